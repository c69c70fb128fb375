use std::sync::Arc;

use crate::auth::verifier::TokenVerifier;
use crate::db::booking_repository::BookingRepository;
use crate::db::service_repository::ServiceRepository;

/// Shared application state, injected into the router.
///
/// Everything behind `Arc<dyn ...>` so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub verifier: Arc<dyn TokenVerifier>,
}
