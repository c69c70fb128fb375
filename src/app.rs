use axum::handler::Handler;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{bookings, services};
use crate::auth::middleware::require_auth;
use crate::state::AppState;

/// `GET /` — liveness probe.
pub async fn liveness() -> &'static str {
    "home hero server is running now"
}

/// Build the application router.
///
/// The auth guard is attached per method registration, so which routes are
/// protected is decided here, route by route, rather than by a global
/// toggle. An open deployment builds its own router from the same handlers
/// without attaching the guard.
pub fn app_router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route("/", get(liveness))
        .route(
            "/services",
            get(services::list_services).post(services::create_service.layer(auth.clone())),
        )
        .route("/top-rated-services", get(services::top_rated_services))
        .route("/my-services", get(services::my_services.layer(auth.clone())))
        .route(
            "/services/{id}",
            get(services::get_service.layer(auth.clone()))
                .patch(services::update_service.layer(auth.clone()))
                .delete(services::delete_service.layer(auth.clone())),
        )
        .route(
            "/services/{id}/reviews",
            post(services::add_review.layer(auth.clone())),
        )
        .route(
            "/bookings",
            get(bookings::list_bookings.layer(auth.clone()))
                .post(bookings::create_booking.layer(auth.clone())),
        )
        .route(
            "/bookings/{service_id}",
            get(bookings::bookings_by_service).delete(bookings::delete_booking.layer(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
