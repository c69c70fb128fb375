use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use home_hero::app::app_router;
use home_hero::auth::models::AuthenticatedUser;
use home_hero::auth::verifier::TokenVerifier;
use home_hero::db::booking_repository::{BookingRepository, MongoBookingRepository};
use home_hero::db::service_repository::{MongoServiceRepository, ServiceRepository};
use home_hero::error::AppError;
use home_hero::state::AppState;

/// The one bearer token the test verifier accepts.
pub const TEST_TOKEN: &str = "valid-test-token";

/// Verifier that accepts exactly [`TEST_TOKEN`], standing in for the
/// identity provider.
struct StaticTokenVerifier;

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify_id_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        if token == TEST_TOKEN {
            Ok(AuthenticatedUser {
                user_id: "test-uid".to_string(),
                email: "tester@example.com".to_string(),
            })
        } else {
            Err(AppError::Auth("Token rejected".into()))
        }
    }
}

/// Holds the running Mongo container and provides the router for
/// integration tests.
///
/// The container is kept alive for as long as this struct lives and is
/// cleaned up automatically on drop.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub router: Router,
    pub services: Arc<dyn ServiceRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl TestEnv {
    /// Spin up MongoDB and build a router wired to real repositories and
    /// the static test verifier.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");
        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);

        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("home_hero_test");

        let services: Arc<dyn ServiceRepository> = Arc::new(MongoServiceRepository::new(&mongo_db));
        let bookings: Arc<dyn BookingRepository> = Arc::new(MongoBookingRepository::new(&mongo_db));

        let app_state = AppState {
            services: services.clone(),
            bookings: bookings.clone(),
            verifier: Arc::new(StaticTokenVerifier),
        };

        Self {
            _mongo: mongo_container,
            router: app_router(app_state),
            services,
            bookings,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for
    /// error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: create a service via the API and return its assigned id.
    pub async fn create_service(
        &self,
        server: &axum_test::TestServer,
        body: serde_json::Value,
    ) -> String {
        let response = server
            .post("/services")
            .authorization_bearer(TEST_TOKEN)
            .json(&body)
            .await;
        let ack: serde_json::Value = response.json();
        assert_eq!(ack["acknowledged"], true);
        ack["insertedId"]
            .as_str()
            .expect("insert ack carries the new id")
            .to_string()
    }
}
