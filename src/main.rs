use std::sync::Arc;

use home_hero::auth::verifier::{FirebaseCredentials, FirebaseTokenVerifier, TokenVerifier};
use home_hero::config::Config;
use home_hero::db::booking_repository::{BookingRepository, MongoBookingRepository};
use home_hero::db::service_repository::{MongoServiceRepository, ServiceRepository};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "home_hero=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting home-hero server...");

    let config = Config::from_env().expect("Incomplete environment configuration");

    // Identity provider credentials
    let credentials = FirebaseCredentials::from_file(&config.firebase_credentials)
        .expect("Failed to load Firebase credentials");
    let verifier: Arc<dyn TokenVerifier> = Arc::new(FirebaseTokenVerifier::new(credentials));

    // Connect to MongoDB; fail loudly rather than serve degraded traffic.
    let mongo_client = mongodb::Client::with_uri_str(config.mongodb_uri())
        .await
        .expect("Failed to connect to MongoDB");
    mongo_client
        .database("admin")
        .run_command(bson::doc! { "ping": 1 })
        .await
        .expect("MongoDB ping failed");

    let db = mongo_client.database("home_hero");
    let services: Arc<dyn ServiceRepository> = Arc::new(MongoServiceRepository::new(&db));
    let bookings: Arc<dyn BookingRepository> = Arc::new(MongoBookingRepository::new(&db));

    tracing::info!("Connected to MongoDB at {}", config.db_host);

    let app_state = home_hero::state::AppState {
        services,
        bookings,
        verifier,
    };

    let app = home_hero::app::app_router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("home hero server is running on port: {}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
