pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod api {
    pub mod bookings;
    pub mod errors;
    pub mod services;
}
