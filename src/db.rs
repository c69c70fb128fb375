pub mod booking_repository;
pub mod models;
pub mod service_repository;
