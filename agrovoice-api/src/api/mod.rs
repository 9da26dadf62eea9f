//! HTTP API handlers for agrovoice-api

pub mod analyze;
pub mod health;

pub use analyze::analyze;
pub use health::health_routes;
