//! API endpoint handlers

pub mod awards;
pub mod health;

pub use awards::award_routes;
pub use health::health_routes;
