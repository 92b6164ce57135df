//! Database schema, models and queries

pub mod init;
pub mod migrations;
pub mod models;
pub mod queries;

pub use init::*;
pub use migrations::*;
pub use models::*;
pub use queries::*;
