//! # PCJC Common Library
//!
//! Shared code for the pcjc award services including:
//! - Database schema, models and queries
//! - Award number validation
//! - Configuration loading and root folder resolution
//! - Error types

pub mod award_num;
pub mod config;
pub mod db;
pub mod error;

pub use award_num::AwardNum;
pub use error::{Error, Result};
