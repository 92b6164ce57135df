//! pcjc-import library interface
//!
//! The award-record import pipeline: raw JSON record shape, field
//! normalizers, the idempotent importer, the page fetch/extract tools and
//! the advisory name-variant review. Exposed as a library so the
//! integration tests can drive the pipeline directly.

pub mod importer;
pub mod normalize;
pub mod raw;
pub mod review;
pub mod scrape;

pub use importer::{BatchReport, ImportError, ImportOutcome, Importer};
