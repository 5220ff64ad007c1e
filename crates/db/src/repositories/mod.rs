//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod correlation_repo;

pub use correlation_repo::CorrelationRepo;
