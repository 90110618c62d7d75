//! Alpha Sigma Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the paper-trading tracker:
//! members, the holdings lifecycle and its return math, the quote cache and
//! the leaderboard. It is database-agnostic and defines repository traits
//! that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod members;
pub mod portfolio;
pub mod quotes;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
