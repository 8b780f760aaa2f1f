//! Estimo Core - Domain entities, services, and traits.
//!
//! This crate contains the valuation refinement pipeline. It is
//! database-agnostic and defines repository traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod market_calibration;
pub mod proximity;
pub mod settings;
pub mod utils;
pub mod valuation;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
