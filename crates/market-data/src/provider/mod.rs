//! External provider abstractions and implementations.
//!
//! This module contains:
//! - The capability traits every provider implements
//!   (`ZipcodeResolver`, `MarketStatsProvider`, `LandmarkSearchProvider`)
//! - Concrete HTTP providers (Nominatim, Google, Zoneval)
//!
//! # Architecture
//!
//! The provider system is designed to be:
//! - **Provider-agnostic**: Callers only see the capability traits
//! - **Extensible**: New providers can be added by implementing a trait
//! - **Fail-soft**: Every failure is returned as a typed [`ProviderError`](crate::errors::ProviderError)
//!   instead of escaping as a panic

mod traits;

pub mod google;
pub mod nominatim;
pub mod zoneval;

// Re-exports
pub use traits::{LandmarkSearchProvider, MarketStatsProvider, ZipcodeResolver};
