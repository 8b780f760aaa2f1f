//! Postal code resolution from coordinates.
//!
//! [`GeoResolver`] holds an ordered list of [`ZipcodeResolver`] strategies and
//! returns the first location that carries a non-empty zipcode:
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │                GeoResolver                 │
//! │                                            │
//! │  1. Nominatim (free, regional coverage)    │
//! │            │ error / no postcode           │
//! │            ▼                               │
//! │  2. Google Geocoding (only if configured)  │
//! │            │ error / no postcode           │
//! │            ▼                               │
//! │          None                              │
//! └───────────────────────────────────────────┘
//! ```
//!
//! `None` is a normal outcome: callers proceed without market calibration.
//!
//! [`ZipcodeResolver`]: crate::provider::ZipcodeResolver

mod chain;

pub use chain::GeoResolver;
