//! SQLite storage implementation for Estimo.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `estimo-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The market calibration cache and property proximity repositories
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//! core (domain)     market-data (providers)
//!       │
//!       ▼
//! storage-sqlite (this crate)
//!       │
//!       ▼
//!   SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod market_cache;
pub mod properties;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use market_cache::MarketCacheRepository;
pub use properties::PropertyRepository;

// Re-export from estimo-core for convenience
pub use estimo_core::errors::{DatabaseError, Error, Result};
