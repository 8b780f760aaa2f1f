//! SQLite storage implementation for property proximity snapshots.

mod model;
mod repository;

pub use model::{PropertyDB, ProximityChangesetDB};
pub use repository::PropertyRepository;
