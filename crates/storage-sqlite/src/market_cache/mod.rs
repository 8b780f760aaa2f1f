//! SQLite storage implementation for the market calibration cache.

mod model;
mod repository;

pub use model::MarketCacheDB;
pub use repository::MarketCacheRepository;
