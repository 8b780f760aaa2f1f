//! Tunable parameters of the valuation, proximity and populator components.

mod settings_model;

pub use settings_model::{PopulatorSettings, ProximitySettings, ValuationSettings};
