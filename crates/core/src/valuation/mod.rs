//! Valuation - comparable models, robust aggregation and the orchestrating
//! pipeline.

mod aggregator;
mod valuation_model;
mod valuation_pipeline;
mod valuation_traits;

pub use aggregator::{average_precision, PriceSummary, RobustPriceAggregator};
pub use valuation_model::{
    Comparable, ComparableCriteria, ComparableQuery, ComparableTolerances, PropertyAttributes,
    ValuationResult,
};
pub use valuation_pipeline::ValuationPipeline;
pub use valuation_traits::{ComparableRetrievalTrait, ValuationServiceTrait};
