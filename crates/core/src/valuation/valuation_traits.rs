use async_trait::async_trait;

use super::valuation_model::{Comparable, ComparableQuery, PropertyAttributes, ValuationResult};
use crate::errors::Result;

/// External service returning listings similar to the criteria.
#[async_trait]
pub trait ComparableRetrievalTrait: Send + Sync {
    async fn find(&self, query: &ComparableQuery) -> Result<Vec<Comparable>>;
}

/// Trait for valuation operations
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    async fn evaluate(&self, attributes: &PropertyAttributes) -> Result<ValuationResult>;
}
