//! Classification of an estimate against the regional benchmark and bounded
//! refinement of the estimate.

use estimo_market_data::RegionalStatsSet;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::calibration_model::{
    InsightType, MarketInsight, MarketReality, MarketValidation, RefinedPrice,
};
use crate::constants::*;
use crate::settings::ValuationSettings;

/// Classifies market deviation and refines prices.
///
/// # Example
///
/// ```
/// use estimo_core::market_calibration::{MarketDeviationClassifier, MarketReality};
/// use rust_decimal_macros::dec;
///
/// let classifier = MarketDeviationClassifier::default();
/// assert_eq!(classifier.classify(dec!(25)), MarketReality::AboveMarket);
/// assert_eq!(classifier.classify(dec!(-15)), MarketReality::WithinMarket);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketDeviationClassifier {
    band_percent: Decimal,
    confidence_threshold: u8,
    max_adjustment_factor: Decimal,
}

impl Default for MarketDeviationClassifier {
    fn default() -> Self {
        Self {
            band_percent: MARKET_DEVIATION_BAND_PERCENT,
            confidence_threshold: REFINEMENT_CONFIDENCE_THRESHOLD,
            max_adjustment_factor: MAX_ADJUSTMENT_FACTOR,
        }
    }
}

impl MarketDeviationClassifier {
    pub fn from_settings(settings: &ValuationSettings) -> Self {
        Self {
            band_percent: settings.deviation_band_percent,
            confidence_threshold: settings.confidence_threshold,
            max_adjustment_factor: settings.max_adjustment_factor,
        }
    }

    pub fn classify(&self, deviation_percent: Decimal) -> MarketReality {
        if deviation_percent > self.band_percent {
            MarketReality::AboveMarket
        } else if deviation_percent < -self.band_percent {
            MarketReality::BelowMarket
        } else {
            MarketReality::WithinMarket
        }
    }

    /// Confidence from the sample support of the three lower granularities.
    ///
    /// The state level never contributes.
    pub fn confidence(stats: &RegionalStatsSet) -> u8 {
        let mut confidence = CONFIDENCE_BASE;
        if stats.zipcode.global.has_data() {
            confidence += CONFIDENCE_ZIPCODE_WEIGHT;
        }
        if stats.neighbourhood.global.has_data() {
            confidence += CONFIDENCE_NEIGHBOURHOOD_WEIGHT;
        }
        if stats.city.global.has_data() {
            confidence += CONFIDENCE_CITY_WEIGHT;
        }
        confidence.min(CONFIDENCE_MAX)
    }

    /// Compare an estimate with the zipcode-level median price per area.
    ///
    /// Returns `None` when the area or the benchmark is not positive, since no
    /// meaningful deviation exists then.
    pub fn build_validation(
        &self,
        stats: &RegionalStatsSet,
        estimated_price: Decimal,
        area: Decimal,
    ) -> Option<MarketValidation> {
        let median = stats.zipcode_price_per_area_median();
        if area <= Decimal::ZERO || median <= Decimal::ZERO {
            return None;
        }

        let estimate = estimated_price.checked_div(area)?;
        let deviation = (estimate - median)
            .checked_div(median)?
            .checked_mul(dec!(100))?
            .round_dp_with_strategy(
                DEVIATION_DECIMAL_PRECISION,
                RoundingStrategy::MidpointAwayFromZero,
            );

        Some(MarketValidation {
            zipcode: stats.zipcode,
            neighbourhood: stats.neighbourhood,
            city: stats.city,
            state: stats.state,
            confidence: Self::confidence(stats),
            price_per_area_estimate: estimate,
            price_per_area_median: median,
            market_reality: self.classify(deviation),
            market_deviation_percent: deviation,
        })
    }

    /// Apply a bounded, confidence-gated correction to `original_price`.
    ///
    /// Corrections never exceed `max_adjustment_factor` of the original price.
    /// A within-market estimate always carries an informational insight, while
    /// a low-confidence out-of-band estimate carries none.
    pub fn refine(&self, validation: &MarketValidation, original_price: Decimal) -> RefinedPrice {
        let deviation = validation.market_deviation_percent.abs();
        let confident = validation.confidence > self.confidence_threshold;

        match validation.market_reality {
            MarketReality::AboveMarket if confident => {
                let factor = self.adjustment_factor(deviation);
                RefinedPrice {
                    refined_price: round_currency(original_price * (Decimal::ONE - factor)),
                    insight: Some(MarketInsight {
                        insight_type: InsightType::AboveMarketAdjustment,
                        message: format!(
                            "Estimated price is {}% above the local market. Adjusted down by {}%.",
                            deviation,
                            (factor * dec!(100)).normalize()
                        ),
                    }),
                }
            }
            MarketReality::BelowMarket if confident => {
                let factor = self.adjustment_factor(deviation);
                RefinedPrice {
                    refined_price: round_currency(original_price * (Decimal::ONE + factor)),
                    insight: Some(MarketInsight {
                        insight_type: InsightType::BelowMarketAdjustment,
                        message: format!(
                            "Estimated price is {}% below the local market. Adjusted up by {}%.",
                            deviation,
                            (factor * dec!(100)).normalize()
                        ),
                    }),
                }
            }
            MarketReality::WithinMarket => RefinedPrice {
                refined_price: original_price,
                insight: Some(MarketInsight {
                    insight_type: InsightType::WithinMarket,
                    message: format!(
                        "Estimated price is in line with the local market (±{}% deviation).",
                        deviation
                    ),
                }),
            },
            _ => RefinedPrice {
                refined_price: original_price,
                insight: None,
            },
        }
    }

    fn adjustment_factor(&self, deviation_abs: Decimal) -> Decimal {
        (deviation_abs / dec!(100)).min(self.max_adjustment_factor)
    }
}

fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
