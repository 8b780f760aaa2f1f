use std::sync::Arc;

use async_trait::async_trait;
use estimo_market_data::{strip_non_digits, MarketStatsProvider, RegionalStatsSet};
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::calibration_model::{MarketValidation, MarketValidationOutcome};
use super::calibration_traits::{MarketCalibrationCacheTrait, MarketCalibrationServiceTrait};
use super::deviation_classifier::MarketDeviationClassifier;
use crate::constants::ZIPCODE_LENGTH;
use crate::errors::ValidationError;

/// Reduce a raw postal code to its digits and check its length.
///
/// # Examples
///
/// ```
/// use estimo_core::market_calibration::normalize_zipcode;
///
/// assert_eq!(normalize_zipcode("01310-100").unwrap(), "01310100");
/// assert!(normalize_zipcode("123").is_err());
/// ```
pub fn normalize_zipcode(raw: &str) -> Result<String, ValidationError> {
    let digits = strip_non_digits(raw);
    if digits.len() == ZIPCODE_LENGTH {
        Ok(digits)
    } else {
        Err(ValidationError::InvalidZipcode(raw.to_string()))
    }
}

/// Service deriving regional benchmarks and market validations.
///
/// The cache is always consulted first. The provider is only called on a
/// miss, and a successful answer is written through to the cache. Every
/// failure degrades to `None`.
pub struct MarketCalibrationService {
    provider: Option<Arc<dyn MarketStatsProvider>>,
    cache: Arc<dyn MarketCalibrationCacheTrait>,
    classifier: MarketDeviationClassifier,
}

impl MarketCalibrationService {
    pub fn new(
        provider: Option<Arc<dyn MarketStatsProvider>>,
        cache: Arc<dyn MarketCalibrationCacheTrait>,
        classifier: MarketDeviationClassifier,
    ) -> Self {
        if !provider.as_ref().is_some_and(|p| p.is_configured()) {
            warn!("Market statistics provider not configured, only cached statistics will be used");
        }
        Self {
            provider,
            cache,
            classifier,
        }
    }

    pub fn classifier(&self) -> &MarketDeviationClassifier {
        &self.classifier
    }

    fn normalized(zipcode: &str) -> Option<String> {
        match normalize_zipcode(zipcode) {
            Ok(zip) => Some(zip),
            Err(e) => {
                warn!("Skipping market calibration: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl MarketCalibrationServiceTrait for MarketCalibrationService {
    async fn lookup_stats(&self, zipcode: &str) -> Option<RegionalStatsSet> {
        let zipcode = Self::normalized(zipcode)?;

        if let Some(stats) = self.cache.get(&zipcode).await {
            debug!("Using cached market stats for {}", zipcode);
            return Some(stats);
        }

        let provider = match &self.provider {
            Some(p) if p.is_configured() => p,
            _ => {
                debug!("No market stats provider available for {}", zipcode);
                return None;
            }
        };

        info!("Fetching market stats for {} from {}", zipcode, provider.id());
        match provider.fetch_stats(&zipcode).await {
            Ok(stats) => {
                self.cache.put(&zipcode, &stats).await;
                Some(stats)
            }
            Err(e) => {
                warn!(
                    "{} stats lookup for {} failed ({}): {}",
                    provider.id(),
                    zipcode,
                    e.kind().as_str(),
                    e
                );
                None
            }
        }
    }

    async fn get_regional_price_per_area(&self, zipcode: &str) -> Option<Decimal> {
        let stats = self.lookup_stats(zipcode).await?;
        let median = stats.zipcode_price_per_area_median();
        (median > Decimal::ZERO).then_some(median)
    }

    async fn evaluate(
        &self,
        zipcode: &str,
        estimated_price: Decimal,
        area: Decimal,
    ) -> Option<MarketValidation> {
        let stats = self.lookup_stats(zipcode).await?;
        self.classifier.build_validation(&stats, estimated_price, area)
    }

    async fn validate(
        &self,
        zipcode: &str,
        estimated_price: Decimal,
        area: Decimal,
    ) -> MarketValidationOutcome {
        match self.lookup_stats(zipcode).await {
            Some(stats) => self.validate_with_stats(&stats, estimated_price, area),
            None => MarketValidationOutcome::unavailable(estimated_price),
        }
    }

    fn validate_with_stats(
        &self,
        stats: &RegionalStatsSet,
        estimated_price: Decimal,
        area: Decimal,
    ) -> MarketValidationOutcome {
        let Some(validation) = self
            .classifier
            .build_validation(stats, estimated_price, area)
        else {
            debug!("No usable benchmark for market validation");
            return MarketValidationOutcome::unavailable(estimated_price);
        };

        let refined = self.classifier.refine(&validation, estimated_price);
        info!(
            "Market validation: {} ({}%), confidence {}",
            validation.market_reality.as_str(),
            validation.market_deviation_percent,
            validation.confidence
        );

        MarketValidationOutcome {
            validation: Some(validation),
            insight: refined.insight,
            refined_price: refined.refined_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use estimo_market_data::{ProviderError, RegionalStats, RegionalStatsGroup};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::market_calibration::{InsightType, MarketReality};

    #[derive(Default)]
    struct MockCache {
        entries: Mutex<HashMap<String, RegionalStatsSet>>,
        puts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MarketCalibrationCacheTrait for MockCache {
        async fn get(&self, zipcode: &str) -> Option<RegionalStatsSet> {
            self.entries.lock().unwrap().get(zipcode).copied()
        }

        async fn put(&self, zipcode: &str, stats: &RegionalStatsSet) {
            self.puts.lock().unwrap().push(zipcode.to_string());
            self.entries
                .lock()
                .unwrap()
                .insert(zipcode.to_string(), *stats);
        }
    }

    enum Reply {
        Stats(RegionalStatsSet),
        RateLimited,
    }

    struct MockProvider {
        reply: Reply,
        configured: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl MarketStatsProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK_STATS"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn fetch_stats(&self, zipcode: &str) -> Result<RegionalStatsSet, ProviderError> {
            self.calls.lock().unwrap().push(zipcode.to_string());
            match &self.reply {
                Reply::Stats(stats) => Ok(*stats),
                Reply::RateLimited => Err(ProviderError::RateLimited {
                    provider: "MOCK_STATS".to_string(),
                }),
            }
        }
    }

    fn stats(median: Decimal) -> RegionalStatsSet {
        let group = RegionalStatsGroup {
            global: RegionalStats {
                average: dec!(450000),
                median: dec!(420000),
                support: 25,
            },
            per_area: RegionalStats {
                average: median,
                median,
                support: 25,
            },
            per_room: RegionalStats::default(),
        };
        RegionalStatsSet {
            zipcode: group,
            neighbourhood: group,
            city: group,
            state: group,
        }
    }

    fn service(
        reply: Reply,
        cache: Arc<MockCache>,
    ) -> (MarketCalibrationService, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let provider = MockProvider {
            reply,
            configured: true,
            calls: calls.clone(),
        };
        (
            MarketCalibrationService::new(
                Some(Arc::new(provider)),
                cache,
                MarketDeviationClassifier::default(),
            ),
            calls,
        )
    }

    #[test]
    fn test_normalize_zipcode() {
        assert_eq!(normalize_zipcode("01310-100").unwrap(), "01310100");
        assert_eq!(normalize_zipcode(" 22.041-001 ").unwrap(), "22041001");
        assert!(matches!(
            normalize_zipcode("123"),
            Err(ValidationError::InvalidZipcode(_))
        ));
        assert!(normalize_zipcode("013101000").is_err());
    }

    #[test]
    fn test_normalized_zipcode_matches_provider_width() {
        assert_eq!(crate::constants::ZIPCODE_LENGTH, estimo_market_data::ZIPCODE_LENGTH);
        assert_eq!(
            normalize_zipcode("01310-100").unwrap().len(),
            estimo_market_data::ZIPCODE_LENGTH
        );
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let cache = Arc::new(MockCache::default());
        cache
            .entries
            .lock()
            .unwrap()
            .insert("01310100".to_string(), stats(dec!(8800)));
        let (service, calls) = service(Reply::Stats(stats(dec!(1))), cache);

        let median = service.get_regional_price_per_area("01310-100").await;
        assert_eq!(median, Some(dec!(8800)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_miss_fetches_and_writes_through() {
        let cache = Arc::new(MockCache::default());
        let (service, calls) = service(Reply::Stats(stats(dec!(8000))), cache.clone());

        let validation = service
            .evaluate("01310100", dec!(880000), dec!(100))
            .await
            .unwrap();
        assert_eq!(validation.market_deviation_percent, dec!(10));
        assert_eq!(validation.market_reality, MarketReality::WithinMarket);
        assert_eq!(*calls.lock().unwrap(), vec!["01310100"]);
        assert_eq!(*cache.puts.lock().unwrap(), vec!["01310100"]);

        // second lookup is served from the cache
        service.evaluate("01310100", dec!(880000), dec!(100)).await;
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_zipcode_skips_calibration() {
        let cache = Arc::new(MockCache::default());
        let (service, calls) = service(Reply::Stats(stats(dec!(8000))), cache);

        assert!(service.evaluate("123", dec!(500000), dec!(80)).await.is_none());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_returns_original_price() {
        let cache = Arc::new(MockCache::default());
        let (service, _) = service(Reply::RateLimited, cache.clone());

        let outcome = service.validate("01310100", dec!(500000), dec!(80)).await;
        assert_eq!(outcome, MarketValidationOutcome::unavailable(dec!(500000)));
        assert!(cache.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_not_called() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let provider = MockProvider {
            reply: Reply::Stats(stats(dec!(8000))),
            configured: false,
            calls: calls.clone(),
        };
        let service = MarketCalibrationService::new(
            Some(Arc::new(provider)),
            Arc::new(MockCache::default()),
            MarketDeviationClassifier::default(),
        );

        assert!(service.lookup_stats("01310100").await.is_none());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validate_refines_above_market() {
        let cache = Arc::new(MockCache::default());
        let (service, _) = service(Reply::Stats(stats(dec!(4000))), cache);

        let outcome = service.validate("01310100", dec!(500000), dec!(100)).await;
        assert_eq!(outcome.refined_price, dec!(450000));
        assert_eq!(outcome.validation.map(|v| v.confidence), Some(100));
        assert_eq!(
            outcome.insight.map(|i| i.insight_type),
            Some(InsightType::AboveMarketAdjustment)
        );
    }
}
