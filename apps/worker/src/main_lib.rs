use std::sync::Arc;

use chrono::Duration;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};
use estimo_core::market_calibration::{
    MarketCalibrationCache, MarketCalibrationService, MarketCalibrationServiceTrait,
    MarketDeviationClassifier,
};
use estimo_core::proximity::{
    ProximityBatchPopulator, ProximityCache, ProximityScorer, ProximityScorerTrait,
};
use estimo_core::settings::{ProximitySettings, ValuationSettings};
use estimo_core::utils::{Clock, SystemClock};
use estimo_core::valuation::{ComparableRetrievalTrait, ValuationPipeline};
use estimo_market_data::{
    GeoResolver, GoogleGeocodingProvider, GooglePlacesProvider, LandmarkSearchProvider,
    MarketStatsProvider, NominatimProvider, ZipcodeResolver, ZonevalProvider,
};
use estimo_storage_sqlite::{
    db::{self, write_actor},
    MarketCacheRepository, PropertyRepository,
};

pub struct AppState {
    pub geo_resolver: Arc<GeoResolver>,
    pub market_calibration: Arc<dyn MarketCalibrationServiceTrait>,
    pub proximity_cache: Arc<ProximityCache>,
    pub proximity_scorer: Arc<ProximityScorer>,
    pub populator: Arc<ProximityBatchPopulator>,
    /// False when no landmark search provider is configured.
    pub landmarks_enabled: bool,
    pub valuation_settings: ValuationSettings,
    pub proximity_settings: ProximitySettings,
}

impl AppState {
    /// Valuation pipeline over the shared services, using `comparables` as
    /// the retrieval backend.
    ///
    /// Entry point for hosts that embed the worker state and serve
    /// `evaluate` themselves. The scheduled worker only refreshes proximity.
    #[allow(dead_code)]
    pub fn valuation_pipeline(
        &self,
        comparables: Arc<dyn ComparableRetrievalTrait>,
    ) -> ValuationPipeline {
        let proximity = self
            .landmarks_enabled
            .then(|| self.proximity_scorer.clone() as Arc<dyn ProximityScorerTrait>);
        ValuationPipeline::new(
            self.geo_resolver.clone(),
            self.market_calibration.clone(),
            comparables,
            proximity,
            self.valuation_settings.clone(),
            self.proximity_settings.clone(),
        )
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also bridges `log` records from the library crates.
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let valuation_settings = ValuationSettings {
        market_cache_ttl_days: config.market_cache_ttl_days,
        ..ValuationSettings::default()
    };
    let proximity_settings = ProximitySettings::default();

    // Market calibration
    let market_cache_repository = Arc::new(MarketCacheRepository::new(pool.clone(), writer.clone()));
    let market_cache = Arc::new(MarketCalibrationCache::with_ttl(
        market_cache_repository,
        clock.clone(),
        Duration::days(valuation_settings.market_cache_ttl_days),
    ));
    let stats_provider: Option<Arc<dyn MarketStatsProvider>> =
        match (&config.zoneval_api_key, &config.zoneval_api_secret) {
            (Some(key), Some(secret)) => {
                Some(Arc::new(ZonevalProvider::new(key.clone(), secret.clone())))
            }
            _ => {
                tracing::warn!(
                    "ZONEVAL_API_KEY/ZONEVAL_API_SECRET not set, market calibration uses cached statistics only"
                );
                None
            }
        };
    let market_calibration: Arc<dyn MarketCalibrationServiceTrait> =
        Arc::new(MarketCalibrationService::new(
            stats_provider,
            market_cache,
            MarketDeviationClassifier::from_settings(&valuation_settings),
        ));

    // Geocoding and landmarks
    let mut resolvers: Vec<Arc<dyn ZipcodeResolver>> = Vec::new();
    resolvers.push(Arc::new(NominatimProvider::new()));
    let landmark_provider: Option<Arc<dyn LandmarkSearchProvider>> =
        match &config.google_maps_api_key {
            Some(key) => {
                resolvers.push(Arc::new(GoogleGeocodingProvider::new(key.clone())));
                Some(Arc::new(GooglePlacesProvider::new(key.clone())))
            }
            None => {
                tracing::warn!(
                    "GOOGLE_MAPS_API_KEY not set, Google geocoding fallback and proximity analysis are disabled"
                );
                None
            }
        };
    let landmarks_enabled = landmark_provider.is_some();
    let geo_resolver = Arc::new(GeoResolver::new(resolvers));
    tracing::info!("Geocoding chain: {:?}", geo_resolver.resolver_ids());

    let proximity_cache = Arc::new(ProximityCache::with_ttl(
        clock.clone(),
        Duration::days(proximity_settings.cache_ttl_days),
    ));
    let proximity_scorer = Arc::new(ProximityScorer::new(
        landmark_provider,
        proximity_cache.clone(),
    ));

    let property_repository = Arc::new(PropertyRepository::new(pool.clone(), writer));
    let populator = Arc::new(ProximityBatchPopulator::new(
        proximity_scorer.clone(),
        property_repository,
        clock,
        config.populator.clone(),
    ));

    Ok(Arc::new(AppState {
        geo_resolver,
        market_calibration,
        proximity_cache,
        proximity_scorer,
        populator,
        landmarks_enabled,
        valuation_settings,
        proximity_settings,
    }))
}
