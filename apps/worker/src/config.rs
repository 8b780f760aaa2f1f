use std::time::Duration;

use estimo_core::constants::MARKET_CACHE_TTL_DAYS;
use estimo_core::settings::PopulatorSettings;
use estimo_storage_sqlite::db::get_db_path;

/// Default pause between two scheduled proximity refreshes: one day.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub struct Config {
    pub db_path: String,
    pub zoneval_api_key: Option<String>,
    pub zoneval_api_secret: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub market_cache_ttl_days: i64,
    pub populator: PopulatorSettings,
    pub refresh_interval: Duration,
    pub run_once: bool,
    pub log_format: LogFormat,
    /// Values that could not be parsed and fell back to their default.
    /// Logged once tracing is up.
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();
        let defaults = PopulatorSettings::default();

        let db_path = lookup("ESTIMO_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| get_db_path("./db"));
        let secret = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let populator = PopulatorSettings {
            batch_size: parse_or(&lookup, "ESTIMO_PROXIMITY_BATCH_SIZE", defaults.batch_size, &mut warnings),
            pacing_ms: parse_or(&lookup, "ESTIMO_PROXIMITY_PACING_MS", defaults.pacing_ms, &mut warnings),
            stale_after_days: parse_or(
                &lookup,
                "ESTIMO_PROXIMITY_STALE_DAYS",
                defaults.stale_after_days,
                &mut warnings,
            ),
            limit: parse_or(&lookup, "ESTIMO_PROXIMITY_LIMIT", defaults.limit, &mut warnings),
            ..defaults
        };

        let log_format = match lookup("ESTIMO_LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let run_once = lookup("ESTIMO_RUN_ONCE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            db_path,
            zoneval_api_key: secret("ZONEVAL_API_KEY"),
            zoneval_api_secret: secret("ZONEVAL_API_SECRET"),
            google_maps_api_key: secret("GOOGLE_MAPS_API_KEY"),
            market_cache_ttl_days: parse_or(
                &lookup,
                "ESTIMO_MARKET_CACHE_TTL_DAYS",
                MARKET_CACHE_TTL_DAYS,
                &mut warnings,
            ),
            populator,
            refresh_interval: Duration::from_secs(parse_or(
                &lookup,
                "ESTIMO_PROXIMITY_INTERVAL_SECS",
                DEFAULT_REFRESH_INTERVAL_SECS,
                &mut warnings,
            )),
            run_once,
            log_format,
            warnings,
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    warnings: &mut Vec<String>,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!("Invalid {}={:?}, using default", key, raw));
            default
        }),
        None => default,
    }
}
