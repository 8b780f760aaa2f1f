//! Resolver chain that tries geocoding strategies in priority order.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::models::{Coordinates, ResolvedLocation};
use crate::provider::ZipcodeResolver;

/// Cascading reverse geocoder.
///
/// Strategies are sorted by [`ZipcodeResolver::priority`] (lowest first,
/// stable for equal priorities). Unconfigured strategies are skipped. A
/// strategy error or an empty zipcode falls through to the next strategy;
/// nothing is ever propagated to the caller.
///
/// # Example
///
/// ```ignore
/// let resolver = GeoResolver::new(vec![
///     Arc::new(NominatimProvider::new()),
///     Arc::new(GoogleGeocodingProvider::new(api_key)),
/// ]);
///
/// if let Some(location) = resolver.resolve(&Coordinates::new(-23.561, -46.656)).await {
///     println!("{} via {}", location.zipcode, location.source.as_str());
/// }
/// ```
pub struct GeoResolver {
    resolvers: Vec<Arc<dyn ZipcodeResolver>>,
}

impl GeoResolver {
    pub fn new(mut resolvers: Vec<Arc<dyn ZipcodeResolver>>) -> Self {
        resolvers.sort_by_key(|r| r.priority());
        Self { resolvers }
    }

    /// Add a strategy, keeping the chain ordered by priority.
    pub fn add_resolver(&mut self, resolver: Arc<dyn ZipcodeResolver>) {
        self.resolvers.push(resolver);
        self.resolvers.sort_by_key(|r| r.priority());
    }

    /// Identifiers of the strategies in the order they are tried.
    pub fn resolver_ids(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.id()).collect()
    }

    pub async fn resolve(&self, coordinates: &Coordinates) -> Option<ResolvedLocation> {
        debug!(
            "Reverse geocoding coordinates {}, {}",
            coordinates.lat, coordinates.lng
        );

        for resolver in &self.resolvers {
            if !resolver.is_configured() {
                debug!("Skipping unconfigured geocoder {}", resolver.id());
                continue;
            }

            match resolver.reverse_geocode(coordinates).await {
                Ok(location) if !location.zipcode.is_empty() => {
                    info!(
                        "Found zipcode {} via {}",
                        location.zipcode,
                        resolver.id()
                    );
                    return Some(location);
                }
                Ok(_) => {
                    debug!("{} returned a location without zipcode", resolver.id());
                }
                Err(e) => {
                    warn!("{} reverse geocoding failed: {}", resolver.id(), e);
                }
            }
        }

        info!(
            "No zipcode found for coordinates {}, {}",
            coordinates.lat, coordinates.lng
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::errors::ProviderError;
    use crate::models::GeocodingSource;

    enum Answer {
        Zip(&'static str),
        Fail,
    }

    struct MockGeocoder {
        id: &'static str,
        priority: u8,
        configured: bool,
        answer: Answer,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl MockGeocoder {
        fn new(
            id: &'static str,
            priority: u8,
            answer: Answer,
            calls: &Arc<Mutex<Vec<&'static str>>>,
        ) -> Self {
            Self {
                id,
                priority,
                configured: true,
                answer,
                calls: calls.clone(),
            }
        }
    }

    #[async_trait]
    impl ZipcodeResolver for MockGeocoder {
        fn id(&self) -> &'static str {
            self.id
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn reverse_geocode(
            &self,
            _coordinates: &Coordinates,
        ) -> Result<ResolvedLocation, ProviderError> {
            self.calls.lock().unwrap().push(self.id);
            match self.answer {
                Answer::Zip(zip) => Ok(ResolvedLocation {
                    zipcode: zip.to_string(),
                    address: None,
                    neighbourhood: None,
                    city: Some("São Paulo".to_string()),
                    state: Some("SP".to_string()),
                    source: GeocodingSource::Nominatim,
                }),
                Answer::Fail => Err(ProviderError::Timeout {
                    provider: self.id.to_string(),
                }),
            }
        }
    }

    fn point() -> Coordinates {
        Coordinates::new(-23.5614, -46.6559)
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let resolver = GeoResolver::new(vec![
            Arc::new(MockGeocoder::new("SECOND", 2, Answer::Zip("22222222"), &calls)),
            Arc::new(MockGeocoder::new("FIRST", 1, Answer::Zip("11111111"), &calls)),
        ]);

        let location = resolver.resolve(&point()).await.unwrap();
        assert_eq!(location.zipcode, "11111111");
        assert_eq!(*calls.lock().unwrap(), vec!["FIRST"]);
    }

    #[tokio::test]
    async fn test_error_and_empty_zipcode_fall_through() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let resolver = GeoResolver::new(vec![
            Arc::new(MockGeocoder::new("FAILING", 1, Answer::Fail, &calls)),
            Arc::new(MockGeocoder::new("EMPTY", 2, Answer::Zip(""), &calls)),
            Arc::new(MockGeocoder::new("GOOD", 3, Answer::Zip("01310100"), &calls)),
        ]);

        let location = resolver.resolve(&point()).await.unwrap();
        assert_eq!(location.zipcode, "01310100");
        assert_eq!(*calls.lock().unwrap(), vec!["FAILING", "EMPTY", "GOOD"]);
    }

    #[tokio::test]
    async fn test_unconfigured_resolver_is_skipped() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut paid = MockGeocoder::new("PAID", 1, Answer::Zip("99999999"), &calls);
        paid.configured = false;
        let resolver = GeoResolver::new(vec![
            Arc::new(paid),
            Arc::new(MockGeocoder::new("FREE", 2, Answer::Zip("01310100"), &calls)),
        ]);

        let location = resolver.resolve(&point()).await.unwrap();
        assert_eq!(location.zipcode, "01310100");
        assert_eq!(*calls.lock().unwrap(), vec!["FREE"]);
    }

    #[tokio::test]
    async fn test_all_failing_returns_none() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut resolver = GeoResolver::new(vec![]);
        resolver.add_resolver(Arc::new(MockGeocoder::new("B", 2, Answer::Fail, &calls)));
        resolver.add_resolver(Arc::new(MockGeocoder::new("A", 1, Answer::Fail, &calls)));
        assert_eq!(resolver.resolver_ids(), vec!["A", "B"]);

        assert!(resolver.resolve(&point()).await.is_none());
        assert_eq!(calls.lock().unwrap().len(), 2);
    }
}
