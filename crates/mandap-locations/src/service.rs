//! The tiered location search engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use mandap_core::{AppError, AppResult};

use crate::model::Location;
use crate::normalize::normalize;
use crate::provider::GeocodeProvider;
use crate::storage::LocationStorage;

const LOCATIONS_FOUND: &str = "Locations found";
const NO_LOCATIONS_FOUND: &str = "No locations found";

/// Configuration for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of rows served from the location cache per query
    /// (default: 20).
    pub cache_result_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_result_cap: 20,
        }
    }
}

impl SearchConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache result cap.
    #[must_use]
    pub fn with_cache_result_cap(mut self, cap: usize) -> Self {
        self.cache_result_cap = cap;
        self
    }
}

/// Outcome of a location search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Caller-facing status message.
    pub message: &'static str,
    /// Matching locations, possibly empty.
    pub locations: Vec<Location>,
}

/// Hybrid location search: cache first, geocoding fallback, cache fill.
pub struct LocationService {
    storage: Arc<dyn LocationStorage>,
    provider: Arc<dyn GeocodeProvider>,
    config: SearchConfig,
}

impl LocationService {
    /// Creates a new location service.
    ///
    /// # Arguments
    ///
    /// * `storage` - The location cache
    /// * `provider` - Geocoding fallback for cache misses
    /// * `config` - Result cap for cache lookups
    #[must_use]
    pub fn new(
        storage: Arc<dyn LocationStorage>,
        provider: Arc<dyn GeocodeProvider>,
        config: SearchConfig,
    ) -> Self {
        Self {
            storage,
            provider,
            config,
        }
    }

    /// Searches locations for a free-text query.
    ///
    /// The cache answers when it has any match, even a partial one; the
    /// geocoding provider is only consulted on a complete miss, and its
    /// normalized results are written back so the next lookup is served
    /// locally. Provider failures degrade to an empty result.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` when the query is shorter than 2 characters
    /// - `AppError::Storage` when the cache lookup fails
    pub async fn search(&self, query: &str) -> AppResult<SearchOutcome> {
        // 1. Reject queries too short to mean anything.
        if query.chars().count() < 2 {
            return Err(AppError::validation(
                "Search query must be at least 2 characters",
            ));
        }

        // 2. The cache answers when it can.
        let cached = self
            .storage
            .search(query, self.config.cache_result_cap)
            .await?;
        if !cached.is_empty() {
            tracing::debug!("Found {} locations in cache for: {}", cached.len(), query);
            return Ok(SearchOutcome {
                message: LOCATIONS_FOUND,
                locations: cached,
            });
        }

        // 3. Complete miss: fall back to the geocoding provider. Failures
        //    degrade to an empty result; the cause stays in the logs.
        let places = match self.provider.search_places(query).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!("Geocoding lookup for {} failed: {}", query, e);
                return Ok(SearchOutcome {
                    message: NO_LOCATIONS_FOUND,
                    locations: Vec::new(),
                });
            }
        };

        // 4. Normalize, silently dropping records without usable parts.
        let locations: Vec<Location> = places.iter().filter_map(normalize).collect();
        if locations.is_empty() {
            tracing::debug!("No usable locations for: {}", query);
            return Ok(SearchOutcome {
                message: NO_LOCATIONS_FOUND,
                locations,
            });
        }

        // 5. Fill the cache. The response is built from the normalized
        //    records either way, so insert failures only get logged.
        let mut inserted = 0usize;
        for location in &locations {
            match self.storage.insert_if_absent(location).await {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Failed to cache location: {}", e),
            }
        }
        tracing::debug!(
            "Cached {} of {} locations for: {}",
            inserted,
            locations.len(),
            query
        );

        Ok(SearchOutcome {
            message: LOCATIONS_FOUND,
            locations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{GeocodeError, PlaceAddress, RawPlace};
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock location cache backed by a plain vector.
    struct MockLocationStorage {
        rows: RwLock<Vec<Location>>,
        fail_inserts: bool,
    }

    impl MockLocationStorage {
        fn new() -> Self {
            Self {
                rows: RwLock::new(Vec::new()),
                fail_inserts: false,
            }
        }

        fn with_rows(rows: Vec<Location>) -> Self {
            Self {
                rows: RwLock::new(rows),
                fail_inserts: false,
            }
        }

        fn failing_inserts() -> Self {
            Self {
                rows: RwLock::new(Vec::new()),
                fail_inserts: true,
            }
        }

        fn len(&self) -> usize {
            self.rows.read().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl LocationStorage for MockLocationStorage {
        async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<Location>> {
            let needle = query.to_lowercase();
            let rows = self.rows.read().unwrap();
            Ok(rows
                .iter()
                .filter(|l| {
                    l.city.to_lowercase().contains(&needle)
                        || l.area.to_lowercase().contains(&needle)
                        || l.district.to_lowercase().contains(&needle)
                        || l.pincode.contains(query)
                })
                .take(limit)
                .cloned()
                .collect())
        }

        async fn insert_if_absent(&self, location: &Location) -> AppResult<bool> {
            if self.fail_inserts {
                return Err(AppError::storage("insert failed"));
            }
            let mut rows = self.rows.write().unwrap();
            if rows.iter().any(|l| {
                l.pincode == location.pincode && l.city == location.city && l.area == location.area
            }) {
                return Ok(false);
            }
            rows.push(location.clone());
            Ok(true)
        }
    }

    /// Mock provider with a scripted response and a call counter.
    struct MockGeocodeProvider {
        places: Vec<RawPlace>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockGeocodeProvider {
        fn returning(places: Vec<RawPlace>) -> Self {
            Self {
                places,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                places: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl GeocodeProvider for MockGeocodeProvider {
        async fn search_places(&self, _query: &str) -> Result<Vec<RawPlace>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GeocodeError::NetworkError("connection refused".to_string()));
            }
            Ok(self.places.clone())
        }
    }

    fn service(
        storage: Arc<MockLocationStorage>,
        provider: Arc<MockGeocodeProvider>,
    ) -> LocationService {
        LocationService::new(storage, provider, SearchConfig::default())
    }

    fn mg_road() -> Location {
        Location {
            pincode: "560001".to_string(),
            city: "Bangalore".to_string(),
            state: "Karnataka".to_string(),
            district: "Bangalore Urban".to_string(),
            area: "MG Road".to_string(),
        }
    }

    fn hebbal_place() -> RawPlace {
        RawPlace {
            address: PlaceAddress {
                village: Some("Hebbal".to_string()),
                state_district: Some("Bangalore Urban".to_string()),
                state: Some("Karnataka".to_string()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_search_rejects_short_query() {
        let storage = Arc::new(MockLocationStorage::new());
        let provider = Arc::new(MockGeocodeProvider::returning(vec![hebbal_place()]));
        let service = service(storage, provider.clone());

        for query in ["", "a"] {
            let err = service.search(query).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }));
            assert!(err.to_string().contains("at least 2 characters"));
        }

        // Rejected queries never reach the provider.
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_serves_cache_without_consulting_provider() {
        let storage = Arc::new(MockLocationStorage::with_rows(vec![mg_road()]));
        let provider = Arc::new(MockGeocodeProvider::returning(vec![hebbal_place()]));
        let service = service(storage, provider.clone());

        let outcome = service.search("Bangalore").await.unwrap();

        assert_eq!(outcome.message, "Locations found");
        assert_eq!(outcome.locations, vec![mg_road()]);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_cache_match_is_case_insensitive() {
        let storage = Arc::new(MockLocationStorage::with_rows(vec![mg_road()]));
        let provider = Arc::new(MockGeocodeProvider::returning(Vec::new()));
        let service = service(storage, provider.clone());

        let outcome = service.search("bangalore").await.unwrap();

        assert_eq!(outcome.locations.len(), 1);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_matches_pincode_substring() {
        let storage = Arc::new(MockLocationStorage::with_rows(vec![mg_road()]));
        let provider = Arc::new(MockGeocodeProvider::returning(Vec::new()));
        let service = service(storage, provider);

        let outcome = service.search("5600").await.unwrap();

        assert_eq!(outcome.locations, vec![mg_road()]);
    }

    #[tokio::test]
    async fn test_search_cache_miss_fills_cache_from_provider() {
        let storage = Arc::new(MockLocationStorage::new());
        let provider = Arc::new(MockGeocodeProvider::returning(vec![hebbal_place()]));
        let service = service(storage.clone(), provider.clone());

        let outcome = service.search("Hebbal").await.unwrap();

        assert_eq!(outcome.message, "Locations found");
        assert_eq!(outcome.locations.len(), 1);
        let hebbal = &outcome.locations[0];
        assert_eq!(hebbal.area, "Hebbal");
        assert_eq!(hebbal.city, "Hebbal");
        assert_eq!(hebbal.district, "Bangalore Urban");
        assert_eq!(hebbal.pincode, "000000");
        assert_eq!(storage.len(), 1);

        // The repeat query is a Tier-1 hit; the provider is not asked again
        // and the cache does not grow.
        let repeat = service.search("Hebbal").await.unwrap();
        assert_eq!(repeat.message, "Locations found");
        assert_eq!(repeat.locations.len(), 1);
        assert_eq!(provider.calls(), 1);
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_search_provider_empty_yields_no_locations() {
        let storage = Arc::new(MockLocationStorage::new());
        let provider = Arc::new(MockGeocodeProvider::returning(Vec::new()));
        let service = service(storage, provider);

        let outcome = service.search("NoSuchPlaceXYZ").await.unwrap();

        assert_eq!(outcome.message, "No locations found");
        assert!(outcome.locations.is_empty());
    }

    #[tokio::test]
    async fn test_search_provider_failure_degrades_to_empty() {
        let storage = Arc::new(MockLocationStorage::new());
        let provider = Arc::new(MockGeocodeProvider::failing());
        let service = service(storage, provider);

        let outcome = service.search("Hebbal").await.unwrap();

        assert_eq!(outcome.message, "No locations found");
        assert!(outcome.locations.is_empty());
    }

    #[tokio::test]
    async fn test_search_drops_unnormalizable_places() {
        let stateless = RawPlace {
            address: PlaceAddress {
                village: Some("Nowhere".to_string()),
                ..Default::default()
            },
        };
        let storage = Arc::new(MockLocationStorage::new());
        let provider = Arc::new(MockGeocodeProvider::returning(vec![
            stateless,
            hebbal_place(),
        ]));
        let service = service(storage.clone(), provider);

        let outcome = service.search("Hebbal").await.unwrap();

        assert_eq!(outcome.locations.len(), 1);
        assert_eq!(outcome.locations[0].area, "Hebbal");
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_search_all_places_dropped_yields_no_locations() {
        let stateless = RawPlace {
            address: PlaceAddress {
                village: Some("Nowhere".to_string()),
                ..Default::default()
            },
        };
        let storage = Arc::new(MockLocationStorage::new());
        let provider = Arc::new(MockGeocodeProvider::returning(vec![stateless]));
        let service = service(storage.clone(), provider);

        let outcome = service.search("Nowhere").await.unwrap();

        assert_eq!(outcome.message, "No locations found");
        assert!(outcome.locations.is_empty());
        assert_eq!(storage.len(), 0);
    }

    #[tokio::test]
    async fn test_search_duplicate_places_cached_once() {
        let storage = Arc::new(MockLocationStorage::new());
        let provider = Arc::new(MockGeocodeProvider::returning(vec![
            hebbal_place(),
            hebbal_place(),
        ]));
        let service = service(storage.clone(), provider);

        let outcome = service.search("Hebbal").await.unwrap();

        // The response mirrors the provider verbatim; only the cache dedups.
        assert_eq!(outcome.locations.len(), 2);
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_search_cache_fill_failure_is_swallowed() {
        let storage = Arc::new(MockLocationStorage::failing_inserts());
        let provider = Arc::new(MockGeocodeProvider::returning(vec![hebbal_place()]));
        let service = service(storage, provider);

        let outcome = service.search("Hebbal").await.unwrap();

        assert_eq!(outcome.message, "Locations found");
        assert_eq!(outcome.locations.len(), 1);
    }

    #[tokio::test]
    async fn test_search_respects_cache_result_cap() {
        let rows: Vec<Location> = (0..5)
            .map(|i| Location {
                pincode: format!("56000{i}"),
                area: format!("Area {i}"),
                ..mg_road()
            })
            .collect();
        let storage = Arc::new(MockLocationStorage::with_rows(rows));
        let provider = Arc::new(MockGeocodeProvider::returning(Vec::new()));
        let service = LocationService::new(
            storage,
            provider,
            SearchConfig::new().with_cache_result_cap(3),
        );

        let outcome = service.search("Bangalore").await.unwrap();

        assert_eq!(outcome.locations.len(), 3);
    }
}
