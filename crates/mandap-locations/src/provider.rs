//! Geocoding provider contract and the Nominatim implementation.
//!
//! When the location cache has no answer for a query, the search engine
//! falls back to an external geocoding service. This module provides:
//!
//! - [`GeocodeProvider`] - The async contract the search engine calls
//! - [`NominatimClient`] - An implementation backed by the OpenStreetMap
//!   Nominatim API
//! - [`GeocodingConfig`] - Endpoint, country filter, result limit, timeout
//! - [`GeocodeError`] - Error types for provider lookups
//!
//! Providers return *raw* address records ([`RawPlace`]); turning those
//! into [`Location`](crate::Location) values is the job of
//! [`normalize`](crate::normalize::normalize). Provider failures never
//! reach callers of the search engine: the caller-visible outcome is an
//! empty result, while the cause (network failure, non-2xx status,
//! malformed payload) stays distinguishable in logs.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// User-Agent sent with every provider request, as required by the
/// Nominatim usage policy.
const USER_AGENT: &str = "MandapServices/1.0";

/// Default base URL of the public OpenStreetMap Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Configuration for the geocoding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim instance (default: the public OSM one).
    pub base_url: Url,

    /// Country name appended to every query for disambiguation
    /// (default: "India").
    pub country: String,

    /// ISO 3166-1 alpha-2 country-code filter (default: "in").
    pub country_code: String,

    /// Maximum number of results requested from the provider (default: 10).
    pub result_limit: u32,

    /// HTTP request timeout (default: 5 seconds).
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            country: "India".to_string(),
            country_code: "in".to_string(),
            result_limit: 10,
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl GeocodingConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the Nominatim instance.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the country name appended to queries.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Sets the country-code filter.
    #[must_use]
    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    /// Sets the maximum number of results requested from the provider.
    #[must_use]
    pub fn with_result_limit(mut self, limit: u32) -> Self {
        self.result_limit = limit;
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn default_base_url() -> Url {
    // Parsing a constant; cannot fail.
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

/// Errors that can occur during a provider lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// A network error occurred while reaching the provider.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The provider returned a non-success status code.
    #[error("HTTP error: status {0}")]
    HttpError(u16),

    /// The provider response could not be parsed.
    #[error("Failed to parse geocoding response: {0}")]
    ParseError(String),
}

/// A raw geocoding result as returned by the provider.
///
/// Only the address component is consumed; everything else in the
/// provider payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlace {
    /// Structured address parts (present when `addressdetails=1`).
    #[serde(default)]
    pub address: PlaceAddress,
}

/// Structured address parts of a raw geocoding result.
///
/// Every field is optional; which ones a record carries depends on the
/// kind of place the provider matched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceAddress {
    pub village: Option<String>,
    pub town: Option<String>,
    pub city: Option<String>,
    pub municipality: Option<String>,
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub locality: Option<String>,
    pub state_district: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
}

/// Contract for external geocoding lookups.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Looks up raw places matching a free-text query.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be reached, answers with
    /// a non-success status, or returns a payload that does not parse.
    async fn search_places(&self, query: &str) -> Result<Vec<RawPlace>, GeocodeError>;
}

/// Geocoding client backed by the OpenStreetMap Nominatim API.
///
/// Sends a single bounded GET per lookup: the query is suffixed with the
/// configured country, filtered by country code, and capped at the
/// configured result limit. No retries.
pub struct NominatimClient {
    /// HTTP client for provider requests.
    http_client: reqwest::Client,
    /// Configuration.
    config: GeocodingConfig,
}

impl NominatimClient {
    /// Creates a new client with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// practice).
    #[must_use]
    pub fn new(config: GeocodingConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            config,
        }
    }

    /// Creates a new client with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(GeocodingConfig::default())
    }

    /// Returns the search endpoint for the configured base URL.
    fn search_url(&self) -> String {
        format!(
            "{}/search",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl GeocodeProvider for NominatimClient {
    async fn search_places(&self, query: &str) -> Result<Vec<RawPlace>, GeocodeError> {
        let url = self.search_url();

        tracing::debug!("Querying geocoding provider for: {}", query);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", format!("{}, {}", query, self.config.country)),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("limit", self.config.result_limit.to_string()),
                ("countrycodes", self.config.country_code.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Geocoding request to {} failed: {}", url, e);
                GeocodeError::NetworkError(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(GeocodeError::HttpError(response.status().as_u16()));
        }

        let places: Vec<RawPlace> = response.json().await.map_err(|e| {
            tracing::warn!("Failed to parse geocoding response: {}", e);
            GeocodeError::ParseError(e.to_string())
        })?;

        tracing::debug!("Geocoding provider returned {} places", places.len());

        Ok(places)
    }
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_places() -> serde_json::Value {
        serde_json::json!([
            {
                "display_name": "Hebbal, Bangalore Urban, Karnataka, India",
                "address": {
                    "village": "Hebbal",
                    "state_district": "Bangalore Urban",
                    "state": "Karnataka",
                    "postcode": "560024"
                }
            },
            {
                "display_name": "Karnataka, India",
                "address": {
                    "state": "Karnataka"
                }
            }
        ])
    }

    fn test_client(mock_server: &MockServer) -> NominatimClient {
        let config = GeocodingConfig::default()
            .with_base_url(Url::parse(&mock_server.uri()).unwrap())
            .with_result_limit(10);
        NominatimClient::new(config)
    }

    #[tokio::test]
    async fn test_search_places_sends_expected_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Hebbal, India"))
            .and(query_param("format", "json"))
            .and(query_param("addressdetails", "1"))
            .and(query_param("limit", "10"))
            .and(query_param("countrycodes", "in"))
            .respond_with(ResponseTemplate::new(200).set_body_json(test_places()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let places = client.search_places("Hebbal").await.unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].address.village.as_deref(), Some("Hebbal"));
        assert_eq!(places[0].address.postcode.as_deref(), Some("560024"));
    }

    #[tokio::test]
    async fn test_search_places_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let err = client.search_places("Hebbal").await.unwrap_err();

        assert!(matches!(err, GeocodeError::HttpError(503)));
    }

    #[tokio::test]
    async fn test_search_places_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let err = client.search_places("Hebbal").await.unwrap_err();

        assert!(matches!(err, GeocodeError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_search_places_network_error() {
        // Start a server to grab a free port, then drop it so the
        // connection is refused. Must be a builder (non-pooled) server:
        // pooled `MockServer::start()` servers keep listening after drop.
        let uri = {
            let mock_server = MockServer::builder().start().await;
            mock_server.uri()
        };

        let config = GeocodingConfig::default().with_base_url(Url::parse(&uri).unwrap());
        let client = NominatimClient::new(config);
        let err = client.search_places("Hebbal").await.unwrap_err();

        assert!(matches!(err, GeocodeError::NetworkError(_)));
    }
}
