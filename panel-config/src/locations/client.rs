//! Transit locations API client.
//!
//! Searches stops by name and normalizes the results into [`Station`]s.

use std::future::Future;

use tracing::debug;

use crate::domain::Station;

use super::error::LocationsError;
use super::normalize::normalize_results;
use super::types::{LocationItem, LocationsQuery};

/// Default base URL for the locations API.
pub const DEFAULT_BASE_URL: &str = "https://v6.bvg.transport.rest";

/// Default number of results per search.
const DEFAULT_RESULTS: u32 = 10;

/// Anything that can turn a search string into stations.
///
/// Implemented by the HTTP client and its cache; tests substitute their own.
pub trait StationSource: Send + Sync + 'static {
    fn search_stations(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Station>, LocationsError>> + Send;
}

/// Configuration for the locations client.
#[derive(Debug, Clone)]
pub struct LocationsConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Results requested per search
    pub results: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LocationsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            results: DEFAULT_RESULTS,
            timeout_secs: 10,
        }
    }
}

impl LocationsConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_results(mut self, results: u32) -> Self {
        self.results = results;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the transit locations API.
#[derive(Debug, Clone)]
pub struct LocationsClient {
    http: reqwest::Client,
    base_url: String,
    results: u32,
}

impl LocationsClient {
    /// Create a new locations client.
    pub fn new(config: LocationsConfig) -> Result<Self, LocationsError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("panel-config/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            results: config.results,
        })
    }

    /// Fetch the raw search results for a query.
    pub async fn search_raw(&self, query: &str) -> Result<Vec<LocationItem>, LocationsError> {
        let url = format!("{}/locations", self.base_url);
        let params = LocationsQuery::stops(query).with_results(self.results);

        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LocationsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LocationsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| LocationsError::Json {
            message: e.to_string(),
        })
    }
}

impl StationSource for LocationsClient {
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, LocationsError> {
        let items = self.search_raw(query).await?;
        let stations = normalize_results(&items);
        debug!(query, found = stations.len(), "locations search");
        Ok(stations)
    }
}
