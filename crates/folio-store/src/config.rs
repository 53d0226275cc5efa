//! Store configuration.
//!
//! All connection parameters live in an explicit [`StoreConfig`] value
//! constructed once by the caller and handed to
//! [`StoreContext`](crate::StoreContext). There is no ambient global
//! client or module-level configuration.

use std::time::Duration;

/// Connection and behavior parameters for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// API origin of the store, e.g. `https://content.example.com`.
    pub endpoint: String,
    pub project_id: String,
    pub dataset: String,
    /// Dated API version segment of the query path.
    pub api_version: String,
    /// Origin of the asset-delivery endpoint; defaults to `endpoint`.
    pub asset_endpoint: String,
    pub token: Option<String>,
    /// Default per-request deadline.
    pub timeout: Duration,
    /// TTL of the read-through query cache; `None` disables caching.
    pub cache_ttl: Option<Duration>,
}

pub const DEFAULT_API_VERSION: &str = "2024-03-01";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl StoreConfig {
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_owned();
        Self {
            asset_endpoint: endpoint.clone(),
            endpoint,
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_asset_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.asset_endpoint = endpoint.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub(crate) fn query_url(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.endpoint, self.api_version, self.dataset
        )
    }
}
