use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use moka::future::Cache;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::ApiError;
use crate::config::ApiConfig;
use crate::observability::{ApiMetrics, ApiStats};

/// Rate-limited JSON client for the workflow API.
///
/// GET responses may be cached for a short TTL. Any mutation clears the
/// whole cache, so a reload issued after a mutation always reaches the server.
#[derive(Debug)]
pub struct RateLimitedHttpClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    cache: Option<Cache<String, Value>>,
    metrics: Arc<ApiMetrics>,
}

impl RateLimitedHttpClient {
    pub fn new(settings: &ApiConfig) -> Result<Self, ApiError> {
        let per_second = NonZeroU32::new(settings.rate_limit.requests_per_second).ok_or_else(|| {
            ApiError::InvalidConfig {
                message: "rate_limit.requests_per_second must be greater than zero".to_string(),
            }
        })?;
        let burst = NonZeroU32::new(settings.rate_limit.burst_capacity).unwrap_or(per_second);
        let rate_limiter = Arc::new(RateLimiter::direct(
            Quota::per_second(per_second).allow_burst(burst),
        ));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| ApiError::InvalidConfig {
                message: e.to_string(),
            })?;

        // Url::join drops the last path segment unless the base ends with '/'
        let base = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidConfig {
            message: format!("invalid base_url '{}': {e}", settings.base_url),
        })?;

        let cache = (settings.cache_ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(settings.cache_ttl_seconds))
                .build()
        });

        Ok(Self {
            http,
            base_url,
            token: settings.token.clone(),
            rate_limiter,
            cache,
            metrics: Arc::new(ApiMetrics::new()),
        })
    }

    /// Resolve a path relative to the configured base URL
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidConfig {
                message: format!("invalid endpoint '{path}': {e}"),
            })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(name, value)| (*name, value.as_str())));
        }
        Ok(url)
    }

    /// GET a JSON resource, served from cache when enabled
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        let cache_key = url.to_string();

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                self.metrics.record_cache_hit();
                debug!(url = %cache_key, "Cache hit");
                return Ok(serde_json::from_value(cached)?);
            }
            self.metrics.record_cache_miss();
        }

        let value = self.execute(Method::GET, url, None::<&()>).await?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, value.clone()).await;
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Send a JSON body with a mutating method. Clears the read cache
    /// whether or not the call succeeds.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path, &[])?;
        let result = self.execute(method, url, Some(body)).await;
        self.clear_cache().await;
        result
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;
        self.metrics.record_request();

        let resource = url.path().to_string();
        debug!(method = %method, resource = %resource, "Sending workflow API request");

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            self.metrics.record_error();
            ApiError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            self.metrics.record_error();
            ApiError::from(e)
        })?;

        if !status.is_success() {
            self.metrics.record_error();
            if status.as_u16() == 429 {
                self.metrics.record_rate_limit_hit();
            }
            return Err(ApiError::from_status(status.as_u16(), &resource, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Drop all cached reads
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            debug!("Workflow API cache cleared");
        }
    }

    pub fn metrics(&self) -> &ApiMetrics {
        &self.metrics
    }

    pub fn stats(&self) -> ApiStats {
        self.metrics.get_stats()
    }

    pub fn log_stats(&self) {
        self.metrics.log_stats();
        info!(base_url = %self.base_url, "Workflow API client statistics logged");
    }
}
