//! The shared, retry-aware JSON client and the [`JsonFetcher`] seam the
//! station locator, daily fetcher and amenity query run through.

use crate::http::error::{HttpError, TransportError, TransportErrorKind};
use crate::http::retry::{RawResponse, RetryPolicy};
use bon::Builder;
use log::debug;
use reqwest::{Client, Request};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("geo_enrich/", env!("CARGO_PKG_VERSION"));

/// An idempotent GET request: URL, query parameters (keys may repeat),
/// headers and an optional per-request timeout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// All values given for `key`, in insertion order.
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The first value given for `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query_values(key).into_iter().next()
    }
}

/// Anything that can answer an [`ApiRequest`] with a JSON document.
pub trait JsonFetcher {
    fn get_json(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<Value, HttpError>> + Send;
}

/// Construction-time settings for [`RetryClient`].
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    #[builder(default = DEFAULT_USER_AGENT.to_string(), into)]
    pub user_agent: String,
    #[builder(default = Duration::from_secs(10))]
    pub connect_timeout: Duration,
    /// Tier 1: connection failures and retryable statuses.
    #[builder(default = RetryPolicy::adapter_default())]
    pub adapter_policy: RetryPolicy,
    /// Tier 2: wraps tier 1, retrying timeouts and connection failures that survive it.
    #[builder(default = RetryPolicy::timeout_default())]
    pub timeout_policy: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A pooled HTTP client with two-tier retry, meant to be built once per run
/// and passed by reference to every component that talks to the network.
///
/// # Examples
///
/// ```no_run
/// # use geo_enrich::{ApiRequest, ClientConfig, JsonFetcher, RetryClient, HttpError};
/// # async fn run() -> Result<(), HttpError> {
/// let client = RetryClient::new(ClientConfig::default())?;
/// let request = ApiRequest::new("https://overpass-api.de/api/status");
/// let body = client.get_json(&request).await?;
/// println!("{}", body);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RetryClient {
    client: Client,
    adapter_policy: RetryPolicy,
    timeout_policy: RetryPolicy,
}

impl RetryClient {
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(HttpError::ClientBuild)?;
        Ok(Self {
            client,
            adapter_policy: config.adapter_policy,
            timeout_policy: config.timeout_policy,
        })
    }

    fn prepare(&self, request: &ApiRequest) -> Result<Request, HttpError> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|source| HttpError::InvalidRequest {
            url: request.url.clone(),
            source,
        })
    }

    async fn execute(&self, prepared: &Request) -> Result<RawResponse, TransportError> {
        let request = prepared.try_clone().ok_or_else(|| {
            TransportError::new(TransportErrorKind::Other, "request body cannot be replayed")
        })?;
        let response = self.client.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

impl JsonFetcher for RetryClient {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, HttpError> {
        let prepared = self.prepare(request)?;
        let url = request.url.as_str();
        debug!("GET {}", prepared.url());

        let attempts = AtomicU32::new(0);
        let (this, prepared_ref, attempts_ref) = (self, &prepared, &attempts);
        let outcome = self
            .timeout_policy
            .run(url, move || {
                this.adapter_policy.run(url, move || {
                    attempts_ref.fetch_add(1, Ordering::Relaxed);
                    this.execute(prepared_ref)
                })
            })
            .await;

        match outcome {
            Ok(response) if response.is_success() => {
                serde_json::from_str(&response.body).map_err(|source| HttpError::Decode {
                    url: url.to_string(),
                    source,
                })
            }
            Ok(response) => Err(HttpError::status(url, response.status, &response.body)),
            Err(e) => Err(HttpError::Transport {
                url: url.to_string(),
                attempts: attempts.load(Ordering::Relaxed),
                kind: e.kind,
                message: e.message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_keeps_repeated_keys() {
        let request = ApiRequest::new("http://example.test/data")
            .query("datatypeid", "TMAX")
            .query("datatypeid", "TMIN")
            .query("limit", 1000)
            .header("token", "abc");
        assert_eq!(request.query_values("datatypeid"), vec!["TMAX", "TMIN"]);
        assert_eq!(request.query_value("limit"), Some("1000"));
        assert_eq!(request.query_value("missing"), None);
        assert_eq!(request.headers, vec![("token".to_string(), "abc".to_string())]);
    }

    #[test]
    fn test_prepare_encodes_query() {
        let client = RetryClient::new(ClientConfig::default()).unwrap();
        let request = ApiRequest::new("http://example.test/data")
            .query("datatypeid", "TMAX")
            .query("datatypeid", "PRCP")
            .query("extent", "1.5,-2,3,4");
        let prepared = client.prepare(&request).unwrap();
        assert_eq!(
            prepared.url().query(),
            Some("datatypeid=TMAX&datatypeid=PRCP&extent=1.5%2C-2%2C3%2C4")
        );
    }

    #[test]
    fn test_invalid_header_is_rejected_up_front() {
        let client = RetryClient::new(ClientConfig::default()).unwrap();
        let request = ApiRequest::new("http://example.test").header("bad header", "x");
        assert!(matches!(
            client.prepare(&request),
            Err(HttpError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.adapter_policy, RetryPolicy::adapter_default());
        assert!(config.user_agent.starts_with("geo_enrich/"));
    }
}
