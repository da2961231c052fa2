//! Request and response plumbing for the climate-data (NCEI CDO v2) API.

use crate::config::{AuthToken, WeatherOptions};
use crate::http::client::ApiRequest;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Header carrying the API token.
const TOKEN_HEADER: &str = "token";

/// Endpoint root, token and read timeout shared by every climate-data request.
#[derive(Debug, Clone)]
pub struct NceiApi {
    base_url: String,
    token: AuthToken,
    read_timeout: Option<Duration>,
}

impl NceiApi {
    pub fn new(base_url: impl Into<String>, token: AuthToken, read_timeout: Option<Duration>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            read_timeout,
        }
    }

    pub fn from_options(options: &WeatherOptions) -> Self {
        Self::new(
            options.base_url.clone(),
            options.token.clone(),
            Some(options.read_timeout),
        )
    }

    /// A GET request for `path` under the base URL, authenticated and with the read timeout set.
    pub fn request(&self, path: &str) -> ApiRequest {
        ApiRequest::new(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
        .header(TOKEN_HEADER, self.token.expose())
        .timeout(self.read_timeout)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResultSet {
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Metadata {
    #[serde(default)]
    pub resultset: Option<ResultSet>,
}

/// The envelope every list endpoint answers with. An empty match comes back as `{}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NceiResponse<T> {
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T: DeserializeOwned> NceiResponse<T> {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl<T> NceiResponse<T> {
    /// Total matches the server reported, if any.
    pub fn total_count(&self) -> Option<u64> {
        self.metadata
            .as_ref()
            .and_then(|m| m.resultset.as_ref())
            .and_then(|r| r.count)
    }

    /// `true` when the page may not hold every match: it filled the request
    /// limit, or the server reported more matches than it returned.
    pub fn possibly_truncated(&self, limit: u32) -> bool {
        let returned = self.results.len() as u64;
        returned >= u64::from(limit) || self.total_count().is_some_and(|count| count > returned)
    }
}
