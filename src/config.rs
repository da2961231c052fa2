//! Run-time settings for the two enrichment pipelines.
//!
//! Values come from builders with the defaults listed on each field; only the
//! climate-data API token has no default and is usually read from the
//! environment with [`AuthToken::from_env`].

use crate::error::EnrichError;
use crate::types::observation_type::ObservationType;
use bon::Builder;
use std::env;
use std::fmt;
use std::time::Duration;

/// Environment variable holding the climate-data API token.
pub const TOKEN_ENV_VAR: &str = "NOAA_TOKEN";

pub const NCEI_BASE_URL: &str = "https://www.ncei.noaa.gov/cdo-web/api/v2";
pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Smallest pause allowed between two amenity queries.
pub const MIN_AMENITY_PACING: Duration = Duration::from_secs(1);

/// Static API token sent with every climate-data request. Redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Reads the token from [`TOKEN_ENV_VAR`].
    pub fn from_env() -> Result<Self, EnrichError> {
        Self::from_env_var(TOKEN_ENV_VAR)
    }

    pub fn from_env_var(var: &str) -> Result<Self, EnrichError> {
        match env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            _ => Err(EnrichError::MissingToken(var.to_string())),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(***)")
    }
}

/// Settings for the weather pipeline (station search, chunked daily fetch, join).
#[derive(Debug, Clone, Builder)]
pub struct WeatherOptions {
    pub token: AuthToken,
    #[builder(default = NCEI_BASE_URL.to_string(), into)]
    pub base_url: String,
    /// Dataset queried for both stations and observations.
    #[builder(default = "GHCND".to_string(), into)]
    pub dataset: String,
    #[builder(default = 50.0)]
    pub radius_km: f64,
    #[builder(default = ObservationType::defaults())]
    pub datatypes: Vec<ObservationType>,
    #[builder(default = 30)]
    pub chunk_days: u32,
    /// Per-request result cap for observation requests.
    #[builder(default = 1000)]
    pub limit: u32,
    #[builder(default = Duration::from_secs(120))]
    pub read_timeout: Duration,
    /// Days added on each side of the event window before querying.
    #[builder(default = 1)]
    pub window_padding_days: i64,
}

/// Settings for the amenity pipeline.
#[derive(Debug, Clone, Builder)]
pub struct AmenityOptions {
    /// OSM `amenity=*` values to look for.
    #[builder(default = default_amenities())]
    pub amenities: Vec<String>,
    #[builder(default = 5.0)]
    pub radius_km: f64,
    #[builder(default = OVERPASS_URL.to_string(), into)]
    pub endpoint: String,
    /// Server-side timeout written into the query header.
    #[builder(default = 25)]
    pub query_timeout_secs: u32,
    /// Pause between successive perimeter queries; never less than [`MIN_AMENITY_PACING`].
    #[builder(default = Duration::from_millis(1200))]
    pub pacing: Duration,
    /// Also match `way` features (reported at their computed center).
    #[builder(default = false)]
    pub include_ways: bool,
}

impl AmenityOptions {
    pub fn radius_m(&self) -> u32 {
        (self.radius_km * 1000.0).max(0.0) as u32
    }

    pub fn effective_pacing(&self) -> Duration {
        self.pacing.max(MIN_AMENITY_PACING)
    }
}

impl Default for AmenityOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_amenities() -> Vec<String> {
    parse_amenity_list("fire_station,hospital,police,school")
}

/// Splits a comma separated list, trimming entries and dropping blanks.
///
/// ```
/// use geo_enrich::parse_amenity_list;
///
/// assert_eq!(parse_amenity_list(" hospital, ,school,"), vec!["hospital", "school"]);
/// ```
pub fn parse_amenity_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect()
}
