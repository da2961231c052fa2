//! Defines the set of daily observation types (GHCND datatype codes) the
//! enrichment can request, and how they map to and from their API codes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A daily observation type, identified by its climate-data API datatype code.
///
/// The well-known types used by the default enrichment have dedicated variants;
/// any other code can still be requested through [`ObservationType::Custom`].
///
/// # Examples
///
/// ```
/// use geo_enrich::ObservationType;
///
/// let tmax: ObservationType = "TMAX".parse().unwrap();
/// assert_eq!(tmax, ObservationType::Tmax);
/// assert_eq!(ObservationType::Wsf2.to_string(), "WSF2");
/// assert_eq!("SNOW".parse::<ObservationType>().unwrap().code(), "SNOW");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObservationType {
    /// Maximum temperature.
    Tmax,
    /// Minimum temperature.
    Tmin,
    /// Precipitation.
    Prcp,
    /// Fastest 2-minute wind speed (max wind gust proxy).
    Wsf2,
    /// Any other datatype code, stored upper-cased.
    Custom(String),
}

impl ObservationType {
    /// The datatype code as sent to, and returned by, the API.
    pub fn code(&self) -> &str {
        match self {
            ObservationType::Tmax => "TMAX",
            ObservationType::Tmin => "TMIN",
            ObservationType::Prcp => "PRCP",
            ObservationType::Wsf2 => "WSF2",
            ObservationType::Custom(code) => code,
        }
    }

    /// Max temp, min temp, precipitation and max wind gust.
    pub fn defaults() -> Vec<ObservationType> {
        vec![
            ObservationType::Tmax,
            ObservationType::Tmin,
            ObservationType::Prcp,
            ObservationType::Wsf2,
        ]
    }
}

impl FromStr for ObservationType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Ok(match code.as_str() {
            "TMAX" => ObservationType::Tmax,
            "TMIN" => ObservationType::Tmin,
            "PRCP" => ObservationType::Prcp,
            "WSF2" => ObservationType::Wsf2,
            _ => ObservationType::Custom(code),
        })
    }
}

impl fmt::Display for ObservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for ObservationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ObservationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(code.parse().unwrap_or(ObservationType::Custom(code)))
    }
}
