//! Defines the data structures representing climate-data API weather stations,
//! as returned by the station search endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents a single weather station returned by the station search endpoint.
///
/// Only `id`, `latitude` and `longitude` are required; the remaining fields are
/// provider metadata and are carried along untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The opaque station identifier (e.g., "GHCND:USW00023062").
    pub id: String,
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
    /// Human readable station name, if reported.
    #[serde(default)]
    pub name: Option<String>,
    /// Elevation, in `elevation_unit`.
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub elevation_unit: Option<String>,
    /// First date with data in the dataset.
    #[serde(default)]
    pub mindate: Option<NaiveDate>,
    /// Last date with data in the dataset.
    #[serde(default)]
    pub maxdate: Option<NaiveDate>,
    /// Fraction (0..=1) of the station's period with data.
    #[serde(default)]
    pub datacoverage: Option<f64>,
}

/// The station chosen for a query origin, together with its great-circle
/// distance from that origin.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestStation {
    pub station: Station,
    pub dist_km: f64,
}
