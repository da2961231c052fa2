//! Overpass QL construction and response flattening for amenity lookups.

use crate::amenities::error::AmenityError;
use crate::config::AmenityOptions;
use crate::http::client::{ApiRequest, JsonFetcher};
use crate::types::lat_lon::LatLon;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One OSM feature found near a perimeter.
#[derive(Debug, Clone, PartialEq)]
pub struct Amenity {
    /// `<type>:<id>`, e.g. `node:123`. Unique within OSM only.
    pub osm_id: String,
    pub name: String,
    pub amenity: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub perim_id: usize,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    id: u64,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    center: Option<OverpassCenter>,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds one query returning every feature tagged with any of
/// `options.amenities` within `options.radius_m()` of `origin`.
///
/// ```
/// use geo_enrich::{build_amenity_query, AmenityOptions, LatLon};
///
/// let options = AmenityOptions::builder()
///     .amenities(vec!["hospital".to_string()])
///     .radius_km(1.0)
///     .build();
/// assert_eq!(
///     build_amenity_query(&options, LatLon(34.0, -118.5)),
///     r#"[out:json][timeout:25];(node(around:1000,34,-118.5)["amenity"="hospital"];);out center;"#
/// );
/// ```
pub fn build_amenity_query(options: &AmenityOptions, origin: LatLon) -> String {
    let radius_m = options.radius_m();
    let kinds: &[&str] = if options.include_ways {
        &["node", "way"]
    } else {
        &["node"]
    };
    let filters: String = options
        .amenities
        .iter()
        .flat_map(|amenity| {
            kinds.iter().map(move |kind| {
                format!(
                    r#"{}(around:{},{},{})["amenity"="{}"];"#,
                    kind,
                    radius_m,
                    origin.lat(),
                    origin.lon(),
                    escape(amenity)
                )
            })
        })
        .collect();
    format!(
        "[out:json][timeout:{}];({});out center;",
        options.query_timeout_secs, filters
    )
}

/// Flattens an Overpass JSON document into amenities tagged with `perim_id`.
///
/// Coordinates come from the element itself, or from its `center` for ways.
pub fn parse_amenities(body: Value, perim_id: usize) -> Result<Vec<Amenity>, AmenityError> {
    let response: OverpassResponse =
        serde_json::from_value(body).map_err(AmenityError::UnexpectedResponse)?;
    Ok(response
        .elements
        .into_iter()
        .map(|mut element| {
            let (center_lat, center_lon) = element
                .center
                .as_ref()
                .map_or((None, None), |c| (c.lat, c.lon));
            Amenity {
                osm_id: format!("{}:{}", element.kind, element.id),
                name: element.tags.remove("name").unwrap_or_default(),
                amenity: element.tags.remove("amenity").unwrap_or_default(),
                lat: element.lat.or(center_lat),
                lon: element.lon.or(center_lon),
                perim_id,
            }
        })
        .collect())
}

/// Runs the amenity query around `origin` and returns the matches for `perim_id`.
pub async fn query_amenities<F: JsonFetcher>(
    fetcher: &F,
    options: &AmenityOptions,
    origin: LatLon,
    perim_id: usize,
) -> Result<Vec<Amenity>, AmenityError> {
    let request = ApiRequest::new(options.endpoint.clone())
        .query("data", build_amenity_query(options, origin));
    let body = fetcher.get_json(&request).await?;
    let amenities = parse_amenities(body, perim_id)?;
    debug!("Perimeter {}: {} amenities", perim_id, amenities.len());
    Ok(amenities)
}
