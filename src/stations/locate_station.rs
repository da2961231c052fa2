//! Finds the weather station nearest to a point among those the climate-data
//! API reports inside a bounding box for a date range.

use crate::distance::{bbox_from_point, distance_km};
use crate::http::client::JsonFetcher;
use crate::ncei::{NceiApi, NceiResponse};
use crate::stations::error::LocateStationError;
use crate::types::lat_lon::LatLon;
use crate::types::station::{NearestStation, Station};
use bon::Builder;
use chrono::NaiveDate;
use log::{debug, info, warn};
use ordered_float::OrderedFloat;

/// Result cap of the station search request.
pub const STATION_LIMIT: u32 = 1000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// What to search for: an origin, an inclusive date range and a radius.
#[derive(Debug, Clone, Builder)]
pub struct StationQuery {
    pub origin: LatLon,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[builder(default = 50.0)]
    pub radius_km: f64,
    #[builder(default = "GHCND".to_string(), into)]
    pub dataset: String,
}

/// Picks the station closest to `origin` by great-circle distance.
///
/// Among exact ties the first station in `stations` wins.
pub fn nearest_station(origin: LatLon, stations: Vec<Station>) -> Option<NearestStation> {
    stations
        .into_iter()
        .map(|station| {
            let dist_km = distance_km(origin, LatLon(station.latitude, station.longitude));
            NearestStation { station, dist_km }
        })
        .min_by_key(|candidate| OrderedFloat(candidate.dist_km))
}

/// Issues one station search for the box around `query.origin` and returns the
/// nearest station, or `None` when the search matched nothing.
pub async fn locate_nearest_station<F: JsonFetcher>(
    fetcher: &F,
    api: &NceiApi,
    query: &StationQuery,
) -> Result<Option<NearestStation>, LocateStationError> {
    let bbox = bbox_from_point(query.origin.lat(), query.origin.lon(), query.radius_km);
    let request = api
        .request("stations")
        .query("datasetid", &query.dataset)
        .query("extent", bbox.to_extent())
        .query("startdate", query.start.format(DATE_FORMAT))
        .query("enddate", query.end.format(DATE_FORMAT))
        .query("limit", STATION_LIMIT);

    let body = fetcher.get_json(&request).await?;
    let response = NceiResponse::<Station>::from_value(body)
        .map_err(LocateStationError::UnexpectedResponse)?;
    debug!(
        "Station search around ({:.4}, {:.4}) returned {} stations",
        query.origin.lat(),
        query.origin.lon(),
        response.results.len()
    );
    if response.possibly_truncated(STATION_LIMIT) {
        warn!(
            "Station search hit the {} result cap; the nearest station may be missing",
            STATION_LIMIT
        );
    }

    let nearest = nearest_station(query.origin, response.results);
    if let Some(found) = &nearest {
        info!(
            "Nearest {} station: {} at {:.2} km",
            query.dataset, found.station.id, found.dist_km
        );
    }
    Ok(nearest)
}
