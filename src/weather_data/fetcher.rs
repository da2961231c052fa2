//! Chunked retrieval of daily observations for one station.

use crate::http::client::JsonFetcher;
use crate::ncei::{NceiApi, NceiResponse};
use crate::types::observation_type::ObservationType;
use crate::weather_data::chunks::{DateChunk, DateChunks};
use crate::weather_data::daily_table::{DailyTable, ObservationRecord};
use crate::weather_data::error::WeatherDataError;
use bon::Builder;
use chrono::NaiveDate;
use log::{debug, info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which station, dates and observation types to fetch, and how to split the requests.
#[derive(Debug, Clone, Builder)]
pub struct DailyRequest {
    #[builder(into)]
    pub station_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[builder(default = ObservationType::defaults())]
    pub datatypes: Vec<ObservationType>,
    #[builder(default = 30)]
    pub chunk_days: u32,
    /// Result cap per chunk request.
    #[builder(default = 1000)]
    pub limit: u32,
    #[builder(default = "GHCND".to_string(), into)]
    pub dataset: String,
}

async fn fetch_chunk<F: JsonFetcher>(
    fetcher: &F,
    api: &NceiApi,
    request: &DailyRequest,
    chunk: DateChunk,
) -> Result<NceiResponse<ObservationRecord>, WeatherDataError> {
    let mut api_request = api
        .request("data")
        .query("datasetid", &request.dataset)
        .query("stationid", &request.station_id)
        .query("startdate", chunk.start.format(DATE_FORMAT))
        .query("enddate", chunk.end.format(DATE_FORMAT))
        .query("units", "standard")
        .query("limit", request.limit);
    for datatype in &request.datatypes {
        api_request = api_request.query("datatypeid", datatype);
    }
    let body = fetcher.get_json(&api_request).await?;
    NceiResponse::from_value(body).map_err(WeatherDataError::UnexpectedResponse)
}

/// Fetches daily observations for `request.station_id` over `[start, end]`,
/// one request per chunk in ascending date order, and pivots them into a
/// [`DailyTable`].
///
/// A chunk that fails is logged, recorded in [`DailyTable::failed_chunks`] and
/// skipped. The returned table is empty when no chunk produced data; callers
/// must check [`DailyTable::is_empty`].
pub async fn fetch_daily_chunked<F: JsonFetcher>(
    fetcher: &F,
    api: &NceiApi,
    request: &DailyRequest,
) -> DailyTable {
    let mut table = DailyTable::new(request.datatypes.clone());
    for chunk in DateChunks::new(request.start, request.end, request.chunk_days) {
        match fetch_chunk(fetcher, api, request, chunk).await {
            Ok(response) => {
                debug!(
                    "Chunk {} for {}: {} records",
                    chunk,
                    request.station_id,
                    response.results.len()
                );
                if response.possibly_truncated(request.limit) {
                    warn!(
                        "Chunk {} for {} may be truncated at {} records; use a smaller chunk size",
                        chunk, request.station_id, request.limit
                    );
                    table.possibly_truncated = true;
                }
                table.extend(response.results);
            }
            Err(e) => {
                warn!("Daily chunk {} for {} failed: {}", chunk, request.station_id, e);
                table.failed_chunks.push(chunk);
            }
        }
    }
    info!(
        "Fetched {} days of observations for {} ({} chunks skipped)",
        table.len(),
        request.station_id,
        table.failed_chunks.len()
    );
    table
}
