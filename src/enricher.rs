//! The weather pipeline: event window and origin, nearest station, chunked
//! daily fetch, then the left join back onto the events.

use crate::config::WeatherOptions;
use crate::error::EnrichError;
use crate::events::EventTable;
use crate::http::client::JsonFetcher;
use crate::ncei::NceiApi;
use crate::stations::locate_station::{locate_nearest_station, StationQuery};
use crate::types::station::NearestStation;
use crate::weather_data::daily_table::DailyTable;
use crate::weather_data::fetcher::{fetch_daily_chunked, DailyRequest};
use chrono::NaiveDate;
use log::info;
use polars::prelude::DataFrame;

/// The enriched events and what went into them.
#[derive(Debug, Clone)]
pub struct WeatherEnrichment {
    /// Every input event, in order, with the observation columns added.
    pub frame: DataFrame,
    pub station: NearestStation,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub daily: DailyTable,
}

/// Attaches nearest-station daily weather to an [`EventTable`].
///
/// # Examples
///
/// ```no_run
/// use geo_enrich::{AuthToken, ClientConfig, EventTable, RetryClient, WeatherEnricher, WeatherOptions};
///
/// # async fn run() -> Result<(), geo_enrich::EnrichError> {
/// let client = RetryClient::new(ClientConfig::default())?;
/// let options = WeatherOptions::builder().token(AuthToken::from_env()?).build();
/// let events = EventTable::from_csv("data/geo_events_sample.csv")?;
///
/// let enrichment = WeatherEnricher::new(&client, options).enrich(&events).await?;
/// println!("{} rows via {}", enrichment.frame.height(), enrichment.station.station.id);
/// # Ok(())
/// # }
/// ```
pub struct WeatherEnricher<'a, F> {
    fetcher: &'a F,
    api: NceiApi,
    options: WeatherOptions,
}

impl<'a, F: JsonFetcher> WeatherEnricher<'a, F> {
    pub fn new(fetcher: &'a F, options: WeatherOptions) -> Self {
        Self {
            fetcher,
            api: NceiApi::from_options(&options),
            options,
        }
    }

    pub fn options(&self) -> &WeatherOptions {
        &self.options
    }

    /// Runs the whole pipeline.
    ///
    /// Fails with a [`crate::FailureKind::NoData`] error when the events have no
    /// usable timestamp or coordinates, no station is within range, or no
    /// observation came back for the window.
    pub async fn enrich(&self, events: &EventTable) -> Result<WeatherEnrichment, EnrichError> {
        let (start, end) = events.query_window(self.options.window_padding_days)?;
        let origin = events.median_origin()?;
        info!("Date window: {}..{}", start, end);
        info!(
            "Finding nearest {} station near ({:.4}, {:.4})",
            self.options.dataset,
            origin.lat(),
            origin.lon()
        );

        let query = StationQuery::builder()
            .origin(origin)
            .start(start)
            .end(end)
            .radius_km(self.options.radius_km)
            .dataset(self.options.dataset.clone())
            .build();
        let station = locate_nearest_station(self.fetcher, &self.api, &query)
            .await?
            .ok_or(EnrichError::NoStationFound {
                lat: origin.lat(),
                lon: origin.lon(),
                radius_km: self.options.radius_km,
            })?;

        let request = DailyRequest::builder()
            .station_id(station.station.id.clone())
            .start(start)
            .end(end)
            .datatypes(self.options.datatypes.clone())
            .chunk_days(self.options.chunk_days)
            .limit(self.options.limit)
            .dataset(self.options.dataset.clone())
            .build();
        let daily = fetch_daily_chunked(self.fetcher, &self.api, &request).await;
        if daily.is_empty() {
            return Err(EnrichError::NoObservations {
                station: station.station.id.clone(),
                start,
                end,
            });
        }

        let frame = events.join_daily(&daily)?;
        info!("Enriched {} events", frame.height());
        Ok(WeatherEnrichment {
            frame,
            station,
            start,
            end,
            daily,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthToken;
    use crate::error::FailureKind;
    use crate::events::{DATE_CREATED_COLUMN, LAT_COLUMN, LNG_COLUMN};
    use crate::test_support::ScriptedFetcher;
    use polars::prelude::*;
    use serde_json::json;

    fn options() -> WeatherOptions {
        WeatherOptions::builder()
            .token(AuthToken::new("tok"))
            .base_url("http://ncei.test")
            .build()
    }

    fn events() -> EventTable {
        let frame = DataFrame::new(vec![
            Column::new(LAT_COLUMN.into(), vec!["34.00", "34.20"]),
            Column::new(LNG_COLUMN.into(), vec!["-118.00", "-118.20"]),
            Column::new(
                DATE_CREATED_COLUMN.into(),
                vec!["2023-01-01 09:00:00.000000", "2023-01-03 17:30:00.000000"],
            ),
        ])
        .unwrap();
        EventTable::from_frame(frame).unwrap()
    }

    fn stations() -> serde_json::Value {
        json!({
            "metadata": {"resultset": {"offset": 1, "count": 2, "limit": 1000}},
            "results": [
                {"id": "GHCND:FAR", "latitude": 35.0, "longitude": -119.0, "name": "FAR"},
                {"id": "GHCND:NEAR", "latitude": 34.11, "longitude": -118.09, "name": "NEAR"}
            ]
        })
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_enrich_left_joins_by_date() -> Result<(), EnrichError> {
        let fetcher = ScriptedFetcher::new().reply(stations()).reply(json!({
            "results": [
                {"date": "2023-01-01T00:00:00", "datatype": "TMAX", "station": "GHCND:NEAR", "value": 68},
                {"date": "2023-01-01T00:00:00", "datatype": "PRCP", "station": "GHCND:NEAR", "value": 0.0}
            ]
        }));
        let enrichment = WeatherEnricher::new(&fetcher, options())
            .enrich(&events())
            .await?;

        assert_eq!(enrichment.station.station.id, "GHCND:NEAR");
        assert_eq!((enrichment.start, enrichment.end), (ymd(2022, 12, 31), ymd(2023, 1, 4)));
        assert_eq!(enrichment.frame.height(), 2);
        let tmax: Vec<Option<f64>> = enrichment
            .frame
            .column("TMAX")?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();
        assert_eq!(tmax, vec![Some(68.0), None]);

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query_value("startdate"), Some("2022-12-31"));
        assert_eq!(requests[1].query_value("stationid"), Some("GHCND:NEAR"));
        assert_eq!(requests[1].query_value("enddate"), Some("2023-01-04"));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_station_is_no_data() {
        let fetcher = ScriptedFetcher::new().reply(json!({}));
        let err = WeatherEnricher::new(&fetcher, options())
            .enrich(&events())
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::NoStationFound { radius_km, .. } if radius_km == 50.0));
        assert_eq!(err.kind(), FailureKind::NoData);
    }

    #[tokio::test]
    async fn test_no_observations_is_no_data() {
        let fetcher = ScriptedFetcher::new().reply(stations()).fail_timeout();
        let err = WeatherEnricher::new(&fetcher, options())
            .enrich(&events())
            .await
            .unwrap_err();
        assert!(matches!(&err, EnrichError::NoObservations { station, .. } if station == "GHCND:NEAR"));
        assert_eq!(err.kind(), FailureKind::NoData);
    }

    #[tokio::test]
    async fn test_station_search_failure_propagates() {
        let fetcher = ScriptedFetcher::new().fail_timeout();
        let err = WeatherEnricher::new(&fetcher, options())
            .enrich(&events())
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::LocateStation(_)));
        assert_eq!(err.kind(), FailureKind::Transient);
    }
}
