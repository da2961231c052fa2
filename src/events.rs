//! The events table: timestamp and coordinate derivation, the query window
//! and origin used for the station search, and the left join of daily
//! observations onto the events.

use crate::error::EnrichError;
use crate::table_io::read_csv_as_strings;
use crate::timestamps::parse_timestamp;
use crate::types::lat_lon::LatLon;
use crate::weather_data::daily_table::{DailyTable, OBS_DATE_COLUMN};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use log::debug;
use polars::prelude::*;
use std::path::Path;

pub const LAT_COLUMN: &str = "lat";
pub const LNG_COLUMN: &str = "lng";
pub const DATE_CREATED_COLUMN: &str = "date_created";
pub const DATE_MODIFIED_COLUMN: &str = "date_modified";
pub const EVENT_DT_COLUMN: &str = "event_dt";
pub const EVENT_DATE_COLUMN: &str = "event_date";

const EVENT_DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Events with their derived instants and coordinates.
///
/// `event_dt` is `date_modified` when that cell is non-blank, else
/// `date_created`. A non-blank but unparseable `date_modified` leaves the
/// event without an instant; it does not fall back to `date_created`.
#[derive(Debug, Clone)]
pub struct EventTable {
    frame: DataFrame,
    event_times: Vec<Option<NaiveDateTime>>,
    coordinates: Vec<Option<LatLon>>,
}

fn string_cells(frame: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>, EnrichError> {
    let Ok(column) = frame.column(name) else {
        return Ok(None);
    };
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let cells = series
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::trim).filter(|c| !c.is_empty()).map(String::from))
        .collect();
    Ok(Some(cells))
}

fn numeric_cells(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, EnrichError> {
    let column = frame
        .column(name)
        .map_err(|_| EnrichError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series();
    let floats: Vec<Option<f64>> = if series.dtype() == &DataType::String {
        // Non-numeric text becomes null.
        series
            .str()?
            .into_iter()
            .map(|cell| cell.and_then(|c| c.trim().parse::<f64>().ok()))
            .collect()
    } else {
        series.cast(&DataType::Float64)?.f64()?.into_iter().collect()
    };
    Ok(floats
        .into_iter()
        .map(|v| v.filter(|v: &f64| v.is_finite()))
        .collect())
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

impl EventTable {
    /// Loads events from a headed CSV file, keeping every original column as text.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, EnrichError> {
        Self::from_frame(read_csv_as_strings(path)?)
    }

    /// Wraps `frame`, which needs `lat`, `lng` and at least one of
    /// `date_created` / `date_modified`.
    pub fn from_frame(frame: DataFrame) -> Result<Self, EnrichError> {
        let lats = numeric_cells(&frame, LAT_COLUMN)?;
        let lngs = numeric_cells(&frame, LNG_COLUMN)?;
        let created = string_cells(&frame, DATE_CREATED_COLUMN)?;
        let modified = string_cells(&frame, DATE_MODIFIED_COLUMN)?;
        if created.is_none() && modified.is_none() {
            return Err(EnrichError::MissingColumn(DATE_CREATED_COLUMN.to_string()));
        }

        let height = frame.height();
        let cell = |cells: &Option<Vec<Option<String>>>, i: usize| {
            cells.as_ref().and_then(|c| c[i].clone())
        };
        let event_times: Vec<Option<NaiveDateTime>> = (0..height)
            .map(|i| {
                cell(&modified, i)
                    .or_else(|| cell(&created, i))
                    .and_then(|raw| parse_timestamp(&raw))
            })
            .collect();
        let coordinates = lats
            .into_iter()
            .zip(lngs)
            .map(|(lat, lng)| Some(LatLon(lat?, lng?)))
            .collect();
        debug!(
            "Loaded {} events, {} with a timestamp",
            height,
            event_times.iter().flatten().count()
        );

        Ok(Self {
            frame,
            event_times,
            coordinates,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Derived instant per row, `None` where no timestamp parsed.
    pub fn event_times(&self) -> &[Option<NaiveDateTime>] {
        &self.event_times
    }

    pub fn event_dates(&self) -> Vec<Option<NaiveDate>> {
        self.event_times.iter().map(|t| t.map(|t| t.date())).collect()
    }

    /// Earliest and latest event instants.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.event_times.iter().flatten().min()?;
        let max = self.event_times.iter().flatten().max()?;
        Some((*min, *max))
    }

    /// The calendar-date range covering every event, widened by
    /// `padding_days` on each side.
    pub fn query_window(&self, padding_days: i64) -> Result<(NaiveDate, NaiveDate), EnrichError> {
        let (min, max) = self.time_span().ok_or(EnrichError::NoEventTimestamps)?;
        let padding = TimeDelta::days(padding_days.max(0));
        Ok((min.date() - padding, max.date() + padding))
    }

    /// Per-axis median over the events that have both coordinates.
    pub fn median_origin(&self) -> Result<LatLon, EnrichError> {
        let (mut lats, mut lons): (Vec<f64>, Vec<f64>) = self
            .coordinates
            .iter()
            .flatten()
            .map(|p| (p.lat(), p.lon()))
            .unzip();
        match (median(&mut lats), median(&mut lons)) {
            (Some(lat), Some(lon)) => Ok(LatLon(lat, lon)),
            _ => Err(EnrichError::NoEventCoordinates),
        }
    }

    /// Left-joins `daily` onto the events by calendar date.
    ///
    /// The result keeps every event row in order and adds `event_dt`,
    /// `event_date`, `obs_date` and one column per observation type of
    /// `daily`. Events without a matching date get nulls in the added columns.
    pub fn join_daily(&self, daily: &DailyTable) -> Result<DataFrame, EnrichError> {
        let dates = self.event_dates();
        let matches: Vec<_> = dates
            .iter()
            .map(|date| date.and_then(|d| daily.get(d)))
            .collect();

        let mut joined = self.frame.clone();
        let event_dt: Vec<Option<String>> = self
            .event_times
            .iter()
            .map(|t| t.map(|t| t.format(EVENT_DT_FORMAT).to_string()))
            .collect();
        joined.with_column(Column::new(EVENT_DT_COLUMN.into(), event_dt))?;
        let event_date: Vec<Option<String>> =
            dates.iter().map(|d| d.map(|d| d.to_string())).collect();
        joined.with_column(Column::new(EVENT_DATE_COLUMN.into(), event_date))?;
        let obs_date: Vec<Option<String>> = matches
            .iter()
            .map(|row| row.map(|r| r.date.to_string()))
            .collect();
        joined.with_column(Column::new(OBS_DATE_COLUMN.into(), obs_date))?;
        for datatype in daily.datatypes() {
            let values: Vec<Option<f64>> = matches
                .iter()
                .map(|row| row.and_then(|r| r.get(datatype)))
                .collect();
            joined.with_column(Column::new(datatype.code().into(), values))?;
        }

        debug!(
            "Joined {} events, {} matched a daily observation",
            joined.height(),
            matches.iter().flatten().count()
        );
        Ok(joined)
    }
}
