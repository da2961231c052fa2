//! Reshapes long-format observation records (one per date and type) into one
//! row per calendar date with one value per requested observation type.

use crate::timestamps::parse_date;
use crate::types::observation_type::ObservationType;
use crate::weather_data::chunks::DateChunk;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// Name of the date column in [`DailyTable::to_frame`].
pub const OBS_DATE_COLUMN: &str = "obs_date";

/// One long-format record as returned by the observation endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ObservationRecord {
    pub date: String,
    pub datatype: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub attributes: Option<String>,
}

/// All values observed on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    values: BTreeMap<ObservationType, f64>,
}

impl DailyObservation {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, datatype: &ObservationType) -> Option<f64> {
        self.values.get(datatype).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Wide daily table: exactly one [`DailyObservation`] per date, values limited
/// to the observation types that were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyTable {
    datatypes: Vec<ObservationType>,
    rows: BTreeMap<NaiveDate, DailyObservation>,
    /// Chunks whose request failed and were skipped.
    pub failed_chunks: Vec<DateChunk>,
    /// Set when any chunk response may have been cut off at the result cap.
    pub possibly_truncated: bool,
}

impl DailyTable {
    /// An empty table expecting `datatypes`.
    pub fn new(datatypes: Vec<ObservationType>) -> Self {
        Self {
            datatypes,
            ..Default::default()
        }
    }

    /// Pivots `records` into a table.
    ///
    /// Records are taken in order. For a repeated (date, type) pair the first
    /// value wins, which also collapses exact duplicate records. Records with an
    /// unparseable date or an unrequested type are dropped.
    pub fn from_records(
        datatypes: Vec<ObservationType>,
        records: impl IntoIterator<Item = ObservationRecord>,
    ) -> Self {
        let mut table = Self::new(datatypes);
        table.extend(records);
        table
    }

    /// Adds `records` with the same first-value-wins rule as [`DailyTable::from_records`].
    pub fn extend(&mut self, records: impl IntoIterator<Item = ObservationRecord>) {
        let wanted: HashSet<ObservationType> = self.datatypes.iter().cloned().collect();
        for record in records {
            let Some(date) = parse_date(&record.date) else {
                debug!("Dropping observation with unparseable date {:?}", record.date);
                continue;
            };
            let datatype: ObservationType = record.datatype.parse().unwrap_or_else(|_| {
                ObservationType::Custom(record.datatype.clone())
            });
            if !wanted.contains(&datatype) {
                debug!("Dropping unrequested observation type {}", datatype);
                continue;
            }
            let row = self
                .rows
                .entry(date)
                .or_insert_with(|| DailyObservation::new(date));
            if let Some(value) = record.value {
                row.values.entry(datatype).or_insert(value);
            }
        }
    }

    pub fn datatypes(&self) -> &[ObservationType] {
        &self.datatypes
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyObservation> {
        self.rows.get(&date)
    }

    /// Rows in ascending date order.
    pub fn rows(&self) -> impl Iterator<Item = &DailyObservation> {
        self.rows.values()
    }

    /// The table as a `DataFrame`: an `obs_date` column (`YYYY-MM-DD`) and one
    /// nullable `f64` column per requested type, named by its code.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<String> = self.rows.keys().map(|d| d.to_string()).collect();
        let mut columns = vec![Column::new(OBS_DATE_COLUMN.into(), dates)];
        for datatype in &self.datatypes {
            let values: Vec<Option<f64>> = self.rows().map(|row| row.get(datatype)).collect();
            columns.push(Column::new(datatype.code().into(), values));
        }
        DataFrame::new(columns)
    }
}
