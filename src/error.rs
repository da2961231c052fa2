use crate::amenities::error::AmenityError;
use crate::geometry::error::GeometryError;
use crate::http::error::HttpError;
use crate::stations::error::LocateStationError;
use crate::weather_data::error::WeatherDataError;
use chrono::NaiveDate;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// How a failure should be handled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network trouble that survived every retry. Trying again later may succeed.
    Transient,
    /// The server or the local setup rejected the work outright.
    Terminal,
    /// The run has no reference data to work with.
    NoData,
    /// A single input item or file is malformed.
    MalformedInput,
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    LocateStation(#[from] LocateStationError),

    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error(transparent)]
    Amenity(#[from] AmenityError),

    #[error("No nearby station found within {radius_km} km of ({lat:.4}, {lon:.4}); increase the radius or adjust the dates")]
    NoStationFound { lat: f64, lon: f64, radius_km: f64 },

    #[error("No daily observations from station {station} for {start}..{end}")]
    NoObservations {
        station: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("No valid event timestamps found; clean the date_created/date_modified columns")]
    NoEventTimestamps,

    #[error("No event has numeric lat and lng values")]
    NoEventCoordinates,

    #[error("Input table has no '{0}' column")]
    MissingColumn(String),

    #[error("Environment variable {0} is not set (get a token at https://www.ncdc.noaa.gov/cdo-web/token)")]
    MissingToken(String),

    #[error("Failed to read CSV '{0}'")]
    ReadCsv(PathBuf, #[source] PolarsError),

    #[error("Failed to write '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

fn http_kind(error: &HttpError) -> FailureKind {
    if error.is_transient() {
        FailureKind::Transient
    } else {
        FailureKind::Terminal
    }
}

impl EnrichError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EnrichError::Http(e)
            | EnrichError::LocateStation(LocateStationError::Http(e))
            | EnrichError::WeatherData(WeatherDataError::Http(e))
            | EnrichError::Amenity(AmenityError::Http(e)) => http_kind(e),
            EnrichError::LocateStation(_)
            | EnrichError::WeatherData(_)
            | EnrichError::Amenity(_)
            | EnrichError::MissingToken(_)
            | EnrichError::Io(..)
            | EnrichError::Polars(_) => FailureKind::Terminal,
            EnrichError::NoStationFound { .. }
            | EnrichError::NoObservations { .. }
            | EnrichError::NoEventTimestamps
            | EnrichError::NoEventCoordinates => FailureKind::NoData,
            EnrichError::Geometry(_) | EnrichError::MissingColumn(_) | EnrichError::ReadCsv(..) => {
                FailureKind::MalformedInput
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::TransportErrorKind;

    #[test]
    fn test_failure_kinds() {
        let timeout = HttpError::Transport {
            url: "u".to_string(),
            attempts: 3,
            kind: TransportErrorKind::Timeout,
            message: "timed out".to_string(),
        };
        assert_eq!(
            EnrichError::from(LocateStationError::Http(timeout)).kind(),
            FailureKind::Transient
        );
        assert_eq!(
            EnrichError::from(HttpError::status("u", 404, "missing")).kind(),
            FailureKind::Terminal
        );
        assert_eq!(EnrichError::NoEventTimestamps.kind(), FailureKind::NoData);
        assert_eq!(
            EnrichError::from(GeometryError::Empty).kind(),
            FailureKind::MalformedInput
        );
        assert_eq!(
            EnrichError::MissingToken("NOAA_TOKEN".to_string()).kind(),
            FailureKind::Terminal
        );
    }

    #[test]
    fn test_no_station_message_is_actionable() {
        let err = EnrichError::NoStationFound {
            lat: 34.05,
            lon: -118.25,
            radius_km: 50.0,
        };
        let message = err.to_string();
        assert!(message.contains("50 km"));
        assert!(message.contains("increase the radius"));
    }
}
