mod amenities;
mod config;
mod distance;
mod enricher;
mod error;
mod events;
mod geometry;
mod http;
mod ncei;
mod perimeters;
mod stations;
mod table_io;
mod timestamps;
mod types;
mod weather_data;

#[cfg(test)]
mod test_support;

pub use error::{EnrichError, FailureKind};

pub use config::*;
pub use distance::{bbox_from_point, distance_km, haversine_km};
pub use timestamps::{parse_date, parse_timestamp};

pub use http::client::{ApiRequest, ClientConfig, JsonFetcher, RetryClient};
pub use http::error::{HttpError, TransportError, TransportErrorKind, MAX_BODY_EXCERPT};
pub use http::retry::{Backoff, RawResponse, RetryPolicy, TransportRetry, RETRYABLE_STATUSES};

pub use geometry::centroid::{centroid_from_wkt, strip_srid};
pub use geometry::error::GeometryError;

pub use types::lat_lon::{BoundingBox, LatLon};
pub use types::observation_type::ObservationType;
pub use types::station::{NearestStation, Station};

pub use ncei::{Metadata, NceiApi, NceiResponse, ResultSet};

pub use stations::error::LocateStationError;
pub use stations::locate_station::{
    locate_nearest_station, nearest_station, StationQuery, STATION_LIMIT,
};

pub use weather_data::chunks::{DateChunk, DateChunks};
pub use weather_data::daily_table::{
    DailyObservation, DailyTable, ObservationRecord, OBS_DATE_COLUMN,
};
pub use weather_data::error::WeatherDataError;
pub use weather_data::fetcher::{fetch_daily_chunked, DailyRequest};

pub use events::*;
pub use enricher::{WeatherEnricher, WeatherEnrichment};

pub use perimeters::{PerimeterCentroid, PerimeterTable, GEOM_COLUMN};

pub use amenities::collector::{AmenityBatch, AmenityCollector};
pub use amenities::error::AmenityError;
pub use amenities::frame::{amenities_frame, amenity_summary, AMENITY_COLUMNS};
pub use amenities::query::{build_amenity_query, parse_amenities, query_amenities, Amenity};

pub use table_io::{read_csv_as_strings, write_csv};
