//! Great-circle distance and radius bounding boxes.

use crate::types::lat_lon::{BoundingBox, LatLon};
use haversine::{distance, Location as HaversineLocation, Units};

/// Kilometres per degree of latitude, as used for the bounding-box approximation.
const KM_PER_DEGREE: f64 = 111.0;

/// Lower bound on `cos(lat)` so boxes near the poles stay finite.
const MIN_LON_SCALE: f64 = 0.1;

/// Haversine distance in kilometres on a sphere of radius 6371.0 km.
///
/// Symmetric in its arguments and zero for identical points.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance(
        HaversineLocation {
            latitude: lat1,
            longitude: lon1,
        },
        HaversineLocation {
            latitude: lat2,
            longitude: lon2,
        },
        Units::Kilometers,
    )
}

/// Same as [`haversine_km`], for two [`LatLon`] points.
pub fn distance_km(a: LatLon, b: LatLon) -> f64 {
    haversine_km(a.lat(), a.lon(), b.lat(), b.lon())
}

/// Square lat/lon box with half-extent `km` around `(lat, lon)`.
///
/// The latitude half-extent is `km / 111` degrees; the longitude half-extent is
/// `km / (111 * max(0.1, cos(lat)))` degrees.
pub fn bbox_from_point(lat: f64, lon: f64, km: f64) -> BoundingBox {
    let dlat = km / KM_PER_DEGREE;
    let dlon = km / (KM_PER_DEGREE * lat.to_radians().cos().max(MIN_LON_SCALE));
    BoundingBox {
        min_lon: lon - dlon,
        min_lat: lat - dlat,
        max_lon: lon + dlon,
        max_lat: lat + dlat,
    }
}
