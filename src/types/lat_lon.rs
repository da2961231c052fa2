//! Geographic coordinate and bounding-box types shared by the weather and amenity pipelines.

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64` decimal degrees.
///
/// # Examples
///
/// ```
/// use geo_enrich::LatLon;
///
/// let denver = LatLon(39.7392, -104.9903);
/// assert_eq!(denver.lat(), 39.7392);
/// assert_eq!(denver.lon(), -104.9903);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }
}

/// An axis-aligned latitude/longitude rectangle approximating a circular search radius.
///
/// Field order mirrors the `(min_lon, min_lat, max_lon, max_lat)` convention used
/// throughout GIS tooling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Returns `true` when `point` lies strictly inside the box.
    pub fn contains_strictly(&self, point: LatLon) -> bool {
        point.lat() > self.min_lat
            && point.lat() < self.max_lat
            && point.lon() > self.min_lon
            && point.lon() < self.max_lon
    }

    /// Formats the box as the `minlat,minlon,maxlat,maxlon` extent string the
    /// climate-data API expects.
    pub fn to_extent(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}
