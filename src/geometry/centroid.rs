//! Extracts a single (lat, lon) point from a WKT or EWKT geometry string.

use crate::geometry::error::GeometryError;
use crate::types::lat_lon::LatLon;
use geo::{Centroid, Geometry, HasDimensions, InteriorPoint};
use wkt::TryFromWkt;

const SRID_PREFIX: &str = "SRID=";

/// Removes any leading `SRID=<n>;` prefixes, returning the bare WKT.
///
/// Strings without the prefix come back unchanged, and stripping is
/// idempotent. A prefix with no `;` after it is left in place.
///
/// ```
/// use geo_enrich::strip_srid;
///
/// assert_eq!(strip_srid("SRID=4326;POINT(1 2)"), "POINT(1 2)");
/// assert_eq!(strip_srid("POINT(1 2)"), "POINT(1 2)");
/// ```
pub fn strip_srid(geom: &str) -> &str {
    let mut rest = geom;
    while rest.starts_with(SRID_PREFIX) {
        match rest.split_once(';') {
            Some((_, wkt)) => rest = wkt,
            None => break,
        }
    }
    rest
}

/// Parses `geom` (WKT, optionally SRID-prefixed) and returns its true centroid,
/// or its representative point when the geometry is empty.
pub fn centroid_from_wkt(geom: &str) -> Result<LatLon, GeometryError> {
    let text = strip_srid(geom.trim()).trim();
    if text.is_empty() {
        return Err(GeometryError::Empty);
    }
    let geometry = Geometry::<f64>::try_from_wkt_str(text).map_err(|e| GeometryError::Parse {
        message: e.to_string(),
    })?;
    let point = if geometry.is_empty() {
        geometry.interior_point()
    } else {
        geometry.centroid()
    };
    point
        .map(|p| LatLon(p.y(), p.x()))
        .ok_or(GeometryError::NoRepresentativePoint)
}
