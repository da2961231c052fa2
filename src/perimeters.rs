//! Perimeter geometries and their centroids.

use crate::error::EnrichError;
use crate::geometry::centroid::{centroid_from_wkt, strip_srid};
use crate::table_io::read_csv_as_strings;
use crate::types::lat_lon::LatLon;
use log::{info, warn};
use polars::prelude::*;
use std::path::Path;

pub const GEOM_COLUMN: &str = "geom";

/// A perimeter's 1-based row position and the point amenity queries start from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerimeterCentroid {
    pub perim_id: usize,
    pub centroid: LatLon,
}

/// The raw `geom` cells of a perimeter table, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerimeterTable {
    geometries: Vec<Option<String>>,
}

impl PerimeterTable {
    pub fn new(geometries: Vec<Option<String>>) -> Self {
        Self { geometries }
    }

    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, EnrichError> {
        Self::from_frame(&read_csv_as_strings(path)?)
    }

    /// Takes the `geom` column of `frame`; other columns are ignored.
    pub fn from_frame(frame: &DataFrame) -> Result<Self, EnrichError> {
        let column = frame
            .column(GEOM_COLUMN)
            .map_err(|_| EnrichError::MissingColumn(GEOM_COLUMN.to_string()))?;
        let series = column.as_materialized_series().cast(&DataType::String)?;
        let geometries = series.str()?.into_iter().map(|g| g.map(String::from)).collect();
        Ok(Self { geometries })
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Centroids of every usable row.
    ///
    /// Rows with a blank geometry are skipped silently, rows that fail to parse
    /// are skipped with a warning. Ids keep the row position, so skipped rows
    /// leave gaps.
    pub fn centroids(&self) -> Vec<PerimeterCentroid> {
        let mut centroids = Vec::with_capacity(self.geometries.len());
        for (index, geom) in self.geometries.iter().enumerate() {
            let Some(geom) = geom.as_deref() else {
                continue;
            };
            if strip_srid(geom.trim()).trim().is_empty() {
                continue;
            }
            match centroid_from_wkt(geom) {
                Ok(centroid) => centroids.push(PerimeterCentroid {
                    perim_id: index + 1,
                    centroid,
                }),
                Err(e) => warn!("Skipping perimeter row {}: {}", index, e),
            }
        }
        info!(
            "Computed {} centroids from {} perimeters",
            centroids.len(),
            self.geometries.len()
        );
        centroids
    }
}
