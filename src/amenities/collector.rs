//! Runs the amenity query for every perimeter, one at a time with a pause in
//! between, and gathers the results.

use crate::amenities::query::{query_amenities, Amenity};
use crate::config::AmenityOptions;
use crate::http::client::JsonFetcher;
use crate::perimeters::PerimeterCentroid;
use log::{info, warn};
use tokio::time::sleep;

/// Everything gathered over a batch of perimeters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmenityBatch {
    pub amenities: Vec<Amenity>,
    /// Perimeters whose query failed and were skipped.
    pub failed_perimeters: Vec<usize>,
}

pub struct AmenityCollector<'a, F> {
    fetcher: &'a F,
    options: AmenityOptions,
}

impl<'a, F: JsonFetcher> AmenityCollector<'a, F> {
    pub fn new(fetcher: &'a F, options: AmenityOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn options(&self) -> &AmenityOptions {
        &self.options
    }

    /// Queries around each centroid in order, waiting
    /// [`AmenityOptions::effective_pacing`] between consecutive queries.
    /// A failed query is logged and its perimeter recorded as failed.
    pub async fn collect(&self, centroids: &[PerimeterCentroid]) -> AmenityBatch {
        let pacing = self.options.effective_pacing();
        let mut batch = AmenityBatch::default();
        for (i, perimeter) in centroids.iter().enumerate() {
            if i > 0 {
                sleep(pacing).await;
            }
            info!(
                "Amenities near perimeter {} at ({:.5}, {:.5}), r={} km",
                perimeter.perim_id,
                perimeter.centroid.lat(),
                perimeter.centroid.lon(),
                self.options.radius_km
            );
            match query_amenities(
                self.fetcher,
                &self.options,
                perimeter.centroid,
                perimeter.perim_id,
            )
            .await
            {
                Ok(found) => batch.amenities.extend(found),
                Err(e) => {
                    warn!("Amenity query failed for perimeter {}: {}", perimeter.perim_id, e);
                    batch.failed_perimeters.push(perimeter.perim_id);
                }
            }
        }
        info!(
            "Collected {} amenities from {} perimeters ({} failed)",
            batch.amenities.len(),
            centroids.len(),
            batch.failed_perimeters.len()
        );
        batch
    }
}
