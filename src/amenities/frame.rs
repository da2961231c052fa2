//! Tabular views of collected amenities.

use crate::amenities::query::Amenity;
use polars::prelude::*;

pub const AMENITY_COLUMNS: [&str; 6] = ["osm_id", "name", "amenity", "lat", "lon", "perim_id"];

/// One row per amenity with the columns in [`AMENITY_COLUMNS`] order.
pub fn amenities_frame(amenities: &[Amenity]) -> PolarsResult<DataFrame> {
    let [osm_id, name, amenity, lat, lon, perim_id] = AMENITY_COLUMNS;
    DataFrame::new(vec![
        Column::new(
            osm_id.into(),
            amenities.iter().map(|a| a.osm_id.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            name.into(),
            amenities.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            amenity.into(),
            amenities.iter().map(|a| a.amenity.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(lat.into(), amenities.iter().map(|a| a.lat).collect::<Vec<_>>()),
        Column::new(lon.into(), amenities.iter().map(|a| a.lon).collect::<Vec<_>>()),
        Column::new(
            perim_id.into(),
            amenities
                .iter()
                .map(|a| a.perim_id as u64)
                .collect::<Vec<_>>(),
        ),
    ])
}

/// Counts amenities per (perimeter, category), sorted by perimeter then category.
pub fn amenity_summary(frame: &DataFrame) -> PolarsResult<DataFrame> {
    frame
        .clone()
        .lazy()
        .group_by([col("perim_id"), col("amenity")])
        .agg([len().alias("count")])
        .sort_by_exprs(
            vec![col("perim_id"), col("amenity")],
            SortMultipleOptions::default(),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amenity(id: u64, kind: &str, perim_id: usize) -> Amenity {
        Amenity {
            osm_id: format!("node:{}", id),
            name: String::new(),
            amenity: kind.to_string(),
            lat: Some(1.0),
            lon: None,
            perim_id,
        }
    }

    #[test]
    fn test_frame_columns() -> PolarsResult<()> {
        let df = amenities_frame(&[amenity(1, "school", 2)])?;
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, AMENITY_COLUMNS);
        assert_eq!(df.column("lon")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_frame_keeps_schema() -> PolarsResult<()> {
        let df = amenities_frame(&[])?;
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), AMENITY_COLUMNS.len());
        Ok(())
    }

    #[test]
    fn test_summary_counts_by_perimeter_and_category() -> PolarsResult<()> {
        let df = amenities_frame(&[
            amenity(1, "school", 2),
            amenity(2, "hospital", 1),
            amenity(3, "school", 2),
            amenity(4, "school", 1),
            amenity(5, "hospital", 1),
        ])?;
        let summary = amenity_summary(&df)?;
        assert_eq!(summary.height(), 3);

        let perims: Vec<Option<u64>> = summary
            .column("perim_id")?
            .as_materialized_series()
            .u64()?
            .into_iter()
            .collect();
        let kinds: Vec<Option<&str>> = summary
            .column("amenity")?
            .as_materialized_series()
            .str()?
            .into_iter()
            .collect();
        let counts = summary
            .column("count")?
            .as_materialized_series()
            .cast(&DataType::UInt64)?;
        let counts: Vec<Option<u64>> = counts.u64()?.into_iter().collect();
        assert_eq!(perims, vec![Some(1), Some(1), Some(2)]);
        assert_eq!(kinds, vec![Some("hospital"), Some("school"), Some("school")]);
        assert_eq!(counts, vec![Some(2), Some(1), Some(2)]);
        Ok(())
    }
}
