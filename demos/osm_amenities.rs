use geo_enrich::{
    amenities_frame, amenity_summary, parse_amenity_list, write_csv, AmenityCollector,
    AmenityOptions, ClientConfig, EnrichError, PerimeterTable, RetryClient,
};
use std::env;

// Usage: cargo run --example osm_amenities [perimeters.csv] [output.csv]
// AMENITIES (comma list) and RADIUS_KM override the defaults.
#[tokio::main]
async fn main() -> Result<(), EnrichError> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| "data/perimeter_sample.csv".to_string());
    let output = args
        .next()
        .unwrap_or_else(|| "data/osm_amenities.csv".to_string());

    let mut options = AmenityOptions::default();
    if let Ok(list) = env::var("AMENITIES") {
        options.amenities = parse_amenity_list(&list);
    }
    if let Some(radius_km) = env::var("RADIUS_KM").ok().and_then(|r| r.parse().ok()) {
        options.radius_km = radius_km;
    }

    let perimeters = PerimeterTable::from_csv(&input)?;
    let centroids = perimeters.centroids();
    println!("{} of {} perimeters have a centroid", centroids.len(), perimeters.len());

    let client = RetryClient::new(ClientConfig::default())?;
    let batch = AmenityCollector::new(&client, options).collect(&centroids).await;

    let mut frame = amenities_frame(&batch.amenities)?;
    write_csv(&mut frame, &output)?;
    println!("Wrote {} rows to {}", frame.height(), output);

    if frame.height() > 0 {
        println!("{}", amenity_summary(&frame)?.head(Some(5)));
    }
    Ok(())
}
