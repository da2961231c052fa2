use geo_enrich::{
    write_csv, AuthToken, ClientConfig, EnrichError, EventTable, RetryClient, WeatherEnricher,
    WeatherOptions,
};
use std::env;

// Usage: cargo run --example enrich_events [events.csv] [output.csv]
// Needs NOAA_TOKEN. Set RUST_LOG=info to follow progress.
#[tokio::main]
async fn main() -> Result<(), EnrichError> {
    env_logger::init();
    configure_polars_display();

    let mut args = env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| "data/geo_events_sample.csv".to_string());
    let output = args
        .next()
        .unwrap_or_else(|| "data/events_with_noaa.csv".to_string());

    let options = WeatherOptions::builder()
        .token(AuthToken::from_env()?)
        .build();
    let client = RetryClient::new(ClientConfig::default())?;
    let events = EventTable::from_csv(&input)?;
    println!("Read {} events from {}", events.len(), input);

    let mut enrichment = WeatherEnricher::new(&client, options).enrich(&events).await?;
    println!(
        "Station {} at {:.2} km, window {}..{}",
        enrichment.station.station.id, enrichment.station.dist_km, enrichment.start, enrichment.end
    );
    if !enrichment.daily.failed_chunks.is_empty() {
        println!("Skipped chunks: {:?}", enrichment.daily.failed_chunks);
    }

    write_csv(&mut enrichment.frame, &output)?;
    println!("Wrote {} rows to {}", enrichment.frame.height(), output);
    println!("{}", enrichment.frame.head(Some(5)));
    Ok(())
}

fn configure_polars_display() {
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
