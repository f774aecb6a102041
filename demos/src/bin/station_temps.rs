//! Demo 2: Station Temperatures
//!
//! Finds stations inside a bounding box around Manhattan, then fetches a
//! month of daily maximum temperatures from several of them concurrently.
//! The client paces the burst at 5 requests per second on its own.
//!
//! Run: NOAA_TOKEN=... cargo run --bin station_temps

use cdo_client::{CdoClient, DataQuery, Extent, StationsQuery, Units};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let token = std::env::var("NOAA_TOKEN")
        .map_err(|_| "set NOAA_TOKEN to your CDO API token (https://www.ncdc.noaa.gov/cdo-web/token)")?;
    let client = CdoClient::new(token)?;

    let stations = client
        .get_stations(
            &StationsQuery::new()
                .with_dataset_id("GHCND")
                .with_extent(Extent::new(40.70, -74.02, 40.88, -73.91))
                .with_limit(8),
        )
        .await?;
    println!("{} stations in the box\n", stations.results.len());

    // All queries go through one client: the limiter spaces them out, the
    // pool caps concurrent connections.
    let fetches = stations.results.iter().map(|station| {
        let client = &client;
        let station_id = station.id.clone();
        let name = station.name.clone();
        async move {
            let data = client
                .get_data(
                    &DataQuery::new("GHCND", "2024-06-01", "2024-06-30")
                        .with_datatype_id("TMAX")
                        .with_station_id(&station_id)
                        .with_units(Units::Metric)
                        .with_limit(31),
                )
                .await?;
            Ok::<_, cdo_client::CdoError>((name, data))
        }
    });

    for result in futures::future::join_all(fetches).await {
        match result {
            Ok((name, data)) if !data.is_empty() => {
                let mean: f64 = data.results.iter().map(|p| p.value).sum::<f64>()
                    / data.results.len() as f64;
                println!("  {:<38} mean TMAX {:>5.1} °C", name, mean);
            }
            Ok((name, _)) => println!("  {:<38} no observations", name),
            Err(err) => eprintln!("  fetch failed: {err}"),
        }
    }

    println!("\nrequests left today: {}", client.remaining_today().await);
    client.close();
    Ok(())
}
