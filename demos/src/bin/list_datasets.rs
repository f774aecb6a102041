//! Demo 1: Dataset Catalog
//!
//! Lists every dataset the CDO API offers, with its coverage window.
//!
//! Run: NOAA_TOKEN=... cargo run --bin list_datasets

use cdo_client::{CdoClient, DatasetsQuery, SortField, SortOrder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let token = std::env::var("NOAA_TOKEN")
        .map_err(|_| "set NOAA_TOKEN to your CDO API token (https://www.ncdc.noaa.gov/cdo-web/token)")?;
    let client = CdoClient::new(token)?;

    let query = DatasetsQuery::new()
        .with_sort(SortField::Name, SortOrder::Asc)
        .with_limit(100);
    let page = client.get_datasets(&query).await?;

    println!(
        "{} datasets available (showing {}):\n",
        page.total_count().unwrap_or(page.results.len() as u64),
        page.results.len()
    );
    println!("  {:<12} {:<42} {:>10} {:>10}", "ID", "NAME", "FROM", "TO");
    println!("  {}", "─".repeat(78));
    for dataset in &page.results {
        println!(
            "  {:<12} {:<42} {:>10} {:>10}",
            dataset.id, dataset.name, dataset.mindate, dataset.maxdate
        );
    }

    client.close();
    Ok(())
}
