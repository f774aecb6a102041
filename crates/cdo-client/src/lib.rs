//! Async client for the NOAA Climate Data Online (CDO) Web API v2
//!
//! This crate wraps the CDO REST API with typed queries and records, a
//! client-side rate limiter, and a bounded connection pool.
//!
//! # Features
//!
//! - **Catalog**: datasets, data categories, data types
//! - **Geography**: location categories, locations, stations (with bounding
//!   extents)
//! - **Observations**: the data endpoint with unit conversion and pagination
//! - **Rate limiting**: the documented 5 req/s and 10,000 req/day ceilings
//!   are enforced locally, FIFO fair across concurrent callers
//!
//! # Authentication
//!
//! Every request carries the caller's API token in the `token` header.
//! Tokens are issued free of charge at <https://www.ncdc.noaa.gov/cdo-web/token>.
//!
//! # Example
//!
//! ```no_run
//! use cdo_client::{CdoClient, DataQuery, StationsQuery, Units};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CdoClient::new(std::env::var("NOAA_TOKEN")?)?;
//!
//!     // Stations that report daily summaries
//!     let stations = client
//!         .get_stations(&StationsQuery::new().with_dataset_id("GHCND").with_limit(10))
//!         .await?;
//!
//!     // A month of observations from the first one
//!     if let Some(station) = stations.results.first() {
//!         let data = client
//!             .get_data(
//!                 &DataQuery::new("GHCND", "2024-01-01", "2024-01-31")
//!                     .with_station_id(&station.id)
//!                     .with_units(Units::Metric),
//!             )
//!             .await?;
//!         println!("{} observations", data.results.len());
//!     }
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! Both ceilings belong to one client instance; two clients never share
//! counters. Exhausting the daily quota fails immediately with
//! [`CdoError::QuotaExceeded`] rather than waiting, since waiting cannot
//! help within the same UTC day.

pub mod client;
pub mod endpoints;
pub mod error;

mod limiter;
mod transport;

// Re-export main types
pub use client::{CdoClient, ClientConfig, DEFAULT_BASE_URL};
pub use endpoints::{CatalogEndpoints, DataEndpoints, GeoEndpoints};
pub use error::{CdoError, CdoResult};

// Re-export the shared types users need to build queries and read results
pub use cdo_types::{
    DataCategoriesQuery, DataCategory, DataPoint, DataQuery, DataType, DataTypesQuery, Dataset,
    DatasetsQuery, Extent, Location, LocationCategoriesQuery, LocationCategory, LocationsQuery,
    Metadata, Page, RateLimitConfig, ResultSet, SortField, SortOrder, Station, StationsQuery,
    Units, ValidationError,
};
