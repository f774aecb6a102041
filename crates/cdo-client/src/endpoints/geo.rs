//! Geographic endpoints: location categories, locations, stations

use tracing::{debug, instrument};

use cdo_types::{
    Location, LocationCategoriesQuery, LocationCategory, LocationsQuery, Page, Station,
    StationsQuery,
};

use super::require_id;
use crate::client::CdoClient;
use crate::error::CdoResult;

/// Geographic endpoints, borrowed from a [`CdoClient`]
pub struct GeoEndpoints<'a> {
    client: &'a CdoClient,
}

impl<'a> GeoEndpoints<'a> {
    pub(crate) fn new(client: &'a CdoClient) -> Self {
        Self { client }
    }

    /// List location categories matching the query
    #[instrument(skip(self, query))]
    pub async fn location_categories(
        &self,
        query: &LocationCategoriesQuery,
    ) -> CdoResult<Page<LocationCategory>> {
        debug!("fetching location categories");
        self.client
            .request("locationcategories", query.to_query()?)
            .await
    }

    /// Fetch one location category by id (e.g. `CITY`)
    #[instrument(skip(self))]
    pub async fn location_category(&self, id: &str) -> CdoResult<LocationCategory> {
        require_id("locationcategoryid", id)?;
        self.client
            .request(&format!("locationcategories/{id}"), Vec::new())
            .await
    }

    /// List locations matching the query
    #[instrument(skip(self, query))]
    pub async fn locations(&self, query: &LocationsQuery) -> CdoResult<Page<Location>> {
        debug!("fetching locations");
        self.client.request("locations", query.to_query()?).await
    }

    /// Fetch one location by id (e.g. `FIPS:37`)
    #[instrument(skip(self))]
    pub async fn location(&self, id: &str) -> CdoResult<Location> {
        require_id("locationid", id)?;
        self.client
            .request(&format!("locations/{id}"), Vec::new())
            .await
    }

    /// List stations matching the query
    ///
    /// Stations are the only resource filterable by geographic extent.
    #[instrument(skip(self, query))]
    pub async fn stations(&self, query: &StationsQuery) -> CdoResult<Page<Station>> {
        debug!("fetching stations");
        self.client.request("stations", query.to_query()?).await
    }

    /// Fetch one station by id (e.g. `GHCND:USW00014732`)
    #[instrument(skip(self))]
    pub async fn station(&self, id: &str) -> CdoResult<Station> {
        require_id("stationid", id)?;
        self.client
            .request(&format!("stations/{id}"), Vec::new())
            .await
    }
}
