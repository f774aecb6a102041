//! Dataset catalog endpoints: datasets, data categories, data types

use tracing::{debug, instrument};

use cdo_types::{
    DataCategoriesQuery, DataCategory, DataType, DataTypesQuery, Dataset, DatasetsQuery, Page,
};

use super::require_id;
use crate::client::CdoClient;
use crate::error::CdoResult;

/// Catalog endpoints, borrowed from a [`CdoClient`]
pub struct CatalogEndpoints<'a> {
    client: &'a CdoClient,
}

impl<'a> CatalogEndpoints<'a> {
    pub(crate) fn new(client: &'a CdoClient) -> Self {
        Self { client }
    }

    /// List datasets matching the query
    #[instrument(skip(self, query))]
    pub async fn datasets(&self, query: &DatasetsQuery) -> CdoResult<Page<Dataset>> {
        debug!("fetching datasets");
        self.client.request("datasets", query.to_query()?).await
    }

    /// Fetch one dataset by id (e.g. `GHCND`)
    #[instrument(skip(self))]
    pub async fn dataset(&self, id: &str) -> CdoResult<Dataset> {
        require_id("datasetid", id)?;
        self.client
            .request(&format!("datasets/{id}"), Vec::new())
            .await
    }

    /// List data categories matching the query
    #[instrument(skip(self, query))]
    pub async fn data_categories(
        &self,
        query: &DataCategoriesQuery,
    ) -> CdoResult<Page<DataCategory>> {
        debug!("fetching data categories");
        self.client
            .request("datacategories", query.to_query()?)
            .await
    }

    /// Fetch one data category by id (e.g. `TEMP`)
    #[instrument(skip(self))]
    pub async fn data_category(&self, id: &str) -> CdoResult<DataCategory> {
        require_id("datacategoryid", id)?;
        self.client
            .request(&format!("datacategories/{id}"), Vec::new())
            .await
    }

    /// List data types matching the query
    #[instrument(skip(self, query))]
    pub async fn datatypes(&self, query: &DataTypesQuery) -> CdoResult<Page<DataType>> {
        debug!("fetching data types");
        self.client.request("datatypes", query.to_query()?).await
    }

    /// Fetch one data type by id (e.g. `TMAX`)
    #[instrument(skip(self))]
    pub async fn datatype(&self, id: &str) -> CdoResult<DataType> {
        require_id("datatypeid", id)?;
        self.client
            .request(&format!("datatypes/{id}"), Vec::new())
            .await
    }
}
