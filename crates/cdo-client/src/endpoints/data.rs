//! Observation data endpoint

use tracing::{debug, instrument};

use cdo_types::{DataPoint, DataQuery, Page};

use crate::client::CdoClient;
use crate::error::CdoResult;

/// Data endpoints, borrowed from a [`CdoClient`]
pub struct DataEndpoints<'a> {
    client: &'a CdoClient,
}

impl<'a> DataEndpoints<'a> {
    pub(crate) fn new(client: &'a CdoClient) -> Self {
        Self { client }
    }

    /// Fetch observations for a dataset over a date range
    ///
    /// Annual and monthly datasets accept ranges up to ten years, everything
    /// else up to one year; the server enforces this because the bound
    /// depends on the dataset's resolution.
    #[instrument(skip(self, query))]
    pub async fn query(&self, query: &DataQuery) -> CdoResult<Page<DataPoint>> {
        debug!(dataset = %query.dataset_id, "fetching observations");
        self.client.request("data", query.to_query()?).await
    }
}
