//! Main CDO client implementation

use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use cdo_types::{
    DataCategoriesQuery, DataCategory, DataPoint, DataQuery, DataType, DataTypesQuery, Dataset,
    DatasetsQuery, Location, LocationCategoriesQuery, LocationCategory, LocationsQuery, Page,
    QueryPairs, RateLimitConfig, Station, StationsQuery,
};

use crate::endpoints::{CatalogEndpoints, DataEndpoints, GeoEndpoints};
use crate::error::{CdoError, CdoResult};
use crate::limiter::RequestLimiter;
use crate::transport::Transport;

/// Base URL for the NOAA CDO Web API v2
pub const DEFAULT_BASE_URL: &str = "https://www.ncei.noaa.gov/cdo-web/api/v2";

/// Default per-request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default bound on concurrent pooled connections
const DEFAULT_POOL_LIMIT: usize = 10;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API token, issued by NOAA per e-mail address
    pub token: String,
    /// Per-second dispatch ceiling (default 5)
    pub requests_per_second: u32,
    /// Calendar-day request ceiling (default 10,000)
    pub requests_per_day: u32,
    /// Maximum concurrent pooled connections (default 10)
    pub connection_pool_limit: usize,
    /// Per-request timeout (default 10 s)
    pub request_timeout: Duration,
    /// API base URL, overridable for tests
    pub base_url: String,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with the documented CDO defaults
    pub fn new(token: impl Into<String>) -> Self {
        let limits = RateLimitConfig::noaa_defaults();
        Self {
            token: token.into(),
            requests_per_second: limits.requests_per_second,
            requests_per_day: limits.requests_per_day,
            connection_pool_limit: DEFAULT_POOL_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
        }
    }

    pub fn with_requests_per_second(mut self, limit: u32) -> Self {
        self.requests_per_second = limit;
        self
    }

    pub fn with_requests_per_day(mut self, limit: u32) -> Self {
        self.requests_per_day = limit;
        self
    }

    pub fn with_connection_pool_limit(mut self, limit: usize) -> Self {
        self.connection_pool_limit = limit;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Point the client at a different server (used by the mock tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn validate(&self) -> CdoResult<()> {
        if self.token.is_empty() {
            return Err(CdoError::Validation("token must not be empty".into()));
        }
        if self.requests_per_second == 0 {
            return Err(CdoError::Validation(
                "requests_per_second must be at least 1".into(),
            ));
        }
        if self.requests_per_day == 0 {
            return Err(CdoError::Validation(
                "requests_per_day must be at least 1".into(),
            ));
        }
        if self.connection_pool_limit == 0 {
            return Err(CdoError::Validation(
                "connection_pool_limit must be at least 1".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(CdoError::Validation(
                "request_timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }

    fn rate_limits(&self) -> RateLimitConfig {
        RateLimitConfig {
            requests_per_second: self.requests_per_second,
            requests_per_day: self.requests_per_day,
        }
    }
}

/// Asynchronous client for the NOAA Climate Data Online Web API v2
///
/// One client owns one connection pool and one set of rate-limit counters;
/// every request issued through it shares both. The client opens on
/// construction and closes on [`close`](CdoClient::close), which cancels all
/// suspended callers and releases the pooled connections. Dropping the
/// client releases the pool as well.
///
/// # Example
///
/// ```no_run
/// use cdo_client::{CdoClient, DatasetsQuery};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CdoClient::new(std::env::var("NOAA_TOKEN")?)?;
///
///     let datasets = client.get_datasets(&DatasetsQuery::new()).await?;
///     for dataset in &datasets.results {
///         println!("{}: {}", dataset.id, dataset.name);
///     }
///
///     client.close();
///     Ok(())
/// }
/// ```
pub struct CdoClient {
    transport: Transport,
    limiter: RequestLimiter,
    closed_tx: watch::Sender<bool>,
    closed_rx: watch::Receiver<bool>,
}

impl CdoClient {
    /// Create a client with the documented CDO defaults
    pub fn new(token: impl Into<String>) -> CdoResult<Self> {
        Self::with_config(ClientConfig::new(token))
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> CdoResult<Self> {
        config.validate()?;

        let transport = Transport::new(&config)?;
        let limiter = RequestLimiter::new(&config.rate_limits());
        let (closed_tx, closed_rx) = watch::channel(false);

        info!(
            requests_per_second = config.requests_per_second,
            requests_per_day = config.requests_per_day,
            pool_limit = config.connection_pool_limit,
            "created CDO client"
        );

        Ok(Self {
            transport,
            limiter,
            closed_tx,
            closed_rx,
        })
    }

    /// Whether the client still accepts requests
    pub fn is_open(&self) -> bool {
        !*self.closed_rx.borrow()
    }

    /// Close the client
    ///
    /// Callers suspended on a rate-limit token or a connection slot are
    /// cancelled with [`CdoError::Cancelled`]; in-flight requests are
    /// aborted. Idempotent.
    pub fn close(&self) {
        if self.closed_tx.send_replace(true) {
            return;
        }
        self.transport.shutdown();
        info!("CDO client closed");
    }

    /// Connection slots currently held by in-flight requests
    pub fn connections_in_use(&self) -> usize {
        self.transport.slots_in_use()
    }

    /// Requests left in the current UTC day under the local quota
    pub async fn remaining_today(&self) -> u32 {
        self.limiter.remaining_today().await
    }

    /// One rate-limited request cycle: lifecycle gate, limiter slot,
    /// pooled dispatch, decode.
    pub(crate) async fn request<T>(&self, path: &str, query: QueryPairs) -> CdoResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if !self.is_open() {
            return Err(CdoError::Lifecycle);
        }
        self.limiter.acquire(self.closed_rx.clone()).await?;
        self.transport
            .get_json(path, &query, self.closed_rx.clone())
            .await
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Dataset catalog endpoints (datasets, data categories, data types)
    pub fn catalog(&self) -> CatalogEndpoints<'_> {
        CatalogEndpoints::new(self)
    }

    /// Geographic endpoints (location categories, locations, stations)
    pub fn geo(&self) -> GeoEndpoints<'_> {
        GeoEndpoints::new(self)
    }

    /// Observation data endpoints
    pub fn data(&self) -> DataEndpoints<'_> {
        DataEndpoints::new(self)
    }

    // ========================================================================
    // Convenience methods
    // ========================================================================

    /// Query the dataset catalog
    pub async fn get_datasets(&self, query: &DatasetsQuery) -> CdoResult<Page<Dataset>> {
        self.catalog().datasets(query).await
    }

    /// Look up a single dataset by id
    pub async fn get_dataset(&self, id: &str) -> CdoResult<Dataset> {
        self.catalog().dataset(id).await
    }

    /// Query data categories
    pub async fn get_data_categories(
        &self,
        query: &DataCategoriesQuery,
    ) -> CdoResult<Page<DataCategory>> {
        self.catalog().data_categories(query).await
    }

    /// Look up a single data category by id
    pub async fn get_data_category(&self, id: &str) -> CdoResult<DataCategory> {
        self.catalog().data_category(id).await
    }

    /// Query data types
    pub async fn get_datatypes(&self, query: &DataTypesQuery) -> CdoResult<Page<DataType>> {
        self.catalog().datatypes(query).await
    }

    /// Look up a single data type by id
    pub async fn get_datatype(&self, id: &str) -> CdoResult<DataType> {
        self.catalog().datatype(id).await
    }

    /// Query location categories
    pub async fn get_location_categories(
        &self,
        query: &LocationCategoriesQuery,
    ) -> CdoResult<Page<LocationCategory>> {
        self.geo().location_categories(query).await
    }

    /// Look up a single location category by id
    pub async fn get_location_category(&self, id: &str) -> CdoResult<LocationCategory> {
        self.geo().location_category(id).await
    }

    /// Query locations
    pub async fn get_locations(&self, query: &LocationsQuery) -> CdoResult<Page<Location>> {
        self.geo().locations(query).await
    }

    /// Look up a single location by id
    pub async fn get_location(&self, id: &str) -> CdoResult<Location> {
        self.geo().location(id).await
    }

    /// Query weather stations
    pub async fn get_stations(&self, query: &StationsQuery) -> CdoResult<Page<Station>> {
        self.geo().stations(query).await
    }

    /// Look up a single station by id
    pub async fn get_station(&self, id: &str) -> CdoResult<Station> {
        self.geo().station(id).await
    }

    /// Query observation data
    pub async fn get_data(&self, query: &DataQuery) -> CdoResult<Page<DataPoint>> {
        self.data().query(query).await
    }
}

impl std::fmt::Debug for CdoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdoClient")
            .field("open", &self.is_open())
            .field("connections_in_use", &self.connections_in_use())
            .finish()
    }
}
