//! Connection-pooled HTTP transport and response decoding
//!
//! Executes GET requests against the CDO base URL over a bounded pool of
//! reusable connections. Requests beyond the pool's capacity queue on a
//! semaphore until a slot frees, independently of the rate limiter's
//! queueing. Responses are decoded here: 2xx bodies parse into the typed
//! record, everything else maps into the error taxonomy.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::{watch, Semaphore};
use tracing::debug;

use cdo_types::QueryPairs;

use crate::client::ClientConfig;
use crate::error::{CdoError, CdoResult};

pub(crate) struct Transport {
    http: reqwest::Client,
    /// Bounds in-flight requests to the configured pool size
    slots: Semaphore,
    pool_limit: usize,
    base_url: String,
    token: String,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig) -> CdoResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.connection_pool_limit)
            .user_agent(
                config
                    .user_agent
                    .as_deref()
                    .unwrap_or(concat!("cdo-client/", env!("CARGO_PKG_VERSION"))),
            )
            .build()?;

        Ok(Self {
            http,
            slots: Semaphore::new(config.connection_pool_limit),
            pool_limit: config.connection_pool_limit,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Execute a GET and decode the response
    ///
    /// Suspends first on a connection slot; a `true` on `closed` cancels the
    /// wait and aborts an in-flight request.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryPairs,
        mut closed: watch::Receiver<bool>,
    ) -> CdoResult<T> {
        let _slot = tokio::select! {
            permit = self.slots.acquire() => permit.map_err(|_| CdoError::Cancelled)?,
            _ = closed.changed() => return Err(CdoError::Cancelled),
        };

        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "dispatching GET");

        let (status, body) = tokio::select! {
            result = self.execute(&url, query) => result?,
            _ = closed.changed() => return Err(CdoError::Cancelled),
        };

        decode_body(status, &body)
    }

    async fn execute(&self, url: &str, query: &QueryPairs) -> CdoResult<(StatusCode, String)> {
        let response = self
            .http
            .get(url)
            .header("token", &self.token)
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        Ok((status, body))
    }

    /// Stop admitting requests and wake every caller queued on a slot
    pub(crate) fn shutdown(&self) {
        self.slots.close();
    }

    /// Connection slots currently held by in-flight requests
    pub(crate) fn slots_in_use(&self) -> usize {
        self.pool_limit.saturating_sub(self.slots.available_permits())
    }
}

fn map_transport_error(err: reqwest::Error) -> CdoError {
    if err.is_timeout() {
        CdoError::Timeout
    } else {
        CdoError::Http(err)
    }
}

/// Decode a status/body pair into the endpoint's record type
pub(crate) fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> CdoResult<T> {
    if status.is_success() {
        serde_json::from_str(body).map_err(|e| CdoError::Decode(e.to_string()))
    } else {
        Err(CdoError::from_status(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdo_types::{Dataset, Page};

    #[test]
    fn test_decode_success_body() {
        let body = r#"{"metadata": {"resultset": {"offset": 1, "count": 1, "limit": 25}},
            "results": [{"mindate": "1763-01-01", "maxdate": "2026-08-01",
                         "name": "Daily Summaries", "datacoverage": 1, "id": "GHCND"}]}"#;
        let page: Page<Dataset> = decode_body(StatusCode::OK, body).unwrap();
        assert_eq!(page.results[0].id, "GHCND");
    }

    #[test]
    fn test_malformed_success_body_is_decode_error() {
        let result: CdoResult<Page<Dataset>> = decode_body(StatusCode::OK, "<html>oops</html>");
        assert!(matches!(result, Err(CdoError::Decode(_))));
    }

    #[test]
    fn test_non_success_maps_through_taxonomy() {
        let result: CdoResult<Page<Dataset>> = decode_body(
            StatusCode::NOT_FOUND,
            r#"{"status": "404", "message": "no such station"}"#,
        );
        assert!(matches!(
            result,
            Err(CdoError::NotFound { ref message }) if message == "no such station"
        ));
    }
}
