//! Integration tests for the CDO client
//!
//! Runs the full request pipeline (validation, rate limiting, pooled
//! transport, decoding) against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use httpmock::{Method::GET, MockServer};

use cdo_client::{
    CdoClient, CdoError, ClientConfig, DataQuery, DatasetsQuery, Extent, SortField, SortOrder,
    StationsQuery, Units,
};

fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new("test-token")
        .with_base_url(server.base_url())
        .with_requests_per_second(1_000)
}

// =============================================================================
// Round-trip encoding and decoding
// =============================================================================

#[tokio::test]
async fn test_datasets_roundtrip() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/datasets")
                .header("token", "test-token")
                .query_param("datatypeid", "TMAX&TMIN")
                .query_param("startdate", "2020-01-01")
                .query_param("enddate", "2020-12-31")
                .query_param("sortfield", "name")
                .query_param("sortorder", "desc")
                .query_param("limit", "2");
            then.status(200).json_body(serde_json::json!({
                "metadata": {"resultset": {"offset": 1, "count": 2, "limit": 2}},
                "results": [
                    {"uid": "gov.noaa.ncdc:C00861", "mindate": "1763-01-01",
                     "maxdate": "2026-08-01", "name": "Daily Summaries",
                     "datacoverage": 1, "id": "GHCND"},
                    {"uid": "gov.noaa.ncdc:C00946", "mindate": "1750-02-01",
                     "maxdate": "2026-07-01", "name": "Global Summary of the Month",
                     "datacoverage": 1, "id": "GSOM"}
                ]
            }));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let query = DatasetsQuery::new()
        .with_datatype_id("TMAX")
        .with_datatype_id("TMIN")
        .with_date_range("2020-01-01", "2020-12-31")
        .with_sort(SortField::Name, SortOrder::Desc)
        .with_limit(2);

    let page = client.get_datasets(&query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.total_count(), Some(2));
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].id, "GHCND");
    assert_eq!(page.results[1].name, "Global Summary of the Month");
}

#[tokio::test]
async fn test_dataset_by_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/datasets/GHCND");
            then.status(200).json_body(serde_json::json!({
                "mindate": "1763-01-01", "maxdate": "2026-08-01",
                "name": "Daily Summaries", "datacoverage": 1, "id": "GHCND"
            }));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let dataset = client.get_dataset("GHCND").await.unwrap();

    mock.assert_async().await;
    assert_eq!(dataset.name, "Daily Summaries");
    assert!(dataset.uid.is_none());
}

#[tokio::test]
async fn test_stations_extent_roundtrip() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/stations")
                .query_param("extent", "40,-74.5,41,-73.5");
            then.status(200).json_body(serde_json::json!({
                "metadata": {"resultset": {"offset": 1, "count": 1, "limit": 25}},
                "results": [{
                    "elevation": 3, "mindate": "1948-01-01", "maxdate": "2026-08-01",
                    "latitude": 40.77898, "name": "LAGUARDIA AIRPORT, NY US",
                    "datacoverage": 1, "id": "GHCND:USW00014732",
                    "elevationUnit": "METERS", "longitude": -73.88
                }]
            }));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let page = client
        .get_stations(&StationsQuery::new().with_extent(Extent::new(40.0, -74.5, 41.0, -73.5)))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.results[0].elevation_unit.as_deref(), Some("METERS"));
}

#[tokio::test]
async fn test_data_without_metadata() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/data")
                .query_param("datasetid", "GHCND")
                .query_param("units", "metric")
                .query_param("includemetadata", "false");
            then.status(200).json_body(serde_json::json!({
                "results": [{
                    "date": "2024-01-01T00:00:00", "datatype": "TMAX",
                    "station": "GHCND:USW00014732", "attributes": ",,W,2400",
                    "value": 7.8
                }]
            }));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let page = client
        .get_data(
            &DataQuery::new("GHCND", "2024-01-01", "2024-01-31")
                .with_units(Units::Metric)
                .without_metadata(),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(page.metadata.is_none());
    assert_eq!(page.results[0].value, 7.8);
}

#[tokio::test]
async fn test_empty_body_decodes_to_empty_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stations");
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let page = client.get_stations(&StationsQuery::new()).await.unwrap();
    assert!(page.is_empty());
}

// =============================================================================
// Error taxonomy
// =============================================================================

#[tokio::test]
async fn test_unknown_station_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stations/GHCND:NOPE");
            then.status(404)
                .json_body(serde_json::json!({"status": "404", "message": "Station not found"}));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let err = client.get_station("GHCND:NOPE").await.unwrap_err();
    assert!(matches!(
        err,
        CdoError::NotFound { ref message } if message == "Station not found"
    ));
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/datasets");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let err = client.get_datasets(&DatasetsQuery::new()).await.unwrap_err();
    assert!(matches!(err, CdoError::Decode(_)));
}

#[tokio::test]
async fn test_bad_token_is_authentication_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/datasets");
            then.status(401).json_body(
                serde_json::json!({"status": "400", "message": "Token parameter is invalid"}),
            );
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let err = client.get_datasets(&DatasetsQuery::new()).await.unwrap_err();
    assert!(matches!(err, CdoError::Authentication { status: 401, .. }));
}

#[tokio::test]
async fn test_remote_throttle_is_rate_limited_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/datasets");
            then.status(429).json_body(serde_json::json!({
                "status": "error",
                "message": "The request limit has been reached"
            }));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let err = client.get_datasets(&DatasetsQuery::new()).await.unwrap_err();
    assert!(matches!(
        err,
        CdoError::RateLimited { ref message } if message.contains("request limit")
    ));
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_server_failure_is_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/datasets");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let err = client.get_datasets(&DatasetsQuery::new()).await.unwrap_err();
    assert!(matches!(err, CdoError::Server { status: 503, .. }));
}

#[tokio::test]
async fn test_upstream_rejection_is_validation_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/data");
            then.status(400).json_body(serde_json::json!({
                "status": "400",
                "message": "Date range exceeds one year"
            }));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let err = client
        .get_data(&DataQuery::new("GHCND", "2020-01-01", "2024-01-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, CdoError::Validation(_)));
}

// =============================================================================
// Local validation happens before any dispatch
// =============================================================================

#[tokio::test]
async fn test_invalid_limit_never_reaches_network() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/datasets");
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;

    let client = CdoClient::with_config(test_config(&server)).unwrap();
    let err = client
        .get_datasets(&DatasetsQuery::new().with_limit(1001))
        .await
        .unwrap_err();

    assert!(matches!(err, CdoError::Validation(_)));
    assert_eq!(mock.hits_async().await, 0);
}

// =============================================================================
// Lifecycle and cancellation
// =============================================================================

#[tokio::test]
async fn test_call_after_close_is_lifecycle_error() {
    let server = MockServer::start_async().await;
    let client = CdoClient::with_config(test_config(&server)).unwrap();

    client.close();
    let err = client.get_datasets(&DatasetsQuery::new()).await.unwrap_err();
    assert!(matches!(err, CdoError::Lifecycle));
}

#[tokio::test]
async fn test_close_cancels_limiter_waiters_and_drains_pool() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/datasets");
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;

    // One token per second: the first request drains the bucket, the rest
    // suspend on the limiter.
    let config = ClientConfig::new("test-token")
        .with_base_url(server.base_url())
        .with_requests_per_second(1);
    let client = Arc::new(CdoClient::with_config(config).unwrap());

    client.get_datasets(&DatasetsQuery::new()).await.unwrap();

    let mut waiters = Vec::new();
    for _ in 0..3 {
        let client = client.clone();
        waiters.push(tokio::spawn(async move {
            client.get_datasets(&DatasetsQuery::new()).await
        }));
    }
    // Give the waiters time to suspend on the limiter.
    tokio::time::sleep(Duration::from_millis(50)).await;

    client.close();

    for waiter in waiters {
        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(CdoError::Cancelled)));
    }
    assert_eq!(client.connections_in_use(), 0);
    assert!(!client.is_open());
}

// =============================================================================
// Local daily quota
// =============================================================================

#[tokio::test]
async fn test_daily_quota_exhaustion_fails_without_waiting() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/datasets");
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;

    let config = test_config(&server).with_requests_per_day(2);
    let client = CdoClient::with_config(config).unwrap();

    client.get_datasets(&DatasetsQuery::new()).await.unwrap();
    client.get_datasets(&DatasetsQuery::new()).await.unwrap();
    assert_eq!(client.remaining_today().await, 0);

    let before = std::time::Instant::now();
    let err = client.get_datasets(&DatasetsQuery::new()).await.unwrap_err();
    assert!(matches!(err, CdoError::QuotaExceeded { limit: 2 }));
    assert!(before.elapsed() < Duration::from_millis(100));
    assert_eq!(mock.hits_async().await, 2);
}
