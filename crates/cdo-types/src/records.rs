//! Decoded JSON records for the CDO endpoints
//!
//! Field names follow the wire format; dates arrive as `YYYY-MM-DD` strings
//! (observation timestamps as `YYYY-MM-DDTHH:MM:SS`) and are kept as strings,
//! matching what the API serves.

use serde::Deserialize;

/// Pagination details of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ResultSet {
    pub offset: u64,
    pub count: u64,
    pub limit: u64,
}

/// Response metadata wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Metadata {
    pub resultset: ResultSet,
}

/// One page of decoded results
///
/// `metadata` is absent when the caller asked for `includemetadata=false`;
/// the API also serves a bare `{}` for empty result sets, which decodes to
/// an empty page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Total matching records reported by the server, when metadata is present
    pub fn total_count(&self) -> Option<u64> {
        self.metadata.map(|m| m.resultset.count)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A dataset in the CDO catalog
///
/// `uid` is only present in list responses, not in by-id lookups.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub uid: Option<String>,
    pub mindate: String,
    pub maxdate: String,
    pub name: String,
    pub datacoverage: f64,
    pub id: String,
}

/// A data category (grouping of data types)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataCategory {
    pub name: String,
    pub id: String,
}

/// A data type (observable quantity, e.g. TMAX)
///
/// By-id lookups omit `name`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataType {
    pub mindate: String,
    pub maxdate: String,
    #[serde(default)]
    pub name: Option<String>,
    pub datacoverage: f64,
    pub id: String,
}

/// A location category (e.g. city, state, country)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationCategory {
    pub name: String,
    pub id: String,
}

/// A named location
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub mindate: String,
    pub maxdate: String,
    pub name: String,
    pub datacoverage: f64,
    pub id: String,
}

/// A weather station
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Station {
    #[serde(default)]
    pub elevation: Option<f64>,
    pub mindate: String,
    pub maxdate: String,
    pub latitude: f64,
    pub name: String,
    pub datacoverage: f64,
    pub id: String,
    #[serde(default, rename = "elevationUnit")]
    pub elevation_unit: Option<String>,
    pub longitude: f64,
}

/// A single observation returned by the data endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataPoint {
    pub date: String,
    pub datatype: String,
    pub station: String,
    #[serde(default)]
    pub attributes: Option<String>,
    pub value: f64,
}

/// Status/message envelope the API serves for throttled or rejected requests
#[derive(Debug, Clone, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_datasets_page() {
        let body = r#"{
            "metadata": {"resultset": {"offset": 1, "count": 11, "limit": 25}},
            "results": [{
                "uid": "gov.noaa.ncdc:C00861",
                "mindate": "1763-01-01",
                "maxdate": "2026-08-01",
                "name": "Daily Summaries",
                "datacoverage": 1,
                "id": "GHCND"
            }]
        }"#;
        let page: Page<Dataset> = serde_json::from_str(body).unwrap();
        assert_eq!(page.total_count(), Some(11));
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, "GHCND");
        assert_eq!(page.results[0].datacoverage, 1.0);
    }

    #[test]
    fn test_decode_empty_body_as_empty_page() {
        let page: Page<Station> = serde_json::from_str("{}").unwrap();
        assert!(page.is_empty());
        assert!(page.metadata.is_none());
    }

    #[test]
    fn test_decode_station_with_elevation_unit() {
        let body = r#"{
            "elevation": 139,
            "mindate": "1948-01-01",
            "maxdate": "2026-08-01",
            "latitude": 40.77898,
            "name": "LAGUARDIA AIRPORT, NY US",
            "datacoverage": 1,
            "id": "GHCND:USW00014732",
            "elevationUnit": "METERS",
            "longitude": -73.88
        }"#;
        let station: Station = serde_json::from_str(body).unwrap();
        assert_eq!(station.elevation, Some(139.0));
        assert_eq!(station.elevation_unit.as_deref(), Some("METERS"));
    }

    #[test]
    fn test_decode_dataset_by_id_without_uid() {
        let body = r#"{
            "mindate": "1763-01-01",
            "maxdate": "2026-08-01",
            "name": "Daily Summaries",
            "datacoverage": 1,
            "id": "GHCND"
        }"#;
        let dataset: Dataset = serde_json::from_str(body).unwrap();
        assert!(dataset.uid.is_none());
    }

    #[test]
    fn test_decode_data_point_without_attributes() {
        let body = r#"{
            "date": "2020-01-01T00:00:00",
            "datatype": "TMAX",
            "station": "GHCND:USW00014732",
            "value": 7.8
        }"#;
        let point: DataPoint = serde_json::from_str(body).unwrap();
        assert!(point.attributes.is_none());
        assert_eq!(point.value, 7.8);
    }

    #[test]
    fn test_decode_status_message() {
        let body = r#"{"status": "error", "message": "rate limit exceeded"}"#;
        let msg: StatusMessage = serde_json::from_str(body).unwrap();
        assert_eq!(msg.message.as_deref(), Some("rate limit exceeded"));
    }
}
