//! Query parameter sets for the CDO endpoints
//!
//! Each list endpoint gets a query struct with optional filters and fluent
//! `with_*` setters. [`to_query`](DatasetsQuery::to_query) validates every
//! field and produces the encoded pairs handed to the HTTP layer, so nothing
//! reaches the network until validation passes.
//!
//! Multi-valued ID filters are joined with `&`, which is the chaining format
//! the upstream API documents (e.g. `GHCND:USW00094728&GHCND:USC00042319`).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ValidationError, MAX_PAGE_LIMIT};

/// Encoded query pairs ready for URL serialization
pub type QueryPairs = Vec<(&'static str, String)>;

/// Field to sort results by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Name,
    MinDate,
    MaxDate,
    DataCoverage,
}

impl SortField {
    /// Wire representation of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::MinDate => "mindate",
            Self::MaxDate => "maxdate",
            Self::DataCoverage => "datacoverage",
        }
    }
}

/// Direction of sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Unit system applied to returned data values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    Standard,
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Metric => "metric",
        }
    }
}

/// Geographic bounding box for filtering stations by area
///
/// Rendered as `lat_min,lon_min,lat_max,lon_max`, the `LatLngBounds` URL
/// format the stations endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Extent {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Check coordinate ranges and corner ordering
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidExtent { reason };

        for (name, lat) in [("min_lat", self.min_lat), ("max_lat", self.max_lat)] {
            if !(-90.0..=90.0).contains(&lat) || !lat.is_finite() {
                return Err(invalid(format!("{name} {lat} outside [-90, 90]")));
            }
        }
        for (name, lon) in [("min_lon", self.min_lon), ("max_lon", self.max_lon)] {
            if !(-180.0..=180.0).contains(&lon) || !lon.is_finite() {
                return Err(invalid(format!("{name} {lon} outside [-180, 180]")));
            }
        }
        if self.min_lat >= self.max_lat {
            return Err(invalid(format!(
                "min_lat {} is not below max_lat {}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon >= self.max_lon {
            return Err(invalid(format!(
                "min_lon {} is not below max_lon {}",
                self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

fn parse_date(value: &str) -> Result<NaiveDateTime, ValidationError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").map_err(|_| {
        ValidationError::MalformedDate {
            value: value.to_string(),
        }
    })
}

fn push_id_list(q: &mut QueryPairs, key: &'static str, ids: &[String]) {
    if !ids.is_empty() {
        q.push((key, ids.join("&")));
    }
}

/// Validate and encode the date window, sorting, and pagination fields
/// shared by every endpoint.
#[allow(clippy::too_many_arguments)]
fn encode_window(
    q: &mut QueryPairs,
    start: Option<&str>,
    end: Option<&str>,
    sort_field: Option<SortField>,
    sort_order: Option<SortOrder>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<(), ValidationError> {
    let start_at = start.map(parse_date).transpose()?;
    let end_at = end.map(parse_date).transpose()?;
    if let (Some(s), Some(e)) = (start_at, end_at) {
        if s > e {
            return Err(ValidationError::InvertedDateRange {
                start: start.unwrap_or_default().to_string(),
                end: end.unwrap_or_default().to_string(),
            });
        }
    }

    if let Some(v) = start {
        q.push(("startdate", v.to_string()));
    }
    if let Some(v) = end {
        q.push(("enddate", v.to_string()));
    }
    if let Some(field) = sort_field {
        q.push(("sortfield", field.as_str().to_string()));
    }
    if let Some(order) = sort_order {
        q.push(("sortorder", order.as_str().to_string()));
    }
    if let Some(limit) = limit {
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(ValidationError::LimitOutOfRange {
                got: limit,
                max: MAX_PAGE_LIMIT,
            });
        }
        q.push(("limit", limit.to_string()));
    }
    if let Some(offset) = offset {
        q.push(("offset", offset.to_string()));
    }
    Ok(())
}

/// Query parameters for the `/datasets` endpoint
#[derive(Debug, Clone, Default)]
pub struct DatasetsQuery {
    pub datatype_ids: Vec<String>,
    pub location_ids: Vec<String>,
    pub station_ids: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DatasetsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datatype_id(mut self, id: impl Into<String>) -> Self {
        self.datatype_ids.push(id.into());
        self
    }

    pub fn with_location_id(mut self, id: impl Into<String>) -> Self {
        self.location_ids.push(id.into());
        self
    }

    pub fn with_station_id(mut self, id: impl Into<String>) -> Self {
        self.station_ids.push(id.into());
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Validate and encode into query pairs
    pub fn to_query(&self) -> Result<QueryPairs, ValidationError> {
        let mut q = QueryPairs::new();
        push_id_list(&mut q, "datatypeid", &self.datatype_ids);
        push_id_list(&mut q, "locationid", &self.location_ids);
        push_id_list(&mut q, "stationid", &self.station_ids);
        encode_window(
            &mut q,
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.sort_field,
            self.sort_order,
            self.limit,
            self.offset,
        )?;
        Ok(q)
    }
}

/// Query parameters for the `/datacategories` endpoint
#[derive(Debug, Clone, Default)]
pub struct DataCategoriesQuery {
    pub dataset_ids: Vec<String>,
    pub location_ids: Vec<String>,
    pub station_ids: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DataCategoriesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_ids.push(id.into());
        self
    }

    pub fn with_location_id(mut self, id: impl Into<String>) -> Self {
        self.location_ids.push(id.into());
        self
    }

    pub fn with_station_id(mut self, id: impl Into<String>) -> Self {
        self.station_ids.push(id.into());
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_query(&self) -> Result<QueryPairs, ValidationError> {
        let mut q = QueryPairs::new();
        push_id_list(&mut q, "datasetid", &self.dataset_ids);
        push_id_list(&mut q, "locationid", &self.location_ids);
        push_id_list(&mut q, "stationid", &self.station_ids);
        encode_window(
            &mut q,
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.sort_field,
            self.sort_order,
            self.limit,
            self.offset,
        )?;
        Ok(q)
    }
}

/// Query parameters for the `/datatypes` endpoint
///
/// Data types additionally filter by data category.
#[derive(Debug, Clone, Default)]
pub struct DataTypesQuery {
    pub dataset_ids: Vec<String>,
    pub location_ids: Vec<String>,
    pub station_ids: Vec<String>,
    pub data_category_ids: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DataTypesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_ids.push(id.into());
        self
    }

    pub fn with_location_id(mut self, id: impl Into<String>) -> Self {
        self.location_ids.push(id.into());
        self
    }

    pub fn with_station_id(mut self, id: impl Into<String>) -> Self {
        self.station_ids.push(id.into());
        self
    }

    pub fn with_data_category_id(mut self, id: impl Into<String>) -> Self {
        self.data_category_ids.push(id.into());
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_query(&self) -> Result<QueryPairs, ValidationError> {
        let mut q = QueryPairs::new();
        push_id_list(&mut q, "datasetid", &self.dataset_ids);
        push_id_list(&mut q, "locationid", &self.location_ids);
        push_id_list(&mut q, "stationid", &self.station_ids);
        push_id_list(&mut q, "datacategoryid", &self.data_category_ids);
        encode_window(
            &mut q,
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.sort_field,
            self.sort_order,
            self.limit,
            self.offset,
        )?;
        Ok(q)
    }
}

/// Query parameters for the `/locationcategories` endpoint
#[derive(Debug, Clone, Default)]
pub struct LocationCategoriesQuery {
    pub dataset_ids: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl LocationCategoriesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_ids.push(id.into());
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_query(&self) -> Result<QueryPairs, ValidationError> {
        let mut q = QueryPairs::new();
        push_id_list(&mut q, "datasetid", &self.dataset_ids);
        encode_window(
            &mut q,
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.sort_field,
            self.sort_order,
            self.limit,
            self.offset,
        )?;
        Ok(q)
    }
}

/// Query parameters for the `/locations` endpoint
#[derive(Debug, Clone, Default)]
pub struct LocationsQuery {
    pub dataset_ids: Vec<String>,
    pub location_category_ids: Vec<String>,
    pub data_category_ids: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl LocationsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_ids.push(id.into());
        self
    }

    pub fn with_location_category_id(mut self, id: impl Into<String>) -> Self {
        self.location_category_ids.push(id.into());
        self
    }

    pub fn with_data_category_id(mut self, id: impl Into<String>) -> Self {
        self.data_category_ids.push(id.into());
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_query(&self) -> Result<QueryPairs, ValidationError> {
        let mut q = QueryPairs::new();
        push_id_list(&mut q, "datasetid", &self.dataset_ids);
        push_id_list(&mut q, "locationcategoryid", &self.location_category_ids);
        push_id_list(&mut q, "datacategoryid", &self.data_category_ids);
        encode_window(
            &mut q,
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.sort_field,
            self.sort_order,
            self.limit,
            self.offset,
        )?;
        Ok(q)
    }
}

/// Query parameters for the `/stations` endpoint
///
/// Stations are the only resource filterable by geographic [`Extent`].
#[derive(Debug, Clone, Default)]
pub struct StationsQuery {
    pub dataset_ids: Vec<String>,
    pub location_ids: Vec<String>,
    pub data_category_ids: Vec<String>,
    pub datatype_ids: Vec<String>,
    pub extent: Option<Extent>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl StationsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_ids.push(id.into());
        self
    }

    pub fn with_location_id(mut self, id: impl Into<String>) -> Self {
        self.location_ids.push(id.into());
        self
    }

    pub fn with_data_category_id(mut self, id: impl Into<String>) -> Self {
        self.data_category_ids.push(id.into());
        self
    }

    pub fn with_datatype_id(mut self, id: impl Into<String>) -> Self {
        self.datatype_ids.push(id.into());
        self
    }

    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_query(&self) -> Result<QueryPairs, ValidationError> {
        let mut q = QueryPairs::new();
        push_id_list(&mut q, "datasetid", &self.dataset_ids);
        push_id_list(&mut q, "locationid", &self.location_ids);
        push_id_list(&mut q, "datacategoryid", &self.data_category_ids);
        push_id_list(&mut q, "datatypeid", &self.datatype_ids);
        if let Some(extent) = &self.extent {
            extent.validate()?;
            q.push(("extent", extent.to_string()));
        }
        encode_window(
            &mut q,
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.sort_field,
            self.sort_order,
            self.limit,
            self.offset,
        )?;
        Ok(q)
    }
}

/// Query parameters for the `/data` endpoint
///
/// Unlike the catalog endpoints, a dataset id and a date range are
/// mandatory here. Annual and monthly datasets accept ranges up to ten
/// years; everything else is limited to one year, enforced upstream.
#[derive(Debug, Clone)]
pub struct DataQuery {
    pub dataset_id: String,
    pub start_date: String,
    pub end_date: String,
    pub datatype_ids: Vec<String>,
    pub location_ids: Vec<String>,
    pub station_ids: Vec<String>,
    pub units: Option<Units>,
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub include_metadata: Option<bool>,
}

impl DataQuery {
    pub fn new(
        dataset_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            datatype_ids: Vec::new(),
            location_ids: Vec::new(),
            station_ids: Vec::new(),
            units: None,
            sort_field: None,
            sort_order: None,
            limit: None,
            offset: None,
            include_metadata: None,
        }
    }

    pub fn with_datatype_id(mut self, id: impl Into<String>) -> Self {
        self.datatype_ids.push(id.into());
        self
    }

    pub fn with_location_id(mut self, id: impl Into<String>) -> Self {
        self.location_ids.push(id.into());
        self
    }

    pub fn with_station_id(mut self, id: impl Into<String>) -> Self {
        self.station_ids.push(id.into());
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Exclude result-set metadata from the response
    pub fn without_metadata(mut self) -> Self {
        self.include_metadata = Some(false);
        self
    }

    pub fn to_query(&self) -> Result<QueryPairs, ValidationError> {
        if self.dataset_id.is_empty() {
            return Err(ValidationError::EmptyParameter { name: "datasetid" });
        }

        let mut q = QueryPairs::new();
        q.push(("datasetid", self.dataset_id.clone()));
        push_id_list(&mut q, "datatypeid", &self.datatype_ids);
        push_id_list(&mut q, "locationid", &self.location_ids);
        push_id_list(&mut q, "stationid", &self.station_ids);
        if let Some(units) = self.units {
            q.push(("units", units.as_str().to_string()));
        }
        encode_window(
            &mut q,
            Some(&self.start_date),
            Some(&self.end_date),
            self.sort_field,
            self.sort_order,
            self.limit,
            self.offset,
        )?;
        if let Some(include) = self.include_metadata {
            q.push(("includemetadata", include.to_string()));
        }
        Ok(q)
    }
}
