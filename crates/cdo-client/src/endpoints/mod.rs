//! API endpoint implementations

pub mod catalog;
pub mod data;
pub mod geo;

pub use catalog::CatalogEndpoints;
pub use data::DataEndpoints;
pub use geo::GeoEndpoints;

use crate::error::{CdoError, CdoResult};

/// Reject empty ids before they turn into a malformed path
pub(crate) fn require_id(name: &'static str, id: &str) -> CdoResult<()> {
    if id.is_empty() {
        return Err(CdoError::Validation(format!(
            "parameter '{name}' must not be empty"
        )));
    }
    Ok(())
}
