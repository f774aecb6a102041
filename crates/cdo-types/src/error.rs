//! Parameter validation errors
//!
//! Raised while building a query string, before any network call is made.

use thiserror::Error;

/// Maximum value the `limit` pagination parameter accepts upstream.
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Errors produced while validating query parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `limit` outside the documented 1..=1000 range
    #[error("parameter 'limit' must be between 1 and {max}, got {got}")]
    LimitOutOfRange { got: u32, max: u32 },

    /// Date not in `YYYY-MM-DD` or `YYYY-MM-DDThh:mm:ss` form
    #[error("malformed date '{value}' (expected YYYY-MM-DD or YYYY-MM-DDThh:mm:ss)")]
    MalformedDate { value: String },

    /// Start date after end date
    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: String, end: String },

    /// Bounding extent coordinates out of range or inverted
    #[error("invalid bounding extent: {reason}")]
    InvalidExtent { reason: String },

    /// Required identifier was empty
    #[error("parameter '{name}' must not be empty")]
    EmptyParameter { name: &'static str },
}
