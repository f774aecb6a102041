//! Shared types for the NOAA Climate Data Online (CDO) Web API v2
//!
//! This crate provides the core type definitions used across the CDO SDK.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Dataset`], [`Station`], [`DataPoint`], ... - Decoded API records
//! - [`Page`] - A decoded result page with pagination metadata
//! - [`DatasetsQuery`], [`StationsQuery`], [`DataQuery`], ... - Validated
//!   query parameter sets, one per list endpoint
//! - [`Extent`] - Geographic bounding box for station/location filtering
//! - [`ValidationError`] - Parameter rejection before any network use
//! - [`TokenBucket`], [`DailyQuota`], [`RateLimitConfig`] - Client-side
//!   rate limiting primitives

pub mod error;
pub mod params;
pub mod rate_limit;
pub mod records;

// Re-export commonly used types
pub use error::*;
pub use params::*;
pub use rate_limit::*;
pub use records::*;
