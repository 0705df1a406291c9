#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core error types for the FleetOps API surface
//!
//! This crate provides pure data types for error handling, with no hard
//! dependencies on HTTP frameworks. It includes:
//! - The structured API error body (`ApiError` / `ErrorBody`)
//! - The stable machine-readable error code set (`ErrorCode`)
//! - Static error catalog definitions (`ErrDef`)

pub mod api_error;
pub mod catalog;

pub use api_error::{ApiError, ErrorBody, ErrorDetails};
pub use catalog::{ErrDef, ErrorCode};

/// Helper to attach the request method/url pair to an `ApiError`.
///
/// Convenience for enriching errors with request-specific context at the
/// outermost handling boundary, where the method and url are known.
pub fn finalize(e: ApiError, method: &str, url: &str) -> ApiError {
    e.with_instance(method, url)
}
