//! Structured API error responses (pure data model, no HTTP framework dependencies).

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::catalog::ErrorCode;

/// An API-level error carrying an HTTP status and the structured body
/// returned to clients.
///
/// The body shape is stable:
///
/// ```json
/// { "code": "E004", "message": "Forbidden", "details": { "message": "...", "method": "PATCH", "url": "/bases/base-1" } }
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct ApiError {
    /// The HTTP status for this occurrence.
    pub status: StatusCode,
    /// Stable machine-readable code from the catalog.
    pub code: ErrorCode,
    /// Short human-readable summary (the catalog title).
    pub message: String,
    /// Human-readable explanation specific to this occurrence.
    pub detail: String,
    /// Request method, filled at the handling boundary.
    pub method: String,
    /// Request url, filled at the handling boundary.
    pub url: String,
}

/// Wire shape of the error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub details: ErrorDetails,
}

/// Occurrence-specific detail block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub message: String,
    pub method: String,
    pub url: String,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: ErrorCode,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: detail.into(),
            method: String::new(),
            url: String::new(),
        }
    }

    /// Attach the request method and url for the `details` block.
    pub fn with_instance(mut self, method: impl Into<String>, url: impl Into<String>) -> Self {
        self.method = method.into();
        self.url = url.into();
        self
    }

    /// Build the serializable body for this error.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code,
            message: self.message.clone(),
            details: ErrorDetails {
                message: self.detail.clone(),
                method: self.method.clone(),
                url: self.url.clone(),
            },
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.code, self.message, self.detail)
    }
}

impl std::error::Error for ApiError {}

/// Axum integration: make `ApiError` directly usable as a response.
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code.as_str(), detail = %self.detail, "internal error");
        }
        let status = self.status;
        let mut resp = axum::Json(self.body()).into_response();
        *resp.status_mut() = status;
        resp
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn body_shape_matches_contract() {
        let e = ApiError::new(
            StatusCode::FORBIDDEN,
            ErrorCode::E004,
            "Forbidden",
            "no matching scope",
        )
        .with_instance("PATCH", "/bases/base-2");

        let json = serde_json::to_value(e.body()).unwrap();
        assert_eq!(json["code"], "E004");
        assert_eq!(json["message"], "Forbidden");
        assert_eq!(json["details"]["message"], "no matching scope");
        assert_eq!(json["details"]["method"], "PATCH");
        assert_eq!(json["details"]["url"], "/bases/base-2");
    }

    #[test]
    fn finalize_attaches_instance() {
        let e = crate::finalize(
            ApiError::new(StatusCode::UNAUTHORIZED, ErrorCode::E003, "Unauthorized", "no token"),
            "GET",
            "/units",
        );
        assert_eq!(e.method, "GET");
        assert_eq!(e.url, "/units");
    }

    #[test]
    fn display_includes_code_and_detail() {
        let e = ApiError::new(StatusCode::CONFLICT, ErrorCode::E006, "Conflict", "plate in use");
        assert_eq!(e.to_string(), "E006 Conflict: plate in use");
    }
}
