use thiserror::Error;

use fleetops_errors::{ApiError, catalog};
use fleetops_security::DenyReason;

/// Authentication and authorization failures at the request boundary.
///
/// Authentication failures (no/invalid/expired token) map to 401;
/// authorization failures (valid principal, insufficient permission or
/// scope) map to 403. Configuration failures surface as 500 so operators
/// can tell a misconfigured system apart from a correctly denied user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required: missing or invalid token")]
    Unauthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing required claim: {0}")]
    MissingClaim(&'static str),

    #[error(transparent)]
    Forbidden(#[from] DenyReason),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Map to the stable API error catalog (E003/E004/E007).
    #[must_use]
    pub fn to_api_error(&self) -> ApiError {
        match self {
            AuthError::Unauthenticated
            | AuthError::InvalidToken(_)
            | AuthError::TokenExpired
            | AuthError::MissingClaim(_) => catalog::UNAUTHORIZED.as_error(self.to_string()),
            AuthError::Forbidden(_) => catalog::FORBIDDEN.as_error(self.to_string()),
            AuthError::Internal(_) => catalog::INTERNAL.as_error(self.to_string()),
        }
    }
}

#[cfg(feature = "axum-ext")]
impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        self.to_api_error().into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use fleetops_errors::ErrorCode;
    use fleetops_security::Permission;
    use http::StatusCode;

    #[test]
    fn authentication_failures_map_to_401_e003() {
        for e in [
            AuthError::Unauthenticated,
            AuthError::InvalidToken("bad signature".to_owned()),
            AuthError::TokenExpired,
            AuthError::MissingClaim("roles"),
        ] {
            let api = e.to_api_error();
            assert_eq!(api.status, StatusCode::UNAUTHORIZED);
            assert_eq!(api.code, ErrorCode::E003);
        }
    }

    #[test]
    fn authorization_failure_maps_to_403_e004() {
        let api = AuthError::Forbidden(DenyReason::NoMatchingScope).to_api_error();
        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.code, ErrorCode::E004);
        assert!(api.detail.contains("no matching scope"));
    }

    #[test]
    fn forbidden_detail_lists_required_tokens() {
        let api = AuthError::Forbidden(DenyReason::MissingPermission {
            required: vec![Permission::UnitCreate, Permission::UnitUpdate],
            require_all: true,
        })
        .to_api_error();
        assert!(api.detail.contains("unit:create"));
        assert!(api.detail.contains("unit:update"));
    }

    #[test]
    fn configuration_failure_maps_to_500_e007() {
        let api = AuthError::Internal("role table broken".to_owned()).to_api_error();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code, ErrorCode::E007);
    }
}
