//! Static error catalog (`ErrDef` definitions and the stable code set).

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api_error::ApiError;

/// Stable machine-readable error codes.
///
/// Clients branch on these codes; they never change meaning across releases.
/// The human-readable message may change freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Malformed or invalid request input.
    E002,
    /// Authentication required: missing, invalid, or expired token.
    E003,
    /// Authenticated but not allowed: insufficient permission or scope.
    E004,
    /// Target resource does not exist.
    E005,
    /// Request conflicts with current resource state.
    E006,
    /// Internal error with a known cause.
    E007,
    /// Unhandled internal error.
    E008,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E002 => "E002",
            Self::E003 => "E003",
            Self::E004 => "E004",
            Self::E005 => "E005",
            Self::E006 => "E006",
            Self::E007 => "E007",
            Self::E008 => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static error definition from the catalog.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: ErrorCode,
}

impl ErrDef {
    /// Convert this definition into an `ApiError` with the given detail.
    #[inline]
    #[must_use]
    pub fn as_error(&self, detail: impl Into<String>) -> ApiError {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::new(status, self.code, self.title, detail)
    }
}

pub const BAD_REQUEST: ErrDef = ErrDef {
    status: 400,
    title: "Bad Request",
    code: ErrorCode::E002,
};

pub const UNAUTHORIZED: ErrDef = ErrDef {
    status: 401,
    title: "Unauthorized",
    code: ErrorCode::E003,
};

pub const FORBIDDEN: ErrDef = ErrDef {
    status: 403,
    title: "Forbidden",
    code: ErrorCode::E004,
};

pub const RESOURCE_NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Resource Not Found",
    code: ErrorCode::E005,
};

pub const CONFLICT: ErrDef = ErrDef {
    status: 409,
    title: "Conflict",
    code: ErrorCode::E006,
};

pub const INTERNAL: ErrDef = ErrDef {
    status: 500,
    title: "Internal Server Error",
    code: ErrorCode::E007,
};

pub const UNHANDLED: ErrDef = ErrDef {
    status: 500,
    title: "Internal Server Error",
    code: ErrorCode::E008,
};

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn err_def_to_api_error_works() {
        let e = FORBIDDEN.as_error("missing permission unit:create");
        assert_eq!(e.status, StatusCode::FORBIDDEN);
        assert_eq!(e.code, ErrorCode::E004);
        assert_eq!(e.message, "Forbidden");
        assert_eq!(e.detail, "missing permission unit:create");
    }

    #[test]
    fn catalog_statuses_are_valid() {
        for def in [
            BAD_REQUEST,
            UNAUTHORIZED,
            FORBIDDEN,
            RESOURCE_NOT_FOUND,
            CONFLICT,
            INTERNAL,
            UNHANDLED,
        ] {
            assert!(StatusCode::from_u16(def.status).is_ok());
        }
    }

    #[test]
    fn error_code_serializes_as_bare_string() {
        let json = serde_json::to_string(&ErrorCode::E003).unwrap();
        assert_eq!(json, r#""E003""#);
    }
}
