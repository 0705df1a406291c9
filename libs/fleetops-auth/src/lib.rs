#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! FleetOps authentication: token claims, principal reconstruction, and the
//! request-level authorization gate.
//!
//! The flow per request: the bearer token (header or `accessToken` cookie)
//! is verified by a [`TokenValidator`], its [`Claims`] are mapped to a
//! [`fleetops_security::Principal`], and handlers authorize through the
//! [`gate::Gate`] extractor — including mid-handler, after a persistence
//! lookup has produced the target's hierarchy ids.

pub mod claims;
pub mod errors;
pub mod validator;

#[cfg(feature = "axum-ext")]
pub mod gate;

pub use claims::Claims;
pub use errors::AuthError;
pub use validator::{JwtValidator, TokenValidator, ValidationConfig};

#[cfg(feature = "axum-ext")]
pub use gate::{AuthMode, AuthState, Authz, Gate, authenticate};
