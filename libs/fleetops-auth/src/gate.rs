//! Axum integration: the `authenticate` middleware and the [`Authz`]
//! extractor handlers call `authorize()` on.
//!
//! The middleware verifies the token and stores the reconstructed
//! [`Principal`] in request extensions. The extractor picks it up together
//! with the request method and url, so every denial it produces already
//! carries the `details.method`/`details.url` pair of the error contract.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use fleetops_errors::{ApiError, catalog, finalize};
use fleetops_security::{Ability, AccessRequest, Principal, check_access};

use crate::errors::AuthError;
use crate::validator::TokenValidator;

/// Whether a route tree demands authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Reject requests without a valid principal.
    Required,
    /// Pass requests through without one; extraction fails later only
    /// where a handler actually demands a principal.
    Optional,
}

/// Shared state for the [`authenticate`] middleware.
#[derive(Clone)]
pub struct AuthState {
    validator: Arc<dyn TokenValidator>,
    mode: AuthMode,
}

impl AuthState {
    #[must_use]
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self {
            validator,
            mode: AuthMode::Required,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: AuthMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Pull the raw token out of the request: `Authorization: Bearer` first,
/// then the `accessToken` cookie.
fn extract_token(parts: &http::HeaderMap) -> Option<String> {
    if let Some(value) = parts
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))
        {
            return Some(token.trim().to_owned());
        }
    }

    parts
        .get(http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == "accessToken").then(|| value.to_owned())
            })
        })
}

/// Token-verification middleware.
///
/// On success the reconstructed [`Principal`] lands in request extensions.
/// In [`AuthMode::Required`] any failure short-circuits with a finalized
/// 401 body; in [`AuthMode::Optional`] the request proceeds anonymously.
#[allow(clippy::needless_pass_by_value)] // axum middleware takes state by value
pub async fn authenticate(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let url = req.uri().to_string();

    let outcome = match extract_token(req.headers()) {
        Some(token) => state
            .validator
            .validate_and_parse(&token)
            .await
            .and_then(|claims| claims.to_principal()),
        None => Err(AuthError::Unauthenticated),
    };

    match outcome {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(err) if state.mode == AuthMode::Optional => {
            tracing::debug!(error = %err, "proceeding without principal");
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, %method, %url, "authentication failed");
            finalize(err.to_api_error(), &method, &url).into_response()
        }
    }
}

/// Extractor handlers take to authorize the current request.
///
/// Wraps the [`Gate`], which holds the principal plus the request
/// method/url needed for error bodies. Extraction fails with 401 when the
/// middleware did not establish a principal.
pub struct Authz(pub Gate);

impl<S> FromRequestParts<S> for Authz
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let method = parts.method.to_string();
        let url = parts.uri.to_string();

        let Some(principal) = parts.extensions.get::<Principal>().cloned() else {
            return Err(finalize(
                AuthError::Unauthenticated.to_api_error(),
                &method,
                &url,
            ));
        };

        Ok(Authz(Gate {
            principal,
            method,
            url,
        }))
    }
}

/// Per-request authorization gate.
///
/// Checks run wherever the handler has enough context, including after a
/// persistence lookup has produced the target's hierarchy ids.
#[derive(Debug, Clone)]
pub struct Gate {
    principal: Principal,
    method: String,
    url: String,
}

impl Gate {
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Authorize the current request, or produce the finalized 403 body.
    ///
    /// # Errors
    ///
    /// Returns a `Forbidden` [`ApiError`] when the principal fails the
    /// permission or scope gate.
    pub fn authorize(&self, request: &AccessRequest) -> Result<(), ApiError> {
        check_access(&self.principal, request).map_err(|reason| {
            tracing::warn!(
                subject = %self.principal.id(),
                reason = %reason,
                method = %self.method,
                url = %self.url,
                "access denied"
            );
            finalize(
                AuthError::from(reason).to_api_error(),
                &self.method,
                &self.url,
            )
        })
    }

    /// Build the rule-based [`Ability`] for fine-grained instance checks.
    ///
    /// # Errors
    ///
    /// Returns a 500-class [`ApiError`] when the principal cannot yield a
    /// rule set; the middleware guarantees at least one role, so this only
    /// fires on internal state corruption.
    pub fn ability(&self) -> Result<Ability, ApiError> {
        Ability::for_principal(&self.principal).map_err(|e| {
            finalize(
                catalog::INTERNAL.as_error(e.to_string()),
                &self.method,
                &self.url,
            )
        })
    }
}
