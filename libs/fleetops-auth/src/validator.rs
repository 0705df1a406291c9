//! Token validation behind a trait seam.
//!
//! The middleware only depends on [`TokenValidator`], so tests (and
//! alternate token sources) plug in without touching the JWT machinery.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::claims::Claims;
use crate::errors::AuthError;

/// Validates a raw bearer token and parses it into [`Claims`].
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Verify `token` and parse its payload.
    ///
    /// # Errors
    ///
    /// Returns an authentication-class error when the token is expired,
    /// malformed, or fails signature verification.
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Validation knobs for [`JwtValidator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Expected `iss` claim; unchecked when `None`.
    pub issuer: Option<String>,
    /// Expected `aud` claim; unchecked when `None`.
    pub audience: Option<String>,
    /// Clock skew tolerance for `exp`/`nbf`, in seconds.
    pub leeway_seconds: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            issuer: None,
            audience: None,
            leeway_seconds: 60,
        }
    }
}

/// RS256 JWT validator backed by `jsonwebtoken`.
pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    /// Build a validator from an RSA public key in PEM format.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] when the PEM is not a usable RSA key.
    pub fn from_rsa_pem(pem: &[u8], config: &ValidationConfig) -> Result<Self, AuthError> {
        let key = DecodingKey::from_rsa_pem(pem)
            .map_err(|e| AuthError::Internal(format!("invalid RSA public key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = config.leeway_seconds;
        if let Some(iss) = &config.issuer {
            validation.set_issuer(&[iss]);
        }
        match &config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key, validation })
    }
}

#[async_trait]
impl TokenValidator for JwtValidator {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;
        Ok(data.claims)
    }
}
