use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use fleetops_security::{Principal, Role};

use crate::errors::AuthError;

/// Verified-token payload, provider-agnostic.
///
/// Wire names are camelCase, matching the session token issued by the
/// identity service. Membership id lists default to empty; `roles` does not
/// get a default on purpose — a payload without roles is malformed and must
/// fail reconstruction, not degrade to "no access".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject - the `sub` claim.
    pub sub: String,

    /// Roles held by the subject.
    pub roles: Vec<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_group_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_company_group_id: Option<String>,

    #[serde(default)]
    pub companies_ids: Vec<String>,

    #[serde(default)]
    pub units_ids: Vec<String>,

    #[serde(default)]
    pub bases_ids: Vec<String>,

    /// Expiration - the `exp` claim, unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Not before - the `nbf` claim, unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issued at - the `iat` claim, unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Additional provider-specific claims.
    #[serde(flatten)]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Check if the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.exp
            .is_some_and(|exp| OffsetDateTime::now_utc().unix_timestamp() >= exp)
    }

    /// Check if the token is valid yet (nbf check).
    #[must_use]
    pub fn is_valid_yet(&self) -> bool {
        self.nbf
            .is_none_or(|nbf| OffsetDateTime::now_utc().unix_timestamp() >= nbf)
    }

    /// Reconstruct the request principal from this payload.
    ///
    /// Pure mapping; no network or storage calls. Runs once per request and
    /// the result is discarded at request end.
    ///
    /// # Errors
    ///
    /// Returns an authentication-class error if the payload shape is
    /// invalid: empty `sub` or an empty `roles` list.
    pub fn to_principal(&self) -> Result<Principal, AuthError> {
        if self.sub.is_empty() {
            return Err(AuthError::MissingClaim("sub"));
        }
        if self.roles.is_empty() {
            return Err(AuthError::MissingClaim("roles"));
        }

        let mut builder = Principal::builder()
            .id(self.sub.clone())
            .roles(self.roles.iter().copied())
            .companies_ids(self.companies_ids.iter().cloned())
            .units_ids(self.units_ids.iter().cloned())
            .bases_ids(self.bases_ids.iter().cloned());
        if let Some(id) = &self.company_group_id {
            builder = builder.company_group_id(id.clone());
        }
        if let Some(id) = &self.associated_company_group_id {
            builder = builder.associated_company_group_id(id.clone());
        }

        builder
            .build()
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
