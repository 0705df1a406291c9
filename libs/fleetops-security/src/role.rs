use serde::{Deserialize, Serialize};

/// Coarse role held by a principal.
///
/// Roles are closed: an unmapped role cannot exist at runtime, and every
/// `match` over roles in the grant tables is exhaustive, so adding a variant
/// forces the grant table to be extended at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SysAdmin,
    CompanyGroupAdmin,
    CompanyAdmin,
    UnitAdmin,
    BaseAdmin,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::SysAdmin,
        Role::CompanyGroupAdmin,
        Role::CompanyAdmin,
        Role::UnitAdmin,
        Role::BaseAdmin,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SysAdmin => "SYS_ADMIN",
            Role::CompanyGroupAdmin => "COMPANY_GROUP_ADMIN",
            Role::CompanyAdmin => "COMPANY_ADMIN",
            Role::UnitAdmin => "UNIT_ADMIN",
            Role::BaseAdmin => "BASE_ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYS_ADMIN" => Ok(Role::SysAdmin),
            "COMPANY_GROUP_ADMIN" => Ok(Role::CompanyGroupAdmin),
            "COMPANY_ADMIN" => Ok(Role::CompanyAdmin),
            "UNIT_ADMIN" => Ok(Role::UnitAdmin),
            "BASE_ADMIN" => Ok(Role::BaseAdmin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl std::fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&Role::CompanyGroupAdmin).unwrap();
        assert_eq!(json, r#""COMPANY_GROUP_ADMIN""#);

        let role: Role = serde_json::from_str(r#""BASE_ADMIN""#).unwrap();
        assert_eq!(role, Role::BaseAdmin);
    }

    #[test]
    fn from_str_roundtrips_all_roles() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), *role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = Role::from_str("ADMIN").unwrap_err();
        assert_eq!(err.to_string(), "unknown role: ADMIN");
    }

    #[test]
    fn malformed_role_fails_deserialization() {
        let result: Result<Role, _> = serde_json::from_str(r#""MEMBER""#);
        assert!(result.is_err());
    }
}
