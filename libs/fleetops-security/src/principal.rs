use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::grants::permissions_for;
use crate::permission::Permission;
use crate::role::Role;

/// The authenticated identity, reconstructed fresh per request from the
/// verified token payload. Never mutated, never cached across requests.
///
/// Invariant: at least one role. Construction with zero roles fails with
/// [`PolicyError::NoRoles`] — malformed state fails loudly before any
/// authorization decision is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    roles: Vec<Role>,
    company_group_id: Option<String>,
    associated_company_group_id: Option<String>,
    companies_ids: Vec<String>,
    units_ids: Vec<String>,
    bases_ids: Vec<String>,
}

impl Principal {
    #[must_use]
    pub fn builder() -> PrincipalBuilder {
        PrincipalBuilder::default()
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    #[inline]
    #[must_use]
    pub fn company_group_id(&self) -> Option<&str> {
        self.company_group_id.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn associated_company_group_id(&self) -> Option<&str> {
        self.associated_company_group_id.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn companies_ids(&self) -> &[String] {
        &self.companies_ids
    }

    #[inline]
    #[must_use]
    pub fn units_ids(&self) -> &[String] {
        &self.units_ids
    }

    #[inline]
    #[must_use]
    pub fn bases_ids(&self) -> &[String] {
        &self.bases_ids
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True if any held role grants `permission` in the static role map.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.roles
            .iter()
            .any(|role| permissions_for(*role).contains(&permission))
    }

    /// All company-group ids the principal is attached to, direct and
    /// associated. Both count toward company-group scope overlap.
    #[must_use]
    pub fn company_group_ids(&self) -> Vec<&str> {
        self.company_group_id
            .as_deref()
            .into_iter()
            .chain(self.associated_company_group_id.as_deref())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct PrincipalBuilder {
    id: Option<String>,
    roles: Vec<Role>,
    company_group_id: Option<String>,
    associated_company_group_id: Option<String>,
    companies_ids: Vec<String>,
    units_ids: Vec<String>,
    bases_ids: Vec<String>,
}

impl PrincipalBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    #[must_use]
    pub fn company_group_id(mut self, id: impl Into<String>) -> Self {
        self.company_group_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn associated_company_group_id(mut self, id: impl Into<String>) -> Self {
        self.associated_company_group_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn companies_ids(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.companies_ids.extend(ids);
        self
    }

    #[must_use]
    pub fn units_ids(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.units_ids.extend(ids);
        self
    }

    #[must_use]
    pub fn bases_ids(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.bases_ids.extend(ids);
        self
    }

    /// Build the principal.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NoRoles`] if no role was supplied.
    pub fn build(self) -> Result<Principal, PolicyError> {
        if self.roles.is_empty() {
            return Err(PolicyError::NoRoles);
        }
        Ok(Principal {
            id: self.id.unwrap_or_default(),
            roles: self.roles,
            company_group_id: self.company_group_id,
            associated_company_group_id: self.associated_company_group_id,
            companies_ids: self.companies_ids,
            units_ids: self.units_ids,
            bases_ids: self.bases_ids,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn zero_roles_is_a_fatal_construction_error() {
        let result = Principal::builder().id("user-1").build();
        assert_eq!(result.unwrap_err(), PolicyError::NoRoles);
    }

    #[test]
    fn builder_collects_membership_lists() {
        let p = Principal::builder()
            .id("user-1")
            .role(Role::CompanyAdmin)
            .role(Role::UnitAdmin)
            .companies_ids(["co-1".to_owned(), "co-2".to_owned()])
            .units_ids(["un-1".to_owned()])
            .build()
            .unwrap();

        assert_eq!(p.id(), "user-1");
        assert_eq!(p.roles(), [Role::CompanyAdmin, Role::UnitAdmin]);
        assert_eq!(p.companies_ids(), ["co-1", "co-2"]);
        assert_eq!(p.units_ids(), ["un-1"]);
        assert!(p.bases_ids().is_empty());
        assert!(p.has_role(Role::UnitAdmin));
        assert!(!p.has_role(Role::SysAdmin));
    }

    #[test]
    fn company_group_ids_include_associated_membership() {
        let p = Principal::builder()
            .id("user-2")
            .role(Role::CompanyGroupAdmin)
            .company_group_id("cg-1")
            .associated_company_group_id("cg-9")
            .build()
            .unwrap();

        assert_eq!(p.company_group_ids(), ["cg-1", "cg-9"]);
    }

    #[test]
    fn has_permission_follows_the_role_map() {
        let base_admin = Principal::builder()
            .id("user-3")
            .role(Role::BaseAdmin)
            .bases_ids(["base-1".to_owned()])
            .build()
            .unwrap();

        assert!(base_admin.has_permission(Permission::BaseUpdate));
        assert!(!base_admin.has_permission(Permission::CompanyCreate));
        assert!(!base_admin.has_permission(Permission::SysAdminAccessAll));
    }
}
