//! The role grant tables: static role → permission sets for the
//! permission/scope checker, and per-role rule grants for the
//! condition-based evaluator.
//!
//! Both tables match exhaustively on [`Role`], so adding a role without
//! extending the tables is a compile error — a role can never silently
//! grant nothing.

use crate::permission::Permission;
use crate::principal::Principal;
use crate::role::Role;
use crate::rules::{Action, Predicate, Resource, ResourceKind, Rule, ScopeField};

const SYS_ADMIN_PERMISSIONS: &[Permission] = &[Permission::SysAdminAccessAll];

const COMPANY_GROUP_ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::CompanyGroupRead,
    Permission::CompanyGroupUpdate,
    Permission::CompanyCreate,
    Permission::CompanyRead,
    Permission::CompanyUpdate,
    Permission::CompanyDelete,
    Permission::CompanyList,
    Permission::UnitCreate,
    Permission::UnitRead,
    Permission::UnitUpdate,
    Permission::UnitDelete,
    Permission::UnitList,
    Permission::BaseCreate,
    Permission::BaseRead,
    Permission::BaseUpdate,
    Permission::BaseDelete,
    Permission::BaseList,
    Permission::AmbulanceCreate,
    Permission::AmbulanceRead,
    Permission::AmbulanceUpdate,
    Permission::AmbulanceDelete,
    Permission::AmbulanceList,
    Permission::AmbulanceSwitchStatus,
    Permission::AmbulanceDocumentsCreate,
    Permission::AmbulanceDocumentsRead,
    Permission::AmbulanceDocumentsUpdate,
    Permission::AmbulanceDocumentsDelete,
    Permission::AmbulanceDocumentsBulkUpdate,
    Permission::UserCreate,
    Permission::UserRead,
    Permission::UserUpdate,
    Permission::UserDelete,
    Permission::UserList,
    Permission::ChatCreate,
    Permission::ChatRead,
    Permission::ChatList,
];

const COMPANY_ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::CompanyRead,
    Permission::CompanyUpdate,
    Permission::UnitCreate,
    Permission::UnitRead,
    Permission::UnitUpdate,
    Permission::UnitDelete,
    Permission::UnitList,
    Permission::BaseCreate,
    Permission::BaseRead,
    Permission::BaseUpdate,
    Permission::BaseDelete,
    Permission::BaseList,
    Permission::AmbulanceCreate,
    Permission::AmbulanceRead,
    Permission::AmbulanceUpdate,
    Permission::AmbulanceDelete,
    Permission::AmbulanceList,
    Permission::AmbulanceSwitchStatus,
    Permission::AmbulanceDocumentsCreate,
    Permission::AmbulanceDocumentsRead,
    Permission::AmbulanceDocumentsUpdate,
    Permission::AmbulanceDocumentsDelete,
    Permission::AmbulanceDocumentsBulkUpdate,
    Permission::UserCreate,
    Permission::UserRead,
    Permission::UserUpdate,
    Permission::UserDelete,
    Permission::UserList,
    Permission::ChatCreate,
    Permission::ChatRead,
    Permission::ChatList,
];

const UNIT_ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::UnitRead,
    Permission::UnitUpdate,
    Permission::BaseCreate,
    Permission::BaseRead,
    Permission::BaseUpdate,
    Permission::BaseDelete,
    Permission::BaseList,
    Permission::AmbulanceCreate,
    Permission::AmbulanceRead,
    Permission::AmbulanceUpdate,
    Permission::AmbulanceDelete,
    Permission::AmbulanceList,
    Permission::AmbulanceSwitchStatus,
    Permission::AmbulanceDocumentsCreate,
    Permission::AmbulanceDocumentsRead,
    Permission::AmbulanceDocumentsUpdate,
    Permission::AmbulanceDocumentsDelete,
    Permission::AmbulanceDocumentsBulkUpdate,
    Permission::UserRead,
    Permission::UserList,
    Permission::ChatCreate,
    Permission::ChatRead,
    Permission::ChatList,
];

const BASE_ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::BaseRead,
    Permission::BaseUpdate,
    Permission::AmbulanceRead,
    Permission::AmbulanceList,
    Permission::AmbulanceSwitchStatus,
    Permission::AmbulanceDocumentsRead,
    Permission::AmbulanceDocumentsUpdate,
    Permission::UserRead,
    Permission::UserList,
    Permission::ChatCreate,
    Permission::ChatRead,
    Permission::ChatList,
];

/// The static permission set for a role.
#[must_use]
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::SysAdmin => SYS_ADMIN_PERMISSIONS,
        Role::CompanyGroupAdmin => COMPANY_GROUP_ADMIN_PERMISSIONS,
        Role::CompanyAdmin => COMPANY_ADMIN_PERMISSIONS,
        Role::UnitAdmin => UNIT_ADMIN_PERMISSIONS,
        Role::BaseAdmin => BASE_ADMIN_PERMISSIONS,
    }
}

/// Append the condition-based rule grants for one role.
///
/// Invoked once per role held by the principal, in role order. Grants are
/// additive; a role whose membership ids are absent contributes no rules
/// (its predicates would have nothing to bind to).
pub fn grant_rules(role: Role, principal: &Principal, out: &mut Vec<Rule>) {
    match role {
        Role::SysAdmin => {
            out.push(Rule::allow(Action::Manage, ResourceKind::All));
        }
        Role::CompanyGroupAdmin => {
            let Some(group_id) = principal.company_group_id() else {
                return;
            };
            out.push(
                Rule::allow(Action::Manage, ResourceKind::CompanyGroup).when(Predicate::Eq {
                    field: ScopeField::Id,
                    value: group_id.to_owned(),
                }),
            );
            // Group deletion stays a sys-admin operation.
            out.push(
                Rule::deny(Action::Delete, ResourceKind::CompanyGroup).when(Predicate::Eq {
                    field: ScopeField::Id,
                    value: group_id.to_owned(),
                }),
            );
            for kind in [
                ResourceKind::Company,
                ResourceKind::Unit,
                ResourceKind::Base,
                ResourceKind::Ambulance,
                ResourceKind::User,
            ] {
                out.push(Rule::allow(Action::Manage, kind).when(Predicate::Eq {
                    field: ScopeField::CompanyGroupId,
                    value: group_id.to_owned(),
                }));
            }
        }
        Role::CompanyAdmin => {
            let companies = principal.companies_ids();
            if companies.is_empty() {
                return;
            }
            out.push(Rule::allow(Action::Manage, ResourceKind::Company).when(Predicate::In {
                field: ScopeField::Id,
                values: companies.to_vec(),
            }));
            for kind in [
                ResourceKind::Unit,
                ResourceKind::Base,
                ResourceKind::Ambulance,
                ResourceKind::User,
            ] {
                out.push(Rule::allow(Action::Manage, kind).when(Predicate::In {
                    field: ScopeField::CompanyId,
                    values: companies.to_vec(),
                }));
            }
        }
        Role::UnitAdmin => {
            let units = principal.units_ids();
            if units.is_empty() {
                return;
            }
            out.push(Rule::allow(Action::Manage, ResourceKind::Unit).when(Predicate::In {
                field: ScopeField::Id,
                values: units.to_vec(),
            }));
            for kind in [ResourceKind::Base, ResourceKind::Ambulance] {
                out.push(Rule::allow(Action::Manage, kind).when(Predicate::In {
                    field: ScopeField::UnitId,
                    values: units.to_vec(),
                }));
            }
            out.push(Rule::allow(Action::Read, ResourceKind::User).when(Predicate::In {
                field: ScopeField::UnitId,
                values: units.to_vec(),
            }));
        }
        Role::BaseAdmin => {
            let bases = principal.bases_ids();
            if bases.is_empty() {
                return;
            }
            out.push(Rule::allow(Action::Manage, ResourceKind::Base).when(Predicate::In {
                field: ScopeField::Id,
                values: bases.to_vec(),
            }));
            for action in [Action::Read, Action::Update] {
                out.push(Rule::allow(action, ResourceKind::Ambulance).when(Predicate::In {
                    field: ScopeField::BaseId,
                    values: bases.to_vec(),
                }));
            }
            out.push(Rule::allow(Action::Read, ResourceKind::User).when(Predicate::In {
                field: ScopeField::BaseId,
                values: bases.to_vec(),
            }));
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn every_role_maps_to_a_nonempty_permission_set() {
        for role in Role::ALL {
            assert!(
                !permissions_for(*role).is_empty(),
                "role {role} grants nothing"
            );
        }
    }

    #[test]
    fn only_sys_admin_holds_the_override_token() {
        for role in Role::ALL {
            let holds = permissions_for(*role).contains(&Permission::SysAdminAccessAll);
            assert_eq!(holds, *role == Role::SysAdmin, "override leak on {role}");
        }
    }

    #[test]
    fn permission_sets_have_no_duplicates() {
        for role in Role::ALL {
            let perms = permissions_for(*role);
            let unique: std::collections::HashSet<_> = perms.iter().collect();
            assert_eq!(unique.len(), perms.len(), "duplicate grant on {role}");
        }
    }

    #[test]
    fn group_admin_without_group_membership_grants_no_rules() {
        let p = Principal::builder()
            .id("user-1")
            .role(Role::CompanyGroupAdmin)
            .build()
            .unwrap();
        let mut rules = Vec::new();
        grant_rules(Role::CompanyGroupAdmin, &p, &mut rules);
        assert!(rules.is_empty());
    }

    #[test]
    fn company_admin_rules_bind_to_membership_ids() {
        let p = Principal::builder()
            .id("user-1")
            .role(Role::CompanyAdmin)
            .companies_ids(["co-1".to_owned(), "co-2".to_owned()])
            .build()
            .unwrap();
        let mut rules = Vec::new();
        grant_rules(Role::CompanyAdmin, &p, &mut rules);

        // Company rule plus one per subordinate resource kind.
        assert_eq!(rules.len(), 5);
        assert!(rules.iter().all(|r| !r.predicates.is_empty()));
    }
}
