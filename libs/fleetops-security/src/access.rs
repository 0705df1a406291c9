//! Permission + scope-overlap access checks (the route-handler gate).
//!
//! A deny is a typed [`DenyReason`], never a panic: the engine returns
//! `Result` and the HTTP boundary decides how to surface it. Permission and
//! scope are independent gates — a permission answers "can this role class
//! ever do this", scope answers "does this instance belong to a subtree the
//! principal administers" — and both must pass.

use crate::permission::Permission;
use crate::principal::Principal;
use crate::scope::{ScopeDecision, TargetScope};

/// What a caller requires for one access check.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct AccessRequest {
    permissions: Vec<Permission>,
    target: Option<TargetScope>,
    require_any: bool,
}

impl AccessRequest {
    /// Require a single permission token.
    pub fn permission(permission: Permission) -> Self {
        Self {
            permissions: vec![permission],
            ..Self::default()
        }
    }

    /// Require a set of permission tokens (all of them, unless
    /// [`require_any`](Self::require_any) is set).
    pub fn permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Check scope only, with no permission requirement.
    pub fn scope(target: TargetScope) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    /// Additionally require overlap with the given target scope.
    pub fn target(mut self, target: TargetScope) -> Self {
        self.target = Some(target);
        self
    }

    /// Relax the permission gate to "at least one of" instead of "all of".
    pub fn require_any(mut self) -> Self {
        self.require_any = true;
        self
    }
}

/// Why an access check denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The effective permission set does not satisfy the requirement.
    MissingPermission {
        required: Vec<Permission>,
        require_all: bool,
    },
    /// A target scope was supplied and no populated level overlaps the
    /// principal's membership.
    NoMatchingScope,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::MissingPermission {
                required,
                require_all,
            } => {
                let tokens: Vec<&str> = required.iter().map(|p| p.as_str()).collect();
                let mode = if *require_all { "all of" } else { "any of" };
                write!(f, "missing required permission ({mode} {})", tokens.join(", "))
            }
            DenyReason::NoMatchingScope => write!(f, "no matching scope for target"),
        }
    }
}

impl std::error::Error for DenyReason {}

/// Decide whether `principal` satisfies `request`.
///
/// The absolute override (`sysAdmin:accessAll` in the effective permission
/// set) allows immediately, before any permission or scope check runs.
///
/// # Errors
///
/// Returns the first failing gate as a [`DenyReason`].
pub fn check_access(principal: &Principal, request: &AccessRequest) -> Result<(), DenyReason> {
    if principal.has_permission(Permission::SysAdminAccessAll) {
        return Ok(());
    }

    if !request.permissions.is_empty() {
        let held: Vec<bool> = request
            .permissions
            .iter()
            .map(|p| principal.has_permission(*p))
            .collect();
        let satisfied = if request.require_any {
            held.contains(&true)
        } else {
            held.iter().all(|h| *h)
        };
        if !satisfied {
            return Err(DenyReason::MissingPermission {
                required: request.permissions.clone(),
                require_all: !request.require_any,
            });
        }
    }

    if let Some(target) = &request.target {
        if target.evaluate(principal) == ScopeDecision::NoOverlap {
            return Err(DenyReason::NoMatchingScope);
        }
    }

    Ok(())
}
