//! Condition-based abilities: an immutable rule list built once per
//! principal and evaluated statelessly.
//!
//! Rules are accumulated from the role grant table in role order; grants are
//! additive. Evaluation is last-matching-rule-wins, so a later `deny` can
//! carve an exception out of an earlier broad `allow`. An unconditional
//! `allow manage all` short-circuits immediately.

use crate::error::PolicyError;
use crate::grants::grant_rules;
use crate::principal::Principal;

/// Whether a rule grants or revokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

/// Action verb for condition-based checks. `Manage` matches every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Manage,
    Create,
    Read,
    Update,
    Delete,
}

/// Resource type discriminant. `All` is the wildcard subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    All,
    User,
    CompanyGroup,
    Company,
    Unit,
    Base,
    Ambulance,
}

/// Resource fields a predicate may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeField {
    Id,
    CompanyGroupId,
    CompanyId,
    UnitId,
    BaseId,
}

/// A field-level condition. All predicates within a rule are AND'd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field == value`
    Eq { field: ScopeField, value: String },
    /// `field IN values`
    In {
        field: ScopeField,
        values: Vec<String>,
    },
}

impl Predicate {
    fn holds(&self, resource: &Resource) -> bool {
        match self {
            Predicate::Eq { field, value } => resource.field(*field) == Some(value.as_str()),
            Predicate::In { field, values } => resource
                .field(*field)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
        }
    }
}

/// Hierarchy attributes of a user row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAttrs {
    pub id: String,
    pub company_group_id: Option<String>,
    pub company_id: Option<String>,
    pub unit_id: Option<String>,
    pub base_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyGroupAttrs {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyAttrs {
    pub id: String,
    pub company_group_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitAttrs {
    pub id: String,
    pub company_group_id: Option<String>,
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseAttrs {
    pub id: String,
    pub company_group_id: Option<String>,
    pub company_id: Option<String>,
    pub unit_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbulanceAttrs {
    pub id: String,
    pub company_group_id: Option<String>,
    pub company_id: Option<String>,
    pub unit_id: Option<String>,
    pub base_id: Option<String>,
}

/// A resource instance with its hierarchy foreign keys.
///
/// A tagged union with exhaustive matching; the evaluator never dispatches
/// on a runtime type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    User(UserAttrs),
    CompanyGroup(CompanyGroupAttrs),
    Company(CompanyAttrs),
    Unit(UnitAttrs),
    Base(BaseAttrs),
    Ambulance(AmbulanceAttrs),
}

impl Resource {
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::User(_) => ResourceKind::User,
            Resource::CompanyGroup(_) => ResourceKind::CompanyGroup,
            Resource::Company(_) => ResourceKind::Company,
            Resource::Unit(_) => ResourceKind::Unit,
            Resource::Base(_) => ResourceKind::Base,
            Resource::Ambulance(_) => ResourceKind::Ambulance,
        }
    }

    /// Look up a hierarchy field on this instance, `None` if the field does
    /// not apply to the resource type or is unset.
    #[must_use]
    pub fn field(&self, field: ScopeField) -> Option<&str> {
        match self {
            Resource::User(a) => match field {
                ScopeField::Id => Some(&a.id),
                ScopeField::CompanyGroupId => a.company_group_id.as_deref(),
                ScopeField::CompanyId => a.company_id.as_deref(),
                ScopeField::UnitId => a.unit_id.as_deref(),
                ScopeField::BaseId => a.base_id.as_deref(),
            },
            Resource::CompanyGroup(a) => match field {
                ScopeField::Id => Some(&a.id),
                ScopeField::CompanyGroupId
                | ScopeField::CompanyId
                | ScopeField::UnitId
                | ScopeField::BaseId => None,
            },
            Resource::Company(a) => match field {
                ScopeField::Id => Some(&a.id),
                ScopeField::CompanyGroupId => a.company_group_id.as_deref(),
                ScopeField::CompanyId | ScopeField::UnitId | ScopeField::BaseId => None,
            },
            Resource::Unit(a) => match field {
                ScopeField::Id => Some(&a.id),
                ScopeField::CompanyGroupId => a.company_group_id.as_deref(),
                ScopeField::CompanyId => a.company_id.as_deref(),
                ScopeField::UnitId | ScopeField::BaseId => None,
            },
            Resource::Base(a) => match field {
                ScopeField::Id => Some(&a.id),
                ScopeField::CompanyGroupId => a.company_group_id.as_deref(),
                ScopeField::CompanyId => a.company_id.as_deref(),
                ScopeField::UnitId => a.unit_id.as_deref(),
                ScopeField::BaseId => None,
            },
            Resource::Ambulance(a) => match field {
                ScopeField::Id => Some(&a.id),
                ScopeField::CompanyGroupId => a.company_group_id.as_deref(),
                ScopeField::CompanyId => a.company_id.as_deref(),
                ScopeField::UnitId => a.unit_id.as_deref(),
                ScopeField::BaseId => a.base_id.as_deref(),
            },
        }
    }
}

/// The subject of a check: either a bare type (pre-instance checks like
/// "can I list company groups at all") or a concrete instance.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Kind(ResourceKind),
    Instance(&'a Resource),
}

impl Subject<'_> {
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Subject::Kind(kind) => *kind,
            Subject::Instance(resource) => resource.kind(),
        }
    }
}

impl From<ResourceKind> for Subject<'static> {
    fn from(kind: ResourceKind) -> Self {
        Subject::Kind(kind)
    }
}

impl<'a> From<&'a Resource> for Subject<'a> {
    fn from(resource: &'a Resource) -> Self {
        Subject::Instance(resource)
    }
}

/// One grant or revocation in the rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub effect: Effect,
    pub action: Action,
    pub subject: ResourceKind,
    pub predicates: Vec<Predicate>,
}

impl Rule {
    #[must_use]
    pub fn allow(action: Action, subject: ResourceKind) -> Self {
        Self {
            effect: Effect::Allow,
            action,
            subject,
            predicates: Vec::new(),
        }
    }

    #[must_use]
    pub fn deny(action: Action, subject: ResourceKind) -> Self {
        Self {
            effect: Effect::Deny,
            action,
            subject,
            predicates: Vec::new(),
        }
    }

    /// Add a condition; all conditions on a rule must hold for it to apply.
    #[must_use]
    pub fn when(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn matches_kind(&self, kind: ResourceKind) -> bool {
        self.subject == ResourceKind::All || self.subject == kind
    }

    fn matches_action(&self, action: Action) -> bool {
        self.action == Action::Manage || self.action == action
    }

    fn is_unconditional_manage_all(&self) -> bool {
        self.effect == Effect::Allow
            && self.action == Action::Manage
            && self.subject == ResourceKind::All
            && self.predicates.is_empty()
    }
}

/// Build the rule list for a principal by folding the grant table over its
/// roles, in role order.
///
/// # Errors
///
/// Returns [`PolicyError::NoRoles`] for a principal with zero roles. The
/// principal builder already rejects that state; this guards rule lists
/// built from principals deserialized elsewhere.
pub fn build_rules(principal: &Principal) -> Result<Vec<Rule>, PolicyError> {
    if principal.roles().is_empty() {
        return Err(PolicyError::NoRoles);
    }
    let mut rules = Vec::new();
    for role in principal.roles() {
        grant_rules(*role, principal, &mut rules);
    }
    Ok(rules)
}

/// Decide `action` on `subject` against an ordered rule list.
///
/// Kind-only subjects carry no field data, so conditional rules apply
/// coarsely on type alone. No matching rule means deny.
#[must_use]
pub fn evaluate(rules: &[Rule], action: Action, subject: Subject<'_>) -> bool {
    let kind = subject.kind();
    let mut verdict = false;

    for rule in rules {
        if rule.is_unconditional_manage_all() {
            return true;
        }
        if !rule.matches_kind(kind) || !rule.matches_action(action) {
            continue;
        }
        let applies = match subject {
            Subject::Kind(_) => true,
            Subject::Instance(resource) => rule.predicates.iter().all(|p| p.holds(resource)),
        };
        if applies {
            verdict = rule.effect == Effect::Allow;
        }
    }

    verdict
}

/// The per-principal ability surface (`defineAbilityFor`).
#[derive(Debug, Clone)]
pub struct Ability {
    rules: Vec<Rule>,
}

impl Ability {
    /// Build abilities for a principal from the role grant table.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NoRoles`] for a principal with zero roles.
    pub fn for_principal(principal: &Principal) -> Result<Self, PolicyError> {
        Ok(Self {
            rules: build_rules(principal)?,
        })
    }

    #[must_use]
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn can<'a>(&self, action: Action, subject: impl Into<Subject<'a>>) -> bool {
        evaluate(&self.rules, action, subject.into())
    }

    #[must_use]
    pub fn cannot<'a>(&self, action: Action, subject: impl Into<Subject<'a>>) -> bool {
        !self.can(action, subject)
    }
}
