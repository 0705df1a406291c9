//! The organizational scope model: company-group ⊃ company ⊃ unit ⊃ base.
//!
//! A [`TargetScope`] is the lightweight resource representation used by the
//! scope-overlap evaluator: a partial set of hierarchy ids the caller wants
//! to check the principal's membership against. Levels omitted from the
//! target contribute no constraint; levels supplied are OR'd, so a
//! higher-level admin satisfies a lower-level scope request.

use serde::{Deserialize, Serialize};

use crate::principal::Principal;

/// One or many ids at a single hierarchy level.
///
/// Serializes untagged, matching the wire contract where each scope field
/// accepts a single id or an id list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdSelector {
    One(String),
    Many(Vec<String>),
}

impl IdSelector {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            IdSelector::One(id) => std::slice::from_ref(id),
            IdSelector::Many(ids) => ids,
        }
    }
}

impl From<&str> for IdSelector {
    fn from(id: &str) -> Self {
        IdSelector::One(id.to_owned())
    }
}

impl From<String> for IdSelector {
    fn from(id: String) -> Self {
        IdSelector::One(id)
    }
}

impl From<Vec<String>> for IdSelector {
    fn from(ids: Vec<String>) -> Self {
        IdSelector::Many(ids)
    }
}

/// True iff the two id sets have a non-empty intersection.
#[must_use]
pub fn ids_overlap<A: AsRef<str>, B: AsRef<str>>(principal_ids: &[A], target_ids: &[B]) -> bool {
    target_ids
        .iter()
        .any(|t| principal_ids.iter().any(|p| p.as_ref() == t.as_ref()))
}

/// Partial hierarchy selection to authorize against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_group_id: Option<IdSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<IdSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<IdSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_id: Option<IdSelector>,
}

/// Outcome of matching a target scope against a principal's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeDecision {
    /// No scope level was populated; the check contributes no constraint.
    NotApplicable,
    /// At least one populated level overlaps the principal's membership.
    Matched,
    /// Levels were populated and none overlaps.
    NoOverlap,
}

impl TargetScope {
    #[must_use]
    pub fn company_group(id: impl Into<IdSelector>) -> Self {
        Self {
            company_group_id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn company(id: impl Into<IdSelector>) -> Self {
        Self {
            company_id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn unit(id: impl Into<IdSelector>) -> Self {
        Self {
            unit_id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn base(id: impl Into<IdSelector>) -> Self {
        Self {
            base_id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_company_group(mut self, id: impl Into<IdSelector>) -> Self {
        self.company_group_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_company(mut self, id: impl Into<IdSelector>) -> Self {
        self.company_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, id: impl Into<IdSelector>) -> Self {
        self.unit_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_base(mut self, id: impl Into<IdSelector>) -> Self {
        self.base_id = Some(id.into());
        self
    }

    /// True if no level carries any id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.company_group_id,
            &self.company_id,
            &self.unit_id,
            &self.base_id,
        ]
        .into_iter()
        .all(|level| non_empty(level).is_none())
    }

    /// Match this target against the principal's membership lists.
    ///
    /// Each populated level is checked independently against the matching
    /// membership list; membership is never re-derived from higher levels.
    /// The populated levels are OR'd: overlap on any one level matches.
    #[must_use]
    pub fn evaluate(&self, principal: &Principal) -> ScopeDecision {
        // One boolean per populated level, in hierarchy order.
        let mut checks: Vec<bool> = Vec::with_capacity(4);

        if let Some(target) = non_empty(&self.company_group_id) {
            checks.push(ids_overlap(&principal.company_group_ids(), target));
        }
        if let Some(target) = non_empty(&self.company_id) {
            checks.push(ids_overlap(principal.companies_ids(), target));
        }
        if let Some(target) = non_empty(&self.unit_id) {
            checks.push(ids_overlap(principal.units_ids(), target));
        }
        if let Some(target) = non_empty(&self.base_id) {
            checks.push(ids_overlap(principal.bases_ids(), target));
        }

        if checks.is_empty() {
            ScopeDecision::NotApplicable
        } else if checks.contains(&true) {
            ScopeDecision::Matched
        } else {
            ScopeDecision::NoOverlap
        }
    }
}

/// A populated selector, or `None` when the level is absent or empty.
/// An empty id list means the level is not being checked at all.
fn non_empty(selector: &Option<IdSelector>) -> Option<&[String]> {
    selector
        .as_ref()
        .map(IdSelector::as_slice)
        .filter(|ids| !ids.is_empty())
}
