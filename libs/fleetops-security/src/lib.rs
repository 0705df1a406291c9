#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! The FleetOps authorization engine.
//!
//! Purely synchronous, in-memory evaluation: given an authenticated
//! [`Principal`], decide whether an action on a target is allowed. Two call
//! shapes are supported and produce consistent decisions:
//!
//! - condition-based rules ([`Ability`], built from the role grant table),
//!   for instance-level checks such as "can I manage this unit";
//! - permission + scope-overlap checks ([`check_access`]), the pervasive
//!   route-handler gate: "does the caller hold `base:update` and administer
//!   a subtree containing this base".
//!
//! The engine performs no I/O and holds no shared mutable state; everything
//! is recomputed per call from the principal and the static catalog tables.

pub mod access;
pub mod error;
pub mod grants;
pub mod permission;
pub mod principal;
pub mod role;
pub mod rules;
pub mod scope;

pub use access::{AccessRequest, DenyReason, check_access};
pub use error::PolicyError;
pub use permission::Permission;
pub use principal::Principal;
pub use role::Role;
pub use rules::{
    Ability, Action, Effect, Predicate, Resource, ResourceKind, Rule, ScopeField, Subject,
    build_rules, evaluate,
};
pub use scope::{IdSelector, ScopeDecision, TargetScope, ids_overlap};
