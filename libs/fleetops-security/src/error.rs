use thiserror::Error;

/// Configuration-class failures of the authorization engine.
///
/// These signal malformed state or a broken role table, not a user-facing
/// deny. They must surface loudly so operators can tell "user lacks access"
/// apart from "the system is misconfigured".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// A principal was constructed, or rules were requested, with zero roles.
    #[error("principal has no roles; refusing to evaluate access")]
    NoRoles,
}
