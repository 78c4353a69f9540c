//! Error types for rule and role manipulation.

use alpha_types::{Command, TypeError};
use thiserror::Error;

/// Errors raised while building or mutating rules, rule sets and roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    /// The command is already present in the list.
    #[error("duplicate command {0}")]
    DuplicateCommand(Command),

    /// The command is not present in the list.
    #[error("command {0} is not in the list")]
    CommandNotFound(Command),

    /// A role must keep at least one rule set.
    #[error("cannot remove the last rule set of a role")]
    LastRuleSet,

    /// A role was built without any rule set.
    #[error("a role needs at least one PCC rule set")]
    NoRuleSets,

    /// Rule set index does not exist.
    #[error("rule set index {index} out of range (role has {len})")]
    RuleSetOutOfRange { index: usize, len: usize },

    /// Role name is blank.
    #[error("role name must not be empty")]
    EmptyRoleName,

    /// Underlying domain validation failed.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result type for rule and role operations.
pub type Result<T> = std::result::Result<T, AclError>;
