//! Editor errors.

use alpha_acl::AclError;
use alpha_types::{RoleId, TypeError};
use thiserror::Error;

/// Reasons an editor action is rejected. The previous state stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("role {0} does not exist")]
    UnknownRole(RoleId),

    #[error("no role is selected")]
    NoRoleSelected,

    #[error("no role switch is pending")]
    NoPendingSwitch,

    #[error("role name must not be empty")]
    EmptyRoleName,

    /// Every numeric id of this kind is taken.
    #[error("no {0} ids left to allocate")]
    IdsExhausted(&'static str),

    /// The action does not apply in the current rule-cell state.
    #[error("action {action} is not valid while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("max sessions per user ({per_user}) cannot exceed max sessions per company ({per_company})")]
    SessionLimitExceeded { per_user: u32, per_company: u32 },

    #[error(transparent)]
    Acl(#[from] AclError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result type for editor actions.
pub type Result<T> = std::result::Result<T, EditorError>;
