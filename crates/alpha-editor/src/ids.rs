//! Monotonic id allocation for new roles and rule sets.

use alpha_acl::Role;
use alpha_types::{RoleId, RuleSetId, next_numeric_id};

use crate::error::{EditorError, Result};

/// Hands out decimal ids above every numeric id seen so far.
///
/// Text ids such as `1-default` never collide with allocated ones, so they
/// are skipped when picking the starting point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    /// `None` once `u64::MAX` has been handed out.
    next_role: Option<u64>,
    next_rule_set: Option<u64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_role: Some(1),
            next_rule_set: Some(1),
        }
    }
}

impl IdAllocator {
    /// Allocator whose ids start above those already used by `roles`.
    pub fn after(roles: &[Role]) -> Self {
        Self {
            next_role: next_numeric_id(roles.iter().map(|r| r.id.as_str())),
            next_rule_set: next_numeric_id(
                roles
                    .iter()
                    .flat_map(Role::rule_sets)
                    .map(|rs| rs.id.as_str()),
            ),
        }
    }

    pub fn role_id(&mut self) -> Result<RoleId> {
        take(&mut self.next_role, "role").map(RoleId::new)
    }

    pub fn rule_set_id(&mut self) -> Result<RuleSetId> {
        take(&mut self.next_rule_set, "rule set").map(RuleSetId::new)
    }
}

fn take(next: &mut Option<u64>, kind: &'static str) -> Result<u64> {
    let id = next.ok_or(EditorError::IdsExhausted(kind))?;
    *next = id.checked_add(1);
    Ok(id)
}
