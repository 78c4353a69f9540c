//! Command enforcement.
//!
//! Wraps the evaluator for callers that gate terminal commands, with an
//! audit trail of every decision.

use alpha_types::{ContextKind, Pcc};
use thiserror::Error;
use tracing::{info, warn};

use crate::evaluator::{ContextCombination, Decision, Evaluator};
use crate::roles::Role;

/// Error type for command enforcement.
#[derive(Debug, Error)]
pub enum EnforcementError {
    /// Command denied by the role's rules.
    #[error("Command '{command}' denied for role '{role}' at {pcc} ({context}): {reason}")]
    CommandDenied {
        role: String,
        pcc: Pcc,
        context: ContextKind,
        command: String,
        reason: String,
    },
}

/// Result type for enforcement operations.
pub type Result<T> = std::result::Result<T, EnforcementError>;

/// Command enforcement engine bound to one role.
pub struct CommandEnforcer {
    role: Role,
    evaluator: Evaluator,

    /// Whether to log decisions.
    audit_enabled: bool,
}

impl CommandEnforcer {
    /// Creates a new enforcer with the default context combination.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            evaluator: Evaluator::new(),
            audit_enabled: true,
        }
    }

    /// Sets how the `any` table combines with specific contexts.
    pub fn with_combination(mut self, combination: ContextCombination) -> Self {
        self.evaluator = self.evaluator.with_combination(combination);
        self
    }

    /// Disables audit logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Evaluates a command and records the decision.
    ///
    /// **Audit:** Logs all decisions.
    pub fn decide(&self, pcc: &Pcc, context: ContextKind, command: &str) -> Decision {
        let decision = self.evaluator.evaluate(&self.role, pcc, context, command);

        if self.audit_enabled {
            if decision.is_allowed() {
                info!(
                    role = %self.role.name,
                    pcc = %pcc,
                    context = %context,
                    command = %command,
                    reason = %decision.reason,
                    "Command allowed"
                );
            } else {
                warn!(
                    role = %self.role.name,
                    pcc = %pcc,
                    context = %context,
                    command = %command,
                    reason = %decision.reason,
                    "Command denied"
                );
            }
        }

        decision
    }

    /// Enforces the role's rules for a single command.
    ///
    /// Returns the allowing decision, or `Err` when denied.
    pub fn enforce(&self, pcc: &Pcc, context: ContextKind, command: &str) -> Result<Decision> {
        let decision = self.decide(pcc, context, command);
        if decision.is_allowed() {
            Ok(decision)
        } else {
            Err(EnforcementError::CommandDenied {
                role: self.role.name.clone(),
                pcc: pcc.clone(),
                context,
                command: command.to_string(),
                reason: decision.reason,
            })
        }
    }

    /// Enforces a whole command sequence; stops at the first denial.
    pub fn enforce_all<'a, I>(&self, pcc: &Pcc, context: ContextKind, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for command in commands {
            self.enforce(pcc, context, command)?;
        }
        Ok(())
    }

    /// Keeps only the commands the role may issue.
    pub fn filter_commands(
        &self,
        pcc: &Pcc,
        context: ContextKind,
        commands: &[String],
    ) -> Vec<String> {
        commands
            .iter()
            .filter(|c| self.decide(pcc, context, c).is_allowed())
            .cloned()
            .collect()
    }

    /// Returns the current role.
    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn combination(&self) -> ContextCombination {
        self.evaluator.combination()
    }
}
