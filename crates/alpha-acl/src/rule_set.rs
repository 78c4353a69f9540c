//! PCC rule sets.
//!
//! A rule set binds a [`PccScope`] to the three context tables.

use alpha_types::{ContextKind, Pcc, PccScope, RuleSetId};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rules::{ContextRules, ContextTable, PermissionMode};

/// Permission tables for a group of PCCs (or every PCC).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PccRuleSet {
    pub id: RuleSetId,

    /// Offices this rule set applies to. Serialized as `pccs`.
    #[serde(rename = "pccs")]
    pub scope: PccScope,

    pub contexts: ContextTable,
}

impl PccRuleSet {
    /// Empty rule set: all three contexts `allow-listed` with no entries.
    pub fn new(id: RuleSetId, scope: PccScope) -> Self {
        Self {
            id,
            scope,
            contexts: ContextTable::default(),
        }
    }

    /// Builder: replace one context table.
    pub fn with_context(mut self, context: ContextKind, rules: ContextRules) -> Self {
        *self.contexts.get_mut(context) = rules;
        self
    }

    /// Builder: every context shares `mode` and has no entries.
    pub fn with_uniform_mode(mut self, mode: PermissionMode) -> Self {
        self.contexts = ContextTable::uniform(mode);
        self
    }

    pub fn rules(&self, context: ContextKind) -> &ContextRules {
        self.contexts.get(context)
    }

    pub fn rules_mut(&mut self, context: ContextKind) -> &mut ContextRules {
        self.contexts.get_mut(context)
    }

    /// Adds a PCC; on a wildcard rule set this narrows the scope.
    pub fn add_pcc(&mut self, pcc: Pcc) -> Result<()> {
        self.scope = self.scope.clone().with_pcc(pcc)?;
        Ok(())
    }

    /// Removes a PCC; removing the last one resets the scope to every PCC.
    pub fn remove_pcc(&mut self, pcc: &Pcc) -> Result<()> {
        self.scope = self.scope.clone().without_pcc(pcc)?;
        Ok(())
    }

    /// Widens the scope to every PCC.
    pub fn set_all_pccs(&mut self) {
        self.scope = PccScope::All;
    }

    /// Copy of this rule set under a new id.
    pub fn duplicate(&self, id: RuleSetId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}
