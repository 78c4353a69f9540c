//! Rule-cell editing state machine.
//!
//! ```text
//!             open                      request_delete
//!   Viewing ────────▶ EditingCell   Viewing ────────▶ ConfirmingDelete
//!      ▲                  │              ▲                  │
//!      └── apply/cancel ──┘              └─ confirm/cancel ─┘
//! ```
//!
//! Draft edits stay local to the cell until applied. Events that do not
//! apply in the current state are rejected and leave it unchanged.

use alpha_acl::{CommandList, ListKind, Role};
use alpha_types::{Command, ContextKind};
use tracing::debug;

use crate::error::{EditorError, Result};

/// A command list being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDraft {
    /// Index of the rule set in the role.
    pub rule_set: usize,
    pub context: ContextKind,
    pub list: ListKind,
    pub draft: CommandList,
}

/// State of the rule-cell editor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Viewing,
    EditingCell(CellDraft),
    ConfirmingDelete {
        rule_set: usize,
    },
}

impl CellState {
    pub fn name(&self) -> &'static str {
        match self {
            CellState::Viewing => "viewing",
            CellState::EditingCell(_) => "editing a rule cell",
            CellState::ConfirmingDelete { .. } => "confirming a rule set deletion",
        }
    }

    pub fn is_viewing(&self) -> bool {
        matches!(self, CellState::Viewing)
    }

    /// Fails unless the editor is idle.
    pub fn require_viewing(&self, action: &'static str) -> Result<()> {
        if self.is_viewing() {
            Ok(())
        } else {
            Err(self.reject(action))
        }
    }

    /// Starts editing one command list, seeded with its current entries.
    pub fn open(
        &self,
        role: &Role,
        rule_set: usize,
        context: ContextKind,
        list: ListKind,
    ) -> Result<Self> {
        self.require_viewing("open cell")?;
        let draft = role.rule_set(rule_set)?.rules(context).list(list).clone();
        Ok(CellState::EditingCell(CellDraft {
            rule_set,
            context,
            list,
            draft,
        }))
    }

    /// Adds raw input to the draft. Blank input is ignored.
    pub fn add_command(&self, input: &str) -> Result<Self> {
        let CellState::EditingCell(cell) = self else {
            return Err(self.reject("add draft command"));
        };
        let Some(command) = Command::from_input(input) else {
            return Ok(self.clone());
        };

        let mut cell = cell.clone();
        cell.draft.insert(command)?;
        Ok(CellState::EditingCell(cell))
    }

    pub fn remove_command(&self, command: &Command) -> Result<Self> {
        let CellState::EditingCell(cell) = self else {
            return Err(self.reject("remove draft command"));
        };

        let mut cell = cell.clone();
        cell.draft.remove(command)?;
        Ok(CellState::EditingCell(cell))
    }

    /// Writes the draft into `role` and returns to `Viewing`.
    pub fn apply(&self, role: &mut Role) -> Result<Self> {
        let CellState::EditingCell(cell) = self else {
            return Err(self.reject("apply cell"));
        };

        *role
            .rule_set_mut(cell.rule_set)?
            .rules_mut(cell.context)
            .list_mut(cell.list) = cell.draft.clone();
        Ok(CellState::Viewing)
    }

    /// Discards the draft.
    pub fn cancel(&self) -> Result<Self> {
        match self {
            CellState::EditingCell(_) => Ok(CellState::Viewing),
            _ => Err(self.reject("cancel cell")),
        }
    }

    /// Asks for confirmation before deleting a rule set.
    pub fn request_delete(&self, role: &Role, rule_set: usize) -> Result<Self> {
        self.require_viewing("request rule set deletion")?;
        role.rule_set(rule_set)?;
        if role.rule_sets().len() == 1 {
            return Err(alpha_acl::AclError::LastRuleSet.into());
        }
        Ok(CellState::ConfirmingDelete { rule_set })
    }

    pub fn confirm_delete(&self, role: &mut Role) -> Result<Self> {
        let CellState::ConfirmingDelete { rule_set } = self else {
            return Err(self.reject("confirm deletion"));
        };
        role.remove_rule_set(*rule_set)?;
        Ok(CellState::Viewing)
    }

    pub fn cancel_delete(&self) -> Result<Self> {
        match self {
            CellState::ConfirmingDelete { .. } => Ok(CellState::Viewing),
            _ => Err(self.reject("cancel deletion")),
        }
    }

    fn reject(&self, action: &'static str) -> EditorError {
        debug!(state = self.name(), action, "Rejected rule-cell event");
        EditorError::InvalidTransition {
            state: self.name(),
            action,
        }
    }
}
