//! Actions accepted by the access control editor.

use alpha_acl::{ListKind, PermissionMode};
use alpha_types::{Command, ContextKind, Pcc, PccScope, RoleId};

/// A user intent applied to [`crate::AccessControlState`].
///
/// Rule sets are addressed by their index in the selected role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ========================================================================
    // Role selection
    // ========================================================================
    /// Switches role, or asks first when the draft has unsaved changes.
    SelectRole(RoleId),
    /// Drops unsaved changes and performs the pending switch.
    DiscardAndSwitch,
    /// Cancels the pending switch.
    KeepEditing,

    // ========================================================================
    // Role lifecycle
    // ========================================================================
    CreateRole { name: String, description: String },
    DuplicateRole,
    DeleteRole,
    RenameRole(String),
    DescribeRole(String),
    Save,

    // ========================================================================
    // Rule sets
    // ========================================================================
    AddRuleSet { scope: PccScope },
    DuplicateRuleSet(usize),
    DeleteRuleSet(usize),
    AddPcc { rule_set: usize, input: String },
    RemovePcc { rule_set: usize, pcc: Pcc },
    SetScopeAll { rule_set: usize },
    SetMode {
        rule_set: usize,
        context: ContextKind,
        mode: PermissionMode,
    },

    // ========================================================================
    // Rule cells
    // ========================================================================
    OpenCell {
        rule_set: usize,
        context: ContextKind,
        list: ListKind,
    },
    AddDraftCommand(String),
    RemoveDraftCommand(Command),
    ApplyCell,
    CancelCell,
    RequestDeleteRuleSet(usize),
    ConfirmDelete,
    CancelDelete,

    // ========================================================================
    // Session limits
    // ========================================================================
    SetMaxSessionsPerUser(u32),
    SetMaxSessionsPerCompany(u32),
}

impl Action {
    pub fn create_role(name: impl Into<String>, description: impl Into<String>) -> Self {
        Action::CreateRole {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn add_pcc(rule_set: usize, input: impl Into<String>) -> Self {
        Action::AddPcc {
            rule_set,
            input: input.into(),
        }
    }

    pub fn open_cell(rule_set: usize, context: ContextKind, list: ListKind) -> Self {
        Action::OpenCell {
            rule_set,
            context,
            list,
        }
    }

    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectRole(_) => "select role",
            Action::DiscardAndSwitch => "discard and switch",
            Action::KeepEditing => "keep editing",
            Action::CreateRole { .. } => "create role",
            Action::DuplicateRole => "duplicate role",
            Action::DeleteRole => "delete role",
            Action::RenameRole(_) => "rename role",
            Action::DescribeRole(_) => "describe role",
            Action::Save => "save",
            Action::AddRuleSet { .. } => "add rule set",
            Action::DuplicateRuleSet(_) => "duplicate rule set",
            Action::DeleteRuleSet(_) => "delete rule set",
            Action::AddPcc { .. } => "add PCC",
            Action::RemovePcc { .. } => "remove PCC",
            Action::SetScopeAll { .. } => "set scope to all PCCs",
            Action::SetMode { .. } => "set mode",
            Action::OpenCell { .. } => "open cell",
            Action::AddDraftCommand(_) => "add draft command",
            Action::RemoveDraftCommand(_) => "remove draft command",
            Action::ApplyCell => "apply cell",
            Action::CancelCell => "cancel cell",
            Action::RequestDeleteRuleSet(_) => "request rule set deletion",
            Action::ConfirmDelete => "confirm deletion",
            Action::CancelDelete => "cancel deletion",
            Action::SetMaxSessionsPerUser(_) => "set max sessions per user",
            Action::SetMaxSessionsPerCompany(_) => "set max sessions per company",
        }
    }

    /// Whether the action belongs to the rule-cell state machine.
    pub fn is_cell_event(&self) -> bool {
        matches!(
            self,
            Action::OpenCell { .. }
                | Action::AddDraftCommand(_)
                | Action::RemoveDraftCommand(_)
                | Action::ApplyCell
                | Action::CancelCell
                | Action::RequestDeleteRuleSet(_)
                | Action::ConfirmDelete
                | Action::CancelDelete
        )
    }
}
