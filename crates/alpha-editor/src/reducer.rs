//! The access control reducer.
//!
//! `apply(state, action) -> Result<state>` is pure: no IO, no clocks, ids
//! come from the state's allocator. A rejected action returns an error and
//! the caller keeps its previous state.

use alpha_acl::{PccRuleSet, Role};
use alpha_types::{Pcc, PccScope, WILDCARD_PCC};
use tracing::debug;

use crate::action::Action;
use crate::error::{EditorError, Result};
use crate::state::AccessControlState;

impl AccessControlState {
    /// Applies `action` to a copy of this state.
    pub fn reduce(&self, action: Action) -> Result<Self> {
        let name = action.name();
        apply(self.clone(), action).inspect_err(|e| {
            debug!(action = name, error = %e, "Rejected editor action");
        })
    }

    /// Applies actions in order, stopping at the first rejection.
    pub fn reduce_all(&self, actions: impl IntoIterator<Item = Action>) -> Result<Self> {
        actions
            .into_iter()
            .try_fold(self.clone(), |state, action| state.reduce(action))
    }
}

/// Applies one action to an owned state.
pub fn apply(mut state: AccessControlState, action: Action) -> Result<AccessControlState> {
    // The unsaved-changes prompt is modal
    if state.pending_switch.is_some()
        && !matches!(action, Action::DiscardAndSwitch | Action::KeepEditing)
    {
        return Err(invalid(&state, &action));
    }
    // Only cell events reach the cell machine while it is busy
    if !state.cell.is_viewing() && !action.is_cell_event() {
        return Err(invalid(&state, &action));
    }

    match action {
        // ====================================================================
        // Role selection
        // ====================================================================
        Action::SelectRole(id) => {
            if state.role(&id).is_none() {
                return Err(EditorError::UnknownRole(id));
            }
            if state.selected.as_ref() == Some(&id) {
                return Ok(state);
            }
            if state.has_unsaved_changes() {
                state.pending_switch = Some(id);
            } else {
                state.load(id);
            }
        }

        Action::DiscardAndSwitch => {
            let id = state.pending_switch.clone().ok_or(EditorError::NoPendingSwitch)?;
            state.load(id);
        }

        Action::KeepEditing => {
            if state.pending_switch.take().is_none() {
                return Err(EditorError::NoPendingSwitch);
            }
        }

        // ====================================================================
        // Role lifecycle
        // ====================================================================
        Action::CreateRole { name, description } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(EditorError::EmptyRoleName);
            }
            let rule_set = PccRuleSet::new(state.ids.rule_set_id()?, PccScope::All);
            let role = Role::new(state.ids.role_id()?, name, description, vec![rule_set])?;
            let id = role.id.clone();
            state.roles.push(role);
            state.load(id);
        }

        Action::DuplicateRole => {
            let source = state.draft.as_ref().ok_or(EditorError::NoRoleSelected)?;
            let role_id = state.ids.role_id()?;
            let ids = &mut state.ids;
            let copy = source.duplicate(role_id.clone(), || ids.rule_set_id())?;
            state.roles.push(copy);
            state.load(role_id);
        }

        Action::DeleteRole => {
            let id = state.selected.clone().ok_or(EditorError::NoRoleSelected)?;
            state.roles.retain(|r| r.id != id);
            match state.roles.first().map(|r| r.id.clone()) {
                Some(first) => state.load(first),
                None => state.clear_selection(),
            }
        }

        Action::RenameRole(name) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(EditorError::EmptyRoleName);
            }
            state.draft_mut()?.name = name.to_string();
        }

        Action::DescribeRole(description) => {
            state.draft_mut()?.description = description.trim().to_string();
        }

        Action::Save => {
            let draft = state.draft.clone().ok_or(EditorError::NoRoleSelected)?;
            if let Some(slot) = state.roles.iter_mut().find(|r| r.id == draft.id) {
                *slot = draft.clone();
            }
            state.saved = Some(draft);
        }

        // ====================================================================
        // Rule sets
        // ====================================================================
        Action::AddRuleSet { scope } => {
            let id = state.ids.rule_set_id()?;
            state.draft_mut()?.push_rule_set(PccRuleSet::new(id, scope));
        }

        Action::DuplicateRuleSet(index) => {
            let id = state.ids.rule_set_id()?;
            let draft = state.draft_mut()?;
            let copy = draft.rule_set(index)?.duplicate(id);
            draft.insert_rule_set(index + 1, copy)?;
        }

        Action::DeleteRuleSet(index) => {
            state.draft_mut()?.remove_rule_set(index)?;
        }

        Action::AddPcc { rule_set, input } => {
            let code = Pcc::normalize_input(&input);
            let rs = state.draft_mut()?.rule_set_mut(rule_set)?;
            if code == WILDCARD_PCC {
                rs.set_all_pccs();
            } else {
                rs.add_pcc(Pcc::new(code)?)?;
            }
        }

        Action::RemovePcc { rule_set, pcc } => {
            state.draft_mut()?.rule_set_mut(rule_set)?.remove_pcc(&pcc)?;
        }

        Action::SetScopeAll { rule_set } => {
            state.draft_mut()?.rule_set_mut(rule_set)?.set_all_pccs();
        }

        Action::SetMode {
            rule_set,
            context,
            mode,
        } => {
            state.draft_mut()?.rule_set_mut(rule_set)?.rules_mut(context).mode = mode;
        }

        // ====================================================================
        // Rule cells
        // ====================================================================
        Action::OpenCell {
            rule_set,
            context,
            list,
        } => {
            let draft = state.draft.as_ref().ok_or(EditorError::NoRoleSelected)?;
            state.cell = state.cell.open(draft, rule_set, context, list)?;
        }

        Action::AddDraftCommand(input) => {
            state.cell = state.cell.add_command(&input)?;
        }

        Action::RemoveDraftCommand(command) => {
            state.cell = state.cell.remove_command(&command)?;
        }

        Action::ApplyCell => {
            let cell = state.cell.clone();
            state.cell = cell.apply(state.draft_mut()?)?;
        }

        Action::CancelCell => {
            state.cell = state.cell.cancel()?;
        }

        Action::RequestDeleteRuleSet(index) => {
            let draft = state.draft.as_ref().ok_or(EditorError::NoRoleSelected)?;
            state.cell = state.cell.request_delete(draft, index)?;
        }

        Action::ConfirmDelete => {
            let cell = state.cell.clone();
            state.cell = cell.confirm_delete(state.draft_mut()?)?;
        }

        Action::CancelDelete => {
            state.cell = state.cell.cancel_delete()?;
        }

        // ====================================================================
        // Session limits
        // ====================================================================
        Action::SetMaxSessionsPerUser(per_user) => {
            state.session_limits = state.session_limits.with_per_user(per_user)?;
        }

        Action::SetMaxSessionsPerCompany(per_company) => {
            state.session_limits = state.session_limits.with_per_company(per_company)?;
        }
    }

    debug_assert!(
        state.draft.as_ref().is_none_or(|r| !r.rule_sets().is_empty()),
        "role draft lost its last rule set"
    );

    Ok(state)
}

fn invalid(state: &AccessControlState, action: &Action) -> EditorError {
    EditorError::InvalidTransition {
        state: state.mode_name(),
        action: action.name(),
    }
}
