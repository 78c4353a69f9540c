//! Access control editor state.
//!
//! The state is a plain value. Reducers never mutate it in place; see
//! [`crate::reducer::apply`].

use alpha_acl::{Role, StandardRoles};
use alpha_types::RoleId;

use crate::cell::CellState;
use crate::error::{EditorError, Result};
use crate::ids::IdAllocator;
use crate::limits::SessionLimits;

/// Everything the role editor screen holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlState {
    pub(crate) roles: Vec<Role>,
    pub(crate) selected: Option<RoleId>,
    /// Working copy of the selected role.
    pub(crate) draft: Option<Role>,
    /// The selected role as last saved.
    pub(crate) saved: Option<Role>,
    /// Role the user tried to switch to while the draft had changes.
    pub(crate) pending_switch: Option<RoleId>,
    pub(crate) cell: CellState,
    pub(crate) ids: IdAllocator,
    pub(crate) session_limits: SessionLimits,
}

impl Default for AccessControlState {
    /// Seeded with the standard roles; the first one is selected.
    fn default() -> Self {
        Self::new(StandardRoles::all())
    }
}

impl AccessControlState {
    /// Creates a state over `roles`, selecting the first one.
    pub fn new(roles: Vec<Role>) -> Self {
        let ids = IdAllocator::after(&roles);
        let mut state = Self {
            roles,
            selected: None,
            draft: None,
            saved: None,
            pending_switch: None,
            cell: CellState::Viewing,
            ids,
            session_limits: SessionLimits::default(),
        };
        if let Some(first) = state.roles.first().map(|r| r.id.clone()) {
            state.load(first);
        }
        state
    }

    pub fn with_session_limits(mut self, limits: SessionLimits) -> Self {
        self.session_limits = limits;
        self
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn role(&self, id: &RoleId) -> Option<&Role> {
        self.roles.iter().find(|r| &r.id == id)
    }

    pub fn selected_role_id(&self) -> Option<&RoleId> {
        self.selected.as_ref()
    }

    /// The working copy of the selected role.
    pub fn draft(&self) -> Option<&Role> {
        self.draft.as_ref()
    }

    pub fn saved(&self) -> Option<&Role> {
        self.saved.as_ref()
    }

    pub fn pending_switch(&self) -> Option<&RoleId> {
        self.pending_switch.as_ref()
    }

    pub fn cell(&self) -> &CellState {
        &self.cell
    }

    pub fn session_limits(&self) -> SessionLimits {
        self.session_limits
    }

    /// Whether the working copy differs from the last saved copy.
    pub fn has_unsaved_changes(&self) -> bool {
        match (&self.draft, &self.saved) {
            (Some(draft), Some(saved)) => draft != saved,
            _ => false,
        }
    }

    /// Name of the current interaction mode, for rejected-action errors.
    pub fn mode_name(&self) -> &'static str {
        if self.pending_switch.is_some() {
            "resolving unsaved changes"
        } else {
            self.cell.name()
        }
    }

    pub(crate) fn draft_mut(&mut self) -> Result<&mut Role> {
        self.draft.as_mut().ok_or(EditorError::NoRoleSelected)
    }

    /// Selects `id` and resets the working copy from the role list.
    pub(crate) fn load(&mut self, id: RoleId) {
        let role = self.roles.iter().find(|r| r.id == id).cloned();
        self.selected = role.as_ref().map(|r| r.id.clone());
        self.draft.clone_from(&role);
        self.saved = role;
        self.pending_switch = None;
        self.cell = CellState::Viewing;
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
        self.draft = None;
        self.saved = None;
        self.pending_switch = None;
        self.cell = CellState::Viewing;
    }
}
