//! # alpha-editor: Role editor state machines
//!
//! The access control screen as a pure state machine:
//! `state.reduce(action) -> Result<state>`.
//!
//! - [`AccessControlState`]: role list, selection, working copy, last saved
//!   copy, pending role switch, rule-cell editor and session limits
//! - [`Action`]: every user intent the screen supports
//! - [`CellState`]: the rule-cell editing machine (`Viewing`,
//!   `EditingCell`, `ConfirmingDelete`)
//! - [`SessionLimits`]: concurrent session caps
//!
//! ## Example
//!
//! ```
//! use alpha_acl::ListKind;
//! use alpha_editor::{AccessControlState, Action};
//! use alpha_types::ContextKind;
//!
//! let state = AccessControlState::default();
//! let state = state.reduce_all([
//!     Action::open_cell(0, ContextKind::Pnr, ListKind::DenyExact),
//!     Action::AddDraftCommand("er".into()),
//!     Action::ApplyCell,
//! ])?;
//! assert!(state.has_unsaved_changes());
//!
//! let state = state.reduce(Action::Save)?;
//! assert!(!state.has_unsaved_changes());
//! # Ok::<(), alpha_editor::EditorError>(())
//! ```

pub mod action;
pub mod cell;
pub mod error;
pub mod ids;
pub mod limits;
pub mod reducer;
pub mod state;

pub use action::Action;
pub use cell::{CellDraft, CellState};
pub use error::{EditorError, Result};
pub use ids::IdAllocator;
pub use limits::{DEFAULT_MAX_SESSIONS_PER_COMPANY, DEFAULT_MAX_SESSIONS_PER_USER, SessionLimits};
pub use reducer::apply;
pub use state::AccessControlState;
