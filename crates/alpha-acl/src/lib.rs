//! # alpha-acl: Command Access Control for GDS terminals
//!
//! Decides which Sabre terminal commands a travel-agency role may issue:
//! - **Roles** bundling one or more PCC rule sets
//! - **PCC rule sets** scoped to explicit office codes or to every PCC
//! - **Context tables** for `any`, `pnr` and `ticketedPnr` sessions
//! - **Command enforcement** with an audit trail
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command request (role, PCC, context, text)  │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  CommandEnforcer                             │
//! │  ├─ Rule set selection (explicit, wildcard)  │
//! │  ├─ Deny lists (exact, starts-with)          │
//! │  └─ Mode default or allow lists              │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - allow / deny                              │
//! │  - deciding rule and reason                  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Standard Roles
//!
//! | Role     | Mode             | Queue | PNR edits | Everything |
//! |----------|------------------|-------|-----------|------------|
//! | Basic    | allow-listed     | ✗     | ✗         | ✗          |
//! | Advanced | allow-listed     | ✗     | ✓         | ✗          |
//! | Expert   | allow-listed     | ✓     | ✗         | ✗          |
//! | Unlim    | allow-all-except | ✓     | ✓         | ✓          |
//!
//! ## Examples
//!
//! ### Evaluating a command
//!
//! ```
//! use alpha_acl::{evaluate, StandardRoles};
//! use alpha_types::{ContextKind, Pcc};
//!
//! let basic = StandardRoles::basic();
//! let pcc = Pcc::new("U9XF")?;
//!
//! assert!(evaluate(&basic, &pcc, ContextKind::Any, "*R").is_allowed());
//! assert!(!evaluate(&basic, &pcc, ContextKind::Any, "WC").is_allowed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Custom rules
//!
//! ```
//! use alpha_acl::{ContextRules, PccRuleSet, Role};
//! use alpha_types::{ContextKind, PccScope, RoleId, RuleSetId};
//!
//! let pnr = ContextRules::allow_all_except()
//!     .deny_exact(["E", "ER"])?
//!     .deny_starts_with(["W-"])?;
//!
//! let rule_set = PccRuleSet::new(RuleSetId::new(1), PccScope::from_codes(&["U9XF"])?)
//!     .with_context(ContextKind::Pnr, pnr);
//!
//! let role = Role::new(RoleId::new(10), "Ticketing", "", vec![rule_set])?;
//! assert_eq!(role.rule_sets().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Enforcement
//!
//! ```
//! use alpha_acl::{CommandEnforcer, StandardRoles};
//! use alpha_types::{ContextKind, Pcc};
//!
//! let enforcer = CommandEnforcer::new(StandardRoles::expert());
//! let pcc = Pcc::new("KH6G")?;
//!
//! enforcer.enforce(&pcc, ContextKind::Any, "QC")?;
//! assert!(enforcer.enforce(&pcc, ContextKind::Pnr, "QC").is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod enforcement;
pub mod error;
pub mod evaluator;
pub mod roles;
pub mod rule_set;
pub mod rules;

// Re-export commonly used types
pub use catalog::{CatalogError, CatalogFormat, RoleCatalog};
pub use enforcement::{CommandEnforcer, EnforcementError};
pub use error::{AclError, Result};
pub use evaluator::{ContextCombination, Decision, Effect, Evaluator, RuleMatch, evaluate};
pub use roles::{Role, RoleWarning, StandardRoles};
pub use rule_set::PccRuleSet;
pub use rules::{CommandList, ContextRules, ContextTable, ContextVerdict, ListKind, PermissionMode, RuleHit};
