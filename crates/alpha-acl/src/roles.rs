//! Role definitions.
//!
//! A role is a named bundle of PCC rule sets. Every role keeps at least one
//! rule set; the standard roles ship a single wildcard set each:
//!
//! | Role     | Any context                          | PNR context            |
//! |----------|--------------------------------------|------------------------|
//! | Basic    | display and availability only        | nothing                |
//! | Advanced | booking and pricing                  | names, remarks, no ER  |
//! | Expert   | Advanced plus queue management       | nothing                |
//! | Unlim    | everything                           | everything             |

use alpha_types::{ContextKind, Pcc, PccScope, RoleId, RuleSetId};
use serde::{Deserialize, Serialize};

use crate::error::{AclError, Result};
use crate::rule_set::PccRuleSet;
use crate::rules::{ContextRules, PermissionMode};

/// Named bundle of PCC rule sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RoleRepr", into = "RoleRepr")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: String,
    rule_sets: Vec<PccRuleSet>,
}

/// Wire form of a role; validated into [`Role`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleRepr {
    id: RoleId,
    name: String,
    #[serde(default)]
    description: String,
    pcc_rule_sets: Vec<PccRuleSet>,
}

impl TryFrom<RoleRepr> for Role {
    type Error = AclError;

    fn try_from(repr: RoleRepr) -> Result<Self> {
        Role::new(repr.id, repr.name, repr.description, repr.pcc_rule_sets)
    }
}

impl From<Role> for RoleRepr {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            pcc_rule_sets: role.rule_sets,
        }
    }
}

impl Role {
    /// Creates a role; the name is trimmed and must not be empty, and at
    /// least one rule set is required.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        rule_sets: Vec<PccRuleSet>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(AclError::EmptyRoleName);
        }
        if rule_sets.is_empty() {
            return Err(AclError::NoRuleSets);
        }
        Ok(Self {
            id,
            name,
            description: description.into().trim().to_string(),
            rule_sets,
        })
    }

    /// Rule sets in evaluation order.
    pub fn rule_sets(&self) -> &[PccRuleSet] {
        &self.rule_sets
    }

    pub fn rule_set(&self, index: usize) -> Result<&PccRuleSet> {
        let len = self.rule_sets.len();
        self.rule_sets
            .get(index)
            .ok_or(AclError::RuleSetOutOfRange { index, len })
    }

    pub fn rule_set_mut(&mut self, index: usize) -> Result<&mut PccRuleSet> {
        let len = self.rule_sets.len();
        self.rule_sets
            .get_mut(index)
            .ok_or(AclError::RuleSetOutOfRange { index, len })
    }

    /// Appends a rule set.
    pub fn push_rule_set(&mut self, rule_set: PccRuleSet) {
        self.rule_sets.push(rule_set);
    }

    /// Inserts a rule set at `index` (`index == len` appends).
    pub fn insert_rule_set(&mut self, index: usize, rule_set: PccRuleSet) -> Result<()> {
        let len = self.rule_sets.len();
        if index > len {
            return Err(AclError::RuleSetOutOfRange { index, len });
        }
        self.rule_sets.insert(index, rule_set);
        Ok(())
    }

    /// Removes a rule set; the last one can never be removed.
    pub fn remove_rule_set(&mut self, index: usize) -> Result<PccRuleSet> {
        let len = self.rule_sets.len();
        if index >= len {
            return Err(AclError::RuleSetOutOfRange { index, len });
        }
        if len == 1 {
            return Err(AclError::LastRuleSet);
        }
        Ok(self.rule_sets.remove(index))
    }

    /// Selects the rule set that governs `pcc`.
    ///
    /// **Selection Order:**
    /// 1. First rule set naming `pcc` explicitly
    /// 2. First wildcard rule set
    /// 3. None (callers fail closed)
    pub fn rule_set_for(&self, pcc: &Pcc) -> Option<&PccRuleSet> {
        self.rule_sets
            .iter()
            .find(|rs| rs.scope.names(pcc))
            .or_else(|| self.rule_sets.iter().find(|rs| rs.scope.is_all()))
    }

    /// Lists configuration smells that do not break evaluation but make
    /// some rule sets unreachable.
    pub fn lint(&self) -> Vec<RoleWarning> {
        let mut warnings = Vec::new();

        let wildcard_ids: Vec<RuleSetId> = self
            .rule_sets
            .iter()
            .filter(|rs| rs.scope.is_all())
            .map(|rs| rs.id.clone())
            .collect();
        if let [_, shadowed @ ..] = wildcard_ids.as_slice() {
            for id in shadowed {
                warnings.push(RoleWarning::ShadowedWildcard { rule_set: id.clone() });
            }
        }

        let mut seen: Vec<(&Pcc, &RuleSetId)> = Vec::new();
        for rs in &self.rule_sets {
            for pcc in rs.scope.pccs() {
                if let Some((_, first)) = seen.iter().find(|(p, _)| *p == pcc) {
                    warnings.push(RoleWarning::ShadowedPcc {
                        pcc: pcc.clone(),
                        rule_set: rs.id.clone(),
                        shadowed_by: (*first).clone(),
                    });
                } else {
                    seen.push((pcc, &rs.id));
                }
            }
        }

        warnings
    }

    /// Copy of this role under new ids, named `Copy of <name>`.
    ///
    /// Stops at the first id the allocator cannot hand out.
    pub fn duplicate<E>(
        &self,
        id: RoleId,
        mut next_rule_set_id: impl FnMut() -> std::result::Result<RuleSetId, E>,
    ) -> std::result::Result<Self, E> {
        let mut rule_sets = Vec::with_capacity(self.rule_sets.len());
        for rs in &self.rule_sets {
            rule_sets.push(rs.duplicate(next_rule_set_id()?));
        }
        Ok(Self {
            id,
            name: format!("Copy of {}", self.name),
            description: self.description.clone(),
            rule_sets,
        })
    }
}

/// Non-fatal role configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleWarning {
    /// A later wildcard rule set is never selected.
    ShadowedWildcard { rule_set: RuleSetId },
    /// A PCC listed in a later rule set is always resolved by an earlier one.
    ShadowedPcc {
        pcc: Pcc,
        rule_set: RuleSetId,
        shadowed_by: RuleSetId,
    },
}

impl std::fmt::Display for RoleWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleWarning::ShadowedWildcard { rule_set } => {
                write!(f, "wildcard rule set {rule_set} is shadowed by an earlier wildcard")
            }
            RoleWarning::ShadowedPcc {
                pcc,
                rule_set,
                shadowed_by,
            } => write!(
                f,
                "PCC {pcc} in rule set {rule_set} is shadowed by rule set {shadowed_by}"
            ),
        }
    }
}

/// Standard roles seeded into every company.
pub struct StandardRoles;

const DISPLAY_EXACT: [&str; 4] = ["*R", "*S", "I", "IG"];

const BOOKING_EXACT: [&str; 16] = [
    "*R", "*S", "VI*", "*IA", "*H", "*HIA", "*HI", "I", "IG", "IR", "VCT*", "MD", "MU", "MT",
    "MB", "*I",
];

const BOOKING_PREFIXES: [&str; 14] = [
    "0", "1", "X", ",", "WC", "WP", "FQ", "RD", "RB", "W/*", "T*", "JR", "/", "4G",
];

impl StandardRoles {
    /// All standard roles in display order.
    pub fn all() -> Vec<Role> {
        vec![Self::basic(), Self::advanced(), Self::expert(), Self::unlim()]
    }

    /// View-only commands, no modifications.
    pub fn basic() -> Role {
        let any = ContextRules::allow_listed()
            .allow_exact(DISPLAY_EXACT)
            .and_then(|r| r.allow_starts_with(["0", "1"]));
        standard_role(
            1,
            "Basic",
            "View-only commands, no modifications",
            any.map(|any| {
                PccRuleSet::new(RuleSetId::new(1), PccScope::All).with_context(ContextKind::Any, any)
            }),
        )
    }

    /// Standard booking and pricing commands.
    pub fn advanced() -> Role {
        let any = ContextRules::allow_listed()
            .allow_exact(BOOKING_EXACT)
            .and_then(|r| r.allow_starts_with(BOOKING_PREFIXES));
        let pnr = ContextRules::allow_listed()
            .allow_exact(["N", "NB"])
            .and_then(|r| r.allow_starts_with(["4", "5", "6"]))
            .and_then(|r| r.deny_exact(["E", "ER"]))
            .and_then(|r| r.deny_starts_with(["W-"]));
        standard_role(
            2,
            "Advanced",
            "Standard booking and pricing commands",
            any.and_then(|any| {
                pnr.map(|pnr| {
                    PccRuleSet::new(RuleSetId::new(2), PccScope::All)
                        .with_context(ContextKind::Any, any)
                        .with_context(ContextKind::Pnr, pnr)
                })
            }),
        )
    }

    /// Extended commands including ticketing and queue management.
    pub fn expert() -> Role {
        let any = ContextRules::allow_listed()
            .allow_exact(BOOKING_EXACT.into_iter().chain(["QC", "QXI", "QS"]))
            .and_then(|r| r.allow_starts_with(BOOKING_PREFIXES.into_iter().chain(["Q"])));
        standard_role(
            3,
            "Expert",
            "Extended commands including ticketing and queue management",
            any.map(|any| {
                PccRuleSet::new(RuleSetId::new(3), PccScope::All).with_context(ContextKind::Any, any)
            }),
        )
    }

    /// Full unrestricted access to all commands.
    pub fn unlim() -> Role {
        standard_role(
            4,
            "Unlim",
            "Full unrestricted access to all commands",
            Ok(PccRuleSet::new(RuleSetId::new(4), PccScope::All)
                .with_uniform_mode(PermissionMode::AllowAllExcept)),
        )
    }
}

/// Assembles a fixture role. An invalid fixture entry logs an error and
/// yields an empty (deny-everything) rule set.
fn standard_role(id: u64, name: &str, description: &str, rule_set: Result<PccRuleSet>) -> Role {
    let rule_set = rule_set.unwrap_or_else(|e| {
        tracing::error!(role = name, error = %e, "invalid standard role fixture");
        PccRuleSet::new(RuleSetId::new(id), PccScope::All)
    });
    Role {
        id: RoleId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        rule_sets: vec![rule_set],
    }
}
