//! Command permission evaluation.
//!
//! Decides whether a role may issue a command for a PCC in a context.
//!
//! 1. **Selection**: the first rule set naming the PCC, else the first
//!    wildcard rule set, else deny (fail closed).
//! 2. **Evaluation**: the `any` table alone for the `any` context; for
//!    `pnr` and `ticketedPnr` the `any` table and the specific table are
//!    combined according to [`ContextCombination`]. An explicit deny in
//!    either table always wins.

use std::fmt;

use alpha_types::{Command, ContextKind, Pcc, RuleSetId};
use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::rule_set::PccRuleSet;
use crate::rules::{ContextVerdict, ListKind, RuleHit};

// ============================================================================
// Decision
// ============================================================================

/// Allow or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    /// Safe default: deny unless explicitly allowed.
    #[default]
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Allow => f.write_str("allowed"),
            Effect::Deny => f.write_str("denied"),
        }
    }
}

/// The rule entry that decided the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Context table the entry lives in.
    pub context: ContextKind,
    pub list: ListKind,
    pub entry: Command,
}

impl RuleMatch {
    fn from_hit(context: ContextKind, hit: RuleHit) -> Self {
        Self {
            context,
            list: hit.list,
            entry: hit.entry,
        }
    }
}

impl fmt::Display for RuleMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' in {}", self.list, self.entry, self.context.label())
    }
}

/// The result of evaluating a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub effect: Effect,
    /// Rule set consulted, `None` when no rule set covers the PCC.
    pub rule_set: Option<RuleSetId>,
    /// Entry that decided the outcome; `None` for mode defaults.
    pub matched: Option<RuleMatch>,
    /// Human-readable explanation.
    pub reason: String,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        self.effect == Effect::Allow
    }

    fn deny(rule_set: Option<RuleSetId>, matched: Option<RuleMatch>, reason: String) -> Self {
        Self {
            effect: Effect::Deny,
            rule_set,
            matched,
            reason,
        }
    }

    fn allow(rule_set: RuleSetId, matched: Option<RuleMatch>, reason: String) -> Self {
        Self {
            effect: Effect::Allow,
            rule_set: Some(rule_set),
            matched,
            reason,
        }
    }
}

// ============================================================================
// Context combination
// ============================================================================

/// How the `any` table combines with a specific context table.
///
/// Explicit denies in either table deny under both strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextCombination {
    /// Both tables must permit the command.
    #[default]
    RequireBoth,
    /// Either table permitting is enough; the specific context adds
    /// commands on top of those available everywhere.
    Layered,
}

impl fmt::Display for ContextCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextCombination::RequireBoth => f.write_str("require-both"),
            ContextCombination::Layered => f.write_str("layered"),
        }
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Pure permission evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluator {
    combination: ContextCombination,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_combination(mut self, combination: ContextCombination) -> Self {
        self.combination = combination;
        self
    }

    pub fn combination(&self) -> ContextCombination {
        self.combination
    }

    /// Evaluates `command` for `role` at `pcc` in `context`.
    ///
    /// # Postcondition
    ///
    /// Always returns a `Decision`; never panics.
    pub fn evaluate(&self, role: &Role, pcc: &Pcc, context: ContextKind, command: &str) -> Decision {
        let Some(rule_set) = role.rule_set_for(pcc) else {
            return Decision::deny(
                None,
                None,
                format!("No rule set of role '{}' covers PCC {pcc}", role.name),
            );
        };

        self.evaluate_rule_set(rule_set, context, command)
    }

    /// Evaluates against an already selected rule set.
    pub fn evaluate_rule_set(
        &self,
        rule_set: &PccRuleSet,
        context: ContextKind,
        command: &str,
    ) -> Decision {
        let id = rule_set.id.clone();
        let general = rule_set.rules(ContextKind::Any).evaluate(command);

        if !context.is_specific() {
            return single_context(id, ContextKind::Any, general);
        }

        let specific = rule_set.rules(context).evaluate(command);

        // Explicit denies win regardless of combination
        if let ContextVerdict::Denied(hit) = general {
            return denied_by(id, ContextKind::Any, hit);
        }
        if let ContextVerdict::Denied(hit) = specific {
            return denied_by(id, context, hit);
        }

        match (self.combination, general, specific) {
            (_, ContextVerdict::Allowed(g), ContextVerdict::Allowed(s)) => {
                let matched = s
                    .map(|h| RuleMatch::from_hit(context, h))
                    .or_else(|| g.map(|h| RuleMatch::from_hit(ContextKind::Any, h)));
                Decision::allow(
                    id,
                    matched,
                    format!("Allowed in {} and {}", ContextKind::Any.label(), context.label()),
                )
            }
            (ContextCombination::Layered, ContextVerdict::Allowed(hit), _) => {
                allowed_by(id, ContextKind::Any, hit)
            }
            (ContextCombination::Layered, _, ContextVerdict::Allowed(hit)) => {
                allowed_by(id, context, hit)
            }
            (ContextCombination::RequireBoth, ContextVerdict::Allowed(_), _) => Decision::deny(
                Some(id),
                None,
                format!("'{command}' is not listed in {}", context.label()),
            ),
            (ContextCombination::RequireBoth, _, _) => Decision::deny(
                Some(id),
                None,
                format!("'{command}' is not listed in {}", ContextKind::Any.label()),
            ),
            (ContextCombination::Layered, _, _) => Decision::deny(
                Some(id),
                None,
                format!(
                    "'{command}' is not listed in {} or {}",
                    ContextKind::Any.label(),
                    context.label()
                ),
            ),
        }
    }
}

/// Evaluates with the default [`ContextCombination`].
pub fn evaluate(role: &Role, pcc: &Pcc, context: ContextKind, command: &str) -> Decision {
    Evaluator::new().evaluate(role, pcc, context, command)
}

fn single_context(id: RuleSetId, context: ContextKind, verdict: ContextVerdict) -> Decision {
    match verdict {
        ContextVerdict::Denied(hit) => denied_by(id, context, hit),
        ContextVerdict::Allowed(hit) => allowed_by(id, context, hit),
        ContextVerdict::NotListed => Decision::deny(
            Some(id),
            None,
            format!("Command is not listed in {}", context.label()),
        ),
    }
}

fn denied_by(id: RuleSetId, context: ContextKind, hit: RuleHit) -> Decision {
    let matched = RuleMatch::from_hit(context, hit);
    let reason = format!("Denied by {matched}");
    Decision::deny(Some(id), Some(matched), reason)
}

fn allowed_by(id: RuleSetId, context: ContextKind, hit: Option<RuleHit>) -> Decision {
    match hit {
        Some(hit) => {
            let matched = RuleMatch::from_hit(context, hit);
            let reason = format!("Allowed by {matched}");
            Decision::allow(id, Some(matched), reason)
        }
        None => Decision::allow(
            id,
            None,
            format!("{} allows all commands except denied ones", context.label()),
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::StandardRoles;
    use crate::rules::{ContextRules, PermissionMode};
    use alpha_types::{PccScope, RoleId};
    use proptest::prelude::*;

    fn pcc(code: &str) -> Pcc {
        Pcc::new(code).unwrap()
    }

    fn role_with(rule_sets: Vec<PccRuleSet>) -> Role {
        Role::new(RoleId::new(1), "Test", "", rule_sets).unwrap()
    }

    fn wildcard(id: u64) -> PccRuleSet {
        PccRuleSet::new(RuleSetId::new(id), PccScope::All)
    }

    #[test]
    fn test_basic_role_scenario() {
        let basic = StandardRoles::basic();
        let office = pcc("U9XF");

        let ig = evaluate(&basic, &office, ContextKind::Any, "IG");
        assert_eq!(ig.effect, Effect::Allow);
        assert_eq!(
            ig.matched,
            Some(RuleMatch {
                context: ContextKind::Any,
                list: ListKind::AllowExact,
                entry: Command::new("IG").unwrap(),
            })
        );

        assert_eq!(
            evaluate(&basic, &office, ContextKind::Any, "IR").effect,
            Effect::Deny
        );

        let segment = evaluate(&basic, &office, ContextKind::Any, "0OTHYYGK1");
        assert!(segment.is_allowed());
        assert_eq!(
            segment.matched.map(|m| m.list),
            Some(ListKind::AllowStartsWith)
        );
    }

    #[test]
    fn test_prefix_matching_is_literal() {
        let rs = wildcard(1).with_context(
            ContextKind::Any,
            ContextRules::allow_listed()
                .allow_starts_with(["WC"])
                .unwrap(),
        );
        let role = role_with(vec![rs]);
        assert!(evaluate(&role, &pcc("U9XF"), ContextKind::Any, "WC1-3").is_allowed());

        let rs = wildcard(1).with_context(
            ContextKind::Any,
            ContextRules::allow_listed()
                .allow_starts_with(["W-"])
                .unwrap(),
        );
        let role = role_with(vec![rs]);
        assert!(!evaluate(&role, &pcc("U9XF"), ContextKind::Any, "WC1-3").is_allowed());
    }

    #[test]
    fn test_exact_pcc_rule_set_wins_over_wildcard() {
        let open = wildcard(1).with_uniform_mode(PermissionMode::AllowAllExcept);
        let locked = PccRuleSet::new(
            RuleSetId::new(2),
            PccScope::specific([pcc("U9XF")]).unwrap(),
        );
        // wildcard listed first on purpose
        let role = role_with(vec![open, locked]);

        let at_office = evaluate(&role, &pcc("U9XF"), ContextKind::Any, "IG");
        assert_eq!(at_office.effect, Effect::Deny);
        assert_eq!(at_office.rule_set, Some(RuleSetId::new(2)));

        let elsewhere = evaluate(&role, &pcc("KH6G"), ContextKind::Any, "IG");
        assert_eq!(elsewhere.effect, Effect::Allow);
        assert_eq!(elsewhere.rule_set, Some(RuleSetId::new(1)));
    }

    #[test]
    fn test_unresolvable_pcc_fails_closed() {
        let unlimited_specific = PccRuleSet::new(
            RuleSetId::new(1),
            PccScope::specific([pcc("U9XF")]).unwrap(),
        )
        .with_uniform_mode(PermissionMode::AllowAllExcept);
        let role = role_with(vec![unlimited_specific]);

        let decision = evaluate(&role, &pcc("KH6G"), ContextKind::Any, "*R");
        assert_eq!(decision.effect, Effect::Deny);
        assert!(decision.rule_set.is_none());
        assert!(decision.reason.contains("KH6G"));
    }

    #[test]
    fn test_require_both_needs_specific_allow() {
        let advanced = StandardRoles::advanced();
        let office = pcc("U9XF");

        // listed in any, not in pnr
        let decision = evaluate(&advanced, &office, ContextKind::Pnr, "*R");
        assert_eq!(decision.effect, Effect::Deny);
        assert!(decision.matched.is_none());

        // listed in pnr, not in any
        assert_eq!(
            evaluate(&advanced, &office, ContextKind::Pnr, "NB").effect,
            Effect::Deny
        );
    }

    #[test]
    fn test_require_both_allows_when_both_permit() {
        let rs = wildcard(1)
            .with_context(
                ContextKind::Any,
                ContextRules::allow_listed().allow_starts_with(["5"]).unwrap(),
            )
            .with_context(
                ContextKind::Pnr,
                ContextRules::allow_listed().allow_exact(["5H-VIP"]).unwrap(),
            );
        let role = role_with(vec![rs]);

        let decision = evaluate(&role, &pcc("U9XF"), ContextKind::Pnr, "5H-VIP");
        assert!(decision.is_allowed());
        // the specific context entry is reported
        assert_eq!(decision.matched.map(|m| m.context), Some(ContextKind::Pnr));
    }

    #[test]
    fn test_layered_combination() {
        let layered = Evaluator::new().with_combination(ContextCombination::Layered);
        let advanced = StandardRoles::advanced();
        let office = pcc("U9XF");

        assert!(layered
            .evaluate(&advanced, &office, ContextKind::Pnr, "*R")
            .is_allowed());
        assert!(layered
            .evaluate(&advanced, &office, ContextKind::Pnr, "NB")
            .is_allowed());
        assert!(layered
            .evaluate(&advanced, &office, ContextKind::Pnr, "6AGENT")
            .is_allowed());

        // pnr denies win over the any allow-list
        let er = layered.evaluate(&advanced, &office, ContextKind::Pnr, "ER");
        assert_eq!(er.effect, Effect::Deny);
        assert_eq!(er.matched.map(|m| m.list), Some(ListKind::DenyExact));

        let address = layered.evaluate(&advanced, &office, ContextKind::Pnr, "W-VIP FARES");
        assert_eq!(address.effect, Effect::Deny);

        // nothing lists it
        assert!(!layered
            .evaluate(&advanced, &office, ContextKind::Pnr, "QC")
            .is_allowed());

        // ticketed context of Advanced is empty; any still applies
        assert!(layered
            .evaluate(&advanced, &office, ContextKind::TicketedPnr, "IG")
            .is_allowed());
    }

    #[test]
    fn test_any_deny_applies_to_specific_contexts() {
        let rs = wildcard(1)
            .with_uniform_mode(PermissionMode::AllowAllExcept)
            .with_context(
                ContextKind::Any,
                ContextRules::allow_all_except().deny_exact(["XI"]).unwrap(),
            );
        let role = role_with(vec![rs]);

        for combination in [ContextCombination::RequireBoth, ContextCombination::Layered] {
            let evaluator = Evaluator::new().with_combination(combination);
            let decision = evaluator.evaluate(&role, &pcc("U9XF"), ContextKind::TicketedPnr, "XI");
            assert_eq!(decision.effect, Effect::Deny);
            assert_eq!(decision.matched.map(|m| m.context), Some(ContextKind::Any));
        }
    }

    #[test]
    fn test_unlim_allows_everything() {
        let unlim = StandardRoles::unlim();
        for context in ContextKind::ALL {
            let decision = evaluate(&unlim, &pcc("2GAC"), context, "ANYTHING");
            assert!(decision.is_allowed());
            assert!(decision.matched.is_none());
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let basic = StandardRoles::basic();
        assert!(!evaluate(&basic, &pcc("U9XF"), ContextKind::Any, "ig").is_allowed());
    }

    fn command_strategy() -> impl Strategy<Value = String> {
        "[A-Z0-9*/,\\-]{1,12}"
    }

    fn entries_strategy() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::btree_set("[A-Z0-9*/\\-]{1,4}", 0..6)
            .prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        /// Property: allow-all-except with empty deny lists allows every command
        #[test]
        fn prop_allow_all_except_without_denies_allows(
            command in command_strategy(),
            allows in entries_strategy(),
        ) {
            let rs = wildcard(1)
                .with_uniform_mode(PermissionMode::AllowAllExcept)
                .with_context(
                    ContextKind::Any,
                    ContextRules::allow_all_except().allow_exact(&allows).unwrap(),
                );
            let role = role_with(vec![rs]);
            for context in ContextKind::ALL {
                for combination in [ContextCombination::RequireBoth, ContextCombination::Layered] {
                    let decision = Evaluator::new()
                        .with_combination(combination)
                        .evaluate(&role, &pcc("U9XF"), context, &command);
                    prop_assert!(decision.is_allowed());
                }
            }
        }

        /// Property: allow-listed with empty allow lists denies every command
        #[test]
        fn prop_allow_listed_without_allows_denies(
            command in command_strategy(),
            denies in entries_strategy(),
        ) {
            let rs = wildcard(1).with_context(
                ContextKind::Any,
                ContextRules::allow_listed().deny_starts_with(&denies).unwrap(),
            );
            let role = role_with(vec![rs]);
            for context in ContextKind::ALL {
                for combination in [ContextCombination::RequireBoth, ContextCombination::Layered] {
                    let decision = Evaluator::new()
                        .with_combination(combination)
                        .evaluate(&role, &pcc("U9XF"), context, &command);
                    prop_assert!(!decision.is_allowed());
                }
            }
        }

        /// Property: a command matched by both an allow and a deny rule is denied
        #[test]
        fn prop_deny_overrides_allow(
            prefix in "[A-Z0-9]{1,3}",
            suffix in "[A-Z0-9]{0,5}",
            deny_exact in any::<bool>(),
        ) {
            let command = format!("{prefix}{suffix}");
            let rules = ContextRules::allow_listed()
                .allow_exact([command.as_str()])
                .unwrap()
                .allow_starts_with([prefix.as_str()])
                .unwrap();
            let rules = if deny_exact {
                rules.deny_exact([command.as_str()]).unwrap()
            } else {
                rules.deny_starts_with([prefix.as_str()]).unwrap()
            };
            let role = role_with(vec![wildcard(1).with_context(ContextKind::Any, rules)]);
            let decision = evaluate(&role, &pcc("U9XF"), ContextKind::Any, &command);
            prop_assert_eq!(decision.effect, Effect::Deny);
            prop_assert!(decision.matched.is_some_and(|m| !m.list.is_allow()));
        }

        /// Property: evaluation is total and deterministic
        #[test]
        fn prop_evaluation_is_deterministic(
            command in ".{0,16}",
            code in "[A-Z0-9]{4}",
        ) {
            let office = Pcc::new(code).unwrap();
            for role in StandardRoles::all() {
                for context in ContextKind::ALL {
                    let first = evaluate(&role, &office, context, &command);
                    let second = evaluate(&role, &office, context, &command);
                    prop_assert_eq!(first, second);
                }
            }
        }
    }
}
