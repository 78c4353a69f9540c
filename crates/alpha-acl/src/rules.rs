#![allow(clippy::match_same_arms)]
//! Per-context command rules.
//!
//! A [`ContextRules`] table holds a [`PermissionMode`] and four command
//! lists. Evaluation follows a fixed precedence:
//!
//! 1. Deny rules are checked first (`denyExact`, then `denyStartsWith`).
//!    Any match denies, whatever the mode.
//! 2. In `allow-all-except` mode everything else is allowed.
//! 3. In `allow-listed` mode the command must match `allowExact` or start
//!    with an `allowStartsWith` entry.
//!
//! Matching is literal and case-sensitive.

use std::fmt;

use alpha_types::{Command, ContextKind};
use serde::{Deserialize, Serialize};

use crate::error::{AclError, Result};

/// Default-deny or default-allow behaviour of a context table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionMode {
    /// Only listed commands are allowed.
    #[default]
    AllowListed,
    /// Everything is allowed except denied commands.
    AllowAllExcept,
}

impl PermissionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionMode::AllowListed => "allow-listed",
            PermissionMode::AllowAllExcept => "allow-all-except",
        }
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four command lists of a context table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListKind {
    AllowExact,
    AllowStartsWith,
    DenyExact,
    DenyStartsWith,
}

impl ListKind {
    /// All lists in display order.
    pub const ALL: [ListKind; 4] = [
        ListKind::AllowExact,
        ListKind::AllowStartsWith,
        ListKind::DenyExact,
        ListKind::DenyStartsWith,
    ];

    pub fn is_allow(self) -> bool {
        matches!(self, ListKind::AllowExact | ListKind::AllowStartsWith)
    }

    pub fn is_prefix(self) -> bool {
        matches!(self, ListKind::AllowStartsWith | ListKind::DenyStartsWith)
    }

    pub fn label(self) -> &'static str {
        match self {
            ListKind::AllowExact => "Allow Exact",
            ListKind::AllowStartsWith => "Allow Starts With",
            ListKind::DenyExact => "Deny Exact",
            ListKind::DenyStartsWith => "Deny Starts With",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Duplicate-free list of commands, kept in insertion order for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Command>", into = "Vec<Command>")]
pub struct CommandList {
    commands: Vec<Command>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from commands, rejecting duplicates.
    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Result<Self> {
        let mut list = Self::new();
        for command in commands {
            list.insert(command)?;
        }
        Ok(list)
    }

    /// Appends a command; duplicates are rejected.
    pub fn insert(&mut self, command: Command) -> Result<()> {
        if self.commands.contains(&command) {
            return Err(AclError::DuplicateCommand(command));
        }
        self.commands.push(command);
        Ok(())
    }

    /// Removes a command.
    pub fn remove(&mut self, command: &Command) -> Result<()> {
        let before = self.commands.len();
        self.commands.retain(|c| c != command);
        if self.commands.len() == before {
            return Err(AclError::CommandNotFound(command.clone()));
        }
        Ok(())
    }

    pub fn contains(&self, command: &Command) -> bool {
        self.commands.contains(command)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// First entry equal to `candidate`.
    pub fn find_exact(&self, candidate: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches_exact(candidate))
    }

    /// First entry that is a literal prefix of `candidate`.
    pub fn find_prefix(&self, candidate: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.is_prefix_of(candidate))
    }
}

impl TryFrom<Vec<Command>> for CommandList {
    type Error = AclError;

    fn try_from(value: Vec<Command>) -> Result<Self> {
        Self::from_commands(value)
    }
}

impl From<CommandList> for Vec<Command> {
    fn from(list: CommandList) -> Self {
        list.commands
    }
}

/// The rule entry that decided a context verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub list: ListKind,
    pub entry: Command,
}

/// Outcome of evaluating one context table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextVerdict {
    /// A deny rule matched.
    Denied(RuleHit),
    /// Allowed, by an allow rule or (`None`) by the `allow-all-except` default.
    Allowed(Option<RuleHit>),
    /// `allow-listed` table with no matching allow rule.
    NotListed,
}

impl ContextVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ContextVerdict::Allowed(_))
    }
}

/// Permission table for a single context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRules {
    pub mode: PermissionMode,
    #[serde(default)]
    pub allow_exact: CommandList,
    #[serde(default)]
    pub allow_starts_with: CommandList,
    #[serde(default)]
    pub deny_exact: CommandList,
    #[serde(default)]
    pub deny_starts_with: CommandList,
}

impl ContextRules {
    /// Empty table with the given mode.
    pub fn empty(mode: PermissionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Empty `allow-listed` table (denies everything).
    pub fn allow_listed() -> Self {
        Self::empty(PermissionMode::AllowListed)
    }

    /// Empty `allow-all-except` table (allows everything).
    pub fn allow_all_except() -> Self {
        Self::empty(PermissionMode::AllowAllExcept)
    }

    /// Builder: add exact-match allow entries.
    pub fn allow_exact<I, S>(mut self, commands: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend(&mut self.allow_exact, commands)?;
        Ok(self)
    }

    /// Builder: add prefix allow entries.
    pub fn allow_starts_with<I, S>(mut self, commands: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend(&mut self.allow_starts_with, commands)?;
        Ok(self)
    }

    /// Builder: add exact-match deny entries.
    pub fn deny_exact<I, S>(mut self, commands: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend(&mut self.deny_exact, commands)?;
        Ok(self)
    }

    /// Builder: add prefix deny entries.
    pub fn deny_starts_with<I, S>(mut self, commands: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend(&mut self.deny_starts_with, commands)?;
        Ok(self)
    }

    pub fn list(&self, kind: ListKind) -> &CommandList {
        match kind {
            ListKind::AllowExact => &self.allow_exact,
            ListKind::AllowStartsWith => &self.allow_starts_with,
            ListKind::DenyExact => &self.deny_exact,
            ListKind::DenyStartsWith => &self.deny_starts_with,
        }
    }

    pub fn list_mut(&mut self, kind: ListKind) -> &mut CommandList {
        match kind {
            ListKind::AllowExact => &mut self.allow_exact,
            ListKind::AllowStartsWith => &mut self.allow_starts_with,
            ListKind::DenyExact => &mut self.deny_exact,
            ListKind::DenyStartsWith => &mut self.deny_starts_with,
        }
    }

    /// Returns whether every list is empty.
    pub fn has_no_entries(&self) -> bool {
        ListKind::ALL.iter().all(|k| self.list(*k).is_empty())
    }

    /// Evaluates a candidate command against this table.
    ///
    /// Never fails: every input maps to exactly one verdict.
    pub fn evaluate(&self, command: &str) -> ContextVerdict {
        // 1. Deny rules override everything
        if let Some(entry) = self.deny_exact.find_exact(command) {
            return ContextVerdict::Denied(RuleHit {
                list: ListKind::DenyExact,
                entry: entry.clone(),
            });
        }
        if let Some(entry) = self.deny_starts_with.find_prefix(command) {
            return ContextVerdict::Denied(RuleHit {
                list: ListKind::DenyStartsWith,
                entry: entry.clone(),
            });
        }

        match self.mode {
            // 2. Default allow
            PermissionMode::AllowAllExcept => ContextVerdict::Allowed(None),
            // 3. Explicit allow required
            PermissionMode::AllowListed => {
                if let Some(entry) = self.allow_exact.find_exact(command) {
                    return ContextVerdict::Allowed(Some(RuleHit {
                        list: ListKind::AllowExact,
                        entry: entry.clone(),
                    }));
                }
                if let Some(entry) = self.allow_starts_with.find_prefix(command) {
                    return ContextVerdict::Allowed(Some(RuleHit {
                        list: ListKind::AllowStartsWith,
                        entry: entry.clone(),
                    }));
                }
                ContextVerdict::NotListed
            }
        }
    }
}

fn extend<I, S>(list: &mut CommandList, commands: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for raw in commands {
        list.insert(Command::new(raw.as_ref())?)?;
    }
    Ok(())
}

/// The three context tables of a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextTable {
    pub any: ContextRules,
    pub pnr: ContextRules,
    pub ticketed_pnr: ContextRules,
}

impl ContextTable {
    /// All three contexts share the same mode and have no entries.
    pub fn uniform(mode: PermissionMode) -> Self {
        Self {
            any: ContextRules::empty(mode),
            pnr: ContextRules::empty(mode),
            ticketed_pnr: ContextRules::empty(mode),
        }
    }

    pub fn get(&self, context: ContextKind) -> &ContextRules {
        match context {
            ContextKind::Any => &self.any,
            ContextKind::Pnr => &self.pnr,
            ContextKind::TicketedPnr => &self.ticketed_pnr,
        }
    }

    pub fn get_mut(&mut self, context: ContextKind) -> &mut ContextRules {
        match context {
            ContextKind::Any => &mut self.any,
            ContextKind::Pnr => &mut self.pnr,
            ContextKind::TicketedPnr => &mut self.ticketed_pnr,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContextKind, &ContextRules)> {
        ContextKind::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(text: &str) -> Command {
        Command::new(text).unwrap()
    }

    #[test]
    fn test_command_list_rejects_duplicates() {
        let mut list = CommandList::new();
        list.insert(cmd("*R")).unwrap();
        assert_eq!(
            list.insert(cmd("*R")),
            Err(AclError::DuplicateCommand(cmd("*R")))
        );
        assert_eq!(list.len(), 1);

        list.remove(&cmd("*R")).unwrap();
        assert!(list.is_empty());
        assert_eq!(
            list.remove(&cmd("*R")),
            Err(AclError::CommandNotFound(cmd("*R")))
        );
    }

    #[test]
    fn test_command_list_keeps_insertion_order() {
        let list =
            CommandList::from_commands([cmd("IG"), cmd("*R"), cmd("I")]).unwrap();
        let order: Vec<&str> = list.iter().map(Command::as_str).collect();
        assert_eq!(order, vec!["IG", "*R", "I"]);
    }

    #[test]
    fn test_allow_listed_requires_match() {
        let rules = ContextRules::allow_listed()
            .allow_exact(["*R", "IG"])
            .unwrap()
            .allow_starts_with(["0"])
            .unwrap();

        assert_eq!(
            rules.evaluate("IG"),
            ContextVerdict::Allowed(Some(RuleHit {
                list: ListKind::AllowExact,
                entry: cmd("IG"),
            }))
        );
        assert_eq!(
            rules.evaluate("0OTHYYGK1"),
            ContextVerdict::Allowed(Some(RuleHit {
                list: ListKind::AllowStartsWith,
                entry: cmd("0"),
            }))
        );
        assert_eq!(rules.evaluate("IR"), ContextVerdict::NotListed);
        // exact entries are not prefixes
        assert_eq!(rules.evaluate("IGX"), ContextVerdict::NotListed);
    }

    #[test]
    fn test_allow_all_except_only_denies_listed() {
        let rules = ContextRules::allow_all_except()
            .deny_exact(["E"])
            .unwrap()
            .deny_starts_with(["W-"])
            .unwrap();

        assert_eq!(rules.evaluate("ER"), ContextVerdict::Allowed(None));
        assert!(matches!(rules.evaluate("E"), ContextVerdict::Denied(_)));
        assert!(matches!(
            rules.evaluate("W-VIP FARES"),
            ContextVerdict::Denied(_)
        ));
    }

    #[test]
    fn test_allow_lists_ignored_in_allow_all_except() {
        let rules = ContextRules::allow_all_except()
            .allow_exact(["IG"])
            .unwrap();
        assert_eq!(rules.evaluate("IG"), ContextVerdict::Allowed(None));
    }

    #[test]
    fn test_deny_overrides_allow() {
        let rules = ContextRules::allow_listed()
            .allow_starts_with(["W"])
            .unwrap()
            .deny_starts_with(["W-"])
            .unwrap();

        assert!(rules.evaluate("WC1-3").is_allowed());
        assert_eq!(
            rules.evaluate("W-ADDRESS"),
            ContextVerdict::Denied(RuleHit {
                list: ListKind::DenyStartsWith,
                entry: cmd("W-"),
            })
        );
    }

    #[test]
    fn test_builder_rejects_non_canonical_entries() {
        assert!(ContextRules::allow_listed().allow_exact(["ig"]).is_err());
        assert!(ContextRules::allow_listed().allow_exact(["IG", "IG"]).is_err());
    }

    #[test]
    fn test_context_rules_serde_shape() {
        let rules = ContextRules::allow_listed()
            .deny_exact(["E", "ER"])
            .unwrap();
        let json = serde_json::to_value(&rules).unwrap();

        assert_eq!(json["mode"], "allow-listed");
        assert_eq!(json["denyExact"], serde_json::json!(["E", "ER"]));
        assert_eq!(json["allowStartsWith"], serde_json::json!([]));

        let back: ContextRules = serde_json::from_value(json).unwrap();
        assert_eq!(back, rules);
    }

    #[test]
    fn test_context_rules_serde_rejects_duplicates() {
        let json = r#"{"mode":"allow-listed","allowExact":["IG","IG"]}"#;
        assert!(serde_json::from_str::<ContextRules>(json).is_err());
    }

    #[test]
    fn test_context_table_access() {
        let mut table = ContextTable::uniform(PermissionMode::AllowAllExcept);
        table.get_mut(ContextKind::Pnr).mode = PermissionMode::AllowListed;

        assert_eq!(table.get(ContextKind::Any).mode, PermissionMode::AllowAllExcept);
        assert_eq!(table.get(ContextKind::Pnr).mode, PermissionMode::AllowListed);
        assert_eq!(table.iter().count(), 3);
    }
}
