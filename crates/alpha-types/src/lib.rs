//! # alpha-types: Core types for Alpha Admin
//!
//! This crate contains the shared vocabulary of the access-control and
//! UniFire tooling crates:
//! - Entity IDs ([`RoleId`], [`RuleSetId`], [`GroupId`], [`CommandId`])
//! - GDS office codes ([`Pcc`]) and the scopes built from them ([`PccScope`])
//! - Terminal commands ([`Command`])
//! - Booking-session contexts ([`ContextKind`])

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Error returned when a value fails domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// PCC is not exactly four characters from `[A-Z0-9]`.
    #[error("invalid PCC {0:?}: expected 4 characters from A-Z and 0-9")]
    InvalidPcc(String),

    /// The wildcard token was used where an explicit code is required.
    #[error("the wildcard PCC is not allowed here")]
    WildcardNotAllowed,

    /// A specific PCC scope must hold at least one code.
    #[error("a PCC scope must name at least one PCC or be the wildcard")]
    EmptyScope,

    /// Wildcard and explicit codes cannot be combined.
    #[error("the wildcard PCC cannot be combined with explicit codes")]
    MixedScope,

    /// The same PCC appears twice.
    #[error("duplicate PCC {0}")]
    DuplicatePcc(Pcc),

    /// The PCC is not part of the scope.
    #[error("PCC {0} is not in scope")]
    PccNotInScope(Pcc),

    /// Command text is empty after trimming.
    #[error("command is empty")]
    EmptyCommand,

    /// Command text is not in canonical (trimmed, uppercase) form.
    #[error("command {0:?} must be trimmed and uppercase")]
    NonCanonicalCommand(String),

    /// Unknown context name.
    #[error("unknown context {0:?}: expected any, pnr or ticketedPnr")]
    UnknownContext(String),

    /// An id is blank.
    #[error("id must not be empty")]
    EmptyId,
}

// ============================================================================
// Entity IDs
// ============================================================================

/// Wire form of an id: the admin UI writes strings (`"1-default"`,
/// `"grp-1"`), older exports write numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Opaque text. Ids allocated by this workspace are decimal numbers.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(into = "String")]
        pub struct $name(String);

        impl $name {
            /// ```
            /// # use alpha_types::RoleId;
            /// assert_eq!(RoleId::new(7).as_str(), "7");
            /// assert_eq!(RoleId::new("1-default").as_str(), "1-default");
            /// ```
            pub fn new(id: impl Display) -> Self {
                Self(id.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The numeric value, when the id is a plain decimal number.
            pub fn as_number(&self) -> Option<u64> {
                self.0.parse().ok()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self::new(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(n) => Ok(Self::new(n)),
                    RawId::Text(text) if text.trim().is_empty() => {
                        Err(serde::de::Error::custom(TypeError::EmptyId))
                    }
                    RawId::Text(text) => Ok(Self(text)),
                }
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Next decimal id above every numeric id in `ids`; non-numeric ids are
/// ignored. `None` once `u64::MAX` is taken.
///
/// ```
/// # use alpha_types::{next_numeric_id, RoleId};
/// let ids = [RoleId::new(3), RoleId::new("1-default"), RoleId::new(9)];
/// assert_eq!(next_numeric_id(ids.iter().map(RoleId::as_str)), Some(10));
/// assert_eq!(next_numeric_id(std::iter::empty::<&str>()), Some(1));
/// ```
pub fn next_numeric_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<u64> {
    ids.into_iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

entity_id!(
    /// Unique identifier for a permission role.
    RoleId
);

entity_id!(
    /// Unique identifier for a PCC rule set within a role.
    RuleSetId
);

entity_id!(
    /// Unique identifier for a PNR tool PCC group.
    GroupId
);

entity_id!(
    /// Unique identifier for a single PNR tool command.
    CommandId
);

// ============================================================================
// PCC - Pseudo City Code
// ============================================================================

/// The token that stands for "every PCC" in serialized scopes.
pub const WILDCARD_PCC: &str = "*";

/// Pseudo City Code: a 4-character GDS office identifier.
///
/// Always exactly four ASCII characters from `[A-Z0-9]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pcc(String);

impl Pcc {
    /// Length of every PCC.
    pub const LEN: usize = 4;

    /// Validates a PCC given in canonical form.
    ///
    /// # Examples
    ///
    /// ```
    /// # use alpha_types::Pcc;
    /// assert!(Pcc::new("U9XF").is_ok());
    /// assert!(Pcc::new("u9xf").is_err());
    /// assert!(Pcc::new("*").is_err());
    /// ```
    pub fn new(code: impl Into<String>) -> Result<Self, TypeError> {
        let code = code.into();
        if code == WILDCARD_PCC {
            return Err(TypeError::WildcardNotAllowed);
        }
        if code.len() == Self::LEN
            && code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            Ok(Self(code))
        } else {
            Err(TypeError::InvalidPcc(code))
        }
    }

    /// Normalises raw editor input the way the PCC chip inputs do:
    /// uppercase, drop everything outside `[A-Z0-9*]`, keep at most four
    /// characters.
    ///
    /// The result is not validated; it may be empty, the wildcard, or too
    /// short.
    ///
    /// ```
    /// # use alpha_types::Pcc;
    /// assert_eq!(Pcc::normalize_input(" u9-xf1 "), "U9XF");
    /// assert_eq!(Pcc::normalize_input("*"), "*");
    /// ```
    pub fn normalize_input(raw: &str) -> String {
        raw.chars()
            .flat_map(char::to_uppercase)
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '*')
            .take(Self::LEN)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Pcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Pcc {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Pcc {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pcc> for String {
    fn from(pcc: Pcc) -> Self {
        pcc.0
    }
}

impl AsRef<str> for Pcc {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// PCC Scope
// ============================================================================

/// Non-empty, duplicate-free, insertion-ordered set of PCCs.
///
/// Only constructible through [`PccScope`] operations, so a `Specific`
/// scope can never be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PccSet(Vec<Pcc>);

impl PccSet {
    pub fn as_slice(&self) -> &[Pcc] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, pcc: &Pcc) -> bool {
        self.0.contains(pcc)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pcc> {
        self.0.iter()
    }
}

/// The set of offices a rule set applies to.
///
/// Wildcard and explicit codes are mutually exclusive by construction:
/// adding a code to `All` narrows the scope to that code, adding the
/// wildcard to `Specific` widens it to `All`, and removing the last code
/// from `Specific` falls back to `All`.
///
/// Serializes as the wire form used by the admin UI: `["*"]` or a list of
/// codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum PccScope {
    /// Every PCC (the default rule set).
    #[default]
    All,
    /// Only the listed PCCs.
    Specific(PccSet),
}

impl PccScope {
    /// Builds a specific scope from a non-empty list of distinct codes.
    pub fn specific(pccs: impl IntoIterator<Item = Pcc>) -> Result<Self, TypeError> {
        let mut set = Vec::new();
        for pcc in pccs {
            if set.contains(&pcc) {
                return Err(TypeError::DuplicatePcc(pcc));
            }
            set.push(pcc);
        }
        if set.is_empty() {
            return Err(TypeError::EmptyScope);
        }
        Ok(Self::Specific(PccSet(set)))
    }

    /// Parses the wire form (`["*"]` or explicit codes).
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self, TypeError> {
        match codes {
            [] => Err(TypeError::EmptyScope),
            [only] if only.as_ref() == WILDCARD_PCC => Ok(Self::All),
            _ => {
                if codes.iter().any(|c| c.as_ref() == WILDCARD_PCC) {
                    return Err(TypeError::MixedScope);
                }
                let pccs = codes
                    .iter()
                    .map(|c| Pcc::new(c.as_ref()))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::specific(pccs)
            }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns whether this scope names `pcc` explicitly.
    ///
    /// `All` never names a PCC explicitly; callers that want wildcard
    /// fallback use [`PccScope::covers`].
    pub fn names(&self, pcc: &Pcc) -> bool {
        match self {
            Self::All => false,
            Self::Specific(set) => set.contains(pcc),
        }
    }

    /// Returns whether this scope applies to `pcc`, explicitly or through
    /// the wildcard.
    pub fn covers(&self, pcc: &Pcc) -> bool {
        self.is_all() || self.names(pcc)
    }

    /// Explicit codes, empty for `All`.
    pub fn pccs(&self) -> &[Pcc] {
        match self {
            Self::All => &[],
            Self::Specific(set) => set.as_slice(),
        }
    }

    /// Adds an explicit code.
    ///
    /// On `All` this narrows the scope to the single code.
    pub fn with_pcc(self, pcc: Pcc) -> Result<Self, TypeError> {
        match self {
            Self::All => Ok(Self::Specific(PccSet(vec![pcc]))),
            Self::Specific(PccSet(mut set)) => {
                if set.contains(&pcc) {
                    return Err(TypeError::DuplicatePcc(pcc));
                }
                set.push(pcc);
                Ok(Self::Specific(PccSet(set)))
            }
        }
    }

    /// Removes an explicit code; removing the last one yields `All`.
    pub fn without_pcc(self, pcc: &Pcc) -> Result<Self, TypeError> {
        match self {
            Self::All => Err(TypeError::PccNotInScope(pcc.clone())),
            Self::Specific(PccSet(mut set)) => {
                let before = set.len();
                set.retain(|p| p != pcc);
                if set.len() == before {
                    return Err(TypeError::PccNotInScope(pcc.clone()));
                }
                if set.is_empty() {
                    Ok(Self::All)
                } else {
                    Ok(Self::Specific(PccSet(set)))
                }
            }
        }
    }

    /// Short label for listings: `All PCCs`, a single code, or the first
    /// three codes followed by `+N`.
    pub fn label(&self) -> String {
        match self {
            Self::All => "All PCCs".to_string(),
            Self::Specific(set) => {
                let shown: Vec<&str> = set.iter().take(3).map(Pcc::as_str).collect();
                let mut label = shown.join(", ");
                if set.len() > 3 {
                    label.push_str(&format!(" +{}", set.len() - 3));
                }
                label
            }
        }
    }
}

impl Display for PccScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(WILDCARD_PCC),
            Self::Specific(set) => {
                let codes: Vec<&str> = set.iter().map(Pcc::as_str).collect();
                f.write_str(&codes.join(","))
            }
        }
    }
}

impl TryFrom<Vec<String>> for PccScope {
    type Error = TypeError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_codes(&value)
    }
}

impl From<PccScope> for Vec<String> {
    fn from(scope: PccScope) -> Self {
        match scope {
            PccScope::All => vec![WILDCARD_PCC.to_string()],
            PccScope::Specific(PccSet(set)) => set.into_iter().map(String::from).collect(),
        }
    }
}

// ============================================================================
// Command
// ============================================================================

/// A GDS terminal command entry (e.g. `*R`, `WC`, `0OTHYYGK1`).
///
/// Stored trimmed and uppercase. Characters such as `*` or `/` are literal
/// command text, never pattern syntax.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Command(String);

impl Command {
    /// Validates a command already in canonical form.
    pub fn new(text: impl Into<String>) -> Result<Self, TypeError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TypeError::EmptyCommand);
        }
        if text.trim() != text || text.to_uppercase() != text {
            return Err(TypeError::NonCanonicalCommand(text));
        }
        Ok(Self(text))
    }

    /// Canonicalises raw editor input (trim, uppercase).
    ///
    /// Returns `None` for blank input, which editors ignore.
    ///
    /// ```
    /// # use alpha_types::Command;
    /// assert_eq!(Command::from_input("  wc ").unwrap().as_str(), "WC");
    /// assert!(Command::from_input("   ").is_none());
    /// ```
    pub fn from_input(raw: &str) -> Option<Self> {
        let text = raw.trim().to_uppercase();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Literal exact match against a candidate command.
    pub fn matches_exact(&self, candidate: &str) -> bool {
        self.0 == candidate
    }

    /// Literal prefix match against a candidate command.
    pub fn is_prefix_of(&self, candidate: &str) -> bool {
        candidate.starts_with(self.0.as_str())
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Command {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Command {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Command> for String {
    fn from(command: Command) -> Self {
        command.0
    }
}

impl AsRef<str> for Command {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Context
// ============================================================================

/// Booking-session state under which a command is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContextKind {
    /// Commands available in any situation.
    #[serde(rename = "any")]
    Any,
    /// Commands available when a PNR is active.
    #[serde(rename = "pnr")]
    Pnr,
    /// Commands available when working with a ticketed PNR.
    #[serde(rename = "ticketedPnr")]
    TicketedPnr,
}

impl ContextKind {
    /// All contexts in display order.
    pub const ALL: [ContextKind; 3] = [Self::Any, Self::Pnr, Self::TicketedPnr];

    /// Wire name (`any`, `pnr`, `ticketedPnr`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Pnr => "pnr",
            Self::TicketedPnr => "ticketedPnr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "Any Context",
            Self::Pnr => "PNR Context",
            Self::TicketedPnr => "Ticketed PNR Context",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Any => "Commands available in any situation",
            Self::Pnr => "Commands available when a PNR is active",
            Self::TicketedPnr => "Commands available when working with a ticketed PNR",
        }
    }

    /// Returns whether this is a booking-specific context that layers on
    /// top of `Any`.
    pub fn is_specific(self) -> bool {
        !matches!(self, Self::Any)
    }
}

impl Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "pnr" => Ok(Self::Pnr),
            "ticketedPnr" | "ticketed-pnr" | "ticketed_pnr" => Ok(Self::TicketedPnr),
            other => Err(TypeError::UnknownContext(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests;
