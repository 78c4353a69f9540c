//! PNR commands and their runtime variables.

use std::fmt;

use alpha_types::CommandId;
use serde::{Deserialize, Serialize};

use crate::error::{PnrError, Result};

/// Marker substituted by a runtime value.
pub const PLACEHOLDER: &str = "<>";

/// Value that fills a `<>` placeholder when the sequence runs.
///
/// Serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VariableType {
    /// Agent signature, e.g. `6<>` becomes `6JOHNSMITH`.
    Agent = 1,
    /// Date of the `0OTH` keep-alive segment.
    Date1 = 2,
    /// Ticketing time limit, two days out by default.
    Date2 = 3,
}

impl VariableType {
    pub const ALL: [VariableType; 3] = [Self::Agent, Self::Date1, Self::Date2];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::Date1 => "Date1",
            Self::Date2 => "Date2",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Agent => "Agent signature (name/nickname)",
            Self::Date1 => "Auto-calculated date for 0OTH segment",
            Self::Date2 => "Ticketing time-limit (today + 2 days)",
        }
    }

    pub fn example(self) -> &'static str {
        match self {
            Self::Agent => "6<> -> 6JOHNSMITH",
            Self::Date1 => "0OTHYYGK1MIA<> -> 0OTHYYGK1MIA15MAR",
            Self::Date2 => "7TAC/<> -> 7TAC/17MAR",
        }
    }
}

impl TryFrom<u8> for VariableType {
    type Error = PnrError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(Self::Agent),
            2 => Ok(Self::Date1),
            3 => Ok(Self::Date2),
            other => Err(PnrError::UnknownVariableType(other)),
        }
    }
}

impl From<VariableType> for u8 {
    fn from(value: VariableType) -> Self {
        value.code()
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One Sabre command in a PNR sequence.
///
/// The text is kept verbatim apart from trimming; Sabre accepts mixed case
/// and characters such as `¥` are part of the command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PnrCommand {
    id: CommandId,
    text: String,
    variable_types: Vec<VariableType>,
}

impl PnrCommand {
    /// Creates a command. Variable types are dropped when the text has no
    /// placeholder and required when it has one.
    pub fn new(id: CommandId, text: &str, variable_types: Vec<VariableType>) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PnrError::EmptyCommand);
        }
        let has_placeholder = text.contains(PLACEHOLDER);
        if has_placeholder && variable_types.is_empty() {
            return Err(PnrError::MissingVariableTypes(text.to_string()));
        }

        Ok(Self {
            id,
            text: text.to_string(),
            variable_types: if has_placeholder {
                variable_types
            } else {
                Vec::new()
            },
        })
    }

    pub fn id(&self) -> &CommandId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn variable_types(&self) -> &[VariableType] {
        &self.variable_types
    }

    /// Whether the text contains a `<>` placeholder.
    pub fn has_variables(&self) -> bool {
        self.text.contains(PLACEHOLDER)
    }

    pub fn placeholder_count(&self) -> usize {
        self.text.matches(PLACEHOLDER).count()
    }
}
