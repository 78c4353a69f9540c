//! Error types for the PNR tool.

use std::path::PathBuf;

use alpha_types::{CommandId, GroupId, Pcc, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PnrError {
    #[error("a PCC group needs at least one PCC")]
    EmptyGroup,

    #[error("cannot remove the last PCC of a group")]
    LastPcc,

    #[error("PCC {0} is already in this group")]
    DuplicatePcc(Pcc),

    #[error("PCC {pcc} already belongs to group {group}")]
    PccAlreadyGrouped { pcc: Pcc, group: GroupId },

    #[error("PCC {0} is not in this group")]
    PccNotInGroup(Pcc),

    #[error("group {0} does not exist")]
    UnknownGroup(GroupId),

    #[error("no PNR command group covers PCC {0}")]
    NoGroupForPcc(Pcc),

    #[error("duplicate group id {0}")]
    DuplicateGroupId(GroupId),

    #[error("command {0} does not exist")]
    UnknownCommand(CommandId),

    #[error("duplicate command id {0}")]
    DuplicateCommandId(CommandId),

    /// Every numeric id of this kind is taken.
    #[error("no {0} ids left to allocate")]
    IdsExhausted(&'static str),

    #[error("command text is empty")]
    EmptyCommand,

    #[error("command {0:?} has a <> placeholder but no variable types")]
    MissingVariableTypes(String),

    #[error("command {command:?} has {placeholders} placeholder(s) but {variables} variable type(s)")]
    PlaceholderMismatch {
        command: String,
        placeholders: usize,
        variables: usize,
    },

    #[error("unknown variable type {0}: expected 1 (Agent), 2 (Date1) or 3 (Date2)")]
    UnknownVariableType(u8),

    #[error("invalid date {0:?}: expected DDMMM (15MAR) or YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("Failed to read PNR config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported PNR config format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse JSON PNR config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML PNR config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML PNR config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PnrError>;
