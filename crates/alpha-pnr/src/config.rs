//! A company's PNR tool configuration.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use alpha_types::{CommandId, GroupId, Pcc, next_numeric_id};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::{PnrCommand, VariableType};
use crate::error::{PnrError, Result};
use crate::group::{Direction, PccCommandGroup, parse_pcc_input};

/// All PCC command groups of a company.
///
/// A PCC belongs to at most one group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ConfigRepr")]
pub struct PnrToolConfig {
    pcc_groups: Vec<PccCommandGroup>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigRepr {
    #[serde(default)]
    pcc_groups: Vec<PccCommandGroup>,
}

impl TryFrom<ConfigRepr> for PnrToolConfig {
    type Error = PnrError;

    fn try_from(repr: ConfigRepr) -> Result<Self> {
        let mut config = Self::default();
        let mut command_ids = HashSet::new();
        for group in repr.pcc_groups {
            for pcc in group.pccs() {
                config.ensure_ungrouped(pcc)?;
            }
            if config.group(group.id()).is_ok() {
                return Err(PnrError::DuplicateGroupId(group.id().clone()));
            }
            // Command ids are unique across the whole configuration
            for command in group.commands() {
                if !command_ids.insert(command.id().clone()) {
                    return Err(PnrError::DuplicateCommandId(command.id().clone()));
                }
            }
            config.pcc_groups.push(group);
        }
        Ok(config)
    }
}

impl PnrToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads a configuration; `.json` and `.toml` are accepted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let content = || {
            fs::read_to_string(path).map_err(|source| PnrError::Read {
                path: path.to_path_buf(),
                source,
            })
        };

        let config = match ext.as_deref() {
            Some("json") => Self::from_json_str(&content()?)?,
            Some("toml") => Self::from_toml_str(&content()?)?,
            _ => return Err(PnrError::UnsupportedFormat(path.to_path_buf())),
        };
        debug!(path = %path.display(), groups = config.pcc_groups.len(), "Loaded PNR config");
        Ok(config)
    }

    pub fn groups(&self) -> &[PccCommandGroup] {
        &self.pcc_groups
    }

    pub fn group(&self, id: &GroupId) -> Result<&PccCommandGroup> {
        self.pcc_groups
            .iter()
            .find(|g| g.id() == id)
            .ok_or_else(|| PnrError::UnknownGroup(id.clone()))
    }

    fn group_mut(&mut self, id: &GroupId) -> Result<&mut PccCommandGroup> {
        self.pcc_groups
            .iter_mut()
            .find(|g| g.id() == id)
            .ok_or_else(|| PnrError::UnknownGroup(id.clone()))
    }

    /// The group whose sequence runs for `pcc`.
    pub fn group_for(&self, pcc: &Pcc) -> Option<&PccCommandGroup> {
        self.pcc_groups.iter().find(|g| g.serves(pcc))
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// Adds an empty group for `pccs`.
    pub fn add_group(&mut self, pccs: Vec<Pcc>) -> Result<GroupId> {
        for pcc in &pccs {
            self.ensure_ungrouped(pcc)?;
        }
        let id = self.next_group_id()?;
        self.pcc_groups.push(PccCommandGroup::new(id.clone(), pccs)?);
        Ok(id)
    }

    pub fn delete_group(&mut self, id: &GroupId) -> Result<PccCommandGroup> {
        let index = self
            .pcc_groups
            .iter()
            .position(|g| g.id() == id)
            .ok_or_else(|| PnrError::UnknownGroup(id.clone()))?;
        Ok(self.pcc_groups.remove(index))
    }

    /// Adds a PCC typed by the user to a group.
    pub fn add_pcc(&mut self, group: &GroupId, input: &str) -> Result<Pcc> {
        let pcc = parse_pcc_input(input)?;
        if let Some(owner) = self.group_for(&pcc).map(PccCommandGroup::id)
            && owner != group
        {
            let group = owner.clone();
            return Err(PnrError::PccAlreadyGrouped { pcc, group });
        }
        self.group_mut(group)?.add_pcc(pcc.clone())?;
        Ok(pcc)
    }

    pub fn remove_pcc(&mut self, group: &GroupId, pcc: &Pcc) -> Result<()> {
        self.group_mut(group)?.remove_pcc(pcc)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Appends a command to a group's sequence.
    pub fn add_command(
        &mut self,
        group: &GroupId,
        text: &str,
        variable_types: Vec<VariableType>,
    ) -> Result<CommandId> {
        let id = self.next_command_id()?;
        let command = PnrCommand::new(id.clone(), text, variable_types)?;
        self.group_mut(group)?.push_command(command)?;
        Ok(id)
    }

    pub fn update_command(
        &mut self,
        group: &GroupId,
        command: &CommandId,
        text: &str,
        variable_types: Vec<VariableType>,
    ) -> Result<()> {
        self.group_mut(group)?
            .update_command(command, text, variable_types)
    }

    pub fn delete_command(&mut self, group: &GroupId, command: &CommandId) -> Result<()> {
        self.group_mut(group)?.delete_command(command).map(|_| ())
    }

    /// Moves a command one step; a no-op at either end.
    pub fn move_command(
        &mut self,
        group: &GroupId,
        command: &CommandId,
        direction: Direction,
    ) -> Result<bool> {
        self.group_mut(group)?.move_command(command, direction)
    }

    fn ensure_ungrouped(&self, pcc: &Pcc) -> Result<()> {
        match self.group_for(pcc) {
            Some(group) => Err(PnrError::PccAlreadyGrouped {
                pcc: pcc.clone(),
                group: group.id().clone(),
            }),
            None => Ok(()),
        }
    }

    fn next_group_id(&self) -> Result<GroupId> {
        next_numeric_id(self.pcc_groups.iter().map(|g| g.id().as_str()))
            .map(GroupId::new)
            .ok_or(PnrError::IdsExhausted("group"))
    }

    /// Command ids are unique across the whole configuration.
    fn next_command_id(&self) -> Result<CommandId> {
        next_numeric_id(
            self.pcc_groups
                .iter()
                .flat_map(PccCommandGroup::commands)
                .map(|c| c.id().as_str()),
        )
        .map(CommandId::new)
        .ok_or(PnrError::IdsExhausted("command"))
    }
}
