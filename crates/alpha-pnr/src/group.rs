//! PCC command groups.
//!
//! A group is an ordered command sequence shared by one or more PCCs.
//! Order is positional; the serialized `order` field is always `1..=n`.

use alpha_types::{CommandId, GroupId, Pcc};
use serde::{Deserialize, Serialize};

use crate::command::{PnrCommand, VariableType};
use crate::error::{PnrError, Result};

/// Direction of a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Normalises raw PCC input: uppercase, keep `[A-Z0-9]`, at most four
/// characters, then validate.
pub fn parse_pcc_input(raw: &str) -> Result<Pcc> {
    let code: String = raw
        .chars()
        .flat_map(char::to_uppercase)
        .filter(char::is_ascii_alphanumeric)
        .take(Pcc::LEN)
        .collect();
    Ok(Pcc::new(code)?)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GroupRepr", into = "GroupRepr")]
pub struct PccCommandGroup {
    id: GroupId,
    pccs: Vec<Pcc>,
    commands: Vec<PnrCommand>,
}

impl PccCommandGroup {
    /// Creates an empty group; `pccs` must be non-empty and unique.
    pub fn new(id: GroupId, pccs: Vec<Pcc>) -> Result<Self> {
        if pccs.is_empty() {
            return Err(PnrError::EmptyGroup);
        }
        for (i, pcc) in pccs.iter().enumerate() {
            if pccs[..i].contains(pcc) {
                return Err(PnrError::DuplicatePcc(pcc.clone()));
            }
        }
        Ok(Self {
            id,
            pccs,
            commands: Vec::new(),
        })
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn pccs(&self) -> &[Pcc] {
        &self.pccs
    }

    pub fn serves(&self, pcc: &Pcc) -> bool {
        self.pccs.contains(pcc)
    }

    /// Commands in execution order.
    pub fn commands(&self) -> &[PnrCommand] {
        &self.commands
    }

    /// Commands paired with their 1-based execution order.
    pub fn ordered(&self) -> impl Iterator<Item = (usize, &PnrCommand)> {
        self.commands.iter().enumerate().map(|(i, c)| (i + 1, c))
    }

    pub fn command(&self, id: &CommandId) -> Option<&PnrCommand> {
        self.commands.iter().find(|c| c.id() == id)
    }

    pub fn add_pcc(&mut self, pcc: Pcc) -> Result<()> {
        if self.serves(&pcc) {
            return Err(PnrError::DuplicatePcc(pcc));
        }
        self.pccs.push(pcc);
        Ok(())
    }

    /// Removes a PCC; a group always keeps at least one.
    pub fn remove_pcc(&mut self, pcc: &Pcc) -> Result<()> {
        if !self.serves(pcc) {
            return Err(PnrError::PccNotInGroup(pcc.clone()));
        }
        if self.pccs.len() == 1 {
            return Err(PnrError::LastPcc);
        }
        self.pccs.retain(|p| p != pcc);
        Ok(())
    }

    /// Appends a command to the end of the sequence.
    pub fn push_command(&mut self, command: PnrCommand) -> Result<()> {
        if self.command(command.id()).is_some() {
            return Err(PnrError::DuplicateCommandId(command.id().clone()));
        }
        self.commands.push(command);
        Ok(())
    }

    /// Replaces a command's text and variables, keeping its position.
    pub fn update_command(
        &mut self,
        id: &CommandId,
        text: &str,
        variable_types: Vec<VariableType>,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        self.commands[index] = PnrCommand::new(id.clone(), text, variable_types)?;
        Ok(())
    }

    pub fn delete_command(&mut self, id: &CommandId) -> Result<PnrCommand> {
        let index = self.index_of(id)?;
        Ok(self.commands.remove(index))
    }

    /// Swaps a command with its neighbour. Returns `false` when the command
    /// is already at that end of the sequence.
    pub fn move_command(&mut self, id: &CommandId, direction: Direction) -> Result<bool> {
        let index = self.index_of(id)?;
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.commands.len() => index + 1,
            _ => return Ok(false),
        };
        self.commands.swap(index, target);
        Ok(true)
    }

    fn index_of(&self, id: &CommandId) -> Result<usize> {
        self.commands
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| PnrError::UnknownCommand(id.clone()))
    }
}

// ============================================================================
// Wire form
// ============================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupRepr {
    id: GroupId,
    pcc_ids: Vec<Pcc>,
    #[serde(default)]
    commands: Vec<CommandRepr>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandRepr {
    id: CommandId,
    command: String,
    #[serde(default)]
    has_variables: bool,
    #[serde(default)]
    variable_types: Vec<VariableType>,
    #[serde(default)]
    order: usize,
}

impl TryFrom<GroupRepr> for PccCommandGroup {
    type Error = PnrError;

    fn try_from(repr: GroupRepr) -> Result<Self> {
        let mut group = Self::new(repr.id, repr.pcc_ids)?;

        // Stored order wins over array position
        let mut commands = repr.commands;
        commands.sort_by_key(|c| c.order);
        for c in commands {
            group.push_command(PnrCommand::new(c.id, &c.command, c.variable_types)?)?;
        }
        Ok(group)
    }
}

impl From<PccCommandGroup> for GroupRepr {
    fn from(group: PccCommandGroup) -> Self {
        let commands = group
            .ordered()
            .map(|(order, c)| CommandRepr {
                id: c.id().clone(),
                command: c.text().to_string(),
                has_variables: c.has_variables(),
                variable_types: c.variable_types().to_vec(),
                order,
            })
            .collect();
        Self {
            id: group.id,
            pcc_ids: group.pccs,
            commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn pcc(code: &str) -> Pcc {
        Pcc::new(code).unwrap()
    }

    fn group_with_commands(texts: &[&str]) -> PccCommandGroup {
        let mut group = PccCommandGroup::new(GroupId::new(1), vec![pcc("U9XF")]).unwrap();
        for (i, text) in texts.iter().enumerate() {
            let id = CommandId::new(i as u64 + 1);
            group.push_command(PnrCommand::new(id, text, vec![]).unwrap()).unwrap();
        }
        group
    }

    fn texts(group: &PccCommandGroup) -> Vec<&str> {
        group.commands().iter().map(PnrCommand::text).collect()
    }

    #[test_case(" u9-xf " => "U9XF" ; "strips separators")]
    #[test_case("kh6g99" => "KH6G" ; "truncates")]
    #[test_case("2g*ac" => "2GAC" ; "drops wildcard")]
    fn test_parse_pcc_input(raw: &str) -> String {
        parse_pcc_input(raw).unwrap().to_string()
    }

    #[test]
    fn test_parse_pcc_input_rejects_short() {
        assert!(parse_pcc_input("U9").is_err());
        assert!(parse_pcc_input("*").is_err());
    }

    #[test]
    fn test_new_group_validation() {
        assert!(matches!(
            PccCommandGroup::new(GroupId::new(1), vec![]),
            Err(PnrError::EmptyGroup)
        ));
        assert!(matches!(
            PccCommandGroup::new(GroupId::new(1), vec![pcc("U9XF"), pcc("U9XF")]),
            Err(PnrError::DuplicatePcc(_))
        ));
    }

    #[test]
    fn test_pcc_membership() {
        let mut group = PccCommandGroup::new(GroupId::new(1), vec![pcc("UE07")]).unwrap();
        group.add_pcc(pcc("KH6G")).unwrap();
        assert!(matches!(group.add_pcc(pcc("KH6G")), Err(PnrError::DuplicatePcc(_))));

        group.remove_pcc(&pcc("UE07")).unwrap();
        assert!(matches!(group.remove_pcc(&pcc("KH6G")), Err(PnrError::LastPcc)));
        assert!(matches!(
            group.remove_pcc(&pcc("2GAC")),
            Err(PnrError::PccNotInGroup(_))
        ));
        assert_eq!(group.pccs(), &[pcc("KH6G")]);
    }

    #[test]
    fn test_move_command() {
        let mut group = group_with_commands(&["DK370042", "7TAW/", "ER"]);

        assert!(group.move_command(&CommandId::new(3), Direction::Up).unwrap());
        assert_eq!(texts(&group), vec!["DK370042", "ER", "7TAW/"]);

        // Boundaries are no-ops
        assert!(!group.move_command(&CommandId::new(1), Direction::Up).unwrap());
        assert!(!group.move_command(&CommandId::new(2), Direction::Down).unwrap());
        assert_eq!(texts(&group), vec!["DK370042", "ER", "7TAW/"]);

        assert!(matches!(
            group.move_command(&CommandId::new(9), Direction::Down),
            Err(PnrError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_update_and_delete_command() {
        let mut group = group_with_commands(&["6<>", "ER"]);
        group
            .update_command(&CommandId::new(2), "7TAC/<>", vec![VariableType::Date2])
            .unwrap();
        assert_eq!(group.commands()[1].variable_types(), &[VariableType::Date2]);

        group.update_command(&CommandId::new(2), "ER", vec![VariableType::Date2]).unwrap();
        assert!(group.commands()[1].variable_types().is_empty());

        let removed = group.delete_command(&CommandId::new(1)).unwrap();
        assert_eq!(removed.text(), "6<>");
        let orders: Vec<usize> = group.ordered().map(|(o, _)| o).collect();
        assert_eq!(orders, vec![1]);
    }

    #[test]
    fn test_wire_form_recomputes_order_and_flags() {
        let json = r#"{
            "id": 2,
            "pccIds": ["UE07", "KH6G"],
            "commands": [
                { "id": 21, "command": "7TAW/", "hasVariables": true, "variableTypes": [], "order": 2 },
                { "id": 20, "command": "DK370042", "hasVariables": false, "variableTypes": [], "order": 1 },
                { "id": 27, "command": "6<>", "hasVariables": false, "variableTypes": [1], "order": 8 }
            ]
        }"#;

        let group: PccCommandGroup = serde_json::from_str(json).unwrap();
        assert_eq!(texts(&group), vec!["DK370042", "7TAW/", "6<>"]);

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["pccIds"], serde_json::json!(["UE07", "KH6G"]));
        assert_eq!(value["commands"][1]["hasVariables"], false);
        assert_eq!(value["commands"][2]["hasVariables"], true);
        assert_eq!(value["commands"][2]["order"], 3);
        assert_eq!(value["commands"][2]["variableTypes"], serde_json::json!([1]));
    }

    #[test]
    fn test_wire_form_keeps_admin_ui_ids() {
        let json = r#"{
            "id": "grp-1",
            "pccIds": ["U9XF"],
            "commands": [
                { "id": "cmd-2", "command": "ER", "variableTypes": [], "order": 2 },
                { "id": "cmd-1", "command": "6<>", "variableTypes": [1], "order": 1 }
            ]
        }"#;

        let mut group: PccCommandGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.id(), &GroupId::new("grp-1"));
        assert!(group.move_command(&CommandId::new("cmd-2"), Direction::Up).unwrap());
        assert_eq!(texts(&group), vec!["ER", "6<>"]);

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["id"], "grp-1");
        assert_eq!(value["commands"][0]["id"], "cmd-2");
    }

    #[test]
    fn test_wire_form_rejects_empty_pcc_list() {
        let json = r#"{ "id": 1, "pccIds": [], "commands": [] }"#;
        assert!(serde_json::from_str::<PccCommandGroup>(json).is_err());
    }
}
