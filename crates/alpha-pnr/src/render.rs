//! Placeholder substitution.
//!
//! Each `<>` in a command is replaced, left to right, by the value of the
//! command's variable type at the same position. Dates render in the GDS
//! `DDMMM` form (`15MAR`).

use alpha_types::Pcc;
use chrono::{Datelike, Days, NaiveDate};

use crate::command::{PLACEHOLDER, PnrCommand, VariableType};
use crate::config::PnrToolConfig;
use crate::error::{PnrError, Result};
use crate::group::PccCommandGroup;

/// Days between the local date and the default ticketing time limit.
pub const DATE2_OFFSET_DAYS: u64 = 2;

/// Runtime values for the placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variables {
    pub agent: String,
    pub date1: NaiveDate,
    pub date2: NaiveDate,
}

impl Variables {
    /// `Date2` defaults to `today` plus [`DATE2_OFFSET_DAYS`].
    pub fn new(agent: impl Into<String>, date1: NaiveDate, today: NaiveDate) -> Self {
        Self {
            agent: agent.into(),
            date1,
            date2: today
                .checked_add_days(Days::new(DATE2_OFFSET_DAYS))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn with_date2(mut self, date2: NaiveDate) -> Self {
        self.date2 = date2;
        self
    }

    pub fn value(&self, variable: VariableType) -> String {
        match variable {
            VariableType::Agent => self.agent.clone(),
            VariableType::Date1 => format_gds_date(self.date1),
            VariableType::Date2 => format_gds_date(self.date2),
        }
    }
}

/// `2025-03-15` becomes `15MAR`.
pub fn format_gds_date(date: NaiveDate) -> String {
    date.format("%d%b").to_string().to_uppercase()
}

/// Parses `DDMMM` (next occurrence on or after `today`) or `YYYY-MM-DD`.
pub fn parse_gds_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    let invalid = || PnrError::InvalidDate(input.to_string());
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2..].iter().all(u8::is_ascii_alphabetic);
    if !well_formed {
        return Err(invalid());
    }
    // Leap years can be eight years apart, so 29FEB needs the wider window
    (today.year()..=today.year() + 8)
        .filter_map(|year| NaiveDate::parse_from_str(&format!("{input}{year}"), "%d%b%Y").ok())
        .find(|date| *date >= today)
        .ok_or_else(invalid)
}

/// Substitutes the placeholders of one command.
pub fn render_command(command: &PnrCommand, vars: &Variables) -> Result<String> {
    let placeholders = command.placeholder_count();
    let variables = command.variable_types().len();
    if placeholders != variables {
        return Err(PnrError::PlaceholderMismatch {
            command: command.text().to_string(),
            placeholders,
            variables,
        });
    }

    let mut rendered = String::with_capacity(command.text().len());
    let mut values = command.variable_types().iter().map(|v| vars.value(*v));
    let mut pieces = command.text().split(PLACEHOLDER);
    if let Some(first) = pieces.next() {
        rendered.push_str(first);
    }
    for piece in pieces {
        if let Some(value) = values.next() {
            rendered.push_str(&value);
        }
        rendered.push_str(piece);
    }
    Ok(rendered)
}

/// Renders a group's sequence in execution order.
pub fn render_group(group: &PccCommandGroup, vars: &Variables) -> Result<Vec<String>> {
    group
        .commands()
        .iter()
        .map(|c| render_command(c, vars))
        .collect()
}

/// Renders the sequence configured for `pcc`.
pub fn render_for_pcc(config: &PnrToolConfig, pcc: &Pcc, vars: &Variables) -> Result<Vec<String>> {
    let group = config
        .group_for(pcc)
        .ok_or_else(|| PnrError::NoGroupForPcc(pcc.clone()))?;
    render_group(group, vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_types::CommandId;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vars() -> Variables {
        Variables::new("JOHNSMITH", date(2025, 3, 15), date(2025, 3, 15))
    }

    fn command(text: &str, variable_types: Vec<VariableType>) -> PnrCommand {
        PnrCommand::new(CommandId::new(1), text, variable_types).unwrap()
    }

    #[test_case(date(2025, 3, 15) => "15MAR" ; "march")]
    #[test_case(date(2025, 1, 5) => "05JAN" ; "zero padded")]
    #[test_case(date(2024, 12, 31) => "31DEC" ; "year end")]
    fn test_format_gds_date(d: NaiveDate) -> String {
        format_gds_date(d)
    }

    #[test]
    fn test_date2_defaults_two_days_out() {
        let v = Variables::new("A", date(2025, 2, 27), date(2025, 2, 27));
        assert_eq!(v.date2, date(2025, 3, 1));
        assert_eq!(v.value(VariableType::Date2), "01MAR");
    }

    #[test]
    fn test_render_examples() {
        let v = vars();
        assert_eq!(
            render_command(&command("6<>", vec![VariableType::Agent]), &v).unwrap(),
            "6JOHNSMITH"
        );
        assert_eq!(
            render_command(
                &command("0OTHYYGK1MIA<>-KEEP PNR ACTIVE", vec![VariableType::Date1]),
                &v
            )
            .unwrap(),
            "0OTHYYGK1MIA15MAR-KEEP PNR ACTIVE"
        );
        assert_eq!(
            render_command(&command("7TAC/<>", vec![VariableType::Date2]), &v).unwrap(),
            "7TAC/17MAR"
        );
        assert_eq!(render_command(&command("ER", vec![]), &v).unwrap(), "ER");
    }

    #[test]
    fn test_multiple_placeholders_left_to_right() {
        let cmd = command("<>/<>", vec![VariableType::Date2, VariableType::Agent]);
        assert_eq!(render_command(&cmd, &vars()).unwrap(), "17MAR/JOHNSMITH");
    }

    #[test]
    fn test_placeholder_mismatch() {
        let cmd = command("<>/<>", vec![VariableType::Agent]);
        assert!(matches!(
            render_command(&cmd, &vars()),
            Err(PnrError::PlaceholderMismatch {
                placeholders: 2,
                variables: 1,
                ..
            })
        ));

        let cmd = command("6<>", vec![VariableType::Agent, VariableType::Date1]);
        assert!(matches!(
            render_command(&cmd, &vars()),
            Err(PnrError::PlaceholderMismatch {
                placeholders: 1,
                variables: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_gds_date() {
        let today = date(2025, 11, 20);
        assert_eq!(parse_gds_date("25nov", today).unwrap(), date(2025, 11, 25));
        // Past day-month rolls into next year
        assert_eq!(parse_gds_date("15MAR", today).unwrap(), date(2026, 3, 15));
        assert_eq!(parse_gds_date("2025-03-15", today).unwrap(), date(2025, 3, 15));
        assert!(parse_gds_date("32JAN", today).is_err());
        assert!(parse_gds_date("MARCH", today).is_err());
    }

    #[test_case("1MAR2" ; "one digit day")]
    #[test_case("123MA" ; "three digit day")]
    #[test_case("1MARS" ; "four letter month")]
    #[test_case("31FEB" ; "impossible day")]
    fn test_parse_gds_date_rejects_malformed(input: &str) {
        assert!(parse_gds_date(input, date(2025, 3, 1)).is_err());
    }

    #[test]
    fn test_parse_gds_date_finds_next_leap_day() {
        assert_eq!(parse_gds_date("29FEB", date(2025, 3, 1)).unwrap(), date(2028, 2, 29));
        assert_eq!(parse_gds_date("29FEB", date(2024, 2, 1)).unwrap(), date(2024, 2, 29));
        // 2100 is not a leap year
        assert_eq!(parse_gds_date("29FEB", date(2097, 1, 1)).unwrap(), date(2104, 2, 29));
    }

    #[test]
    fn test_render_for_pcc() {
        let mut config = PnrToolConfig::new();
        let pcc = Pcc::new("U9XF").unwrap();
        let group = config.add_group(vec![pcc.clone()]).unwrap();
        config.add_command(&group, "DK0010020012", vec![]).unwrap();
        config.add_command(&group, "6<>", vec![VariableType::Agent]).unwrap();
        config.add_command(&group, "ER", vec![]).unwrap();

        let lines = render_for_pcc(&config, &pcc, &vars()).unwrap();
        assert_eq!(lines, vec!["DK0010020012", "6JOHNSMITH", "ER"]);

        let other = Pcc::new("KH6G").unwrap();
        assert!(matches!(
            render_for_pcc(&config, &other, &vars()),
            Err(PnrError::NoGroupForPcc(_))
        ));
    }
}
