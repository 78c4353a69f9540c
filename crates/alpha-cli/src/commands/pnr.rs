//! PNR tool commands.

use std::path::Path;

use alpha_config::AlphaConfig;
use alpha_pnr::{PnrToolConfig, Variables, parse_gds_date, parse_pcc_input, render_for_pcc};
use alpha_types::{Command, ContextKind};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use super::check::enforcer_for;
use crate::style::colors::SemanticStyle;
use crate::style::{print_labeled, print_section, print_spacer, print_table};

fn load(file: &Path) -> Result<PnrToolConfig> {
    PnrToolConfig::load(file)
        .with_context(|| format!("Failed to load PNR config from {}", file.display()))
}

/// List the PCC groups of a configuration.
pub fn list(file: &Path) -> Result<()> {
    let pnr = load(file)?;

    let rows: Vec<Vec<String>> = pnr
        .groups()
        .iter()
        .map(|group| {
            let pccs: Vec<&str> = group.pccs().iter().map(|p| p.as_str()).collect();
            vec![
                group.id().to_string(),
                pccs.join(", "),
                group.commands().len().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "PCCs", "Commands"], &rows, "group");
    Ok(())
}

pub struct RenderArgs<'a> {
    pub file: &'a Path,
    pub pcc: &'a str,
    pub agent: &'a str,
    pub date1: &'a str,
    pub date2: Option<&'a str>,
    pub today: Option<&'a str>,
    pub role: Option<&'a str>,
    pub roles: Option<&'a Path>,
}

/// Render the command sequence for a PCC.
pub fn render(config: &AlphaConfig, args: &RenderArgs<'_>) -> Result<()> {
    let pnr = load(args.file)?;
    let pcc = parse_pcc_input(args.pcc).with_context(|| format!("Invalid PCC '{}'", args.pcc))?;

    let today = match args.today {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid --today '{raw}' (expected YYYY-MM-DD)"))?,
        None => Local::now().date_naive(),
    };
    let date1 = parse_gds_date(args.date1, today)?;
    let mut vars = Variables::new(args.agent.trim(), date1, today);
    if let Some(raw) = args.date2 {
        vars = vars.with_date2(parse_gds_date(raw, today)?);
    }

    let lines = render_for_pcc(&pnr, &pcc, &vars)?;

    if let Some(role) = args.role {
        let enforcer = enforcer_for(config, args.roles, role)?;
        // Sabre takes mixed case; entries are stored uppercase
        let canonical: Vec<Command> = lines.iter().filter_map(|l| Command::from_input(l)).collect();
        enforcer.enforce_all(&pcc, ContextKind::Pnr, canonical.iter().map(Command::as_str))?;
    }

    print_section(&format!("PNR tool sequence for {pcc}"));
    print_labeled("Agent", &vars.agent);
    print_labeled("Date1", &alpha_pnr::format_gds_date(vars.date1));
    print_labeled("Date2", &alpha_pnr::format_gds_date(vars.date2));
    print_spacer();
    for (order, line) in lines.iter().enumerate() {
        println!("{}  {}", format!("{:>3}", order + 1).muted(), line.code());
    }
    Ok(())
}
