//! Permission check command.

use std::path::Path;

use alpha_acl::CommandEnforcer;
use alpha_config::AlphaConfig;
use alpha_types::{Command, ContextKind, Pcc};
use anyhow::{Context, Result, bail};

use super::roles::{find_role, load_catalog};
use crate::style::colors::SemanticStyle;
use crate::style::{print_section, print_spacer};

/// Builds an enforcer for `role` honouring the configured combination and
/// audit setting.
pub fn enforcer_for(config: &AlphaConfig, roles: Option<&Path>, role: &str) -> Result<CommandEnforcer> {
    let catalog = load_catalog(config, roles)?;
    let role = find_role(&catalog, role)?.clone();

    let enforcer = CommandEnforcer::new(role)
        .with_combination(config.access_control.context_combination);
    Ok(if config.access_control.audit {
        enforcer
    } else {
        enforcer.without_audit()
    })
}

pub fn parse_pcc(raw: &str) -> Result<Pcc> {
    Pcc::new(Pcc::normalize_input(raw)).with_context(|| format!("Invalid PCC '{raw}'"))
}

/// Prints one decision per command; fails when any command is denied.
pub fn run(
    config: &AlphaConfig,
    roles: Option<&Path>,
    role: &str,
    pcc: &str,
    context: &str,
    commands: &[String],
) -> Result<()> {
    let enforcer = enforcer_for(config, roles, role)?;
    let pcc = parse_pcc(pcc)?;
    let context: ContextKind = context
        .parse()
        .with_context(|| format!("Invalid context '{context}' (expected any, pnr, ticketed-pnr)"))?;

    print_section(&format!(
        "{} at {} in {} ({})",
        enforcer.role().name,
        pcc,
        context.label(),
        enforcer.combination()
    ));
    print_spacer();

    let mut checked = 0usize;
    let mut denied = 0usize;
    // Entries are stored uppercase; match that before evaluating
    for command in commands.iter().filter_map(|raw| Command::from_input(raw)) {
        checked += 1;
        let decision = enforcer.decide(&pcc, context, command.as_str());
        let padded = format!("{:<16}", command.as_str());
        if decision.is_allowed() {
            println!("{} {}  {}", "✓ ALLOWED".success(), padded.code(), decision.reason.muted());
        } else {
            denied += 1;
            println!("{} {}  {}", "✗ DENIED ".error(), padded.code(), decision.reason.muted());
        }
    }

    if checked == 0 {
        bail!("No commands to check");
    }
    if denied > 0 {
        bail!("{denied} of {checked} command(s) denied for role '{}'", enforcer.role().name);
    }
    Ok(())
}
