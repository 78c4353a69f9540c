//! Role catalog commands.

use std::path::Path;

use alpha_acl::{ContextRules, ListKind, PccRuleSet, Role, RoleCatalog};
use alpha_config::AlphaConfig;
use alpha_types::ContextKind;
use anyhow::{Context, Result};

use crate::style::colors::SemanticStyle;
use crate::style::{print_hint, print_labeled, print_section, print_spacer, print_table, print_warn};

/// Loads the catalog from `--roles`, the configured file, or the
/// standard roles.
pub fn load_catalog(config: &AlphaConfig, roles: Option<&Path>) -> Result<RoleCatalog> {
    match roles.or(config.access_control.roles_file.as_deref()) {
        Some(path) => RoleCatalog::load(path)
            .with_context(|| format!("Failed to load roles from {}", path.display())),
        None => Ok(RoleCatalog::standard()),
    }
}

pub fn find_role<'a>(catalog: &'a RoleCatalog, name: &str) -> Result<&'a Role> {
    catalog.find_by_name(name).with_context(|| {
        let known: Vec<&str> = catalog.iter().map(|r| r.name.as_str()).collect();
        format!("Unknown role '{name}' (known: {})", known.join(", "))
    })
}

/// List all roles.
pub fn list(config: &AlphaConfig, roles: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(config, roles)?;

    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|role| {
            vec![
                role.id.to_string(),
                role.name.clone(),
                role.rule_sets().len().to_string(),
                role.description.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "Name", "Rule sets", "Description"], &rows, "role");

    for (role, warning) in catalog.lint() {
        print_warn(&format!("{role}: {warning}"));
    }
    Ok(())
}

/// Show a role's rule sets.
pub fn show(config: &AlphaConfig, roles: Option<&Path>, name: &str) -> Result<()> {
    let catalog = load_catalog(config, roles)?;
    let role = find_role(&catalog, name)?;

    print_section(&format!("{} (id {})", role.name, role.id));
    if !role.description.is_empty() {
        println!("{}", role.description.muted());
    }
    print_spacer();

    for (index, rule_set) in role.rule_sets().iter().enumerate() {
        print_rule_set(index, rule_set);
    }

    for warning in role.lint() {
        print_warn(&warning.to_string());
    }
    if role.rule_sets().len() > 1 {
        print_hint("The first rule set naming the PCC wins; otherwise the first wildcard set.");
    }
    Ok(())
}

fn print_rule_set(index: usize, rule_set: &PccRuleSet) {
    println!(
        "{} {}",
        format!("Rule set #{} (id {})", index + 1, rule_set.id).header(),
        rule_set.scope.label().code()
    );
    for context in ContextKind::ALL {
        let rules = rule_set.rules(context);
        println!("  {} [{}]", context.label(), rules.mode);
        print_lists(rules);
    }
    print_spacer();
}

fn print_lists(rules: &ContextRules) {
    if rules.has_no_entries() {
        println!("    {}", "(no entries)".muted());
        return;
    }
    for kind in ListKind::ALL {
        let list = rules.list(kind);
        if list.is_empty() {
            continue;
        }
        let entries: Vec<&str> = list.iter().map(|c| c.as_str()).collect();
        print_labeled(&format!("  {}", kind.label()), &entries.join(" "));
    }
}

/// Print the role catalog as JSON or TOML.
pub fn export(config: &AlphaConfig, roles: Option<&Path>, format: &str) -> Result<()> {
    let catalog = load_catalog(config, roles)?;
    let out = match format {
        "toml" => catalog.to_toml_string()?,
        _ => catalog.to_json_string()?,
    };
    println!("{out}");
    Ok(())
}
