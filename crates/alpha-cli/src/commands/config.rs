//! Configuration management commands.

use std::path::Path;

use alpha_config::{AlphaConfig, Paths};
use anyhow::Result;

use crate::style::{print_hint, print_labeled, print_section, print_spacer};

/// Show the merged configuration.
pub fn show(config: &AlphaConfig, project: &Path, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(config)?),
        "toml" => println!("{}", toml::to_string_pretty(config)?),
        _ => {
            let limits = config.session_limits()?;

            print_section("Alpha Configuration");
            print_spacer();

            print_section("Project:");
            print_labeled("Name", &config.project.name);
            print_spacer();

            print_section("Access control:");
            print_labeled(
                "Roles file",
                &config
                    .access_control
                    .roles_file
                    .as_ref()
                    .map_or("(standard roles)".to_string(), |p| p.display().to_string()),
            );
            print_labeled(
                "Context combination",
                &config.access_control.context_combination.to_string(),
            );
            print_labeled("Audit", &config.access_control.audit.to_string());
            print_spacer();

            print_section("Sessions:");
            print_labeled("Max per user", &limits.per_user().to_string());
            print_labeled("Max per company", &limits.per_company().to_string());
            print_spacer();

            print_section("Logging:");
            print_labeled("Level", &config.logging.level);

            if !Paths::project_config_file(project).exists() {
                print_spacer();
                print_hint(&format!(
                    "No alpha.toml in {}; showing defaults and overrides",
                    project.display()
                ));
            }
        }
    }
    Ok(())
}
