//! Alpha admin CLI.
//!
//! Checks GDS terminal commands against role permissions and renders the
//! PNR tool command sequences configured per PCC.
//!
//! # Quick Start
//!
//! ```bash
//! # Which of these may a Basic agent run at U9XF?
//! alpha check --role basic --pcc U9XF '*R' WC 0OTHYYGK1
//!
//! # Inspect the role catalog
//! alpha roles list
//! alpha roles show advanced
//!
//! # Expand a company's PNR tool sequence
//! alpha pnr render --file pnr.json --pcc U9XF --agent JOHNSMITH --date1 15MAR
//! ```

mod commands;
mod style;

use std::path::{Path, PathBuf};

use alpha_config::{AlphaConfig, ConfigLoader};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Alpha - GDS command permissions and PNR tool sequences.
#[derive(Parser)]
#[command(name = "alpha")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding alpha.toml.
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Check whether a role may issue commands at a PCC.
    Check {
        /// Role name (case-insensitive).
        #[arg(short, long)]
        role: String,

        /// Pseudo City Code the agent is signed into.
        #[arg(short, long)]
        pcc: String,

        /// Booking context (any, pnr, ticketed-pnr).
        #[arg(short, long, default_value = "any")]
        context: String,

        /// Role catalog file (.json or .toml); overrides the configured one.
        #[arg(long)]
        roles: Option<PathBuf>,

        /// Commands to check.
        #[arg(required = true)]
        commands: Vec<String>,
    },

    /// Role catalog commands.
    #[command(subcommand)]
    Roles(RolesCommands),

    /// PNR tool commands.
    #[command(subcommand)]
    Pnr(PnrCommands),

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum RolesCommands {
    /// List all roles.
    List {
        /// Role catalog file (.json or .toml).
        #[arg(long)]
        roles: Option<PathBuf>,
    },

    /// Show a role's rule sets.
    Show {
        /// Role name (case-insensitive).
        name: String,

        /// Role catalog file (.json or .toml).
        #[arg(long)]
        roles: Option<PathBuf>,
    },

    /// Print the role catalog.
    Export {
        /// Output format.
        #[arg(short, long, default_value = "json", value_parser = ["json", "toml"])]
        format: String,

        /// Role catalog file (.json or .toml).
        #[arg(long)]
        roles: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PnrCommands {
    /// List the PCC groups of a PNR tool configuration.
    List {
        /// PNR tool configuration (.json or .toml).
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Render the command sequence for a PCC.
    Render {
        /// PNR tool configuration (.json or .toml).
        #[arg(short, long)]
        file: PathBuf,

        /// Pseudo City Code.
        #[arg(short, long)]
        pcc: String,

        /// Agent signature.
        #[arg(short, long)]
        agent: String,

        /// Date1 as DDMMM or YYYY-MM-DD.
        #[arg(long)]
        date1: String,

        /// Date2 as DDMMM or YYYY-MM-DD (default: today + 2 days).
        #[arg(long)]
        date2: Option<String>,

        /// Local date as YYYY-MM-DD (default: system date).
        #[arg(long)]
        today: Option<String>,

        /// Fail unless this role may issue every rendered command in a PNR.
        #[arg(long)]
        role: Option<String>,

        /// Role catalog file used with --role.
        #[arg(long)]
        roles: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the merged configuration.
    Show {
        /// Output format.
        #[arg(short, long, default_value = "text", value_parser = ["text", "json", "toml"])]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Check {
            role,
            pcc,
            context,
            roles,
            commands: to_check,
        } => {
            let config = load_config(&cli.project)?;
            commands::check::run(&config, roles.as_deref(), &role, &pcc, &context, &to_check)
        }
        Commands::Roles(cmd) => {
            let config = load_config(&cli.project)?;
            match cmd {
                RolesCommands::List { roles } => commands::roles::list(&config, roles.as_deref()),
                RolesCommands::Show { name, roles } => {
                    commands::roles::show(&config, roles.as_deref(), &name)
                }
                RolesCommands::Export { format, roles } => {
                    commands::roles::export(&config, roles.as_deref(), &format)
                }
            }
        }
        Commands::Pnr(cmd) => {
            let config = load_config(&cli.project)?;
            match cmd {
                PnrCommands::List { file } => commands::pnr::list(&file),
                PnrCommands::Render {
                    file,
                    pcc,
                    agent,
                    date1,
                    date2,
                    today,
                    role,
                    roles,
                } => commands::pnr::render(
                    &config,
                    &commands::pnr::RenderArgs {
                        file: &file,
                        pcc: &pcc,
                        agent: &agent,
                        date1: &date1,
                        date2: date2.as_deref(),
                        today: today.as_deref(),
                        role: role.as_deref(),
                        roles: roles.as_deref(),
                    },
                ),
            }
        }
        Commands::Config(ConfigCommands::Show { format }) => {
            let config = load_config(&cli.project)?;
            commands::config::show(&config, &cli.project, &format)
        }
    }
}

/// Loads the merged configuration and installs the tracing subscriber.
fn load_config(project: &Path) -> Result<AlphaConfig> {
    let config = ConfigLoader::new()
        .with_project_dir(project)
        .load()
        .context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(
        project = %project.display(),
        combination = %config.access_control.context_combination,
        "Loaded configuration"
    );
    Ok(config)
}
