//! CLI command definitions and handlers

mod audit;
mod upgrade;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pyforge - audit and modernize Python project tooling
#[derive(Parser, Debug)]
#[command(name = "pyforge")]
#[command(
    version,
    about = "Audit Python projects and migrate them to modern tooling (uv, ruff, basedpyright)",
    after_help = "\
Examples:
  pyforge audit .                      Score the current project's tooling
  pyforge audit . --format json        JSON output for scripting
  pyforge plan . --from poetry         Preview migration steps, no changes
  pyforge upgrade . --dry-run          Show what an upgrade would change
  pyforge upgrade .                    Migrate to uv + ruff + basedpyright"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a project's tooling, CI, and type annotation coverage
    Audit {
        /// Path to the project root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Minimum severity to display (info, warning, error, critical)
        #[arg(long, value_parser = ["info", "warning", "error", "critical"])]
        min_severity: Option<String>,
    },

    /// Preview the migration plan without touching anything
    Plan {
        /// Path to the project root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Source package manager (poetry, pip, pipenv, setuptools); auto-detected when omitted
        #[arg(long = "from")]
        from_tool: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Migrate a project to uv, ruff, and basedpyright
    Upgrade {
        /// Path to the project root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Source package manager; auto-detected when omitted
        #[arg(long = "from")]
        from_tool: Option<String>,

        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the config-file backup
        #[arg(long)]
        no_backup: bool,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Audit {
            path,
            format,
            min_severity,
        } => audit::run(&path, &format, min_severity.as_deref()),

        Commands::Plan {
            path,
            from_tool,
            format,
        } => upgrade::run_plan(&path, from_tool.as_deref(), &format),

        Commands::Upgrade {
            path,
            from_tool,
            dry_run,
            no_backup,
            format,
        } => upgrade::run_upgrade(&path, from_tool, dry_run, no_backup, &format),
    }
}
