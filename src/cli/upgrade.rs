//! Plan and upgrade commands

use crate::upgrade::{create_migration_plan, upgrade_project, MigrationStep, UpgradeOptions};
use anyhow::Result;
use console::style;
use std::path::Path;

pub fn run_plan(path: &Path, from_tool: Option<&str>, format: &str) -> Result<()> {
    let steps = create_migration_plan(path, from_tool);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    if steps.is_empty() {
        println!(
            "\n{} Nothing to migrate - project may already use modern tooling\n",
            style("✓").green()
        );
        return Ok(());
    }

    println!(
        "\n{} Migration plan for {}\n",
        style("🛠").bold(),
        style(path.display()).cyan()
    );
    for (index, step) in steps.iter().enumerate() {
        render_step(index + 1, step);
    }
    println!(
        "\nRun {} to apply, or {} to preview the changes.\n",
        style("pyforge upgrade").cyan(),
        style("pyforge upgrade --dry-run").cyan()
    );
    Ok(())
}

fn render_step(number: usize, step: &MigrationStep) {
    println!(
        "  {}. {} {} {}",
        number,
        style(&step.source).yellow(),
        style("→").dim(),
        style(&step.target).green()
    );
    println!("     {}", step.description);
    for file in &step.files_affected {
        println!("     {} {}", style("~").dim(), style(file.display()).dim());
    }
    if !step.reversible {
        println!("     {}", style("! not reversible").red());
    }
}

pub fn run_upgrade(
    path: &Path,
    from_tool: Option<String>,
    dry_run: bool,
    no_backup: bool,
    format: &str,
) -> Result<()> {
    let opts = UpgradeOptions {
        from_tool,
        dry_run,
        backup: !no_backup,
    };
    let result = upgrade_project(path, &opts);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        if result.success {
            return Ok(());
        }
        std::process::exit(1);
    }

    if dry_run {
        println!(
            "\n{} Dry run - no files were modified\n",
            style("ℹ").cyan()
        );
    } else {
        println!();
    }

    for change in &result.changes_made {
        println!("  {} {}", style("✓").green(), change);
    }
    for error in &result.errors {
        println!("  {} {}", style("✗").red(), style(error).red());
    }

    if result.success {
        println!("\n{} Upgrade complete\n", style("✓").green().bold());
        Ok(())
    } else {
        println!(
            "\n{} Upgrade finished with {} error(s)\n",
            style("✗").red().bold(),
            result.errors.len()
        );
        std::process::exit(1);
    }
}
