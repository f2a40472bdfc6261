//! Audit command - score a project and print its recommendations

use crate::audit::audit_project;
use crate::models::{AuditResult, Recommendation, Severity};
use anyhow::Result;
use console::style;
use std::path::Path;

pub fn run(path: &Path, format: &str, min_severity: Option<&str>) -> Result<()> {
    let min_severity = min_severity
        .map(str::parse::<Severity>)
        .transpose()?
        .unwrap_or(Severity::Info);

    let mut result = audit_project(path)?;
    // Display filter only; the score already includes every finding.
    result
        .recommendations
        .retain(|rec| rec.severity >= min_severity);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => render_text(&result),
    }
    Ok(())
}

fn render_text(result: &AuditResult) {
    println!(
        "\n{} Audit of {}\n",
        style("🔎").bold(),
        style(result.project_path.display()).cyan()
    );

    let score = result.score;
    let score_display = if score >= 80 {
        style(format!("{score}/100")).green().bold()
    } else if score >= 50 {
        style(format!("{score}/100")).yellow().bold()
    } else {
        style(format!("{score}/100")).red().bold()
    };
    println!("  Health score: {score_display}");

    if !result.tooling_detected.is_empty() {
        println!("\n  Detected tooling:");
        for (category, tool) in &result.tooling_detected {
            println!("    {:<16} {}", format!("{category}:"), style(tool).cyan());
        }
    }

    if result.recommendations.is_empty() {
        println!("\n  {} Nothing to recommend\n", style("✓").green());
        return;
    }

    // Most severe first; generation order breaks ties.
    let mut recommendations: Vec<&Recommendation> = result.recommendations.iter().collect();
    recommendations.sort_by(|a, b| b.severity.cmp(&a.severity));

    println!("\n  Recommendations:");
    for rec in &recommendations {
        println!("    {} {}", severity_badge(rec.severity), rec.message);
        if let Some(action) = &rec.action {
            println!("        {} {}", style("run:").dim(), style(action).dim());
        }
    }

    println!(
        "\n  {} critical, {} error, {} warning, {} info\n",
        result.critical_count(),
        result.error_count(),
        result.warning_count(),
        result.info_count()
    );
}

fn severity_badge(severity: Severity) -> console::StyledObject<&'static str> {
    match severity {
        Severity::Critical => style("CRITICAL").red().bold(),
        Severity::Error => style("ERROR   ").red(),
        Severity::Warning => style("WARNING ").yellow(),
        Severity::Info => style("INFO    ").cyan(),
    }
}
