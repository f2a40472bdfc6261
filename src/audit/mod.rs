//! Project audit: detector fan-out, recommendation engine, health score
//!
//! The audit is a pure read path. Detectors run once, their outputs feed a
//! deterministic recommendation table, and the recommendations reduce to an
//! additive penalty score. Recommendation order is generation order; the
//! score is a sum, so reordering cannot change it.

use crate::detectors::{
    self,
    type_coverage::{self, TypeCoverage},
    Detection,
};
use crate::errors::AuditError;
use crate::models::{AuditCategory, AuditResult, Recommendation, Severity};
use std::path::Path;
use tracing::debug;

/// Audit a Python project for modernization opportunities.
///
/// Always returns a result for a valid directory; the absence of tooling
/// is a finding, not an error.
pub fn audit_project(path: &Path) -> Result<AuditResult, AuditError> {
    if !path.exists() {
        return Err(AuditError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(AuditError::NotADirectory(path.to_path_buf()));
    }
    let path = path.canonicalize()?;

    let pkg_manager = detectors::package_manager::detect(&path);
    let linter = detectors::linter::detect(&path);
    let formatter = detectors::formatter::detect(&path);
    let import_sorter = detectors::import_sorter::detect(&path);
    let type_checker = detectors::type_checker::detect(&path);
    let has_pre_commit = detectors::ci::detect_pre_commit(&path);
    let ci_system = detectors::ci::detect(&path);
    let coverage = type_coverage::analyze(&path);

    let mut result = AuditResult::new(path);
    record_tool(&mut result, "package_manager", &pkg_manager);
    record_tool(&mut result, "linter", &linter);
    record_tool(&mut result, "formatter", &formatter);
    record_tool(&mut result, "import_sorter", &import_sorter);
    record_tool(&mut result, "type_checker", &type_checker);
    if has_pre_commit {
        result
            .tooling_detected
            .insert("pre_commit".to_string(), "configured".to_string());
    }
    record_tool(&mut result, "ci", &ci_system);
    result.tooling_detected.insert(
        "type_coverage".to_string(),
        format!("{:.0}%", coverage.percent),
    );

    // Already on the modern stack: skip recommendation generation entirely.
    // This intentionally suppresses type-coverage findings as well.
    let is_modern = pkg_manager.tool_is("uv")
        && linter.tool_is("ruff")
        && (type_checker.tool_is("basedpyright") || type_checker.tool_is("pyright"))
        && has_pre_commit;

    if is_modern {
        result
            .tooling_detected
            .insert("status".to_string(), "modern".to_string());
    } else {
        tooling_recommendations(
            &mut result,
            pkg_manager.tool.as_deref(),
            linter.tool.as_deref(),
            formatter.tool.as_deref(),
            import_sorter.tool.as_deref(),
            type_checker.tool.as_deref(),
            has_pre_commit,
            ci_system.tool.as_deref(),
        );
        coverage_recommendations(&mut result, &coverage);
    }

    result.score = calculate_score(&result.recommendations);
    debug!(
        score = result.score,
        recommendations = result.recommendations.len(),
        "audit complete"
    );
    Ok(result)
}

fn record_tool(result: &mut AuditResult, category: &str, detection: &Detection) {
    if let Some(tool) = &detection.tool {
        result
            .tooling_detected
            .insert(category.to_string(), tool.clone());
    }
}

/// Fixed recommendation table: each legacy tool maps to exactly one
/// recommendation at a fixed severity.
#[allow(clippy::too_many_arguments)]
fn tooling_recommendations(
    result: &mut AuditResult,
    pkg_manager: Option<&str>,
    linter: Option<&str>,
    formatter: Option<&str>,
    import_sorter: Option<&str>,
    type_checker: Option<&str>,
    has_pre_commit: bool,
    ci_system: Option<&str>,
) {
    let recs = &mut result.recommendations;

    match pkg_manager {
        Some("poetry") => recs.push(
            Recommendation::new(
                AuditCategory::Tooling,
                Severity::Info,
                "Consider migrating from Poetry to uv for faster dependency resolution",
            )
            .with_action("pyforge upgrade . --from poetry"),
        ),
        Some("pip") => recs.push(
            Recommendation::new(
                AuditCategory::Tooling,
                Severity::Info,
                "Consider migrating from pip/requirements.txt to uv with pyproject.toml",
            )
            .with_action("pyforge upgrade . --from pip"),
        ),
        Some("pipenv") => recs.push(
            Recommendation::new(
                AuditCategory::Tooling,
                Severity::Info,
                "Consider migrating from Pipenv to uv for better performance",
            )
            .with_action("pyforge upgrade . --from pipenv"),
        ),
        Some("setuptools") => recs.push(
            Recommendation::new(
                AuditCategory::Tooling,
                Severity::Warning,
                "Consider migrating from setup.py to pyproject.toml (PEP 621)",
            )
            .with_action("pyforge upgrade . --from setuptools"),
        ),
        None => recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Warning,
            "No package manager detected. Consider adding a pyproject.toml",
        )),
        Some(_) => {}
    }

    match linter {
        Some("flake8") => recs.push(
            Recommendation::new(
                AuditCategory::Tooling,
                Severity::Info,
                "Consider migrating from flake8 to ruff for better performance",
            )
            .with_action("pyforge upgrade . (will migrate flake8 to ruff)"),
        ),
        Some("pylint") => recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Info,
            "Consider migrating from pylint to ruff for better performance",
        )),
        None if formatter != Some("ruff") => recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Warning,
            "No linter detected. Consider adding ruff for code quality",
        )),
        _ => {}
    }

    match formatter {
        Some("black") => recs.push(
            Recommendation::new(
                AuditCategory::Tooling,
                Severity::Info,
                "Consider migrating from black to ruff format for better performance",
            )
            .with_action("pyforge upgrade . (will migrate black to ruff)"),
        ),
        Some("autopep8") => recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Info,
            "Consider migrating from autopep8 to ruff format",
        )),
        Some("yapf") => recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Info,
            "Consider migrating from yapf to ruff format",
        )),
        _ => {}
    }

    if import_sorter == Some("isort") {
        recs.push(
            Recommendation::new(
                AuditCategory::Tooling,
                Severity::Info,
                "Consider migrating from isort to ruff (handles import sorting)",
            )
            .with_action("pyforge upgrade . (will migrate isort to ruff)"),
        );
    }

    match type_checker {
        Some("mypy") => recs.push(
            Recommendation::new(
                AuditCategory::Tooling,
                Severity::Info,
                "Consider migrating from mypy to basedpyright for stricter checking",
            )
            .with_action("pyforge upgrade . (will migrate mypy to basedpyright)"),
        ),
        Some("pytype") => recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Info,
            "Consider migrating from pytype to basedpyright",
        )),
        None => recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Warning,
            "No type checker detected. Consider adding basedpyright",
        )),
        Some(_) => {}
    }

    if !has_pre_commit {
        recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Info,
            "No pre-commit hooks detected. Consider adding pre-commit",
        ));
    }

    if ci_system.is_none() {
        recs.push(Recommendation::new(
            AuditCategory::Tooling,
            Severity::Info,
            "No CI/CD configuration detected. Consider adding GitHub Actions",
        ));
    }
}

/// Coverage thresholds: <25% warning, <50% info, <80% info, else nothing.
/// A tree with zero functions emits nothing.
fn coverage_recommendations(result: &mut AuditResult, coverage: &TypeCoverage) {
    if coverage.total == 0 {
        return;
    }

    let rec = if coverage.percent < 25.0 {
        Some((
            Severity::Warning,
            format!(
                "Low type annotation coverage ({:.0}%). Only {}/{} functions have type hints",
                coverage.percent, coverage.annotated, coverage.total
            ),
        ))
    } else if coverage.percent < 50.0 {
        Some((
            Severity::Info,
            format!(
                "Moderate type annotation coverage ({:.0}%). {}/{} functions have type hints",
                coverage.percent, coverage.annotated, coverage.total
            ),
        ))
    } else if coverage.percent < 80.0 {
        Some((
            Severity::Info,
            format!(
                "Good type annotation coverage ({:.0}%). Consider improving to 80%+",
                coverage.percent
            ),
        ))
    } else {
        None
    };

    if let Some((severity, message)) = rec {
        result
            .recommendations
            .push(Recommendation::new(AuditCategory::CodeQuality, severity, message));
    }
}

/// Additive penalty score, clamped to 0..=100. Commutative over the
/// recommendation list.
pub fn calculate_score(recommendations: &[Recommendation]) -> u32 {
    let penalty: u32 = recommendations.iter().map(|r| r.severity.penalty()).sum();
    100u32.saturating_sub(penalty)
}
