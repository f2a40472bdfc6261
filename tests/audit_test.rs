//! End-to-end audit behavior against realistic project trees

use pyforge::audit::audit_project;
use pyforge::errors::AuditError;
use pyforge::models::Severity;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

/// Poetry + black + flake8 + mypy, no hooks, no CI, nothing annotated.
fn legacy_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "pyproject.toml",
        "[tool.poetry]\nname = \"legacy\"\n\n[tool.black]\nline-length = 100\n\n[tool.mypy]\nstrict = true\n",
    );
    write(dir.path(), ".flake8", "[flake8]\nmax-line-length = 100\n");
    write(
        dir.path(),
        "app.py",
        "def handler(event):\n    return event\n\ndef helper(x):\n    return x\n",
    );
    dir
}

fn modern_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "uv.lock", "");
    write(
        dir.path(),
        "pyproject.toml",
        "[project]\nname = \"modern\"\n\n[tool.ruff]\nline-length = 100\n\n[tool.basedpyright]\ntypeCheckingMode = \"strict\"\n",
    );
    write(dir.path(), ".pre-commit-config.yaml", "repos: []\n");
    dir
}

#[test]
fn legacy_project_gets_migration_recommendations() {
    let dir = legacy_project();
    let result = audit_project(dir.path()).unwrap();

    assert_eq!(
        result.tooling_detected.get("package_manager").map(String::as_str),
        Some("poetry")
    );
    assert_eq!(
        result.tooling_detected.get("linter").map(String::as_str),
        Some("flake8")
    );
    assert_eq!(
        result.tooling_detected.get("formatter").map(String::as_str),
        Some("black")
    );
    assert_eq!(
        result.tooling_detected.get("type_checker").map(String::as_str),
        Some("mypy")
    );
    assert_eq!(
        result.tooling_detected.get("type_coverage").map(String::as_str),
        Some("0%")
    );

    let messages: Vec<&str> = result
        .recommendations
        .iter()
        .map(|r| r.message.as_str())
        .collect();
    assert!(messages.iter().any(|m| m.contains("Poetry to uv")));
    assert!(messages.iter().any(|m| m.contains("flake8 to ruff")));
    assert!(messages.iter().any(|m| m.contains("black to ruff")));
    assert!(messages.iter().any(|m| m.contains("mypy to basedpyright")));
    assert!(messages.iter().any(|m| m.contains("pre-commit")));
    assert!(messages.iter().any(|m| m.contains("CI/CD")));
    assert!(messages
        .iter()
        .any(|m| m.contains("Low type annotation coverage")));

    // 6 info findings plus one coverage warning
    assert_eq!(result.score, 100 - 6 - 5);
}

#[test]
fn poetry_recommendation_carries_the_upgrade_command() {
    let dir = legacy_project();
    let result = audit_project(dir.path()).unwrap();
    let poetry_rec = result
        .recommendations
        .iter()
        .find(|r| r.message.contains("Poetry"))
        .unwrap();
    assert_eq!(
        poetry_rec.action.as_deref(),
        Some("pyforge upgrade . --from poetry")
    );
    assert_eq!(poetry_rec.severity, Severity::Info);
}

#[test]
fn audit_is_idempotent_on_an_unchanged_tree() {
    let dir = legacy_project();
    let first = audit_project(dir.path()).unwrap();
    let second = audit_project(dir.path()).unwrap();

    assert_eq!(first.score, second.score);
    assert_eq!(first.tooling_detected, second.tooling_detected);
    assert_eq!(
        first.recommendations.len(),
        second.recommendations.len()
    );
    for (a, b) in first.recommendations.iter().zip(&second.recommendations) {
        assert_eq!(a.message, b.message);
        assert_eq!(a.severity, b.severity);
    }
}

#[test]
fn modern_stack_short_circuits_all_recommendations() {
    let dir = modern_project();
    // even a fully unannotated file is forgiven on the modern stack
    write(dir.path(), "app.py", "def f(x):\n    return x\n");

    let result = audit_project(dir.path()).unwrap();
    assert_eq!(
        result.tooling_detected.get("status").map(String::as_str),
        Some("modern")
    );
    assert!(result.recommendations.is_empty());
    assert_eq!(result.score, 100);
    assert_eq!(
        result.tooling_detected.get("type_coverage").map(String::as_str),
        Some("0%")
    );
}

#[test]
fn missing_pre_commit_disqualifies_modern_status() {
    let dir = modern_project();
    std::fs::remove_file(dir.path().join(".pre-commit-config.yaml")).unwrap();

    let result = audit_project(dir.path()).unwrap();
    assert!(result.tooling_detected.get("status").is_none());
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.message.contains("pre-commit")));
}

#[test]
fn empty_directory_still_audits() {
    let dir = TempDir::new().unwrap();
    let result = audit_project(dir.path()).unwrap();

    // no package manager, linter, or type checker: three warnings,
    // plus info for pre-commit and CI
    assert!(result.score <= 100 - 3 * 5 - 2);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.message.contains("No package manager")));
    assert_eq!(
        result.tooling_detected.get("type_coverage").map(String::as_str),
        Some("100%")
    );
}

#[test]
fn score_stays_in_bounds_for_the_worst_case() {
    let dir = TempDir::new().unwrap();
    let result = audit_project(dir.path()).unwrap();
    assert!(result.score <= 100);
}

#[test]
fn nonexistent_path_is_an_error() {
    let err = audit_project(Path::new("/definitely/not/a/real/path")).unwrap_err();
    assert!(matches!(err, AuditError::PathNotFound(_)));
}

#[test]
fn file_path_is_not_a_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pyproject.toml", "[project]\n");
    let err = audit_project(&dir.path().join("pyproject.toml")).unwrap_err();
    assert!(matches!(err, AuditError::NotADirectory(_)));
}

#[test]
fn vendored_directories_do_not_drag_coverage_down() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app.py", "def f(x: int) -> int:\n    return x\n");
    let venv = dir.path().join(".venv");
    std::fs::create_dir(&venv).unwrap();
    std::fs::write(venv.join("vendored.py"), "def g(a, b, c):\n    pass\n").unwrap();

    let result = audit_project(dir.path()).unwrap();
    assert_eq!(
        result.tooling_detected.get("type_coverage").map(String::as_str),
        Some("100%")
    );
}
