//! End-to-end upgrade runs against realistic legacy projects

use pyforge::audit::audit_project;
use pyforge::upgrade::{upgrade_project, MigrationType, UpgradeOptions};
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn read_manifest(dir: &Path) -> toml::Table {
    let content = std::fs::read_to_string(dir.join("pyproject.toml")).unwrap();
    content.parse().unwrap()
}

/// Poetry project with the whole legacy toolchain configured.
fn full_legacy_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "pyproject.toml",
        r#"[tool.poetry]
name = "legacy-app"
version = "0.5.0"
description = "A legacy project"
authors = ["Jane Doe <jane@example.com>"]
license = "Apache-2.0"

[tool.poetry.dependencies]
python = "^3.11"
requests = "^2.31"

[tool.poetry.group.dev.dependencies]
pytest = "^8.0"

[tool.black]
line-length = 100

[tool.isort]
known_first_party = ["legacy_app"]

[tool.mypy]
strict = true
python_version = "3.11"
"#,
    );
    write(dir.path(), "poetry.lock", "# lock\n");
    write(dir.path(), ".flake8", "[flake8]\nmax-line-length = 100\nignore = E203\n");
    dir
}

fn no_backup() -> UpgradeOptions {
    UpgradeOptions {
        backup: false,
        ..UpgradeOptions::default()
    }
}

#[test]
fn full_legacy_project_round_trip() {
    let dir = full_legacy_project();
    let result = upgrade_project(dir.path(), &no_backup());

    assert!(result.success, "errors: {:?}", result.errors);
    let types: Vec<MigrationType> = result
        .migration_steps
        .iter()
        .map(|s| s.migration_type)
        .collect();
    assert_eq!(
        types,
        vec![
            MigrationType::PackageManager,
            MigrationType::Formatter,
            MigrationType::ImportSorter,
            MigrationType::Linter,
            MigrationType::TypeChecker,
        ]
    );

    let manifest = read_manifest(dir.path());
    let project = manifest["project"].as_table().unwrap();
    assert_eq!(project["name"].as_str(), Some("legacy-app"));
    assert_eq!(project["requires-python"].as_str(), Some(">=3.11"));
    assert_eq!(
        project["dependencies"][0].as_str(),
        Some("requests>=2.31")
    );
    assert_eq!(
        project["optional-dependencies"]["dev"][0].as_str(),
        Some("pytest>=8.0")
    );

    let tool = manifest["tool"].as_table().unwrap();
    assert!(tool.get("poetry").is_none());
    assert!(tool.get("black").is_none());
    assert!(tool.get("isort").is_none());
    assert!(tool.get("mypy").is_none());

    let ruff = tool["ruff"].as_table().unwrap();
    assert_eq!(ruff["line-length"].as_integer(), Some(100));
    assert_eq!(
        ruff["format"]["quote-style"].as_str(),
        Some("double")
    );
    assert_eq!(
        ruff["lint"]["isort"]["known-first-party"][0].as_str(),
        Some("legacy_app")
    );
    assert_eq!(ruff["lint"]["ignore"][0].as_str(), Some("E203"));

    assert_eq!(
        tool["basedpyright"]["typeCheckingMode"].as_str(),
        Some("strict")
    );
    assert_eq!(
        tool["basedpyright"]["pythonVersion"].as_str(),
        Some("3.11")
    );

    assert!(!dir.path().join("poetry.lock").exists());
    assert!(!dir.path().join(".flake8").exists());
}

#[test]
fn upgrade_clears_the_tool_migration_recommendations() {
    let dir = full_legacy_project();
    let before = audit_project(dir.path()).unwrap();
    assert!(before
        .recommendations
        .iter()
        .any(|r| r.message.contains("migrating from")));

    let result = upgrade_project(dir.path(), &no_backup());
    assert!(result.success);

    let after = audit_project(dir.path()).unwrap();
    assert!(after.score >= before.score);
    assert!(!after
        .recommendations
        .iter()
        .any(|r| r.message.contains("migrating from")));
}

#[test]
fn dry_run_modifies_nothing() {
    let dir = full_legacy_project();
    let manifest_before = std::fs::read_to_string(dir.path().join("pyproject.toml")).unwrap();

    let opts = UpgradeOptions {
        dry_run: true,
        ..UpgradeOptions::default()
    };
    let result = upgrade_project(dir.path(), &opts);

    assert!(result.success);
    assert!(!result.migration_steps.is_empty());
    assert!(result.backup_path.is_none());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("pyproject.toml")).unwrap(),
        manifest_before
    );
    assert!(dir.path().join("poetry.lock").exists());
    assert!(dir.path().join(".flake8").exists());
    // dry run also skips backup directories
    let backups: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().starts_with(".pyforge_backup_"))
        .collect();
    assert!(backups.is_empty());
}

#[test]
fn backup_preserves_original_configs() {
    let dir = full_legacy_project();
    let result = upgrade_project(dir.path(), &UpgradeOptions::default());
    assert!(result.success);

    let backup_path = result.backup_path.unwrap();
    assert!(backup_path.starts_with(dir.path().canonicalize().unwrap()));
    let backed_up = std::fs::read_to_string(backup_path.join("pyproject.toml")).unwrap();
    assert!(backed_up.contains("[tool.poetry]"));
    assert!(backup_path.join(".flake8").exists());
    assert!(backup_path.join("poetry.lock").exists());
}

#[test]
fn modern_project_needs_no_migrations() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "uv.lock", "");
    write(
        dir.path(),
        "pyproject.toml",
        "[project]\nname = \"modern\"\n\n[tool.ruff]\nline-length = 100\n",
    );

    let result = upgrade_project(dir.path(), &no_backup());
    assert!(result.success);
    assert!(result.migration_steps.is_empty());
    assert!(result
        .changes_made
        .iter()
        .any(|c| c.contains("No migrations needed")));
}

#[test]
fn pip_project_gains_a_manifest() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "requirements.txt",
        "requests>=2.31\nclick==8.1.7\n# a comment\n",
    );

    let mut opts = no_backup();
    opts.from_tool = Some("pip".to_string());
    let result = upgrade_project(dir.path(), &opts);
    assert!(result.success, "errors: {:?}", result.errors);

    let manifest = read_manifest(dir.path());
    let deps = manifest["project"]["dependencies"].as_array().unwrap();
    assert_eq!(deps.len(), 2);
    assert_eq!(
        manifest["build-system"]["build-backend"].as_str(),
        Some("hatchling.build")
    );
    assert!(dir.path().join("requirements.txt").exists());
}

#[test]
fn explicit_from_tool_overrides_detection() {
    let dir = TempDir::new().unwrap();
    // poetry markers present, but the caller insists on pip
    write(dir.path(), "poetry.lock", "");
    write(dir.path(), "pyproject.toml", "[tool.poetry]\nname = \"x\"\n");

    let mut opts = no_backup();
    opts.from_tool = Some("pip".to_string());
    let result = upgrade_project(dir.path(), &opts);

    assert!(result.success);
    assert_eq!(result.migration_steps.len(), 1);
    assert_eq!(result.migration_steps[0].source, "pip");
    assert!(result
        .changes_made
        .iter()
        .any(|c| c.contains("No requirements.txt found")));
}

#[test]
fn upgraded_project_upgrades_to_an_empty_plan() {
    let dir = full_legacy_project();
    assert!(upgrade_project(dir.path(), &no_backup()).success);

    let second = upgrade_project(dir.path(), &no_backup());
    assert!(second.success);
    assert!(second.migration_steps.is_empty());
}
