//! Project upgrade: migration planning and execution
//!
//! An upgrade runs in phases: back up the known config files, build an
//! ordered migration plan from the detectors, execute each step, then
//! write the shared pyproject.toml document once at the end. A failing
//! step records its error and later steps still run; `success` means the
//! error list came out empty.
//!
//! Package-manager executors write the manifest themselves because they
//! may create it from scratch. The shared document is re-read after each
//! of those steps so config executors see the converted content.

pub mod formatter;
pub mod import_sorter;
pub mod linter;
pub mod package_manager;
pub mod type_checker;

use crate::detectors;
use crate::readers::{read_toml_doc, write_toml_doc};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Table};
use tracing::{debug, info};

/// Legacy package managers this crate can migrate away from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTool {
    Poetry,
    Pip,
    Pipenv,
    Setuptools,
}

impl SourceTool {
    /// Parse a user-supplied tool name. Unknown names are `None`, not an
    /// error: an unrecognized `--from` simply falls back to auto-detection
    /// yielding an empty plan.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "poetry" => Some(Self::Poetry),
            "pip" => Some(Self::Pip),
            "pipenv" => Some(Self::Pipenv),
            "setuptools" => Some(Self::Setuptools),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poetry => "poetry",
            Self::Pip => "pip",
            Self::Pipenv => "pipenv",
            Self::Setuptools => "setuptools",
        }
    }
}

impl fmt::Display for SourceTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a migration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationType {
    PackageManager,
    Formatter,
    ImportSorter,
    Linter,
    TypeChecker,
}

/// A single planned migration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationStep {
    pub migration_type: MigrationType,
    pub description: String,
    pub source: String,
    pub target: String,
    pub files_affected: Vec<PathBuf>,
    pub reversible: bool,
}

impl MigrationStep {
    fn new(
        migration_type: MigrationType,
        description: &str,
        source: &str,
        target: &str,
        files_affected: Vec<PathBuf>,
    ) -> Self {
        Self {
            migration_type,
            description: description.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            files_affected,
            reversible: true,
        }
    }
}

/// Knobs for [`upgrade_project`].
#[derive(Debug, Clone)]
pub struct UpgradeOptions {
    /// Source package manager override; auto-detected when `None`.
    pub from_tool: Option<String>,
    pub dry_run: bool,
    pub backup: bool,
}

impl Default for UpgradeOptions {
    fn default() -> Self {
        Self {
            from_tool: None,
            dry_run: false,
            backup: true,
        }
    }
}

/// Outcome of an upgrade run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeResult {
    pub success: bool,
    pub project_path: PathBuf,
    pub changes_made: Vec<String>,
    pub backup_path: Option<PathBuf>,
    pub errors: Vec<String>,
    pub migration_steps: Vec<MigrationStep>,
}

impl UpgradeResult {
    fn new(project_path: PathBuf) -> Self {
        Self {
            success: false,
            project_path,
            changes_made: Vec::new(),
            backup_path: None,
            errors: Vec::new(),
            migration_steps: Vec::new(),
        }
    }
}

/// Config files copied aside before an upgrade mutates anything.
const BACKUP_FILES: &[&str] = &[
    "pyproject.toml",
    "poetry.lock",
    "requirements.txt",
    "requirements-dev.txt",
    "setup.py",
    "setup.cfg",
    ".flake8",
    ".isort.cfg",
    "mypy.ini",
    ".mypy.ini",
    "Pipfile",
    "Pipfile.lock",
    ".pre-commit-config.yaml",
];

/// Copy the project's known config files into a timestamped backup
/// directory under the project root.
pub fn create_backup(path: &Path) -> std::io::Result<PathBuf> {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let backup_dir = path.join(format!(".pyforge_backup_{timestamp}"));
    std::fs::create_dir_all(&backup_dir)?;

    for filename in BACKUP_FILES {
        let src = path.join(filename);
        if src.exists() {
            std::fs::copy(&src, backup_dir.join(filename))?;
        }
    }

    Ok(backup_dir)
}

/// Auto-detect which legacy package manager the project uses, if any.
pub fn detect_source_tool(path: &Path) -> Option<SourceTool> {
    let detection = detectors::package_manager::detect(path);
    SourceTool::parse(detection.tool.as_deref()?)
}

/// Build the ordered migration plan for a project.
///
/// Step order is fixed: package manager first (later steps edit the
/// manifest it may create), then formatter, import sorter, linter, and
/// type checker. Each category is planned independently; an empty plan
/// means there is nothing to migrate.
pub fn create_migration_plan(path: &Path, from_tool: Option<&str>) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    let source_tool = match from_tool {
        Some(name) => SourceTool::parse(name),
        None => detect_source_tool(path),
    };

    match source_tool {
        Some(SourceTool::Poetry) => {
            let mut step = MigrationStep::new(
                MigrationType::PackageManager,
                "Convert Poetry pyproject.toml to PEP 621 format for uv",
                "poetry",
                "uv",
                vec![path.join("pyproject.toml"), path.join("poetry.lock")],
            );
            // Deleting poetry.lock cannot be undone byte-for-byte.
            step.reversible = false;
            steps.push(step);
        }
        Some(SourceTool::Pip) => steps.push(MigrationStep::new(
            MigrationType::PackageManager,
            "Convert requirements.txt to pyproject.toml for uv",
            "pip",
            "uv",
            vec![path.join("requirements.txt"), path.join("pyproject.toml")],
        )),
        Some(SourceTool::Pipenv) => steps.push(MigrationStep::new(
            MigrationType::PackageManager,
            "Convert Pipfile to pyproject.toml for uv",
            "pipenv",
            "uv",
            vec![path.join("Pipfile"), path.join("pyproject.toml")],
        )),
        Some(SourceTool::Setuptools) => steps.push(MigrationStep::new(
            MigrationType::PackageManager,
            "Convert setup.py/setup.cfg to pyproject.toml",
            "setuptools",
            "uv",
            vec![
                path.join("setup.py"),
                path.join("setup.cfg"),
                path.join("pyproject.toml"),
            ],
        )),
        None => {}
    }

    if detectors::formatter::detect(path).tool_is("black") {
        steps.push(MigrationStep::new(
            MigrationType::Formatter,
            "Migrate Black configuration to ruff format",
            "black",
            "ruff",
            vec![path.join("pyproject.toml")],
        ));
    }

    if detectors::import_sorter::detect(path).tool_is("isort") {
        steps.push(MigrationStep::new(
            MigrationType::ImportSorter,
            "Migrate isort configuration to ruff lint.isort",
            "isort",
            "ruff",
            vec![path.join("pyproject.toml"), path.join(".isort.cfg")],
        ));
    }

    if detectors::linter::detect(path).tool_is("flake8") {
        steps.push(MigrationStep::new(
            MigrationType::Linter,
            "Migrate flake8 configuration to ruff lint",
            "flake8",
            "ruff",
            vec![path.join("pyproject.toml"), path.join(".flake8")],
        ));
    }

    if detectors::type_checker::detect(path).tool_is("mypy") {
        steps.push(MigrationStep::new(
            MigrationType::TypeChecker,
            "Migrate mypy configuration to basedpyright",
            "mypy",
            "basedpyright",
            vec![path.join("pyproject.toml"), path.join("mypy.ini")],
        ));
    }

    steps
}

/// Upgrade a project to the modern toolchain.
///
/// Never returns an error: failures land in `result.errors` so a partial
/// run still reports every change it did make.
pub fn upgrade_project(path: &Path, opts: &UpgradeOptions) -> UpgradeResult {
    let mut result = UpgradeResult::new(path.to_path_buf());

    if !path.exists() {
        result
            .errors
            .push(format!("Path does not exist: {}", path.display()));
        return result;
    }
    if !path.is_dir() {
        result
            .errors
            .push(format!("Path is not a directory: {}", path.display()));
        return result;
    }
    let path = match path.canonicalize() {
        Ok(path) => path,
        Err(err) => {
            result
                .errors
                .push(format!("Cannot resolve {}: {err}", path.display()));
            return result;
        }
    };
    result.project_path = path.clone();

    if opts.backup && !opts.dry_run {
        match create_backup(&path) {
            Ok(backup_dir) => {
                result
                    .changes_made
                    .push(format!("Created backup at {}", backup_dir.display()));
                result.backup_path = Some(backup_dir);
            }
            Err(err) => {
                result.errors.push(format!("Backup failed: {err}"));
                return result;
            }
        }
    }

    let steps = create_migration_plan(&path, opts.from_tool.as_deref());
    result.migration_steps = steps.clone();

    if steps.is_empty() {
        result
            .changes_made
            .push("No migrations needed - project may already use modern tooling".to_string());
        result.success = true;
        return result;
    }

    let manifest_path = path.join("pyproject.toml");
    let mut doc = read_toml_doc(&manifest_path).unwrap_or_default();

    for step in &steps {
        debug!(description = %step.description, "executing migration step");
        let outcome = match (step.migration_type, step.source.as_str()) {
            (MigrationType::PackageManager, "poetry") => {
                package_manager::migrate_poetry(&path, opts.dry_run)
            }
            (MigrationType::PackageManager, "pip") => {
                package_manager::migrate_requirements(&path, opts.dry_run)
            }
            (MigrationType::PackageManager, "pipenv") => {
                package_manager::migrate_pipenv(&path, opts.dry_run)
            }
            (MigrationType::PackageManager, "setuptools") => {
                package_manager::migrate_setuptools(&path, opts.dry_run)
            }
            (MigrationType::Formatter, _) => Ok(formatter::migrate_black(&mut doc)),
            (MigrationType::ImportSorter, _) => {
                import_sorter::migrate_isort(&path, &mut doc, opts.dry_run)
            }
            (MigrationType::Linter, _) => linter::migrate_flake8(&path, &mut doc, opts.dry_run),
            (MigrationType::TypeChecker, _) => {
                type_checker::migrate_mypy(&path, &mut doc, opts.dry_run)
            }
            (MigrationType::PackageManager, other) => {
                Ok(vec![format!("Unknown source tool: {other}")])
            }
        };

        match outcome {
            Ok(changes) => result.changes_made.extend(changes),
            Err(err) => result
                .errors
                .push(format!("Error during {}: {err}", step.description)),
        }

        // The manifest may have been rewritten (or created) on disk.
        if step.migration_type == MigrationType::PackageManager {
            if let Some(fresh) = read_toml_doc(&manifest_path) {
                doc = fresh;
            }
        }
    }

    if !opts.dry_run && !doc.as_table().is_empty() {
        match write_toml_doc(&manifest_path, &doc) {
            Ok(()) => result
                .changes_made
                .push("Wrote updated pyproject.toml".to_string()),
            Err(err) => result.errors.push(err.to_string()),
        }
    }

    result.success = result.errors.is_empty();
    info!(
        success = result.success,
        steps = steps.len(),
        changes = result.changes_made.len(),
        "upgrade finished"
    );
    result
}

/// Look up `[tool.<name>]` in the manifest document as an owned table.
pub(crate) fn tool_table(doc: &DocumentMut, name: &str) -> Option<Table> {
    doc.get("tool")?
        .as_table()?
        .get(name)?
        .as_table()
        .cloned()
}

/// Drop `[tool.<name>]`, and the whole `[tool]` table once it is empty.
pub(crate) fn remove_tool_table(doc: &mut DocumentMut, name: &str) -> bool {
    let removed = match doc.get_mut("tool").and_then(|item| item.as_table_mut()) {
        Some(tool) => tool.remove(name).is_some(),
        None => false,
    };
    let tool_empty = doc
        .get("tool")
        .and_then(|item| item.as_table())
        .is_some_and(|tool| tool.is_empty());
    if tool_empty {
        doc.as_table_mut().remove("tool");
    }
    removed
}

/// configparser-style truthiness for ini values.
pub(crate) fn ini_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
