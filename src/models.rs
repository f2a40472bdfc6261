//! Core data models for pyforge
//!
//! Audit-side value objects (severity, recommendations, results) plus the
//! `ProjectConfig` record consumed by the external project generator.
//! Everything here is created fresh per operation and immutable once built.

use crate::errors::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Severity levels for audit findings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Score deduction for one recommendation at this severity.
    pub fn penalty(self) -> u32 {
        match self {
            Severity::Critical => 20,
            Severity::Error => 10,
            Severity::Warning => 5,
            Severity::Info => 1,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            _ => anyhow::bail!(
                "Unknown severity '{s}'. Valid severities: info, warning, error, critical"
            ),
        }
    }
}

/// Areas an audit recommendation relates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditCategory {
    Tooling,
    Configuration,
    Dependencies,
    Security,
    CodeQuality,
}

impl std::fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditCategory::Tooling => write!(f, "tooling"),
            AuditCategory::Configuration => write!(f, "configuration"),
            AuditCategory::Dependencies => write!(f, "dependencies"),
            AuditCategory::Security => write!(f, "security"),
            AuditCategory::CodeQuality => write!(f, "code_quality"),
        }
    }
}

/// A single audit recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: AuditCategory,
    pub message: String,
    pub severity: Severity,
    pub file_path: Option<PathBuf>,
    pub action: Option<String>,
}

impl Recommendation {
    pub fn new(category: AuditCategory, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            severity,
            file_path: None,
            action: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// Result of one audit pass over a project tree
///
/// Recommendations keep generation order; callers sort for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub project_path: PathBuf,
    pub recommendations: Vec<Recommendation>,
    /// Overall project health score, 0-100
    pub score: u32,
    pub tooling_detected: BTreeMap<String, String>,
}

impl AuditResult {
    pub fn new(project_path: PathBuf) -> Self {
        Self {
            project_path,
            recommendations: Vec::new(),
            score: 100,
            tooling_detected: BTreeMap::new(),
        }
    }

    pub fn count_by(&self, severity: Severity) -> usize {
        self.recommendations
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    pub fn critical_count(&self) -> usize {
        self.count_by(Severity::Critical)
    }

    pub fn error_count(&self) -> usize {
        self.count_by(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_by(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count_by(Severity::Info)
    }
}

// ============================================================================
// Project generation config (consumed by the external generator)
// ============================================================================

/// Project archetypes the generator can scaffold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Library,
    App,
    Cli,
    Api,
    Script,
}

impl ProjectType {
    pub fn description(self) -> &'static str {
        match self {
            ProjectType::Library => "Publishable PyPI package with src layout",
            ProjectType::App => "Standalone application",
            ProjectType::Cli => "Command-line tool",
            ProjectType::Api => "Web API service",
            ProjectType::Script => "Single-file script with inline deps (PEP 723)",
        }
    }

    /// src/ layout prevents accidental imports of the local package in tests.
    pub fn uses_src_layout(self) -> bool {
        matches!(self, ProjectType::Library | ProjectType::Cli | ProjectType::Api)
    }
}

/// Supported minimum Python versions (actively maintained as of 2025)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PythonVersion {
    #[serde(rename = "3.11")]
    Py311,
    #[serde(rename = "3.12")]
    Py312,
    #[serde(rename = "3.13")]
    Py313,
}

impl PythonVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            PythonVersion::Py311 => "3.11",
            PythonVersion::Py312 => "3.12",
            PythonVersion::Py313 => "3.13",
        }
    }

    /// PEP 440 specifier for pyproject.toml's requires-python.
    pub fn requires_python(self) -> String {
        format!(">={}", self.as_str())
    }
}

/// Common open-source licenses, identified by SPDX id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum License {
    #[serde(rename = "MIT")]
    Mit,
    #[serde(rename = "Apache-2.0")]
    Apache2,
    #[serde(rename = "GPL-3.0-only")]
    Gpl3,
    #[serde(rename = "BSD-3-Clause")]
    Bsd3,
    #[serde(rename = "Unlicense")]
    Unlicense,
    #[serde(rename = "Proprietary")]
    Proprietary,
}

impl License {
    pub fn spdx_id(self) -> &'static str {
        match self {
            License::Mit => "MIT",
            License::Apache2 => "Apache-2.0",
            License::Gpl3 => "GPL-3.0-only",
            License::Bsd3 => "BSD-3-Clause",
            License::Unlicense => "Unlicense",
            License::Proprietary => "Proprietary",
        }
    }
}

/// Type checking strictness, mapped to pyright's typeCheckingMode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCheckingMode {
    Off,
    Basic,
    Standard,
    Strict,
    All,
}

impl TypeCheckingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeCheckingMode::Off => "off",
            TypeCheckingMode::Basic => "basic",
            TypeCheckingMode::Standard => "standard",
            TypeCheckingMode::Strict => "strict",
            TypeCheckingMode::All => "all",
        }
    }
}

/// Author information for project metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub email: Option<String>,
}

impl AuthorInfo {
    /// Simple pattern rather than full RFC 5322, to avoid rejecting valid
    /// but unusual addresses.
    pub fn new(name: impl Into<String>, email: Option<String>) -> Result<Self, ConfigError> {
        if let Some(email) = &email {
            if !email_regex().is_match(email) {
                return Err(ConfigError::InvalidEmail(email.clone()));
            }
        }
        Ok(Self {
            name: name.into(),
            email,
        })
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
    })
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("valid regex"))
}

/// Development tool preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolingConfig {
    pub linter: String,
    pub formatter: String,
    pub type_checker: String,
    pub type_checking_mode: TypeCheckingMode,
}

impl Default for ToolingConfig {
    fn default() -> Self {
        Self {
            linter: "ruff".to_string(),
            formatter: "ruff".to_string(),
            type_checker: "basedpyright".to_string(),
            type_checking_mode: TypeCheckingMode::Standard,
        }
    }
}

/// Optional features for the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    pub github_actions: bool,
    pub docker: bool,
    pub devcontainer: bool,
    pub docs: bool,
    pub pre_commit: bool,
    pub vscode: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            github_actions: true,
            docker: false,
            devcontainer: false,
            docs: false,
            pre_commit: true,
            vscode: true,
        }
    }
}

impl FeaturesConfig {
    pub fn enabled_features(&self) -> Vec<&'static str> {
        let flags = [
            ("github_actions", self.github_actions),
            ("docker", self.docker),
            ("devcontainer", self.devcontainer),
            ("docs", self.docs),
            ("pre_commit", self.pre_commit),
            ("vscode", self.vscode),
        ];
        flags
            .into_iter()
            .filter_map(|(name, on)| on.then_some(name))
            .collect()
    }
}

/// Python reserved words, stored post-normalization (lowercase) so that
/// `True`/`False`/`None` are caught too.
const RESERVED_NAMES: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "true",
    "false", "none",
];

/// Complete configuration for one generated project
///
/// Immutable after validation: construct through [`ProjectConfig::builder`],
/// which normalizes the name and rejects inconsistent settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    name: String,
    pub description: String,
    pub project_type: ProjectType,
    pub python_version: PythonVersion,
    pub license: License,
    pub author: AuthorInfo,
    pub tooling: ToolingConfig,
    pub features: FeaturesConfig,
    pub output_dir: PathBuf,
}

impl ProjectConfig {
    pub fn builder(name: impl Into<String>) -> ProjectConfigBuilder {
        ProjectConfigBuilder::new(name)
    }

    /// Normalized project name (lowercase, validated at construction).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name with hyphens replaced, suitable for `import package_name`.
    pub fn package_name(&self) -> String {
        self.name.replace('-', "_")
    }

    pub fn project_dir(&self) -> PathBuf {
        self.output_dir.join(&self.name)
    }

    /// Relative path to the source directory (src layout or flat).
    pub fn src_path(&self) -> PathBuf {
        if self.project_type.uses_src_layout() {
            PathBuf::from("src").join(self.package_name())
        } else {
            PathBuf::from(self.package_name())
        }
    }

    pub fn test_path(&self) -> PathBuf {
        PathBuf::from("tests")
    }
}

/// Builder for [`ProjectConfig`]; all validation happens in [`build`].
///
/// [`build`]: ProjectConfigBuilder::build
#[derive(Debug, Clone)]
pub struct ProjectConfigBuilder {
    name: String,
    description: String,
    project_type: ProjectType,
    python_version: PythonVersion,
    license: License,
    author: AuthorInfo,
    tooling: ToolingConfig,
    features: FeaturesConfig,
    output_dir: Option<PathBuf>,
}

impl ProjectConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "A Python project".to_string(),
            project_type: ProjectType::Library,
            python_version: PythonVersion::Py312,
            license: License::Mit,
            author: AuthorInfo {
                name: "Your Name".to_string(),
                email: None,
            },
            tooling: ToolingConfig::default(),
            features: FeaturesConfig::default(),
            output_dir: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    pub fn python_version(mut self, version: PythonVersion) -> Self {
        self.python_version = version;
        self
    }

    pub fn license(mut self, license: License) -> Self {
        self.license = license;
        self
    }

    pub fn author(mut self, author: AuthorInfo) -> Self {
        self.author = author;
        self
    }

    pub fn tooling(mut self, tooling: ToolingConfig) -> Self {
        self.tooling = tooling;
        self
    }

    pub fn features(mut self, features: FeaturesConfig) -> Self {
        self.features = features;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<ProjectConfig, ConfigError> {
        let name = self.name.to_lowercase().trim().to_string();
        if !name_regex().is_match(&name) {
            return Err(ConfigError::InvalidName(name));
        }
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(ConfigError::ReservedName(name));
        }

        // Cross-field invariant: scripts have no use for containers or docs
        if self.project_type == ProjectType::Script {
            if self.features.docker {
                return Err(ConfigError::FeatureNotApplicable { feature: "Docker" });
            }
            if self.features.docs {
                return Err(ConfigError::FeatureNotApplicable {
                    feature: "Documentation setup",
                });
            }
        }

        let mut tooling = self.tooling;
        tooling.linter = tooling.linter.trim().to_lowercase();
        tooling.formatter = tooling.formatter.trim().to_lowercase();
        tooling.type_checker = tooling.type_checker.trim().to_lowercase();

        let output_dir = match self.output_dir {
            Some(dir) => dir,
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        Ok(ProjectConfig {
            name,
            description: self.description,
            project_type: self.project_type,
            python_version: self.python_version,
            license: self.license,
            author: self.author,
            tooling,
            features: self.features,
            output_dir,
        })
    }
}
