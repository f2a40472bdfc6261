//! Tool detectors
//!
//! One pure function per tooling category. Each inspects the project tree
//! through the tolerant config readers and returns which tool is in use
//! plus the evidence that matched. Detectors never touch the filesystem
//! beyond reads, so calling one twice on an unchanged tree yields the
//! same result.
//!
//! Every cascade is a fixed priority list: the first matching signal wins
//! and the rest are not evaluated. Reordering a cascade changes behavior,
//! so each module keeps its checks in one straight-line function.

pub mod ci;
pub mod formatter;
pub mod import_sorter;
pub mod linter;
pub mod package_manager;
pub mod type_checker;
pub mod type_coverage;

use std::collections::BTreeMap;
use std::path::Path;

/// Outcome of one detector: the tool in use (if any) and why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub tool: Option<String>,
    /// Which file or section supplied the evidence, e.g. `config -> pyproject.toml`.
    pub evidence: BTreeMap<String, String>,
}

impl Detection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn found(tool: &str) -> Self {
        Self {
            tool: Some(tool.to_string()),
            evidence: BTreeMap::new(),
        }
    }

    pub fn found_with(tool: &str, key: &str, value: impl Into<String>) -> Self {
        let mut detection = Self::found(tool);
        detection.evidence.insert(key.to_string(), value.into());
        detection
    }

    pub fn tool_is(&self, name: &str) -> bool {
        self.tool.as_deref() == Some(name)
    }
}

/// Directories never scanned for source files: dependency caches,
/// version-control metadata, and build output.
pub const EXCLUDED_DIRS: &[&str] = &[
    "venv",
    ".venv",
    "env",
    ".env",
    "node_modules",
    "__pycache__",
    ".git",
    "build",
    "dist",
];

/// Look up `[tool.<name>]` in an already-parsed manifest.
pub(crate) fn tool_section<'a>(manifest: &'a toml::Table, name: &str) -> Option<&'a toml::Value> {
    manifest.get("tool")?.get(name)
}

/// Read the project manifest, if present and well-formed.
pub(crate) fn read_manifest(root: &Path) -> Option<toml::Table> {
    crate::readers::read_toml(&root.join("pyproject.toml"))
}
