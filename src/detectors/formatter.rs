//! Formatter detection
//!
//! A `[tool.ruff]` section only counts as a formatter when it carries
//! formatting keys; a bare lint-only section does not.

use super::{read_manifest, tool_section, Detection};
use crate::readers::read_ini;
use std::path::Path;

pub fn detect(root: &Path) -> Detection {
    let manifest = read_manifest(root);

    if let Some(manifest) = &manifest {
        if let Some(ruff) = tool_section(manifest, "ruff") {
            if ruff.get("format").is_some() || ruff.get("line-length").is_some() {
                return Detection::found_with("ruff", "config", "pyproject.toml");
            }
        }

        if tool_section(manifest, "black").is_some() {
            return Detection::found_with("black", "config", "pyproject.toml");
        }

        if tool_section(manifest, "autopep8").is_some() {
            return Detection::found_with("autopep8", "config", "pyproject.toml");
        }
    }
    if let Some(setup_cfg) = read_ini(&root.join("setup.cfg")) {
        if setup_cfg.has_section("autopep8") {
            return Detection::found_with("autopep8", "config", "setup.cfg");
        }
    }

    if root.join(".style.yapf").exists() {
        return Detection::found_with("yapf", "config", ".style.yapf");
    }
    if let Some(manifest) = &manifest {
        if tool_section(manifest, "yapf").is_some() {
            return Detection::found_with("yapf", "config", "pyproject.toml");
        }
    }

    Detection::none()
}
