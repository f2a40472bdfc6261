//! Linter detection
//!
//! ruff (dedicated file or manifest section), then flake8, then pylint.

use super::{read_manifest, tool_section, Detection};
use crate::readers::read_ini;
use std::path::Path;

pub fn detect(root: &Path) -> Detection {
    let manifest = read_manifest(root);

    if root.join("ruff.toml").exists() {
        return Detection::found_with("ruff", "config", "ruff.toml");
    }
    if let Some(manifest) = &manifest {
        if tool_section(manifest, "ruff").is_some() {
            return Detection::found_with("ruff", "config", "pyproject.toml");
        }
    }

    if root.join(".flake8").exists() {
        return Detection::found_with("flake8", "config", ".flake8");
    }
    if let Some(setup_cfg) = read_ini(&root.join("setup.cfg")) {
        if setup_cfg.has_section("flake8") {
            return Detection::found_with("flake8", "config", "setup.cfg");
        }
    }

    if root.join(".pylintrc").exists() {
        return Detection::found_with("pylint", "config", ".pylintrc");
    }
    if root.join("pylintrc").exists() {
        return Detection::found_with("pylint", "config", "pylintrc");
    }
    if let Some(manifest) = &manifest {
        if tool_section(manifest, "pylint").is_some() {
            return Detection::found_with("pylint", "config", "pyproject.toml");
        }
    }

    Detection::none()
}
