//! Import sorter detection
//!
//! ruff counts either via an explicit `[tool.ruff.lint.isort]` sub-table
//! or via an I-prefixed rule code in `lint.select`.

use super::{read_manifest, tool_section, Detection};
use crate::readers::read_ini;
use std::path::Path;

pub fn detect(root: &Path) -> Detection {
    if let Some(manifest) = read_manifest(root) {
        if let Some(lint) = tool_section(&manifest, "ruff").and_then(|ruff| ruff.get("lint")) {
            if lint.get("isort").is_some() {
                return Detection::found_with("ruff", "config", "pyproject.toml");
            }
            if let Some(select) = lint.get("select").and_then(|v| v.as_array()) {
                let sorts_imports = select
                    .iter()
                    .filter_map(|v| v.as_str())
                    .any(|code| code == "I" || code.starts_with('I'));
                if sorts_imports {
                    return Detection::found_with("ruff", "config", "pyproject.toml");
                }
            }
        }

        if root.join(".isort.cfg").exists() {
            return Detection::found_with("isort", "config", ".isort.cfg");
        }
        if tool_section(&manifest, "isort").is_some() {
            return Detection::found_with("isort", "config", "pyproject.toml");
        }
    } else if root.join(".isort.cfg").exists() {
        return Detection::found_with("isort", "config", ".isort.cfg");
    }

    if let Some(setup_cfg) = read_ini(&root.join("setup.cfg")) {
        if setup_cfg.has_section("isort") {
            return Detection::found_with("isort", "config", "setup.cfg");
        }
    }

    Detection::none()
}
