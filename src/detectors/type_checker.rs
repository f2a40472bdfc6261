//! Type checker detection
//!
//! basedpyright, then pyright, then mypy (several config homes), then pytype.

use super::{read_manifest, tool_section, Detection};
use crate::readers::read_ini;
use std::path::Path;

pub fn detect(root: &Path) -> Detection {
    let manifest = read_manifest(root);

    if let Some(manifest) = &manifest {
        if tool_section(manifest, "basedpyright").is_some() {
            return Detection::found_with("basedpyright", "config", "pyproject.toml");
        }
    }

    if root.join("pyrightconfig.json").exists() {
        return Detection::found_with("pyright", "config", "pyrightconfig.json");
    }
    if let Some(manifest) = &manifest {
        if tool_section(manifest, "pyright").is_some() {
            return Detection::found_with("pyright", "config", "pyproject.toml");
        }
    }

    for ini_file in ["mypy.ini", ".mypy.ini"] {
        if root.join(ini_file).exists() {
            return Detection::found_with("mypy", "config", ini_file);
        }
    }
    if let Some(manifest) = &manifest {
        if tool_section(manifest, "mypy").is_some() {
            return Detection::found_with("mypy", "config", "pyproject.toml");
        }
    }
    if let Some(setup_cfg) = read_ini(&root.join("setup.cfg")) {
        if setup_cfg.has_section("mypy") {
            return Detection::found_with("mypy", "config", "setup.cfg");
        }
    }

    if root.join("pytype.cfg").exists() {
        return Detection::found_with("pytype", "config", "pytype.cfg");
    }

    Detection::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn basedpyright_outranks_mypy() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("pyproject.toml"),
            "[tool.basedpyright]\n[tool.mypy]\n",
        )
        .unwrap();
        assert!(detect(dir.path()).tool_is("basedpyright"));
    }

    #[test]
    fn mypy_ini_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("mypy.ini"), "[mypy]\nstrict = True\n").unwrap();
        let detection = detect(dir.path());
        assert!(detection.tool_is("mypy"));
        assert_eq!(detection.evidence.get("config").unwrap(), "mypy.ini");
    }

    #[test]
    fn pyright_json_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pyrightconfig.json"), "{}").unwrap();
        assert!(detect(dir.path()).tool_is("pyright"));
    }
}
