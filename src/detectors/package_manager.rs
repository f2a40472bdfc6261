//! Package manager detection
//!
//! Priority: modern lock file, legacy lock file, tool-specific manifest
//! section, plain requirements file, legacy build script.

use super::{read_manifest, tool_section, Detection};
use std::path::Path;
use tracing::debug;

pub fn detect(root: &Path) -> Detection {
    if root.join("uv.lock").exists() {
        return Detection::found_with("uv", "lock_file", "uv.lock");
    }

    if root.join("poetry.lock").exists() {
        return Detection::found_with("poetry", "lock_file", "poetry.lock");
    }

    if let Some(manifest) = read_manifest(root) {
        for tool in ["poetry", "pdm", "hatch", "flit"] {
            if tool_section(&manifest, tool).is_some() {
                debug!("package manager {tool} declared in pyproject.toml");
                return Detection::found_with(tool, "config", "pyproject.toml");
            }
        }
    }

    if root.join("Pipfile").exists() || root.join("Pipfile.lock").exists() {
        return Detection::found_with("pipenv", "config", "Pipfile");
    }

    if root.join("requirements.txt").exists() {
        let mut detection = Detection::found_with("pip", "requirements", "requirements.txt");
        // Record additional requirements-*.txt variants as evidence
        if let Ok(entries) = std::fs::read_dir(root) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with("requirements")
                    && name.ends_with(".txt")
                    && name != "requirements.txt"
                {
                    detection.evidence.insert(name.clone(), name);
                }
            }
        }
        return detection;
    }

    if root.join("setup.py").exists() {
        return Detection::found_with("setuptools", "config", "setup.py");
    }
    if root.join("setup.cfg").exists() {
        return Detection::found_with("setuptools", "config", "setup.cfg");
    }

    Detection::none()
}
