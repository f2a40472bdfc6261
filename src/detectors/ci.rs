//! CI system and pre-commit detection
//!
//! Providers are checked in a fixed priority order, workflow-directory
//! systems first.

use super::Detection;
use std::path::Path;

/// Number of `*.yml` workflow files in a directory.
fn count_workflows(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "yml"))
        .count()
}

pub fn detect(root: &Path) -> Detection {
    let workflows = count_workflows(&root.join(".github").join("workflows"));
    if workflows > 0 {
        return Detection::found_with("github-actions", "workflows", workflows.to_string());
    }

    if root.join(".gitlab-ci.yml").exists() {
        return Detection::found_with("gitlab-ci", "config", ".gitlab-ci.yml");
    }
    if root.join(".travis.yml").exists() {
        return Detection::found_with("travis-ci", "config", ".travis.yml");
    }
    if root.join(".circleci").join("config.yml").exists() {
        return Detection::found_with("circleci", "config", ".circleci/config.yml");
    }
    if root.join("azure-pipelines.yml").exists() {
        return Detection::found_with("azure-pipelines", "config", "azure-pipelines.yml");
    }

    Detection::none()
}

/// Whether pre-commit hooks are configured.
pub fn detect_pre_commit(root: &Path) -> bool {
    root.join(".pre-commit-config.yaml").exists()
}
