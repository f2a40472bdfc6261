//! Package manager migrations to uv / PEP 621
//!
//! Unlike the config executors, these write pyproject.toml themselves:
//! the pip, pipenv, and setuptools paths may have to create the manifest
//! from scratch. The orchestrator re-reads the document afterwards.

use super::{remove_tool_table, tool_table};
use crate::readers::{read_ini, read_toml, read_toml_doc, write_toml_doc};
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use toml_edit::{value, Array, DocumentMut, InlineTable, Item, Table, Value};

static AUTHOR_RE: OnceLock<Regex> = OnceLock::new();

/// Matches Poetry's `Name <email>` author strings.
fn author_regex() -> &'static Regex {
    AUTHOR_RE.get_or_init(|| Regex::new(r"(.+?)\s*<(.+?)>").expect("valid regex"))
}

/// Convert a Poetry version spec into a PEP 508 requirement string.
///
/// Caret and tilde both become a `>=` floor. An explicit operator is kept
/// verbatim. A bare version is an exact pin, so the author's tested
/// version is what ends up installed.
pub(crate) fn requirement(name: &str, spec: &str) -> String {
    if let Some(version) = spec.strip_prefix(['^', '~']) {
        format!("{name}>={version}")
    } else if spec.is_empty() {
        name.to_string()
    } else if spec.starts_with(['<', '>', '=', '!']) {
        format!("{name}{spec}")
    } else {
        format!("{name}=={spec}")
    }
}

fn ensure_manifest(root: &Path) -> DocumentMut {
    read_toml_doc(&root.join("pyproject.toml")).unwrap_or_else(|| minimal_manifest(root))
}

/// Minimal PEP 621 manifest named after the project directory.
fn minimal_manifest(root: &Path) -> DocumentMut {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    let mut doc = DocumentMut::new();
    doc["project"]["name"] = value(name);
    doc["project"]["version"] = value("0.1.0");
    doc["project"]["requires-python"] = value(">=3.11");
    doc["build-system"]["requires"] = value(Array::from_iter(["hatchling"]));
    doc["build-system"]["build-backend"] = value("hatchling.build");
    doc
}

fn string_array<I, S>(items: I) -> Array
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_string()).collect()
}

/// Convert `[tool.poetry]` metadata and dependencies to PEP 621.
pub fn migrate_poetry(root: &Path, dry_run: bool) -> Result<Vec<String>> {
    let mut changes = Vec::new();
    let manifest_path = root.join("pyproject.toml");

    if !manifest_path.exists() {
        return Ok(vec!["No pyproject.toml found".to_string()]);
    }
    let Some(mut doc) = read_toml_doc(&manifest_path) else {
        return Ok(vec!["Could not parse pyproject.toml".to_string()]);
    };
    let Some(poetry) = tool_table(&doc, "poetry") else {
        return Ok(vec!["No [tool.poetry] section found".to_string()]);
    };

    if let Some(name) = poetry.get("name").and_then(|i| i.as_str()) {
        doc["project"]["name"] = value(name);
        changes.push(format!("Migrated project name: {name}"));
    }
    if let Some(version) = poetry.get("version").and_then(|i| i.as_str()) {
        doc["project"]["version"] = value(version);
        changes.push(format!("Migrated version: {version}"));
    }
    if let Some(description) = poetry.get("description").and_then(|i| i.as_str()) {
        doc["project"]["description"] = value(description);
        changes.push("Migrated description".to_string());
    }

    if let Some(authors) = poetry.get("authors").and_then(|i| i.as_array()) {
        let mut migrated = Array::new();
        for author in authors.iter().filter_map(Value::as_str) {
            let mut entry = InlineTable::new();
            if let Some(caps) = author_regex().captures(author) {
                entry.insert("name", caps[1].trim().into());
                entry.insert("email", caps[2].into());
            } else {
                entry.insert("name", author.into());
            }
            migrated.push(Value::InlineTable(entry));
        }
        if !migrated.is_empty() {
            doc["project"]["authors"] = value(migrated);
            changes.push("Migrated authors".to_string());
        }
    }

    if let Some(readme) = poetry.get("readme").and_then(|i| i.as_str()) {
        doc["project"]["readme"] = value(readme);
    } else if root.join("README.md").exists() {
        doc["project"]["readme"] = value("README.md");
    }

    if let Some(license) = poetry.get("license").and_then(|i| i.as_str()) {
        let mut text = InlineTable::new();
        text.insert("text", license.into());
        doc["project"]["license"] = value(Value::InlineTable(text));
        changes.push(format!("Migrated license: {license}"));
    }

    for key in ["keywords", "classifiers"] {
        if let Some(array) = poetry.get(key).and_then(|i| i.as_array()) {
            doc["project"][key] = value(array.clone());
            changes.push(format!("Migrated {key}"));
        }
    }

    let dependencies = poetry.get("dependencies").and_then(|i| i.as_table_like());

    if let Some(python) = dependencies
        .and_then(|d| d.get("python"))
        .and_then(|i| i.as_str())
    {
        let requires = match python.strip_prefix(['^', '~']) {
            Some(version) => format!(">={version}"),
            None => python.to_string(),
        };
        changes.push(format!("Migrated Python requirement: {requires}"));
        doc["project"]["requires-python"] = value(requires);
    }

    let mut deps = Vec::new();
    if let Some(dependencies) = dependencies {
        for (name, spec) in dependencies.iter() {
            if name == "python" {
                continue;
            }
            if let Some(spec) = spec.as_str() {
                deps.push(requirement(name, spec));
            } else if let Some(table) = spec.as_table_like() {
                let version = table.get("version").and_then(|i| i.as_str()).unwrap_or("");
                deps.push(requirement(name, version));
            }
        }
    }
    if !deps.is_empty() {
        changes.push(format!("Migrated {} dependencies", deps.len()));
        doc["project"]["dependencies"] = value(string_array(&deps));
    }

    // Both the group syntax and the legacy [tool.poetry.dev-dependencies]
    // feed the same dev extra.
    let mut dev_deps = Vec::new();
    let group_dev = poetry
        .get("group")
        .and_then(|i| i.as_table_like())
        .and_then(|g| g.get("dev"))
        .and_then(|i| i.as_table_like())
        .and_then(|d| d.get("dependencies"))
        .and_then(|i| i.as_table_like());
    if let Some(dependencies) = group_dev {
        for (name, spec) in dependencies.iter() {
            match spec.as_str() {
                Some(spec) => dev_deps.push(requirement(name, spec)),
                None => dev_deps.push(name.to_string()),
            }
        }
    }
    if let Some(dependencies) = poetry.get("dev-dependencies").and_then(|i| i.as_table_like()) {
        for (name, spec) in dependencies.iter() {
            match spec.as_str() {
                Some(spec) => dev_deps.push(requirement(name, spec)),
                None => dev_deps.push(name.to_string()),
            }
        }
    }
    if !dev_deps.is_empty() {
        changes.push(format!("Migrated {} dev dependencies", dev_deps.len()));
        doc["project"]["optional-dependencies"]["dev"] = value(string_array(&dev_deps));
    }

    if let Some(scripts) = poetry.get("scripts") {
        doc["project"]["scripts"] = scripts.clone();
        changes.push("Migrated scripts/entry points".to_string());
    }

    let mut build_system = Table::new();
    build_system["requires"] = value(Array::from_iter(["hatchling"]));
    build_system["build-backend"] = value("hatchling.build");
    doc["build-system"] = Item::Table(build_system);
    changes.push("Updated build-system to use hatchling".to_string());

    if remove_tool_table(&mut doc, "poetry") {
        changes.push("Removed [tool.poetry] section".to_string());
    }

    if !dry_run {
        write_toml_doc(&manifest_path, &doc)?;
        changes.push("Wrote updated pyproject.toml".to_string());

        let poetry_lock = root.join("poetry.lock");
        if poetry_lock.exists() {
            std::fs::remove_file(&poetry_lock)?;
            changes.push("Removed poetry.lock".to_string());
        }
    }

    Ok(changes)
}

fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| !line.starts_with("-r") && !line.starts_with("-e"))
        .map(ToString::to_string)
        .collect()
}

fn parse_dev_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .map(ToString::to_string)
        .collect()
}

/// Move requirements.txt (and requirements-dev.txt) into pyproject.toml.
/// The requirements files themselves are kept; other tools may still
/// reference them.
pub fn migrate_requirements(root: &Path, dry_run: bool) -> Result<Vec<String>> {
    let req_file = root.join("requirements.txt");
    if !req_file.exists() {
        return Ok(vec!["No requirements.txt found".to_string()]);
    }

    let deps = parse_requirements(&std::fs::read_to_string(&req_file)?);
    if deps.is_empty() {
        return Ok(vec!["No dependencies found in requirements.txt".to_string()]);
    }

    let mut doc = ensure_manifest(root);
    doc["project"]["dependencies"] = value(string_array(&deps));
    let mut changes = vec![format!(
        "Migrated {} dependencies from requirements.txt",
        deps.len()
    )];

    let dev_file = root.join("requirements-dev.txt");
    if dev_file.exists() {
        let dev_deps = parse_dev_requirements(&std::fs::read_to_string(&dev_file)?);
        if !dev_deps.is_empty() {
            doc["project"]["optional-dependencies"]["dev"] = value(string_array(&dev_deps));
            changes.push(format!(
                "Migrated {} dev dependencies from requirements-dev.txt",
                dev_deps.len()
            ));
        }
    }

    if !dry_run {
        write_toml_doc(&root.join("pyproject.toml"), &doc)?;
        changes.push("Wrote pyproject.toml".to_string());
    }

    Ok(changes)
}

fn pipfile_deps(pipfile: &toml::Table, key: &str) -> Vec<String> {
    let Some(packages) = pipfile.get(key).and_then(|v| v.as_table()) else {
        return Vec::new();
    };
    packages
        .iter()
        .map(|(name, spec)| match spec {
            toml::Value::String(s) if s == "*" => name.clone(),
            toml::Value::String(s) => format!("{name}{s}"),
            toml::Value::Table(t) => match t.get("version").and_then(|v| v.as_str()) {
                Some(version) => format!("{name}{version}"),
                None => name.clone(),
            },
            _ => name.clone(),
        })
        .collect()
}

/// Move a Pipfile's packages and dev-packages into pyproject.toml.
pub fn migrate_pipenv(root: &Path, dry_run: bool) -> Result<Vec<String>> {
    let pipfile_path = root.join("Pipfile");
    if !pipfile_path.exists() {
        return Ok(vec!["No Pipfile found".to_string()]);
    }
    let Some(pipfile) = read_toml(&pipfile_path) else {
        return Ok(vec!["Could not parse Pipfile".to_string()]);
    };

    let mut changes = Vec::new();
    let mut doc = ensure_manifest(root);

    let deps = pipfile_deps(&pipfile, "packages");
    if !deps.is_empty() {
        doc["project"]["dependencies"] = value(string_array(&deps));
        changes.push(format!("Migrated {} dependencies from Pipfile", deps.len()));
    }

    let dev_deps = pipfile_deps(&pipfile, "dev-packages");
    if !dev_deps.is_empty() {
        doc["project"]["optional-dependencies"]["dev"] = value(string_array(&dev_deps));
        changes.push(format!(
            "Migrated {} dev dependencies from Pipfile",
            dev_deps.len()
        ));
    }

    if let Some(python) = pipfile
        .get("requires")
        .and_then(|v| v.get("python_version"))
        .and_then(|v| v.as_str())
    {
        doc["project"]["requires-python"] = value(format!(">={python}"));
        changes.push(format!("Migrated Python requirement: >={python}"));
    }

    if !dry_run {
        write_toml_doc(&root.join("pyproject.toml"), &doc)?;
        changes.push("Wrote pyproject.toml".to_string());
    }

    Ok(changes)
}

/// Move setup.cfg metadata into pyproject.toml. A bare setup.py is too
/// dynamic to convert, so that path only emits guidance.
pub fn migrate_setuptools(root: &Path, dry_run: bool) -> Result<Vec<String>> {
    let mut changes = Vec::new();
    let setup_cfg = root.join("setup.cfg");

    if let Some(config) = read_ini(&setup_cfg) {
        let mut doc = ensure_manifest(root);

        if config.has_section("metadata") {
            if let Some(name) = config.get("metadata", "name") {
                doc["project"]["name"] = value(name);
            }
            if let Some(version) = config.get("metadata", "version") {
                doc["project"]["version"] = value(version);
            }
            if let Some(description) = config.get("metadata", "description") {
                doc["project"]["description"] = value(description);
            }
            if let Some(author) = config.get("metadata", "author") {
                let mut entry = InlineTable::new();
                entry.insert("name", author.into());
                if let Some(email) = config.get("metadata", "author_email") {
                    entry.insert("email", email.into());
                }
                doc["project"]["authors"] = value(Array::from_iter([Value::InlineTable(entry)]));
            }
            if let Some(license) = config.get("metadata", "license") {
                let mut text = InlineTable::new();
                text.insert("text", license.into());
                doc["project"]["license"] = value(Value::InlineTable(text));
            }
            changes.push("Migrated metadata from setup.cfg".to_string());
        }

        if config.has_section("options") {
            if let Some(requires) = config.get("options", "python_requires") {
                doc["project"]["requires-python"] = value(requires);
            }
            if let Some(install_requires) = config.get("options", "install_requires") {
                let deps: Vec<&str> = install_requires
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect();
                if !deps.is_empty() {
                    changes.push(format!("Migrated {} dependencies", deps.len()));
                    doc["project"]["dependencies"] = value(string_array(deps));
                }
            }
        }

        if !dry_run {
            write_toml_doc(&root.join("pyproject.toml"), &doc)?;
            changes.push("Wrote pyproject.toml".to_string());
        }
    }

    if root.join("setup.py").exists() && !setup_cfg.exists() {
        changes.push("Found setup.py - manual migration recommended".to_string());
        changes.push("Tip: Run 'python setup.py egg_info' to extract metadata".to_string());
    }

    Ok(changes)
}
