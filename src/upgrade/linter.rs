//! flake8 → ruff lint
//!
//! flake8 has no pyproject.toml support, so the source is always an ini
//! file: .flake8 first, then a setup.cfg `[flake8]` section. Only .flake8
//! is deleted afterwards; setup.cfg may hold unrelated sections.

use crate::readers::read_ini;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;
use toml_edit::{value, Array, DocumentMut, Item, Table};

fn load_settings(root: &Path) -> BTreeMap<String, String> {
    if let Some(cfg) = read_ini(&root.join(".flake8")) {
        if let Some(section) = cfg.section("flake8") {
            return section.clone();
        }
    }
    if let Some(setup_cfg) = read_ini(&root.join("setup.cfg")) {
        if let Some(section) = setup_cfg.section("flake8") {
            return section.clone();
        }
    }
    BTreeMap::new()
}

fn csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub fn migrate_flake8(root: &Path, doc: &mut DocumentMut, dry_run: bool) -> Result<Vec<String>> {
    let mut changes = Vec::new();
    let settings = load_settings(root);

    let lint = &mut doc["tool"]["ruff"]["lint"];
    if lint.is_none() {
        *lint = Item::Table(Table::new());
    }

    if let Some(line_length) = settings
        .get("max-line-length")
        .and_then(|v| v.parse::<i64>().ok())
    {
        doc["tool"]["ruff"]["line-length"] = value(line_length);
        changes.push(format!("Migrated max-line-length: {line_length}"));
    }

    if let Some(ignore) = settings.get("ignore") {
        let ignored = csv_list(ignore);
        changes.push(format!("Migrated {} ignore rules", ignored.len()));
        doc["tool"]["ruff"]["lint"]["ignore"] = value(Array::from_iter(ignored));
    }

    if let Some(exclude) = settings.get("exclude") {
        let excluded = csv_list(exclude);
        changes.push(format!("Migrated {} exclude patterns", excluded.len()));
        doc["tool"]["ruff"]["exclude"] = value(Array::from_iter(excluded));
    }

    let select = &mut doc["tool"]["ruff"]["lint"]["select"];
    if select.is_none() {
        *select = value(Array::from_iter(["E", "F", "W"]));
        changes.push("Added E, F, W rules to ruff lint.select".to_string());
    }

    let flake8_file = root.join(".flake8");
    if flake8_file.exists() && !dry_run {
        std::fs::remove_file(&flake8_file)?;
        changes.push("Removed .flake8 file".to_string());
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn flake8_file_settings_move_to_ruff() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".flake8"),
            "[flake8]\nmax-line-length = 110\nignore = E203, W503\nexclude = build, dist,\n",
        )
        .unwrap();
        let mut doc = DocumentMut::new();

        let changes = migrate_flake8(dir.path(), &mut doc, false).unwrap();

        let rendered = doc.to_string();
        assert!(rendered.contains("line-length = 110"));
        assert!(rendered.contains("ignore = [\"E203\", \"W503\"]"));
        assert!(rendered.contains("exclude = [\"build\", \"dist\"]"));
        assert!(rendered.contains("select = [\"E\", \"F\", \"W\"]"));
        assert!(changes.iter().any(|c| c.contains("Migrated 2 ignore rules")));
        assert!(!dir.path().join(".flake8").exists());
    }

    #[test]
    fn setup_cfg_section_is_read_but_never_deleted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("setup.cfg"),
            "[metadata]\nname = demo\n\n[flake8]\nmax-line-length = 95\n",
        )
        .unwrap();
        let mut doc = DocumentMut::new();

        migrate_flake8(dir.path(), &mut doc, false).unwrap();
        assert!(doc.to_string().contains("line-length = 95"));
        assert!(dir.path().join("setup.cfg").exists());
    }

    #[test]
    fn existing_select_is_preserved() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".flake8"), "[flake8]\n").unwrap();
        let mut doc: DocumentMut = "[tool.ruff.lint]\nselect = [\"ALL\"]\n".parse().unwrap();

        let changes = migrate_flake8(dir.path(), &mut doc, false).unwrap();
        assert!(doc.to_string().contains("select = [\"ALL\"]"));
        assert!(!changes.iter().any(|c| c.contains("lint.select")));
    }

    #[test]
    fn dry_run_keeps_flake8_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".flake8"), "[flake8]\n").unwrap();
        let mut doc = DocumentMut::new();

        migrate_flake8(dir.path(), &mut doc, true).unwrap();
        assert!(dir.path().join(".flake8").exists());
    }
}
