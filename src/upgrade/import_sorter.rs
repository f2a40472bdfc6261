//! isort → ruff lint.isort
//!
//! Settings may live in `[tool.isort]`, in .isort.cfg, or in a setup.cfg
//! `[isort]` section; the manifest wins when more than one is present.
//! The target shape is `[tool.ruff.lint.isort]` with kebab-case keys plus
//! the `I` rule group enabled in `lint.select`.

use super::{ini_bool, remove_tool_table, tool_table};
use crate::readers::read_ini;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;
use toml_edit::{value, Array, DocumentMut, Item, Table};

#[derive(Default)]
struct IsortSettings {
    known_first_party: Option<Array>,
    known_third_party: Option<Array>,
    known_local_folder: Option<Array>,
    force_single_line: Option<bool>,
    combine_as_imports: Option<bool>,
}

fn csv_array(raw: &str) -> Array {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn from_manifest(isort: &Table) -> IsortSettings {
    IsortSettings {
        known_first_party: isort
            .get("known_first_party")
            .and_then(|i| i.as_array())
            .cloned(),
        known_third_party: isort
            .get("known_third_party")
            .and_then(|i| i.as_array())
            .cloned(),
        known_local_folder: isort
            .get("known_local_folder")
            .and_then(|i| i.as_array())
            .cloned(),
        force_single_line: isort.get("force_single_line").and_then(|i| i.as_bool()),
        combine_as_imports: isort.get("combine_as_imports").and_then(|i| i.as_bool()),
    }
}

fn from_ini(section: &BTreeMap<String, String>) -> IsortSettings {
    IsortSettings {
        known_first_party: section.get("known_first_party").map(|v| csv_array(v)),
        known_third_party: section.get("known_third_party").map(|v| csv_array(v)),
        known_local_folder: section.get("known_local_folder").map(|v| csv_array(v)),
        force_single_line: section.get("force_single_line").map(|v| ini_bool(v)),
        combine_as_imports: section.get("combine_as_imports").map(|v| ini_bool(v)),
    }
}

fn load_settings(root: &Path, doc: &DocumentMut) -> IsortSettings {
    if let Some(isort) = tool_table(doc, "isort") {
        return from_manifest(&isort);
    }
    if let Some(cfg) = read_ini(&root.join(".isort.cfg")) {
        // isort's own config file uses [settings]; some projects use [isort]
        if let Some(section) = cfg.section("settings").or_else(|| cfg.section("isort")) {
            return from_ini(section);
        }
    }
    if let Some(setup_cfg) = read_ini(&root.join("setup.cfg")) {
        if let Some(section) = setup_cfg.section("isort") {
            return from_ini(section);
        }
    }
    IsortSettings::default()
}

pub fn migrate_isort(root: &Path, doc: &mut DocumentMut, dry_run: bool) -> Result<Vec<String>> {
    let mut changes = Vec::new();
    let settings = load_settings(root, doc);

    let isort_item = &mut doc["tool"]["ruff"]["lint"]["isort"];
    if isort_item.is_none() {
        *isort_item = Item::Table(Table::new());
    }

    let known = [
        ("known_first_party", "known-first-party", settings.known_first_party),
        ("known_third_party", "known-third-party", settings.known_third_party),
        ("known_local_folder", "known-local-folder", settings.known_local_folder),
    ];
    for (isort_key, ruff_key, entries) in known {
        if let Some(entries) = entries {
            doc["tool"]["ruff"]["lint"]["isort"][ruff_key] = value(entries);
            changes.push(format!("Migrated {isort_key}"));
        }
    }

    if let Some(force_single_line) = settings.force_single_line {
        doc["tool"]["ruff"]["lint"]["isort"]["force-single-line"] = value(force_single_line);
        changes.push("Migrated force_single_line".to_string());
    }
    if let Some(combine_as_imports) = settings.combine_as_imports {
        doc["tool"]["ruff"]["lint"]["isort"]["combine-as-imports"] = value(combine_as_imports);
        changes.push("Migrated combine_as_imports".to_string());
    }

    let select = &mut doc["tool"]["ruff"]["lint"]["select"];
    if select.is_none() {
        *select = value(Array::from_iter(["E", "F", "I"]));
        changes.push("Added I (isort) rules to ruff lint.select".to_string());
    } else if let Some(select) = select.as_array_mut() {
        if !select.iter().any(|v| v.as_str() == Some("I")) {
            select.push("I");
            changes.push("Added I (isort) to ruff lint.select".to_string());
        }
    }

    if remove_tool_table(doc, "isort") {
        changes.push("Removed [tool.isort] section".to_string());
    }

    let isort_cfg = root.join(".isort.cfg");
    if isort_cfg.exists() && !dry_run {
        std::fs::remove_file(&isort_cfg)?;
        changes.push("Removed .isort.cfg file".to_string());
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn manifest_settings_move_to_ruff() {
        let dir = TempDir::new().unwrap();
        let mut doc: DocumentMut = "[tool.isort]\nknown_first_party = [\"myapp\"]\nforce_single_line = true\n"
            .parse()
            .unwrap();

        migrate_isort(dir.path(), &mut doc, false).unwrap();

        let rendered = doc.to_string();
        assert!(rendered.contains("known-first-party = [\"myapp\"]"));
        assert!(rendered.contains("force-single-line = true"));
        assert!(!rendered.contains("[tool.isort]"));
        assert!(rendered.contains("select = [\"E\", \"F\", \"I\"]"));
    }

    #[test]
    fn appends_i_to_existing_select() {
        let dir = TempDir::new().unwrap();
        let mut doc: DocumentMut = "[tool.isort]\n\n[tool.ruff.lint]\nselect = [\"E\", \"F\"]\n"
            .parse()
            .unwrap();

        migrate_isort(dir.path(), &mut doc, false).unwrap();
        assert!(doc.to_string().contains("select = [\"E\", \"F\", \"I\"]"));
    }

    #[test]
    fn select_already_containing_i_is_untouched() {
        let dir = TempDir::new().unwrap();
        let mut doc: DocumentMut = "[tool.isort]\n\n[tool.ruff.lint]\nselect = [\"I\", \"E\"]\n"
            .parse()
            .unwrap();

        let changes = migrate_isort(dir.path(), &mut doc, false).unwrap();
        assert!(!changes.iter().any(|c| c.contains("lint.select")));
    }

    #[test]
    fn isort_cfg_is_read_then_deleted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".isort.cfg"),
            "[settings]\nknown_first_party = myapp, mylib\ncombine_as_imports = true\n",
        )
        .unwrap();
        let mut doc = DocumentMut::new();

        migrate_isort(dir.path(), &mut doc, false).unwrap();

        let rendered = doc.to_string();
        assert!(rendered.contains("known-first-party = [\"myapp\", \"mylib\"]"));
        assert!(rendered.contains("combine-as-imports = true"));
        assert!(!dir.path().join(".isort.cfg").exists());
    }

    #[test]
    fn dry_run_keeps_isort_cfg() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".isort.cfg"), "[settings]\n").unwrap();
        let mut doc = DocumentMut::new();

        migrate_isort(dir.path(), &mut doc, true).unwrap();
        assert!(dir.path().join(".isort.cfg").exists());
    }
}
