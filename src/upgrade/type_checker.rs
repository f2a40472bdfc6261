//! mypy → basedpyright
//!
//! mypy's many strictness flags collapse into basedpyright's single
//! `typeCheckingMode`: full strict maps to "strict", the common opt-in
//! flags map to "standard", anything else starts at "basic".

use super::{ini_bool, remove_tool_table, tool_table};
use crate::readers::read_ini;
use anyhow::Result;
use std::path::Path;
use toml_edit::{value, DocumentMut, Item, Table};

#[derive(Default)]
struct MypySettings {
    strict: bool,
    warn_return_any: bool,
    disallow_untyped_defs: bool,
    python_version: Option<String>,
    ignore_missing_imports: bool,
}

fn manifest_bool(mypy: &Table, key: &str) -> bool {
    mypy.get(key).and_then(Item::as_bool).unwrap_or(false)
}

fn from_manifest(mypy: &Table) -> MypySettings {
    // python_version is supposed to be a string, but an unquoted 3.12
    // parses as a TOML float.
    let python_version = mypy.get("python_version").and_then(|item| {
        item.as_str()
            .map(ToString::to_string)
            .or_else(|| item.as_float().map(|f| f.to_string()))
    });
    MypySettings {
        strict: manifest_bool(mypy, "strict"),
        warn_return_any: manifest_bool(mypy, "warn_return_any"),
        disallow_untyped_defs: manifest_bool(mypy, "disallow_untyped_defs"),
        python_version,
        ignore_missing_imports: manifest_bool(mypy, "ignore_missing_imports"),
    }
}

fn load_settings(root: &Path, doc: &DocumentMut) -> MypySettings {
    if let Some(mypy) = tool_table(doc, "mypy") {
        return from_manifest(&mypy);
    }
    for ini_file in ["mypy.ini", ".mypy.ini"] {
        if let Some(cfg) = read_ini(&root.join(ini_file)) {
            if let Some(section) = cfg.section("mypy") {
                return MypySettings {
                    strict: section.get("strict").map(|v| ini_bool(v)).unwrap_or(false),
                    warn_return_any: section
                        .get("warn_return_any")
                        .map(|v| ini_bool(v))
                        .unwrap_or(false),
                    disallow_untyped_defs: section
                        .get("disallow_untyped_defs")
                        .map(|v| ini_bool(v))
                        .unwrap_or(false),
                    python_version: section.get("python_version").cloned(),
                    ignore_missing_imports: section
                        .get("ignore_missing_imports")
                        .map(|v| ini_bool(v))
                        .unwrap_or(false),
                };
            }
        }
    }
    MypySettings::default()
}

pub fn migrate_mypy(root: &Path, doc: &mut DocumentMut, dry_run: bool) -> Result<Vec<String>> {
    let mut changes = Vec::new();
    let settings = load_settings(root, doc);

    if settings.strict {
        doc["tool"]["basedpyright"]["typeCheckingMode"] = value("strict");
        changes.push("Set typeCheckingMode to strict (from mypy strict)".to_string());
    } else if settings.warn_return_any || settings.disallow_untyped_defs {
        doc["tool"]["basedpyright"]["typeCheckingMode"] = value("standard");
        changes.push("Set typeCheckingMode to standard".to_string());
    } else {
        doc["tool"]["basedpyright"]["typeCheckingMode"] = value("basic");
        changes.push("Set typeCheckingMode to basic".to_string());
    }

    if let Some(python_version) = &settings.python_version {
        doc["tool"]["basedpyright"]["pythonVersion"] = value(python_version);
        changes.push(format!("Migrated python_version: {python_version}"));
    }

    if settings.ignore_missing_imports {
        doc["tool"]["basedpyright"]["reportMissingImports"] = value(false);
        changes.push("Migrated ignore_missing_imports".to_string());
    }

    if remove_tool_table(doc, "mypy") {
        changes.push("Removed [tool.mypy] section".to_string());
    }

    for ini_file in ["mypy.ini", ".mypy.ini"] {
        let ini_path = root.join(ini_file);
        if ini_path.exists() && !dry_run {
            std::fs::remove_file(&ini_path)?;
            changes.push(format!("Removed {ini_file}"));
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn strict_mypy_maps_to_strict_mode() {
        let dir = TempDir::new().unwrap();
        let mut doc: DocumentMut = "[tool.mypy]\nstrict = true\npython_version = \"3.12\"\n"
            .parse()
            .unwrap();

        migrate_mypy(dir.path(), &mut doc, false).unwrap();

        let rendered = doc.to_string();
        assert!(rendered.contains("typeCheckingMode = \"strict\""));
        assert!(rendered.contains("pythonVersion = \"3.12\""));
        assert!(!rendered.contains("[tool.mypy]"));
    }

    #[test]
    fn partial_strictness_maps_to_standard() {
        let dir = TempDir::new().unwrap();
        let mut doc: DocumentMut = "[tool.mypy]\ndisallow_untyped_defs = true\n".parse().unwrap();
        migrate_mypy(dir.path(), &mut doc, false).unwrap();
        assert!(doc.to_string().contains("typeCheckingMode = \"standard\""));
    }

    #[test]
    fn bare_mypy_section_maps_to_basic() {
        let dir = TempDir::new().unwrap();
        let mut doc: DocumentMut = "[tool.mypy]\n".parse().unwrap();
        migrate_mypy(dir.path(), &mut doc, false).unwrap();
        assert!(doc.to_string().contains("typeCheckingMode = \"basic\""));
    }

    #[test]
    fn ignore_missing_imports_becomes_report_flag() {
        let dir = TempDir::new().unwrap();
        let mut doc: DocumentMut = "[tool.mypy]\nignore_missing_imports = true\n".parse().unwrap();
        migrate_mypy(dir.path(), &mut doc, false).unwrap();
        assert!(doc.to_string().contains("reportMissingImports = false"));
    }

    #[test]
    fn mypy_ini_is_read_then_deleted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("mypy.ini"),
            "[mypy]\nstrict = True\npython_version = 3.12\n",
        )
        .unwrap();
        let mut doc = DocumentMut::new();

        let changes = migrate_mypy(dir.path(), &mut doc, false).unwrap();

        let rendered = doc.to_string();
        assert!(rendered.contains("typeCheckingMode = \"strict\""));
        assert!(rendered.contains("pythonVersion = \"3.12\""));
        assert!(!dir.path().join("mypy.ini").exists());
        assert!(changes.iter().any(|c| c.contains("Removed mypy.ini")));
    }

    #[test]
    fn dry_run_keeps_ini_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".mypy.ini"), "[mypy]\n").unwrap();
        let mut doc = DocumentMut::new();

        migrate_mypy(dir.path(), &mut doc, true).unwrap();
        assert!(dir.path().join(".mypy.ini").exists());
    }
}
