//! Tolerant loaders for the config formats probed during detection
//!
//! Detection is best-effort, not validation: a missing or malformed file
//! reads as `None` and the caller treats the tool as not detected. Parse
//! errors never propagate past this module.
//!
//! Two TOML paths exist on purpose. Detectors read through `toml` into
//! plain values; the migration executors go through `toml_edit` so that
//! comments and formatting of unrelated sections survive a rewrite.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use toml_edit::DocumentMut;
use tracing::debug;

/// Read a TOML file into a plain value table. `None` on missing or malformed.
pub fn read_toml(path: &Path) -> Option<toml::Table> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(table) => Some(table),
        Err(err) => {
            debug!("treating malformed TOML as absent: {}: {err}", path.display());
            None
        }
    }
}

/// Read a TOML file as an editable document that preserves formatting.
pub fn read_toml_doc(path: &Path) -> Option<DocumentMut> {
    let content = std::fs::read_to_string(path).ok()?;
    match content.parse::<DocumentMut>() {
        Ok(doc) => Some(doc),
        Err(err) => {
            debug!("treating malformed TOML as absent: {}: {err}", path.display());
            None
        }
    }
}

/// Write an edited document back as a whole-file rewrite.
pub fn write_toml_doc(path: &Path, doc: &DocumentMut) -> Result<()> {
    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// A flat section/key view of an ini-style config file.
///
/// Matches what Python's configparser accepts for the files this crate
/// cares about (setup.cfg, .flake8, .isort.cfg, mypy.ini): `[section]`
/// headers, `key = value` or `key: value` pairs, `#`/`;` comments, and
/// indented continuation lines appended to the previous value. Keys are
/// case-insensitive. Lines that fit none of those shapes are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn parse(content: &str) -> Self {
        let mut doc = IniDocument::default();
        let mut section: Option<String> = None;
        let mut key: Option<String> = None;

        for raw_line in content.lines() {
            let line = raw_line.trim_end();
            if line.trim().is_empty() {
                key = None;
                continue;
            }

            // Continuation: indented line under an active key
            if line.starts_with([' ', '\t']) {
                if let (Some(section), Some(key)) = (&section, &key) {
                    if let Some(value) = doc
                        .sections
                        .get_mut(section)
                        .and_then(|s| s.get_mut(key))
                    {
                        value.push('\n');
                        value.push_str(line.trim());
                    }
                }
                continue;
            }

            key = None;
            if line.starts_with(['#', ';']) {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(name.trim().to_string());
                doc.sections.entry(name.trim().to_string()).or_default();
                continue;
            }

            let Some(section) = &section else { continue };
            let Some(split) = line.find(['=', ':']) else { continue };
            let (k, v) = line.split_at(split);
            let k = k.trim().to_lowercase();
            if k.is_empty() {
                continue;
            }
            let v = v[1..].trim().to_string();
            doc.sections
                .entry(section.clone())
                .or_default()
                .insert(k.clone(), v);
            key = Some(k);
        }

        doc
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(&key.to_lowercase())
            .map(String::as_str)
    }

    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(name)
    }
}

/// Read an ini-style config file. `None` only when the file is missing or
/// unreadable; malformed content degrades to whatever lines did parse.
pub fn read_ini(path: &Path) -> Option<IniDocument> {
    let content = std::fs::read_to_string(path).ok()?;
    Some(IniDocument::parse(&content))
}
