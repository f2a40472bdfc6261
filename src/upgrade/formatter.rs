//! black → ruff format
//!
//! Pure manifest rewrite, no files to delete. ruff's formatter defaults
//! already track Black's style, so only the handful of knobs Black
//! exposes need carrying over.

use super::{remove_tool_table, tool_table};
use toml_edit::{value, DocumentMut, Table};

pub fn migrate_black(doc: &mut DocumentMut) -> Vec<String> {
    let mut changes = Vec::new();
    let black = tool_table(doc, "black").unwrap_or_else(Table::new);

    match black.get("line-length").and_then(|i| i.as_integer()) {
        Some(line_length) => {
            doc["tool"]["ruff"]["line-length"] = value(line_length);
            changes.push(format!("Migrated line-length: {line_length}"));
        }
        None => {
            let already_set = tool_table(doc, "ruff")
                .is_some_and(|ruff| ruff.contains_key("line-length"));
            if !already_set {
                doc["tool"]["ruff"]["line-length"] = value(88);
                changes.push("Set line-length to 88 (Black default)".to_string());
            }
        }
    }

    // Black takes a list of targets; ruff takes the single floor version,
    // so the last (highest) entry wins.
    let target = black
        .get("target-version")
        .and_then(|i| match i.as_array() {
            Some(versions) => versions.iter().last().and_then(|v| v.as_str()),
            None => i.as_str(),
        });
    if let Some(target) = target {
        if target.starts_with("py") {
            doc["tool"]["ruff"]["target-version"] = value(target);
            changes.push(format!("Migrated target-version: {target}"));
        }
    }

    doc["tool"]["ruff"]["format"]["quote-style"] = value("double");

    if let Some(skip) = black
        .get("skip-magic-trailing-comma")
        .and_then(|i| i.as_bool())
    {
        doc["tool"]["ruff"]["format"]["skip-magic-trailing-comma"] = value(skip);
    }

    if remove_tool_table(doc, "black") {
        changes.push("Removed [tool.black] section".to_string());
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> DocumentMut {
        content.parse().unwrap()
    }

    #[test]
    fn carries_black_settings_into_ruff() {
        let mut manifest = doc(
            "[tool.black]\nline-length = 100\ntarget-version = [\"py310\", \"py312\"]\nskip-magic-trailing-comma = true\n",
        );
        let changes = migrate_black(&mut manifest);

        let rendered = manifest.to_string();
        assert!(rendered.contains("line-length = 100"));
        assert!(rendered.contains("target-version = \"py312\""));
        assert!(rendered.contains("quote-style = \"double\""));
        assert!(rendered.contains("skip-magic-trailing-comma = true"));
        assert!(!rendered.contains("[tool.black]"));
        assert!(changes.iter().any(|c| c.contains("Removed [tool.black]")));
    }

    #[test]
    fn defaults_line_length_when_black_has_none() {
        let mut manifest = doc("[tool.black]\n");
        migrate_black(&mut manifest);
        assert!(manifest.to_string().contains("line-length = 88"));
    }

    #[test]
    fn existing_ruff_line_length_is_kept() {
        let mut manifest = doc("[tool.black]\n\n[tool.ruff]\nline-length = 120\n");
        let changes = migrate_black(&mut manifest);
        assert!(manifest.to_string().contains("line-length = 120"));
        assert!(!changes.iter().any(|c| c.contains("88")));
    }

    #[test]
    fn unrelated_sections_survive_untouched() {
        let mut manifest = doc(
            "# hand-written comment\n[project]\nname = \"demo\" # inline note\n\n[tool.black]\nline-length = 90\n",
        );
        migrate_black(&mut manifest);
        let rendered = manifest.to_string();
        assert!(rendered.contains("# hand-written comment"));
        assert!(rendered.contains("name = \"demo\" # inline note"));
    }
}
