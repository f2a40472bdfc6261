//! Type annotation coverage analyzer
//!
//! Walks every Python file under the project root (skipping dependency
//! caches, VCS metadata, and build output), parses each with tree-sitter,
//! and counts how many function definitions carry a return-type annotation
//! or at least one typed parameter. Files that fail to read or parse are
//! skipped, never fatal.

use super::EXCLUDED_DIRS;
use ignore::WalkBuilder;
use std::path::Path;
use tracing::debug;
use tree_sitter::{Node, Parser};

/// Annotation coverage over one project tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeCoverage {
    /// annotated / total * 100; 100.0 for a tree with no functions at all,
    /// so empty or new projects are not penalized.
    pub percent: f64,
    pub annotated: usize,
    pub total: usize,
}

pub fn analyze(root: &Path) -> TypeCoverage {
    let mut annotated = 0usize;
    let mut total = 0usize;

    // EXCLUDED_DIRS is the only filter; hidden files and gitignored
    // files still count toward coverage.
    let walker = WalkBuilder::new(root)
        .follow_links(false)
        .standard_filters(false)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !EXCLUDED_DIRS.contains(&name.as_ref())
        })
        .build();

    for entry in walker.flatten() {
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if path.extension().map_or(true, |ext| ext != "py") {
            continue;
        }
        let Ok(source) = std::fs::read_to_string(path) else {
            continue;
        };
        match count_functions(&source) {
            Some((file_annotated, file_total)) => {
                annotated += file_annotated;
                total += file_total;
            }
            None => debug!("skipping unparseable Python file: {}", path.display()),
        }
    }

    if total == 0 {
        return TypeCoverage {
            percent: 100.0,
            annotated: 0,
            total: 0,
        };
    }

    TypeCoverage {
        percent: annotated as f64 / total as f64 * 100.0,
        annotated,
        total,
    }
}

/// Count (annotated, total) function definitions in one source file.
/// `None` when the file does not parse cleanly.
pub(crate) fn count_functions(source: &str) -> Option<(usize, usize)> {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE;
    parser.set_language(&language.into()).ok()?;

    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }

    let mut annotated = 0;
    let mut total = 0;
    visit(root, &mut annotated, &mut total);
    Some((annotated, total))
}

/// Recursive walk covers methods, nested functions, and decorated
/// definitions; async defs are `function_definition` nodes too.
fn visit(node: Node, annotated: &mut usize, total: &mut usize) {
    if node.kind() == "function_definition" {
        *total += 1;
        if is_annotated(&node) {
            *annotated += 1;
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, annotated, total);
    }
}

fn is_annotated(node: &Node) -> bool {
    if node.child_by_field_name("return_type").is_some() {
        return true;
    }
    let Some(params) = node.child_by_field_name("parameters") else {
        return false;
    };
    let mut cursor = params.walk();
    let annotated = params
        .children(&mut cursor)
        .any(|p| matches!(p.kind(), "typed_parameter" | "typed_default_parameter"));
    annotated
}
