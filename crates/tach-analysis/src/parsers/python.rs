//! Python import extraction over the tree-sitter grammar.

use std::path::Path;

use tach_core::errors::ParseError;
use tree_sitter::{Node, Parser, TreeCursor};

use super::types::RawImport;

const FUTURE_MODULE: &str = "__future__";

/// Parse `source` and return every import it contains, in source order.
///
/// A file with any syntax error yields a single [`ParseError::Syntax`]
/// pointing at the first error node; no imports are returned for it.
pub fn extract_imports(source: &[u8], path: &Path) -> Result<Vec<RawImport>, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|_| ParseError::GrammarNotFound {
            language: "python".to_string(),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::TreeSitterError {
            path: path.to_path_buf(),
            message: "tree-sitter returned None".to_string(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, message) = first_syntax_error(root);
        return Err(ParseError::Syntax {
            path: path.to_path_buf(),
            line,
            message,
        });
    }

    let mut imports = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let descend = match node.kind() {
            "import_statement" => {
                collect_import(node, source, &mut imports);
                false
            }
            "import_from_statement" => {
                collect_import_from(node, source, &mut imports);
                false
            }
            "future_import_statement" => false,
            _ => true,
        };
        if descend && cursor.goto_first_child() {
            continue;
        }
        if !advance(&mut cursor) {
            break;
        }
    }
    Ok(imports)
}

/// Move to the next node in pre-order that is not below the current one.
fn advance(cursor: &mut TreeCursor) -> bool {
    loop {
        if cursor.goto_next_sibling() {
            return true;
        }
        if !cursor.goto_parent() {
            return false;
        }
    }
}

/// `import a.b`, `import a.b as c`, `import a, b`
fn collect_import(node: Node, source: &[u8], out: &mut Vec<RawImport>) {
    let line = line_of(node);
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        if let Some(path) = imported_name(name, source) {
            out.push(RawImport::new(path, line));
        }
    }
}

/// `from X import y, z`, `from X import *`, `from .X import y`, `from .. import y`
fn collect_import_from(node: Node, source: &[u8], out: &mut Vec<RawImport>) {
    let Some(module) = node
        .child_by_field_name("module_name")
        .and_then(|m| node_text(m, source))
    else {
        return;
    };
    if module == FUTURE_MODULE {
        return;
    }
    let line = line_of(node);

    let mut cursor = node.walk();
    let wildcard = node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import");
    if wildcard {
        out.push(RawImport::new(module, line));
        return;
    }

    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        let Some(member) = imported_name(name, source) else {
            continue;
        };
        let path = if module.ends_with('.') {
            format!("{module}{member}")
        } else {
            format!("{module}.{member}")
        };
        out.push(RawImport::new(path, line));
    }
}

fn imported_name(node: Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "dotted_name" => node_text(node, source),
        "aliased_import" => node
            .child_by_field_name("name")
            .and_then(|n| node_text(n, source)),
        _ => None,
    }
}

/// Node text with any interior whitespace removed (`a . b` is `a.b`).
fn node_text(node: Node, source: &[u8]) -> Option<String> {
    let text: String = node
        .utf8_text(source)
        .ok()?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    (!text.is_empty()).then_some(text)
}

fn line_of(node: Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Line and message of the first ERROR or MISSING node in source order.
fn first_syntax_error(root: Node) -> (u32, String) {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_missing() {
            return (line_of(node), format!("missing '{}'", node.kind()));
        }
        if node.is_error() {
            return (line_of(node), "invalid syntax".to_string());
        }
        // Only subtrees that contain an error are worth entering
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        if !advance(&mut cursor) {
            return (line_of(root), "invalid syntax".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(source: &str) -> Vec<(String, u32)> {
        extract_imports(source.as_bytes(), Path::new("mod.py"))
            .unwrap()
            .into_iter()
            .map(|i| (i.path, i.line))
            .collect()
    }

    #[test]
    fn plain_imports_yield_one_record_per_name() {
        let found = paths("import os\nimport a.b as c, d\n");
        assert_eq!(
            found,
            vec![
                ("os".to_string(), 1),
                ("a.b".to_string(), 2),
                ("d".to_string(), 2),
            ]
        );
    }

    #[test]
    fn from_imports_join_module_and_member() {
        let found = paths("from core.service import run, stop as halt\n");
        assert_eq!(
            found,
            vec![
                ("core.service.run".to_string(), 1),
                ("core.service.stop".to_string(), 1),
            ]
        );
    }

    #[test]
    fn wildcard_import_records_the_module() {
        assert_eq!(paths("from core import *\n"), vec![("core".to_string(), 1)]);
    }

    #[test]
    fn relative_imports_keep_their_dots() {
        let found = paths("from .sibling import x\nfrom .. import y\nfrom . import *\n");
        assert_eq!(
            found,
            vec![
                (".sibling.x".to_string(), 1),
                ("..y".to_string(), 2),
                (".".to_string(), 3),
            ]
        );
    }

    #[test]
    fn future_imports_are_ignored() {
        let found = paths("from __future__ import annotations\nimport json\n");
        assert_eq!(found, vec![("json".to_string(), 2)]);
    }

    #[test]
    fn nested_imports_are_included() {
        let source = "\
def load():
    import yaml
    return yaml

try:
    from fast import impl
except ImportError:
    if True:
        from slow import impl
";
        let found = paths(source);
        assert_eq!(
            found,
            vec![
                ("yaml".to_string(), 2),
                ("fast.impl".to_string(), 6),
                ("slow.impl".to_string(), 9),
            ]
        );
    }

    #[test]
    fn multiline_from_import_uses_statement_line() {
        let found = paths("\n\nfrom pkg import (\n    a,\n    b,\n)\n");
        assert_eq!(
            found,
            vec![("pkg.a".to_string(), 3), ("pkg.b".to_string(), 3)]
        );
    }

    #[test]
    fn syntax_error_is_reported_once_with_line() {
        let err = extract_imports(b"import os\n\ndef broken(:\n    pass\n", Path::new("bad.py"))
            .unwrap_err();
        match err {
            ParseError::Syntax { path, line, .. } => {
                assert_eq!(path, Path::new("bad.py"));
                assert_eq!(line, 3);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_has_no_imports() {
        assert!(paths("").is_empty());
    }
}
