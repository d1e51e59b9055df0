//! Tree-sitter parsing of Go source into a [`SyntaxTree`].
//!
//! tree-sitter always produces a tree; a buffer counts as unparsable when the
//! tree contains ERROR or MISSING nodes, nests deeper than
//! [`MAX_NESTING_DEPTH`], or does not open with a package clause.

use crate::syntax::{children, named_children, start_position, NodeKind, SyntaxTree};
use gosem_core::{Diagnostic, GosemError};
use tree_sitter::{Node, Parser};

/// Deepest node nesting accepted. Binding, resolution and classification
/// recurse once per level.
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Longest snippet of offending source quoted in a syntax error.
const MAX_SNIPPET_LEN: usize = 24;

/// Parses Go source buffers.
pub struct GoParser {
    language: tree_sitter::Language,
}

impl GoParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Parse `source` under the virtual file name `name`.
    pub fn parse(&self, name: &str, source: &str) -> Result<SyntaxTree, GosemError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| GosemError::Language(e.to_string()))?;

        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| GosemError::Language("tree-sitter returned no tree".to_string()))?;
        let tree = SyntaxTree::new(name.to_string(), source.to_string(), tree);

        if let Some(diag) = nesting_too_deep(&tree) {
            return Err(GosemError::Syntax(diag));
        }
        if let Some(diag) = first_syntax_error(&tree) {
            return Err(GosemError::Syntax(diag));
        }
        if let Some(diag) = missing_package_clause(&tree) {
            return Err(GosemError::Syntax(diag));
        }

        tracing::debug!(
            "Parsed {} ({} bytes, {} top-level nodes)",
            name,
            source.len(),
            tree.root().named_child_count()
        );
        Ok(tree)
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a raw buffer as UTF-8.
///
/// Positions are byte offsets into the caller's buffer, so invalid bytes are
/// a syntax error at the first offending byte rather than being replaced.
pub fn decode_source<'a>(name: &str, bytes: &'a [u8]) -> Result<&'a str, GosemError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        let line_start = valid
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = valid.len() - line_start + 1;
        GosemError::Syntax(Diagnostic::new(name, line, column, "illegal UTF-8 encoding"))
    })
}

/// Iterative depth check, so it cannot overflow on the input it rejects.
fn nesting_too_deep(tree: &SyntaxTree) -> Option<Diagnostic> {
    let mut cursor = tree.root().walk();
    let mut depth = 0usize;
    loop {
        if depth > MAX_NESTING_DEPTH {
            let (line, column) = start_position(cursor.node());
            return Some(Diagnostic::new(
                tree.name(),
                line,
                column,
                "exceeded max nesting depth",
            ));
        }
        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
            depth -= 1;
        }
    }
}

fn first_syntax_error(tree: &SyntaxTree) -> Option<Diagnostic> {
    let root = tree.root();
    if !root.has_error() {
        return None;
    }
    let node = find_error_node(root)?;
    let (line, column) = start_position(node);
    let message = if node.is_missing() {
        format!("expected '{}'", node.kind())
    } else {
        match snippet(tree.text(node)) {
            Some(text) => format!("unexpected {text}"),
            None => "unexpected end of file".to_string(),
        }
    };
    Some(Diagnostic::new(tree.name(), line, column, message))
}

/// Pre-order search for the first ERROR or MISSING node.
fn find_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    children(node).into_iter().find_map(find_error_node)
}

fn snippet(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let quoted = if line.len() > MAX_SNIPPET_LEN {
        let mut end = MAX_SNIPPET_LEN;
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        format!("'{}...'", &line[..end])
    } else {
        format!("'{line}'")
    };
    Some(quoted)
}

fn missing_package_clause(tree: &SyntaxTree) -> Option<Diagnostic> {
    let root = tree.root();
    let first = named_children(root)
        .into_iter()
        .find(|n| n.kind() != "comment");

    match first {
        Some(node) if NodeKind::of(node) == NodeKind::PackageClause => None,
        Some(node) => {
            let (line, column) = start_position(node);
            let found = snippet(tree.text(node)).unwrap_or_else(|| node.kind().to_string());
            Some(Diagnostic::new(
                tree.name(),
                line,
                column,
                format!("expected 'package', found {found}"),
            ))
        }
        None => {
            let end = root.end_position();
            Some(Diagnostic::new(
                tree.name(),
                end.row + 1,
                end.column + 1,
                "expected 'package', found 'EOF'",
            ))
        }
    }
}
