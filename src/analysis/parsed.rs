//! Parsed tree-sitter trees and the source they were built from.

use crate::syntax::Position;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// Kept separate from the lowered [`crate::syntax::SourceFile`] so the tree
/// can be inspected (e.g. for syntax errors) before lowering.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Position of the first `ERROR` or `MISSING` node, if any.
    pub fn first_syntax_error(&self) -> Option<Position> {
        let root = self.tree.root_node();
        if !root.has_error() {
            return None;
        }

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                return Some(Position::of(node));
            }
            if !node.has_error() {
                continue;
            }
            // Push in reverse so the leftmost child is examined first.
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        // has_error() was set but no offending node was found.
        Some(Position::of(root))
    }
}
