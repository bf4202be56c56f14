//! Go frontend using tree-sitter.
//!
//! Parses Go source and lowers it into a [`SourceFile`]:
//! - package clause and imports (via queries)
//! - package-level type and variable names
//! - function and method declarations with bodies, parameters and doc comments

mod lower;

use std::collections::HashSet;
use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::ParsedFile;
use crate::syntax::{Import, Position, SourceFile};

use lower::Lowerer;

/// Tree-sitter query for package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Tree-sitter query for imports, single and grouped.
const IMPORT_QUERY: &str = r#"
(import_spec
  name: (_)? @alias
  path: (_) @path
) @import
"#;

/// Go frontend.
pub struct GoFrontend {
    language: Language,
}

impl GoFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Create a new parser for this thread.
    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse Go source into a tree-sitter tree.
    ///
    /// Syntax errors do not fail the parse; they show up as `ERROR` and
    /// `MISSING` nodes, see [`ParsedFile::first_syntax_error`].
    pub fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Go source: {}", path.display()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    /// Lower a parsed file into the syntax model.
    pub fn lower(&self, parsed: &ParsedFile) -> anyhow::Result<SourceFile> {
        let package = self
            .extract_package(parsed)?
            .ok_or_else(|| anyhow::anyhow!("expected 'package' clause"))?;
        let imports = self.extract_imports(parsed)?;

        let lowerer = Lowerer::new(parsed);
        let root = parsed.tree.root_node();
        let mut types = Vec::new();
        let mut vars = Vec::new();
        let mut functions = Vec::new();

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "function_declaration" | "method_declaration" => {
                    functions.push(lowerer.function(node));
                }
                "type_declaration" => collect_spec_names(parsed, node, &mut types),
                "var_declaration" => collect_spec_names(parsed, node, &mut vars),
                _ => {}
            }
        }

        Ok(SourceFile {
            path: parsed.path.clone(),
            package,
            imports,
            types,
            vars,
            functions,
        })
    }

    /// Parse and lower in one step.
    pub fn parse_source(&self, path: &Path, source: &[u8]) -> anyhow::Result<SourceFile> {
        let parsed = self.parse(path, source)?;
        if let Some(pos) = parsed.first_syntax_error() {
            anyhow::bail!("{}:{}: syntax error", path.display(), pos);
        }
        self.lower(&parsed)
    }

    /// Extract the package name from a parsed file.
    fn extract_package(&self, parsed: &ParsedFile) -> anyhow::Result<Option<String>> {
        let query = Query::new(&self.language, PACKAGE_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Ok(Some(parsed.node_text(capture.node).to_string()));
                }
            }
        }
        Ok(None)
    }

    /// Extract imports from a parsed file, in source order.
    fn extract_imports(&self, parsed: &ParsedFile) -> anyhow::Result<Vec<Import>> {
        let query = Query::new(&self.language, IMPORT_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut imports = Vec::new();
        let mut seen = HashSet::new();

        while let Some(m) = matches.next() {
            let mut path = String::new();
            let mut alias = None;
            let mut import_node = None;

            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                match name {
                    "path" => {
                        // Remove quotes from path
                        let raw = parsed.node_text(capture.node);
                        path = raw.trim_matches(|c| c == '"' || c == '`').to_string();
                    }
                    "alias" => {
                        alias = Some(parsed.node_text(capture.node).to_string());
                    }
                    "import" => import_node = Some(capture.node),
                    _ => {}
                }
            }

            if let Some(node) = import_node {
                if !path.is_empty() && seen.insert(node.start_byte()) {
                    imports.push(Import {
                        path,
                        alias,
                        position: Position::of(node),
                    });
                }
            }
        }

        imports.sort_by_key(|i| i.position);
        Ok(imports)
    }
}

impl Default for GoFrontend {
    fn default() -> Self {
        Self::new()
    }
}

/// Names declared by the `type_spec`, `type_alias` or `var_spec` entries of a
/// top-level declaration.
fn collect_spec_names(parsed: &ParsedFile, decl: Node, out: &mut Vec<String>) {
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "type_spec" | "type_alias" | "var_spec" => {
                let mut names = child.walk();
                for name in child.children_by_field_name("name", &mut names) {
                    out.push(parsed.node_text(name).to_string());
                }
            }
            // Grouped declarations may wrap their specs in a list node.
            "var_spec_list" | "type_spec_list" => collect_spec_names(parsed, child, out),
            _ => {}
        }
    }
}
