// Python parser using tree-sitter

use crate::error::{Error, Result};
use crate::parser::syntax::{first_error, SyntaxTree};
use std::path::{Path, PathBuf};
use tree_sitter::Parser;

/// Parser for Python source files
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse a Python file.
    ///
    /// Unreadable files and files that are not valid UTF-8 fail with a
    /// parse error naming the path.
    pub fn parse_file(&mut self, path: &Path) -> Result<SyntaxTree> {
        let bytes = std::fs::read(path).map_err(|e| Error::parse(path, e.to_string()))?;
        let source = String::from_utf8(bytes)
            .map_err(|e| Error::parse(path, format!("invalid UTF-8: {}", e.utf8_error())))?;
        self.parse_source(source, path.to_path_buf())
    }

    /// Parse Python source code
    pub fn parse_source(&mut self, source: String, path: PathBuf) -> Result<SyntaxTree> {
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| Error::parse(&path, "parser produced no tree"))?;

        if let Some(node) = first_error(tree.root_node()) {
            let pos = node.start_position();
            let what = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            return Err(Error::parse(
                &path,
                format!("{} at line {}, column {}", what, pos.row + 1, pos.column + 1),
            ));
        }

        Ok(SyntaxTree::new(path, source, tree))
    }
}
