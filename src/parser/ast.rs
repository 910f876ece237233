// Declarations extracted from Python source files
//
// These are the per-file facts the extractor produces and the structural
// model aggregates. They serialize verbatim into the JSON export.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything extracted from one source file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDeclarations {
    /// Path as discovered
    pub path: PathBuf,
    /// Number of lines in the file
    pub lines: usize,
    /// Classes in traversal order
    pub classes: Vec<ClassDecl>,
    /// Standalone functions in traversal order
    pub functions: Vec<FunctionDecl>,
    /// Imported symbols in traversal order
    pub imports: Vec<ImportRef>,
}

impl FileDeclarations {
    pub fn new(path: PathBuf, lines: usize) -> Self {
        Self {
            path,
            lines,
            ..Default::default()
        }
    }

    /// Check if file declares nothing
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty() && self.imports.is_empty()
    }
}

/// A class definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub source_file: PathBuf,
    /// 1-based line of the `class` keyword
    pub line: usize,
    /// Resolved decorator names, in source order
    pub decorators: Vec<String>,
    /// Function definitions directly in the class body
    pub methods: Vec<FunctionDecl>,
    /// Base classes resolved by syntax only
    pub base_classes: Vec<String>,
    /// Simple `name = expr` assignments directly in the class body
    pub attributes: Vec<AttributeDecl>,
}

impl ClassDecl {
    pub fn new(name: &str, source_file: PathBuf, line: usize) -> Self {
        Self {
            name: name.to_string(),
            source_file,
            line,
            decorators: Vec::new(),
            methods: Vec::new(),
            base_classes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Names of members in graph order: methods first, then attributes
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.methods
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.attributes.iter().map(|a| a.name.as_str()))
    }
}

/// A class attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeDecl {
    pub name: String,
    pub line: usize,
}

impl AttributeDecl {
    pub fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            line,
        }
    }
}

/// A function or method definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(rename = "file_path")]
    pub source_file: PathBuf,
    /// 1-based line of the `def` keyword
    pub line: usize,
    pub decorators: Vec<String>,
    /// Parameter names, in declaration order
    #[serde(rename = "args")]
    pub parameters: Vec<String>,
    #[serde(rename = "returns")]
    pub return_type: Option<String>,
    /// Branch-count complexity, always at least 1
    pub complexity: u32,
    /// Referenced call targets; empty unless call collection is on
    pub calls: Vec<String>,
    pub is_async: bool,
}

impl FunctionDecl {
    pub fn new(name: &str, source_file: PathBuf, line: usize) -> Self {
        Self {
            name: name.to_string(),
            source_file,
            line,
            decorators: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            complexity: 1,
            calls: Vec::new(),
            is_async: false,
        }
    }

    /// Get the function signature as a string
    pub fn signature(&self) -> String {
        let ret = self
            .return_type
            .as_ref()
            .map(|r| format!(" -> {}", r))
            .unwrap_or_default();
        let prefix = if self.is_async { "async " } else { "" };
        format!("{}def {}({}){}", prefix, self.name, self.parameters.join(", "), ret)
    }
}

/// One imported symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportRef {
    /// `module.symbol` for from-imports, the dotted name for plain imports
    pub qualified_name: String,
    pub line: usize,
}

impl ImportRef {
    /// `import x.y`
    pub fn plain(name: &str, line: usize) -> Self {
        Self {
            qualified_name: name.to_string(),
            line,
        }
    }

    /// `from module import symbol`
    pub fn from_module(module: &str, symbol: &str, line: usize) -> Self {
        Self {
            qualified_name: format!("{}.{}", module, symbol),
            line,
        }
    }
}
