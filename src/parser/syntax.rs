// Parsed syntax tree and the closed set of node kinds the extractor handles

use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};

/// Node variants the structural extractor dispatches on.
///
/// Every tree-sitter node maps to exactly one variant; kinds the extractor
/// has no use for collapse into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    ClassDefinition,
    FunctionDefinition,
    DecoratedDefinition,
    Decorator,
    Block,
    ImportStatement,
    ImportFromStatement,
    FutureImportStatement,
    AliasedImport,
    DottedName,
    RelativeImport,
    WildcardImport,
    ExpressionStatement,
    Assignment,
    Identifier,
    Attribute,
    Call,
    IfStatement,
    ElifClause,
    WhileStatement,
    ForStatement,
    ExceptClause,
    BooleanOperator,
    Parameter,
    SplatPattern,
    KeywordArgument,
    Type,
    Comment,
    Error,
    Other,
}

impl NodeKind {
    /// Classify a tree-sitter node
    pub fn of(node: &Node) -> Self {
        if node.is_error() {
            return NodeKind::Error;
        }
        match node.kind() {
            "module" => NodeKind::Module,
            "class_definition" => NodeKind::ClassDefinition,
            "function_definition" => NodeKind::FunctionDefinition,
            "decorated_definition" => NodeKind::DecoratedDefinition,
            "decorator" => NodeKind::Decorator,
            "block" => NodeKind::Block,
            "import_statement" => NodeKind::ImportStatement,
            "import_from_statement" => NodeKind::ImportFromStatement,
            "future_import_statement" => NodeKind::FutureImportStatement,
            "aliased_import" => NodeKind::AliasedImport,
            "dotted_name" => NodeKind::DottedName,
            "relative_import" => NodeKind::RelativeImport,
            "wildcard_import" => NodeKind::WildcardImport,
            "expression_statement" => NodeKind::ExpressionStatement,
            "assignment" => NodeKind::Assignment,
            "identifier" => NodeKind::Identifier,
            "attribute" => NodeKind::Attribute,
            "call" => NodeKind::Call,
            "if_statement" => NodeKind::IfStatement,
            "elif_clause" => NodeKind::ElifClause,
            "while_statement" => NodeKind::WhileStatement,
            "for_statement" => NodeKind::ForStatement,
            "except_clause" | "except_group_clause" => NodeKind::ExceptClause,
            "boolean_operator" => NodeKind::BooleanOperator,
            "typed_parameter" | "default_parameter" | "typed_default_parameter" => {
                NodeKind::Parameter
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => NodeKind::SplatPattern,
            "keyword_argument" => NodeKind::KeywordArgument,
            "type" => NodeKind::Type,
            "comment" => NodeKind::Comment,
            _ => NodeKind::Other,
        }
    }

    /// Control-flow nodes that add one unit of complexity
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            NodeKind::IfStatement
                | NodeKind::ElifClause
                | NodeKind::WhileStatement
                | NodeKind::ForStatement
                | NodeKind::ExceptClause
        )
    }
}

/// A parsed source file: the tree plus the text it was parsed from
pub struct SyntaxTree {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl SyntaxTree {
    pub(crate) fn new(path: PathBuf, source: String, tree: Tree) -> Self {
        Self { path, source, tree }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Number of lines in the source
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }

    /// Source text covered by a node
    pub fn text<'a>(&'a self, node: &Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("path", &self.path)
            .field("root", &self.tree.root_node().kind())
            .finish()
    }
}

/// 1-based line of a node
pub fn line_of(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Visit `root` and every node below it once, in document order
pub fn preorder<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// First named child that is not a comment
pub fn first_named<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| NodeKind::of(c) != NodeKind::Comment);
    found
}

/// First `ERROR` or `MISSING` node in document order
pub fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
