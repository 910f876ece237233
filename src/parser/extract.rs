// Structural extraction: classes, functions, decorators and imports from a
// parsed Python tree

use crate::parser::ast::{AttributeDecl, ClassDecl, FileDeclarations, FunctionDecl, ImportRef};
use crate::parser::syntax::{first_named, line_of, preorder, NodeKind, SyntaxTree};
use tree_sitter::Node;

const FUTURE_MODULE: &str = "__future__";

/// Extraction switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Also record direct class methods as standalone functions
    pub methods_as_functions: bool,
    /// Populate `calls` on every function and method
    pub collect_calls: bool,
}

/// Outcome of resolving a decorator expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decorator {
    Named(String),
    Unresolved,
}

impl Decorator {
    pub fn name(&self) -> Option<&str> {
        match self {
            Decorator::Named(name) => Some(name.as_str()),
            Decorator::Unresolved => None,
        }
    }
}

/// Extract every declaration from a parsed file
pub fn extract_from_tree(tree: &SyntaxTree, options: &ExtractOptions) -> FileDeclarations {
    let mut extractor = Extractor {
        tree,
        options,
        file: FileDeclarations::new(tree.path().to_path_buf(), tree.line_count()),
    };
    preorder(tree.root(), |node| extractor.visit(node));
    extractor.file
}

struct Extractor<'t> {
    tree: &'t SyntaxTree,
    options: &'t ExtractOptions,
    file: FileDeclarations,
}

impl<'t> Extractor<'t> {
    fn visit(&mut self, node: Node<'t>) {
        match NodeKind::of(&node) {
            NodeKind::ClassDefinition => {
                if let Some(class) = self.class_decl(node) {
                    self.file.classes.push(class);
                }
            }
            NodeKind::FunctionDefinition => {
                if self.options.methods_as_functions || !is_direct_method(&node) {
                    if let Some(func) = self.function_decl(node) {
                        self.file.functions.push(func);
                    }
                }
            }
            NodeKind::ImportStatement => self.plain_imports(node),
            NodeKind::ImportFromStatement => self.from_imports(node),
            NodeKind::FutureImportStatement => self.future_imports(node),
            _ => {}
        }
    }

    fn text(&self, node: &Node) -> String {
        self.tree.text(node).to_string()
    }

    fn class_decl(&self, node: Node<'t>) -> Option<ClassDecl> {
        let name = self.text(&node.child_by_field_name("name")?);
        if name.is_empty() {
            return None;
        }

        let mut class = ClassDecl::new(&name, self.tree.path().to_path_buf(), line_of(&node));
        class.decorators = self.decorators_of(&node);

        if let Some(bases) = node.child_by_field_name("superclasses") {
            let mut cursor = bases.walk();
            for base in bases.named_children(&mut cursor) {
                if matches!(
                    NodeKind::of(&base),
                    NodeKind::KeywordArgument | NodeKind::Comment
                ) {
                    continue;
                }
                if let Some(resolved) = resolve_name(&base, self.tree) {
                    class.base_classes.push(resolved);
                }
            }
        }

        let Some(body) = node.child_by_field_name("body") else {
            return Some(class);
        };
        let mut cursor = body.walk();
        for stmt in body.named_children(&mut cursor) {
            match NodeKind::of(&stmt) {
                NodeKind::FunctionDefinition => {
                    if let Some(method) = self.function_decl(stmt) {
                        class.methods.push(method);
                    }
                }
                NodeKind::DecoratedDefinition => {
                    let inner = stmt
                        .child_by_field_name("definition")
                        .filter(|d| NodeKind::of(d) == NodeKind::FunctionDefinition);
                    if let Some(method) = inner.and_then(|d| self.function_decl(d)) {
                        class.methods.push(method);
                    }
                }
                NodeKind::ExpressionStatement => {
                    if let Some(attr) = self.simple_assignment(&stmt) {
                        class.attributes.push(attr);
                    }
                }
                _ => {}
            }
        }

        Some(class)
    }

    /// `name = expr` with a plain identifier target and no annotation
    fn simple_assignment(&self, stmt: &Node) -> Option<AttributeDecl> {
        let assignment = first_named(stmt)?;
        if NodeKind::of(&assignment) != NodeKind::Assignment {
            return None;
        }
        if assignment.child_by_field_name("type").is_some() {
            return None;
        }
        assignment.child_by_field_name("right")?;
        let target = assignment.child_by_field_name("left")?;
        if NodeKind::of(&target) != NodeKind::Identifier {
            return None;
        }
        Some(AttributeDecl::new(self.tree.text(&target), line_of(&assignment)))
    }

    fn function_decl(&self, node: Node<'t>) -> Option<FunctionDecl> {
        let name = self.text(&node.child_by_field_name("name")?);
        if name.is_empty() {
            return None;
        }

        let mut func = FunctionDecl::new(&name, self.tree.path().to_path_buf(), line_of(&node));
        func.decorators = self.decorators_of(&node);
        func.is_async = has_async_keyword(&node);
        func.complexity = calculate_complexity(&node);

        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                if let Some(param_name) = self.parameter_name(&param) {
                    func.parameters.push(param_name);
                }
            }
        }

        if let Some(ret) = node.child_by_field_name("return_type") {
            let inner = first_named(&ret).unwrap_or(ret);
            func.return_type =
                Some(resolve_name(&inner, self.tree).unwrap_or_else(|| self.text(&ret)));
        }

        if self.options.collect_calls {
            if let Some(body) = node.child_by_field_name("body") {
                func.calls = collect_calls(&body, self.tree);
            }
        }

        Some(func)
    }

    fn parameter_name(&self, node: &Node) -> Option<String> {
        match NodeKind::of(node) {
            NodeKind::Identifier => Some(self.text(node)),
            NodeKind::Parameter | NodeKind::SplatPattern => {
                self.parameter_name(&first_named(node)?)
            }
            _ => None,
        }
    }

    /// Resolved decorators of a class or function, in source order
    fn decorators_of(&self, definition: &Node) -> Vec<String> {
        let Some(parent) = definition.parent() else {
            return Vec::new();
        };
        if NodeKind::of(&parent) != NodeKind::DecoratedDefinition {
            return Vec::new();
        }

        let mut names = Vec::new();
        let mut cursor = parent.walk();
        for child in parent.named_children(&mut cursor) {
            if NodeKind::of(&child) != NodeKind::Decorator {
                continue;
            }
            match resolve_decorator(&child, self.tree) {
                Decorator::Named(name) => names.push(name),
                Decorator::Unresolved => tracing::debug!(
                    "Unresolved decorator `{}` in {}:{}",
                    self.tree.text(&child),
                    self.tree.path().display(),
                    line_of(&child)
                ),
            }
        }
        names
    }

    fn plain_imports(&mut self, node: Node<'t>) {
        let line = line_of(&node);
        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            if let Some(dotted) = self.imported_name(&name) {
                self.file.imports.push(ImportRef::plain(&dotted, line));
            }
        }
    }

    fn from_imports(&mut self, node: Node<'t>) {
        let line = line_of(&node);
        let module = match node.child_by_field_name("module_name") {
            Some(module) => self.module_name(&module),
            None => return,
        };

        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            if let Some(symbol) = self.imported_name(&name) {
                self.file
                    .imports
                    .push(ImportRef::from_module(&module, &symbol, line));
            }
        }

        let mut cursor = node.walk();
        let wildcard = node
            .named_children(&mut cursor)
            .any(|c| NodeKind::of(&c) == NodeKind::WildcardImport);
        if wildcard {
            self.file
                .imports
                .push(ImportRef::from_module(&module, "*", line));
        }
    }

    /// `from __future__ import x` has its own node kind and no module field
    fn future_imports(&mut self, node: Node<'t>) {
        let line = line_of(&node);
        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            if let Some(feature) = self.imported_name(&name) {
                self.file
                    .imports
                    .push(ImportRef::from_module(FUTURE_MODULE, &feature, line));
            }
        }
    }

    /// Imported name with any alias dropped
    fn imported_name(&self, node: &Node) -> Option<String> {
        match NodeKind::of(node) {
            NodeKind::DottedName => Some(self.text(node)),
            NodeKind::AliasedImport => node
                .child_by_field_name("name")
                .map(|original| self.text(&original)),
            _ => None,
        }
    }

    /// Module of a from-import; relative imports drop their leading dots
    fn module_name(&self, node: &Node) -> String {
        match NodeKind::of(node) {
            NodeKind::RelativeImport => {
                let mut cursor = node.walk();
                let dotted = node
                    .named_children(&mut cursor)
                    .find(|c| NodeKind::of(c) == NodeKind::DottedName);
                dotted.map(|d| self.text(&d)).unwrap_or_default()
            }
            _ => self.text(node),
        }
    }
}

/// Whether a function definition sits directly in a class body
fn is_direct_method(node: &Node) -> bool {
    let Some(mut parent) = node.parent() else {
        return false;
    };
    if NodeKind::of(&parent) == NodeKind::DecoratedDefinition {
        match parent.parent() {
            Some(grandparent) => parent = grandparent,
            None => return false,
        }
    }
    NodeKind::of(&parent) == NodeKind::Block
        && parent
            .parent()
            .is_some_and(|owner| NodeKind::of(&owner) == NodeKind::ClassDefinition)
}

fn has_async_keyword(node: &Node) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == "async");
    found
}

/// Branch-count complexity of a function subtree.
///
/// One plus every if/elif/while/for/except node and every boolean
/// operator group. A left-nested chain of the same operator is a single
/// group.
pub fn calculate_complexity(function: &Node) -> u32 {
    let mut complexity = 1;
    preorder(*function, |node| {
        let kind = NodeKind::of(&node);
        if kind.is_branch() || (kind == NodeKind::BooleanOperator && !continues_chain(&node)) {
            complexity += 1;
        }
    });
    complexity
}

fn continues_chain(node: &Node) -> bool {
    node.parent().is_some_and(|parent| {
        NodeKind::of(&parent) == NodeKind::BooleanOperator
            && boolean_operator(&parent) == boolean_operator(node)
    })
}

fn boolean_operator(node: &Node) -> Option<&'static str> {
    node.child_by_field_name("operator").map(|op| op.kind())
}

/// Resolve a decorator node to its dotted name
pub fn resolve_decorator(decorator: &Node, tree: &SyntaxTree) -> Decorator {
    let expression = if NodeKind::of(decorator) == NodeKind::Decorator {
        first_named(decorator)
    } else {
        Some(*decorator)
    };
    match expression.and_then(|expr| resolve_name(&expr, tree)) {
        Some(name) => Decorator::Named(name),
        None => Decorator::Unresolved,
    }
}

/// Dotted name of an identifier, attribute chain or call target.
///
/// An attribute whose object does not resolve keeps only the attribute
/// name. Other expression shapes have no name.
pub fn resolve_name(node: &Node, tree: &SyntaxTree) -> Option<String> {
    match NodeKind::of(node) {
        NodeKind::Identifier => Some(tree.text(node).to_string()),
        NodeKind::Attribute => {
            let attr = tree.text(&node.child_by_field_name("attribute")?);
            let object = node
                .child_by_field_name("object")
                .and_then(|object| resolve_name(&object, tree));
            Some(match object {
                Some(object) => format!("{}.{}", object, attr),
                None => attr.to_string(),
            })
        }
        NodeKind::Call => resolve_name(&node.child_by_field_name("function")?, tree),
        _ => None,
    }
}

fn collect_calls(body: &Node, tree: &SyntaxTree) -> Vec<String> {
    let mut calls = Vec::new();
    preorder(*body, |node| {
        if NodeKind::of(&node) == NodeKind::Call {
            if let Some(callee) = resolve_name(&node, tree) {
                calls.push(callee);
            }
        }
    });
    calls
}
