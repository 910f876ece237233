// Parser module for extracting declarations from Python source files

pub mod ast;
pub mod extract;
mod python;
pub mod syntax;

pub use ast::*;
pub use extract::{
    calculate_complexity, extract_from_tree, resolve_decorator, resolve_name, Decorator,
    ExtractOptions,
};
pub use python::PythonParser;
pub use syntax::{NodeKind, SyntaxTree};
