//! Archlens - map the structure of Python codebases
//!
//! Parses Python sources with tree-sitter, builds a model of classes,
//! functions, decorators and imports, derives architectural insights and
//! renders Markdown, JSON, HTML and per-class page reports.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;

// Re-export main types
pub use analysis::{AnalysisResult, Analyzer};
pub use config::Config;
pub use error::{Error, Result};
