// Per-run accumulator for extracted declarations

use crate::parser::{ClassDecl, FileDeclarations, FunctionDecl};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// One place a decorator is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorUsage {
    pub function: String,
    pub file: PathBuf,
    pub line: usize,
}

/// Decorator name -> occurrences in discovery order.
///
/// Keys only ever come from resolved decorators and always carry at least
/// one occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecoratorUsageIndex(BTreeMap<String, Vec<DecoratorUsage>>);

impl DecoratorUsageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every decorator applied to a function or method
    pub fn record_function(&mut self, func: &FunctionDecl) {
        for name in &func.decorators {
            self.0.entry(name.clone()).or_default().push(DecoratorUsage {
                function: func.name.clone(),
                file: func.source_file.clone(),
                line: func.line,
            });
        }
    }

    pub fn get(&self, name: &str) -> Option<&[DecoratorUsage]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DecoratorUsage])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of distinct decorator names
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decorators ordered by usage count, most used first
    pub fn by_usage(&self) -> Vec<(&str, &[DecoratorUsage])> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        entries
    }
}

/// Imported symbol -> files importing it, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportIndex(BTreeMap<String, Vec<PathBuf>>);

impl ImportIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `file` imports `name`; a file is listed once per name
    pub fn record(&mut self, name: &str, file: &Path) {
        let files = self.0.entry(name.to_string()).or_default();
        if files.last().map(PathBuf::as_path) != Some(file) {
            files.push(file.to_path_buf());
        }
    }

    pub fn get(&self, name: &str) -> Option<&[PathBuf]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Classes and functions of a run, identified by `(file, name)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarationSet {
    pub classes: Vec<ClassDecl>,
    pub functions: Vec<FunctionDecl>,
    /// Analyzed files in discovery order
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Direct class methods are also present in `functions`
    #[serde(default)]
    pub methods_as_functions: bool,
}

impl DeclarationSet {
    pub fn new(methods_as_functions: bool) -> Self {
        Self {
            methods_as_functions,
            ..Default::default()
        }
    }

    /// Add a class; with `replace` earlier classes of the same name are dropped
    pub fn insert_class(&mut self, class: ClassDecl, replace: bool) {
        if replace {
            self.classes.retain(|c| c.name != class.name);
        }
        self.classes.push(class);
    }

    /// Add a function; with `replace` earlier functions of the same name are dropped
    pub fn insert_function(&mut self, func: FunctionDecl, replace: bool) {
        if replace {
            self.functions.retain(|f| f.name != func.name);
        }
        self.functions.push(func);
    }

    pub fn classes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ClassDecl> {
        self.classes.iter().filter(move |c| c.name == name)
    }

    pub fn functions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FunctionDecl> {
        self.functions.iter().filter(move |f| f.name == name)
    }

    /// Note a file as analyzed; its position orders `callables`
    pub fn push_file(&mut self, path: &Path) {
        self.files.push(path.to_path_buf());
    }

    /// Every function and method exactly once, in encounter order: by file
    /// discovery order, then by line. Methods already captured as
    /// functions are not repeated.
    pub fn callables(&self) -> impl Iterator<Item = &FunctionDecl> {
        let methods_listed = self.methods_as_functions;
        let mut all: Vec<&FunctionDecl> = self
            .functions
            .iter()
            .chain(
                self.classes
                    .iter()
                    .filter(move |_| !methods_listed)
                    .flat_map(|c| c.methods.iter()),
            )
            .collect();

        let ranks = self.file_ranks();
        all.sort_by_key(|f| {
            let rank = ranks
                .get(f.source_file.as_path())
                .copied()
                .unwrap_or(usize::MAX);
            (rank, f.line)
        });
        all.into_iter()
    }

    /// Discovery position per file; files never pushed rank after the
    /// known ones in order of first appearance
    fn file_ranks(&self) -> HashMap<&Path, usize> {
        let mut ranks = HashMap::new();
        let seen = self
            .functions
            .iter()
            .map(|f| f.source_file.as_path())
            .chain(self.classes.iter().map(|c| c.source_file.as_path()));
        for path in self.files.iter().map(PathBuf::as_path).chain(seen) {
            let next = ranks.len();
            ranks.entry(path).or_insert(next);
        }
        ranks
    }
}

/// Options controlling how declarations are merged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelOptions {
    pub methods_as_functions: bool,
    pub last_write_wins: bool,
}

/// Accumulates per-file declarations across a run
#[derive(Debug, Clone, Default)]
pub struct StructuralModel {
    options: ModelOptions,
    pub(crate) declarations: DeclarationSet,
    pub(crate) decorators: DecoratorUsageIndex,
    pub(crate) imports: ImportIndex,
    pub(crate) total_lines: usize,
    pub(crate) files_analyzed: usize,
}

impl StructuralModel {
    pub fn new(options: ModelOptions) -> Self {
        Self {
            options,
            declarations: DeclarationSet::new(options.methods_as_functions),
            ..Default::default()
        }
    }

    /// Merge one file's declarations into the model
    pub fn absorb(&mut self, file: FileDeclarations) {
        self.files_analyzed += 1;
        self.total_lines += file.lines;
        self.declarations.push_file(&file.path);
        let replace = self.options.last_write_wins;

        for class in file.classes {
            if !self.options.methods_as_functions {
                for method in &class.methods {
                    self.decorators.record_function(method);
                }
            }
            self.declarations.insert_class(class, replace);
        }

        for func in file.functions {
            self.decorators.record_function(&func);
            self.declarations.insert_function(func, replace);
        }

        for import in &file.imports {
            self.imports.record(&import.qualified_name, &file.path);
        }
    }

    pub fn declarations(&self) -> &DeclarationSet {
        &self.declarations
    }

    pub fn decorators(&self) -> &DecoratorUsageIndex {
        &self.decorators
    }

    pub fn imports(&self) -> &ImportIndex {
        &self.imports
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn files_analyzed(&self) -> usize {
        self.files_analyzed
    }
}
