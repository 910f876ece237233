// Analysis pipeline: discover files, extract declarations, build the graph,
// run insight rules

pub mod graph;
pub mod insights;
pub mod model;
pub mod stages;

pub use graph::*;
pub use insights::*;
pub use model::*;
pub use stages::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::{extract_from_tree, ExtractOptions, FunctionDecl, PythonParser};
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Summary counters of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub files_analyzed: usize,
    pub files_failed: usize,
    pub total_lines: usize,
    pub classes_found: usize,
    pub functions_found: usize,
    pub decorators_found: usize,
    pub insights_generated: usize,
}

/// Result of analyzing a codebase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    #[serde(flatten)]
    pub declarations: DeclarationSet,
    pub decorators: DecoratorUsageIndex,
    pub imports: ImportIndex,
    pub insights: Vec<Insight>,
    pub timestamp: DateTime<Local>,
    /// Files that failed to parse (path -> error message)
    pub parse_errors: BTreeMap<PathBuf, String>,
    /// Target directories that did not exist
    pub missing_directories: Vec<PathBuf>,
    /// Member and call graph; not exported
    #[serde(skip)]
    pub graph: DependencyGraph,
}

impl AnalysisResult {
    /// Every function and method exactly once
    pub fn callables(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.callables()
    }

    pub fn has_parse_errors(&self) -> bool {
        !self.parse_errors.is_empty()
    }
}

/// Files found under the target directories
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub missing_directories: Vec<PathBuf>,
}

/// Main analyzer that orchestrates the analysis pipeline
pub struct Analyzer {
    config: Config,
    parser: PythonParser,
    verbose: bool,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let parser = PythonParser::new()?;

        Ok(Self {
            config,
            parser,
            verbose: false,
        })
    }

    /// Create analyzer with verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze a codebase at the given path
    pub fn analyze(&mut self, root: &Path) -> Result<AnalysisResult> {
        self.analyze_with(root, &mut TracingObserver)
    }

    /// Analyze a codebase, reporting stage boundaries to `observer`
    pub fn analyze_with(
        &mut self,
        root: &Path,
        observer: &mut dyn StageObserver,
    ) -> Result<AnalysisResult> {
        if !root.is_dir() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }
        tracing::info!("Analyzing {}", root.display());

        // Step 1: Discover Python files
        let discovery = timed(observer, Stage::Discover, || self.discover(root));
        if discovery.files.is_empty() {
            tracing::warn!("No Python files found under {}", root.display());
        }

        // Step 2: Parse and accumulate declarations
        let (model, parse_errors) =
            timed(observer, Stage::Extract, || self.extract(&discovery.files));

        // Step 3: Build the dependency graph
        let graph = timed(observer, Stage::Graph, || {
            let declarations = model.declarations();
            let mut graph = DependencyGraph::build(&declarations.classes);
            if self.config.analysis.collect_calls {
                graph.add_calls(declarations.callables());
            }
            let stats = graph.stats();
            tracing::debug!(
                "Graph: {} nodes, {} member edges, {} call edges",
                stats.nodes,
                stats.member_edges,
                stats.call_edges
            );
            graph
        });

        // Step 4: Run insight rules
        let insights = timed(observer, Stage::Insights, || {
            InsightEngine::new(&self.config.insights).run(&model)
        });

        let StructuralModel {
            declarations,
            decorators,
            imports,
            total_lines,
            files_analyzed,
            ..
        } = model;

        let summary = Summary {
            files_analyzed,
            files_failed: parse_errors.len(),
            total_lines,
            classes_found: declarations.classes.len(),
            functions_found: declarations.callables().count(),
            decorators_found: decorators.len(),
            insights_generated: insights.len(),
        };

        Ok(AnalysisResult {
            summary,
            declarations,
            decorators,
            imports,
            insights,
            timestamp: Local::now(),
            parse_errors,
            missing_directories: discovery.missing_directories,
            graph,
        })
    }

    /// Discover Python files under each target directory
    pub fn discover(&self, root: &Path) -> Discovery {
        let mut discovery = Discovery::default();
        let mut seen = HashSet::new();

        for dir in &self.config.analysis.target_directories {
            let target = root.join(dir);
            if !target.is_dir() {
                let err = Error::MissingDirectory(target.clone());
                tracing::warn!("{}", err);
                discovery.missing_directories.push(target);
                continue;
            }

            let walker = WalkDir::new(&target)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !self.is_excluded_dir(e));

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("{}", Error::from(e));
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if path.extension().map_or(true, |ext| ext != "py") {
                    continue;
                }
                if !self.is_included(path) {
                    continue;
                }
                if seen.insert(path.to_path_buf()) {
                    discovery.files.push(path.to_path_buf());
                }
            }
        }

        tracing::debug!("Discovered {} Python files", discovery.files.len());
        discovery
    }

    /// Directories whose name contains an exclude pattern are pruned;
    /// the target directory itself never is
    fn is_excluded_dir(&self, entry: &walkdir::DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.config
            .analysis
            .exclude
            .iter()
            .any(|pattern| name.contains(pattern.as_str()))
    }

    fn is_included(&self, path: &Path) -> bool {
        let include = &self.config.analysis.include;
        if include.is_empty() {
            return true;
        }
        let full = path.to_string_lossy();
        include.iter().any(|pattern| full.contains(pattern.as_str()))
    }

    /// Parse all files and merge their declarations
    fn extract(&mut self, files: &[PathBuf]) -> (StructuralModel, BTreeMap<PathBuf, String>) {
        let analysis = &self.config.analysis;
        let options = ExtractOptions {
            methods_as_functions: analysis.methods_as_functions,
            collect_calls: analysis.collect_calls,
        };
        let mut model = StructuralModel::new(ModelOptions {
            methods_as_functions: analysis.methods_as_functions,
            last_write_wins: analysis.last_write_wins,
        });
        let mut errors = BTreeMap::new();

        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        for path in files {
            if let Some(ref pb) = progress {
                let msg = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                pb.set_message(msg);
                pb.inc(1);
            }

            match self.parser.parse_file(path) {
                Ok(tree) => {
                    let file = extract_from_tree(&tree, &options);
                    if file.is_empty() {
                        tracing::debug!("No declarations in {}", path.display());
                    }
                    model.absorb(file);
                }
                Err(e) => {
                    let log = || {
                        if e.is_per_file() {
                            tracing::warn!("Skipping {}", e);
                        } else {
                            tracing::error!("Failed to analyze {}: {}", path.display(), e);
                        }
                    };
                    match progress {
                        Some(ref pb) => pb.suspend(log),
                        None => log(),
                    }
                    let message = match e {
                        Error::Parse { message, .. } => message,
                        other => other.to_string(),
                    };
                    errors.insert(path.clone(), message);
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Parsing complete");
        }

        (model, errors)
    }
}

/// Run one stage inside a span, reporting its boundaries
fn timed<T>(observer: &mut dyn StageObserver, stage: Stage, run: impl FnOnce() -> T) -> T {
    let _span = tracing::info_span!("stage", name = stage.as_str()).entered();
    observer.stage_started(stage);
    let start = Instant::now();
    let out = run();
    observer.stage_finished(stage, start.elapsed());
    out
}
