//! CLI argument parsing

use crate::config::CliOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Map the structure of a Python codebase and report on its architecture
#[derive(Parser, Debug)]
#[command(name = "archlens")]
#[command(about = "Map the structure of a Python codebase and report on its architecture")]
#[command(version)]
pub struct Args {
    /// Root of the project to analyze
    pub path: PathBuf,

    /// Directories under the root to analyze [default: src]
    #[arg(long, num_args = 1.., value_name = "DIR")]
    pub dirs: Option<Vec<String>>,

    /// Skip directories whose name contains any of these (can be repeated)
    #[arg(long, num_args = 1.., value_name = "PAT")]
    pub exclude: Vec<String>,

    /// Only analyze files whose path contains one of these (can be repeated)
    #[arg(long, num_args = 1.., value_name = "PAT")]
    pub include: Vec<String>,

    /// Prefix for report files [default: architecture_analysis]
    #[arg(short, long, value_name = "PREFIX")]
    pub output: Option<String>,

    /// Also render an HTML report
    #[arg(long)]
    pub html: bool,

    /// Also write the IDE-integration export
    #[arg(long)]
    pub cursor: bool,

    /// Open the report when done
    #[arg(long)]
    pub open: bool,

    /// Skip the per-class Markdown pages
    #[arg(long)]
    pub no_pages: bool,

    /// Config file path [default: archlens.toml if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Treat methods as standalone functions too
    #[arg(long)]
    pub methods_as_functions: bool,

    /// Record call edges in the dependency graph
    #[arg(long)]
    pub collect_calls: bool,

    /// Exit with status 2 when any file failed to parse
    #[arg(long)]
    pub strict: bool,

    /// Print per-stage timings to stderr
    #[arg(long)]
    pub profile: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Settings that override the config file
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dirs: self.dirs.clone(),
            exclude: self.exclude.clone(),
            include: self.include.clone(),
            output: self.output.clone(),
            html: self.html,
            cursor: self.cursor,
            open: self.open,
            no_pages: self.no_pages,
            methods_as_functions: self.methods_as_functions,
            collect_calls: self.collect_calls,
        }
    }
}
