//! CLI module for Archlens

mod args;

pub use args::Args;

use crate::analysis::{AnalysisResult, Analyzer, TimingCollector};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{
    generate_markdown, open_in_browser, to_json, write_output, CursorExport, HtmlReport, PageSet,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status when `--strict` is set and some file failed to parse
const STRICT_FAILURE: u8 = 2;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    // An explicit --config must load; the default file is optional
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::resolve_path(None)),
    };
    config.merge_cli(args.overrides());
    config.validate()?;
    Ok(config)
}

fn execute(args: &Args) -> Result<ExitCode> {
    let config = load_config(args)?;

    if args.verbose {
        tracing::debug!("Target directories: {:?}", config.analysis.target_directories);
        tracing::debug!("Exclude: {:?}", config.analysis.exclude);
        tracing::debug!("Include: {:?}", config.analysis.include);
        tracing::debug!("Output prefix: {}", config.output.prefix);
    }

    let mut analyzer = Analyzer::new(config.clone())?.with_verbose(args.verbose);
    let analysis = if args.profile {
        let mut timings = TimingCollector::new();
        let analysis = analyzer.analyze_with(&args.path, &mut timings)?;
        eprint!("{}", timings.report());
        analysis
    } else {
        analyzer.analyze(&args.path)?
    };

    let outputs = render_outputs(&analysis, &config, args);

    print_summary(&analysis, &outputs);

    if config.output.open {
        if let Some(target) = outputs.html.as_ref().or(outputs.markdown.as_ref()) {
            if let Err(e) = open_in_browser(target) {
                tracing::warn!("Could not open {}: {}", target.display(), e);
            }
        }
    }

    if !outputs.failures.is_empty() {
        for e in &outputs.failures {
            eprintln!("Error: {}", e);
        }
        return Ok(ExitCode::FAILURE);
    }
    if args.strict && analysis.has_parse_errors() {
        return Ok(ExitCode::from(STRICT_FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}

/// What the render steps produced
#[derive(Debug, Default)]
struct Outputs {
    written: Vec<PathBuf>,
    markdown: Option<PathBuf>,
    html: Option<PathBuf>,
    failures: Vec<Error>,
}

impl Outputs {
    fn record(&mut self, step: &str, result: Result<PathBuf>) -> Option<PathBuf> {
        match result {
            Ok(path) => {
                tracing::info!("Wrote {} to {}", step, path.display());
                self.written.push(path.clone());
                Some(path)
            }
            Err(e) => {
                tracing::error!("{} failed: {}", step, e);
                self.failures.push(e);
                None
            }
        }
    }
}

fn write_report(path: PathBuf, contents: Result<String>) -> Result<PathBuf> {
    write_output(&path, &contents?)?;
    Ok(path)
}

/// Run every enabled render step; a failed step does not stop the others
fn render_outputs(analysis: &AnalysisResult, config: &Config, args: &Args) -> Outputs {
    let prefix = &config.output.prefix;
    let mut outputs = Outputs::default();

    let markdown = write_report(
        PathBuf::from(format!("{}.md", prefix)),
        Ok(generate_markdown(analysis, &config.report)),
    );
    outputs.markdown = outputs.record("Markdown report", markdown);

    let json = write_report(PathBuf::from(format!("{}.json", prefix)), to_json(analysis));
    outputs.record("JSON export", json);

    if config.output.cursor {
        let export = CursorExport::from_result(analysis, config.insights.complexity_threshold);
        let cursor = write_report(
            PathBuf::from(format!("{}_cursor.json", prefix)),
            export.to_json(),
        );
        outputs.record("IDE export", cursor);
    }

    if config.output.html {
        let html = write_report(
            PathBuf::from(format!("{}.html", prefix)),
            HtmlReport::new().and_then(|report| report.render(analysis, &config.report)),
        );
        outputs.html = outputs.record("HTML report", html);
    }

    if config.output.pages {
        let pages = PageSet::build(analysis).write(&args.path);
        outputs.record("class pages", pages);
    }

    outputs
}

fn print_summary(analysis: &AnalysisResult, outputs: &Outputs) {
    let summary = &analysis.summary;
    println!("\nAnalysis complete!");
    println!("Files analyzed: {}", summary.files_analyzed);
    if summary.files_failed > 0 {
        println!("Files failed: {}", summary.files_failed);
        for (path, err) in analysis.parse_errors.iter().take(5) {
            println!("  {}: {}", path.display(), err);
        }
        if analysis.parse_errors.len() > 5 {
            println!("  ... and {} more", analysis.parse_errors.len() - 5);
        }
    }
    println!("Insights: {}", summary.insights_generated);

    if !outputs.written.is_empty() {
        println!("\nGenerated:");
        for path in &outputs.written {
            println!("  {}", path.display());
        }
    }
}
