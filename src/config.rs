use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "archlens.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub insights: InsightConfig,
    pub report: ReportConfig,
    pub output: OutputConfig,
}

/// Analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Subdirectories of the root to scan
    pub target_directories: Vec<String>,
    /// Directory-name substrings that prune descent
    pub exclude: Vec<String>,
    /// File-path substrings; when non-empty only matching files are kept
    pub include: Vec<String>,
    /// Also record class methods as standalone functions
    pub methods_as_functions: bool,
    /// Later declarations replace earlier ones with the same name
    pub last_write_wins: bool,
    /// Populate `calls` on functions and add call edges to the graph
    pub collect_calls: bool,
}

/// Insight rule settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Callables above this complexity are flagged
    pub complexity_threshold: u32,
    /// Substring identifying checksum-like decorators
    pub checksum_marker: String,
}

/// Markdown report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Callables above this complexity are listed in the report
    pub complexity_threshold: u32,
    /// Occurrences listed per decorator before the overflow line
    pub max_decorator_usages: usize,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix for `<prefix>.md`, `<prefix>.json` and friends
    pub prefix: String,
    pub html: bool,
    pub cursor: bool,
    /// Write per-class pages under `<root>/MD`
    pub pages: bool,
    pub open: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_directories: vec!["src".to_string()],
            exclude: vec![],
            include: vec![],
            methods_as_functions: false,
            last_write_wins: false,
            collect_calls: false,
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            complexity_threshold: 10,
            checksum_marker: "Checksum".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            complexity_threshold: 8,
            max_decorator_usages: 5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "architecture_analysis".to_string(),
            html: false,
            cursor: false,
            pages: true,
            open: false,
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dirs: Option<Vec<String>>,
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub output: Option<String>,
    pub html: bool,
    pub cursor: bool,
    pub open: bool,
    pub no_pages: bool,
    pub methods_as_functions: bool,
    pub collect_calls: bool,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Resolve the config path: explicit flag first, then the default file
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: CliOverrides) {
        if let Some(dirs) = cli.dirs {
            if !dirs.is_empty() {
                self.analysis.target_directories = dirs;
            }
        }

        self.analysis.exclude.extend(cli.exclude);
        self.analysis.include.extend(cli.include);

        if let Some(prefix) = cli.output {
            self.output.prefix = prefix;
        }

        self.output.html |= cli.html;
        self.output.cursor |= cli.cursor;
        self.output.open |= cli.open;
        if cli.no_pages {
            self.output.pages = false;
        }

        self.analysis.methods_as_functions |= cli.methods_as_functions;
        self.analysis.collect_calls |= cli.collect_calls;
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.analysis.target_directories.is_empty() {
            return Err(Error::config_validation(
                "at least one target directory required",
            ));
        }

        if self.output.prefix.trim().is_empty() {
            return Err(Error::config_validation("output prefix must not be empty"));
        }

        if self.insights.complexity_threshold == 0 {
            return Err(Error::config_validation(
                "insight complexity_threshold must be at least 1",
            ));
        }

        if self.insights.checksum_marker.is_empty() {
            return Err(Error::config_validation("checksum_marker must not be empty"));
        }

        if self.report.complexity_threshold == 0 {
            return Err(Error::config_validation(
                "report complexity_threshold must be at least 1",
            ));
        }

        if self.report.max_decorator_usages == 0 {
            return Err(Error::config_validation(
                "max_decorator_usages must be at least 1",
            ));
        }

        Ok(())
    }
}
