// HTML report rendered through the embedded tera template

use crate::analysis::AnalysisResult;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::output::group_thousands;
use crate::output::templates::{TemplateEngine, REPORT_TEMPLATE};
use serde::Serialize;
use tera::Context;

#[derive(Debug, Serialize)]
struct InsightView<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    icon: &'static str,
    title: &'a str,
    description: &'a str,
    severity: &'static str,
    files: Vec<String>,
}

#[derive(Debug, Serialize)]
struct UsageView<'a> {
    function: &'a str,
    location: String,
}

#[derive(Debug, Serialize)]
struct DecoratorView<'a> {
    name: &'a str,
    count: usize,
    usages: Vec<UsageView<'a>>,
    hidden: usize,
}

#[derive(Debug, Serialize)]
struct CallableView<'a> {
    name: &'a str,
    complexity: u32,
    location: String,
}

#[derive(Debug, Serialize)]
struct ClassView<'a> {
    name: &'a str,
    location: String,
    bases: &'a [String],
    methods: Vec<String>,
    attributes: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct SkippedView {
    path: String,
    reason: String,
}

/// Renders the HTML report
pub struct HtmlReport {
    engine: TemplateEngine,
}

impl HtmlReport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
        })
    }

    pub fn render(&self, analysis: &AnalysisResult, config: &ReportConfig) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", "Code Architecture Analysis Report");
        context.insert(
            "timestamp",
            &analysis.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        context.insert("summary", &analysis.summary);
        context.insert("total_lines", &group_thousands(analysis.summary.total_lines));
        context.insert("complexity_threshold", &config.complexity_threshold);

        let insights: Vec<InsightView> = analysis
            .insights
            .iter()
            .map(|i| InsightView {
                kind: i.kind.as_str(),
                icon: i.kind.icon(),
                title: &i.title,
                description: &i.description,
                severity: i.severity.as_str(),
                files: i
                    .files_affected
                    .iter()
                    .map(|f| f.display().to_string())
                    .collect(),
            })
            .collect();
        context.insert("insights", &insights);

        let limit = config.max_decorator_usages;
        let decorators: Vec<DecoratorView> = analysis
            .decorators
            .by_usage()
            .into_iter()
            .map(|(name, usages)| DecoratorView {
                name,
                count: usages.len(),
                usages: usages
                    .iter()
                    .take(limit)
                    .map(|u| UsageView {
                        function: &u.function,
                        location: format!("{}:{}", u.file.display(), u.line),
                    })
                    .collect(),
                hidden: usages.len().saturating_sub(limit),
            })
            .collect();
        context.insert("decorators", &decorators);

        let mut complex: Vec<_> = analysis
            .callables()
            .filter(|f| f.complexity > config.complexity_threshold)
            .collect();
        complex.sort_by(|a, b| b.complexity.cmp(&a.complexity));
        let complex: Vec<CallableView> = complex
            .into_iter()
            .map(|f| CallableView {
                name: &f.name,
                complexity: f.complexity,
                location: format!("{}:{}", f.source_file.display(), f.line),
            })
            .collect();
        context.insert("complex", &complex);

        let classes: Vec<ClassView> = analysis
            .declarations
            .classes
            .iter()
            .map(|c| ClassView {
                name: &c.name,
                location: format!("{}:{}", c.source_file.display(), c.line),
                bases: &c.base_classes,
                methods: c.methods.iter().map(|m| m.signature()).collect(),
                attributes: c.attributes.iter().map(|a| a.name.as_str()).collect(),
            })
            .collect();
        context.insert("classes", &classes);

        let skipped: Vec<SkippedView> = analysis
            .missing_directories
            .iter()
            .map(|d| SkippedView {
                path: d.display().to_string(),
                reason: "directory not found".to_string(),
            })
            .chain(analysis.parse_errors.iter().map(|(p, message)| SkippedView {
                path: p.display().to_string(),
                reason: message.clone(),
            }))
            .collect();
        context.insert("skipped", &skipped);

        self.engine.render(REPORT_TEMPLATE, &context)
    }
}
