// Rule engine deriving architectural insights from the finished model

use crate::analysis::model::StructuralModel;
use crate::config::InsightConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Kind of insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Info,
    Recommendation,
}

impl InsightKind {
    /// Marker shown before the insight title in reports
    pub fn icon(self) -> &'static str {
        match self {
            InsightKind::Warning => "⚠️",
            InsightKind::Info => "ℹ️",
            InsightKind::Recommendation => "💡",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InsightKind::Warning => "warning",
            InsightKind::Info => "info",
            InsightKind::Recommendation => "recommendation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding about the analyzed code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub files_affected: BTreeSet<PathBuf>,
}

impl Insight {
    pub fn new(
        kind: InsightKind,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            severity,
            files_affected: BTreeSet::new(),
        }
    }

    pub fn with_files(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.files_affected.extend(files);
        self
    }
}

/// A single check over the model. Rules never mutate what they read.
pub trait InsightRule {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn evaluate(&self, model: &StructuralModel) -> Option<Insight>;
}

/// Callables whose complexity exceeds the threshold
pub struct HighComplexityRule {
    threshold: u32,
}

impl HighComplexityRule {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

impl InsightRule for HighComplexityRule {
    fn name(&self) -> &'static str {
        "high-complexity"
    }

    fn evaluate(&self, model: &StructuralModel) -> Option<Insight> {
        let complex: Vec<_> = model
            .declarations()
            .callables()
            .filter(|f| f.complexity > self.threshold)
            .collect();
        if complex.is_empty() {
            return None;
        }

        let insight = Insight::new(
            InsightKind::Warning,
            Severity::Medium,
            "High Complexity Functions Detected",
            format!(
                "Found {} functions with complexity > {}. Consider refactoring.",
                complex.len(),
                self.threshold
            ),
        )
        .with_files(complex.iter().map(|f| f.source_file.clone()));
        Some(insight)
    }
}

/// Decorators applied more than once
pub struct ReusedDecoratorRule;

impl InsightRule for ReusedDecoratorRule {
    fn name(&self) -> &'static str {
        "reused-decorators"
    }

    fn evaluate(&self, model: &StructuralModel) -> Option<Insight> {
        let reused = model
            .decorators()
            .iter()
            .filter(|(_, usages)| usages.len() > 1)
            .count();
        if reused == 0 {
            return None;
        }

        Some(Insight::new(
            InsightKind::Info,
            Severity::Low,
            "Decorator Patterns Found",
            format!(
                "Found {} decorators used across multiple functions. This indicates good architectural patterns.",
                reused
            ),
        ))
    }
}

/// More than one distinct decorator carrying the checksum marker
pub struct DuplicateChecksumRule {
    marker: String,
}

impl DuplicateChecksumRule {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl InsightRule for DuplicateChecksumRule {
    fn name(&self) -> &'static str {
        "duplicate-checksum"
    }

    fn evaluate(&self, model: &StructuralModel) -> Option<Insight> {
        let variants = model
            .decorators()
            .names()
            .filter(|name| name.contains(self.marker.as_str()))
            .count();
        if variants <= 1 {
            return None;
        }

        Some(Insight::new(
            InsightKind::Recommendation,
            Severity::Medium,
            "Multiple Checksum Decorator Implementations",
            "Found multiple checksum decorator implementations. Consider consolidating for consistency.",
        ))
    }
}

/// The fixed rule set, in output order
pub fn default_rules(config: &InsightConfig) -> Vec<Box<dyn InsightRule>> {
    vec![
        Box::new(HighComplexityRule::new(config.complexity_threshold)),
        Box::new(ReusedDecoratorRule),
        Box::new(DuplicateChecksumRule::new(config.checksum_marker.clone())),
    ]
}

/// Runs rules in order and collects what they report
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl InsightEngine {
    pub fn new(config: &InsightConfig) -> Self {
        Self::with_rules(default_rules(config))
    }

    pub fn with_rules(rules: Vec<Box<dyn InsightRule>>) -> Self {
        Self { rules }
    }

    pub fn run(&self, model: &StructuralModel) -> Vec<Insight> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let insight = rule.evaluate(model);
                if insight.is_some() {
                    tracing::debug!("Rule {} fired", rule.name());
                }
                insight
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::ModelOptions;
    use crate::parser::{ClassDecl, FileDeclarations, FunctionDecl};

    fn func(name: &str, file: &str, complexity: u32, decorators: &[&str]) -> FunctionDecl {
        let mut f = FunctionDecl::new(name, PathBuf::from(file), 1);
        f.complexity = complexity;
        f.decorators = decorators.iter().map(|d| d.to_string()).collect();
        f
    }

    fn model_of(files: Vec<(&str, Vec<FunctionDecl>)>) -> StructuralModel {
        let mut model = StructuralModel::new(ModelOptions::default());
        for (path, functions) in files {
            let mut file = FileDeclarations::new(PathBuf::from(path), 1);
            file.functions = functions;
            model.absorb(file);
        }
        model
    }

    fn engine() -> InsightEngine {
        InsightEngine::new(&InsightConfig::default())
    }

    #[test]
    fn test_no_insights_for_simple_code() {
        let model = model_of(vec![("a.py", vec![func("f", "a.py", 2, &[])])]);
        assert!(engine().run(&model).is_empty());
    }

    #[test]
    fn test_high_complexity_threshold_is_exclusive() {
        let model = model_of(vec![("a.py", vec![func("f", "a.py", 10, &[])])]);
        assert!(engine().run(&model).is_empty());
    }

    #[test]
    fn test_high_complexity_files_are_distinct() {
        let model = model_of(vec![
            (
                "a.py",
                vec![func("f", "a.py", 11, &[]), func("g", "a.py", 14, &[])],
            ),
            ("b.py", vec![func("h", "b.py", 12, &[]), func("i", "b.py", 3, &[])]),
            ("c.py", vec![func("j", "c.py", 1, &[])]),
        ]);
        let insights = engine().run(&model);
        assert_eq!(insights.len(), 1);

        let insight = &insights[0];
        assert_eq!(insight.kind, InsightKind::Warning);
        assert_eq!(insight.severity, Severity::Medium);
        assert_eq!(insight.title, "High Complexity Functions Detected");
        assert!(insight.description.contains("Found 3 functions"));
        let files: Vec<PathBuf> = insight.files_affected.iter().cloned().collect();
        assert_eq!(files, vec![PathBuf::from("a.py"), PathBuf::from("b.py")]);
    }

    #[test]
    fn test_high_complexity_includes_methods() {
        let mut class = ClassDecl::new("Foo", PathBuf::from("a.py"), 1);
        class.methods.push(func("bar", "a.py", 20, &[]));
        let mut file = FileDeclarations::new(PathBuf::from("a.py"), 5);
        file.classes.push(class);
        let mut model = StructuralModel::new(ModelOptions::default());
        model.absorb(file);

        let insights = engine().run(&model);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].description.contains("Found 1 functions"));
    }

    #[test]
    fn test_reused_decorators() {
        let model = model_of(vec![(
            "a.py",
            vec![
                func("f", "a.py", 1, &["cache", "log"]),
                func("g", "a.py", 1, &["cache"]),
            ],
        )]);
        let insights = engine().run(&model);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Info);
        assert_eq!(insights[0].severity, Severity::Low);
        assert!(insights[0].description.starts_with("Found 1 decorators"));
        assert!(insights[0].files_affected.is_empty());
    }

    #[test]
    fn test_checksum_variants() {
        let model = model_of(vec![(
            "a.py",
            vec![
                func("f", "a.py", 1, &["ChecksumA"]),
                func("g", "a.py", 1, &["ChecksumB"]),
            ],
        )]);
        let insights = engine().run(&model);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Recommendation);
        assert_eq!(insights[0].title, "Multiple Checksum Decorator Implementations");
    }

    #[test]
    fn test_checksum_marker_is_case_sensitive() {
        let model = model_of(vec![(
            "a.py",
            vec![
                func("f", "a.py", 1, &["checksum_a"]),
                func("g", "a.py", 1, &["ChecksumB"]),
            ],
        )]);
        assert!(engine().run(&model).is_empty());
    }

    #[test]
    fn test_rule_order() {
        let model = model_of(vec![(
            "a.py",
            vec![
                func("f", "a.py", 12, &["ChecksumA", "retry"]),
                func("g", "a.py", 1, &["ChecksumB", "retry"]),
            ],
        )]);
        let kinds: Vec<InsightKind> = engine().run(&model).iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightKind::Warning,
                InsightKind::Info,
                InsightKind::Recommendation
            ]
        );
    }

    #[test]
    fn test_custom_threshold() {
        let config = InsightConfig {
            complexity_threshold: 2,
            ..Default::default()
        };
        let model = model_of(vec![("a.py", vec![func("f", "a.py", 3, &[])])]);
        let insights = InsightEngine::new(&config).run(&model);
        assert!(insights[0].description.contains("complexity > 2"));
    }

    #[test]
    fn test_insight_serialization() {
        let insight = Insight::new(InsightKind::Info, Severity::Low, "t", "d");
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "info");
        assert_eq!(json["severity"], "low");
        assert!(json["files_affected"].as_array().unwrap().is_empty());
    }
}
