// IDE-integration export: hotspots and recommendations in one JSON file

use crate::analysis::{AnalysisResult, Summary};
use crate::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const EXPORT_VERSION: &str = "1.0";
pub const EXPORT_TYPE: &str = "architecture_analysis";

/// A callable worth looking at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    #[serde(rename = "type")]
    pub kind: String,
    pub file: PathBuf,
    pub line: usize,
    pub function: String,
    pub complexity: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub files: BTreeSet<PathBuf>,
}

/// The `<prefix>_cursor.json` document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorExport {
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Local>,
    pub summary: Summary,
    pub hotspots: Vec<Hotspot>,
    pub recommendations: Vec<Recommendation>,
}

impl CursorExport {
    /// Build the export; callables above `threshold` become hotspots
    pub fn from_result(analysis: &AnalysisResult, threshold: u32) -> Self {
        let hotspots = analysis
            .callables()
            .filter(|f| f.complexity > threshold)
            .map(|f| Hotspot {
                kind: "high_complexity".to_string(),
                file: f.source_file.clone(),
                line: f.line,
                function: f.name.clone(),
                complexity: f.complexity,
                message: format!(
                    "High complexity function ({}). Consider refactoring.",
                    f.complexity
                ),
            })
            .collect();

        let recommendations = analysis
            .insights
            .iter()
            .map(|i| Recommendation {
                kind: i.kind.as_str().to_string(),
                title: i.title.clone(),
                description: i.description.clone(),
                severity: i.severity.as_str().to_string(),
                files: i.files_affected.clone(),
            })
            .collect();

        Self {
            version: EXPORT_VERSION.to_string(),
            kind: EXPORT_TYPE.to_string(),
            timestamp: analysis.timestamp,
            summary: analysis.summary.clone(),
            hotspots,
            recommendations,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        DeclarationSet, DecoratorUsageIndex, DependencyGraph, ImportIndex, Insight, InsightKind,
        Severity,
    };
    use crate::parser::{ClassDecl, FunctionDecl};
    use std::collections::BTreeMap;

    fn result_with(declarations: DeclarationSet, insights: Vec<Insight>) -> AnalysisResult {
        AnalysisResult {
            summary: Summary::default(),
            declarations,
            decorators: DecoratorUsageIndex::new(),
            imports: ImportIndex::new(),
            insights,
            timestamp: Local::now(),
            parse_errors: BTreeMap::new(),
            missing_directories: Vec::new(),
            graph: DependencyGraph::new(),
        }
    }

    #[test]
    fn test_hotspots_include_methods() {
        let mut declarations = DeclarationSet::new(false);
        let mut simple = FunctionDecl::new("simple", PathBuf::from("a.py"), 1);
        simple.complexity = 10;
        declarations.insert_function(simple, false);
        let mut class = ClassDecl::new("Engine", PathBuf::from("b.py"), 1);
        let mut method = FunctionDecl::new("step", PathBuf::from("b.py"), 4);
        method.complexity = 11;
        class.methods.push(method);
        declarations.insert_class(class, false);

        let export = CursorExport::from_result(&result_with(declarations, vec![]), 10);
        assert_eq!(export.hotspots.len(), 1);
        let hotspot = &export.hotspots[0];
        assert_eq!(hotspot.function, "step");
        assert_eq!(hotspot.file, PathBuf::from("b.py"));
        assert_eq!(
            hotspot.message,
            "High complexity function (11). Consider refactoring."
        );
    }

    #[test]
    fn test_document_shape() {
        let insight = Insight::new(
            InsightKind::Recommendation,
            Severity::Medium,
            "Multiple Checksum Decorator Implementations",
            "Found multiple checksum decorator implementations.",
        );
        let export =
            CursorExport::from_result(&result_with(DeclarationSet::new(false), vec![insight]), 10);
        let value: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();

        assert_eq!(value["version"], "1.0");
        assert_eq!(value["type"], "architecture_analysis");
        assert_eq!(value["recommendations"][0]["type"], "recommendation");
        assert_eq!(value["recommendations"][0]["severity"], "medium");
        assert!(value["recommendations"][0]["files"].as_array().unwrap().is_empty());
        assert!(value["hotspots"].as_array().unwrap().is_empty());
        assert!(value["summary"].is_object());
    }
}
