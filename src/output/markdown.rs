// Markdown report

use crate::analysis::AnalysisResult;
use crate::config::ReportConfig;
use crate::output::group_thousands;

/// Render the full Markdown report
pub fn generate_markdown(analysis: &AnalysisResult, config: &ReportConfig) -> String {
    let mut md = String::new();
    md.push_str("# 🏗️ Code Architecture Analysis Report\n\n");

    // Summary
    let summary = &analysis.summary;
    md.push_str("## 📊 Summary\n\n");
    md.push_str(&format!("- **Files Analyzed**: {}\n", summary.files_analyzed));
    if summary.files_failed > 0 {
        md.push_str(&format!("- **Files Failed**: {}\n", summary.files_failed));
    }
    md.push_str(&format!(
        "- **Total Lines**: {}\n",
        group_thousands(summary.total_lines)
    ));
    md.push_str(&format!("- **Classes Found**: {}\n", summary.classes_found));
    md.push_str(&format!("- **Functions Found**: {}\n", summary.functions_found));
    md.push_str(&format!("- **Decorators Found**: {}\n", summary.decorators_found));
    md.push_str(&format!(
        "- **Insights Generated**: {}\n\n",
        summary.insights_generated
    ));

    // Insights
    md.push_str("## 🎯 Architectural Insights\n\n");
    for insight in &analysis.insights {
        md.push_str(&format!("### {} {}\n", insight.kind.icon(), insight.title));
        md.push_str(&format!(
            "**Severity**: {}\n\n",
            insight.severity.as_str().to_uppercase()
        ));
        md.push_str(&format!("{}\n\n", insight.description));
        if !insight.files_affected.is_empty() {
            md.push_str("**Files Affected**:\n");
            for file in &insight.files_affected {
                md.push_str(&format!("- `{}`\n", file.display()));
            }
            md.push('\n');
        }
    }

    // Decorators
    md.push_str("## 🎨 Decorator Patterns\n\n");
    let limit = config.max_decorator_usages;
    for (name, usages) in analysis.decorators.iter() {
        md.push_str(&format!("### `@{}` ({} usages)\n", name, usages.len()));
        for usage in usages.iter().take(limit) {
            md.push_str(&format!(
                "- `{}` in `{}:{}`\n",
                usage.function,
                usage.file.display(),
                usage.line
            ));
        }
        if usages.len() > limit {
            md.push_str(&format!("- ... and {} more\n", usages.len() - limit));
        }
        md.push('\n');
    }

    // Complexity
    md.push_str("## 🔥 Complexity Analysis\n\n");
    let threshold = config.complexity_threshold;
    let mut complex: Vec<_> = analysis
        .callables()
        .filter(|f| f.complexity > threshold)
        .collect();
    if complex.is_empty() {
        md.push_str("✅ No high-complexity functions found!\n");
    } else {
        complex.sort_by(|a, b| b.complexity.cmp(&a.complexity));
        md.push_str(&format!(
            "### Functions with High Complexity (>{})\n\n",
            threshold
        ));
        for func in complex {
            md.push_str(&format!(
                "- `{}` (complexity: {}) - `{}:{}`\n",
                func.name,
                func.complexity,
                func.source_file.display(),
                func.line
            ));
        }
    }

    // Skipped input
    if !analysis.parse_errors.is_empty() || !analysis.missing_directories.is_empty() {
        md.push_str("\n## ❌ Not Analyzed\n\n");
        for dir in &analysis.missing_directories {
            md.push_str(&format!("- `{}`: directory not found\n", dir.display()));
        }
        for (path, message) in &analysis.parse_errors {
            md.push_str(&format!("- `{}`: {}\n", path.display(), message));
        }
    }

    md.push_str(&format!(
        "\n---\n*Report generated on {}*\n",
        analysis.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        AnalysisResult, DeclarationSet, DecoratorUsageIndex, DependencyGraph, ImportIndex,
        Insight, InsightKind, Severity, Summary,
    };
    use crate::parser::{ClassDecl, FunctionDecl};
    use chrono::Local;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    fn func(name: &str, line: usize, complexity: u32, decorators: &[&str]) -> FunctionDecl {
        let mut f = FunctionDecl::new(name, PathBuf::from("src/app.py"), line);
        f.complexity = complexity;
        f.decorators = decorators.iter().map(|d| d.to_string()).collect();
        f
    }

    fn result_with(functions: Vec<FunctionDecl>, insights: Vec<Insight>) -> AnalysisResult {
        let mut declarations = DeclarationSet::new(false);
        let mut decorators = DecoratorUsageIndex::new();
        for f in functions {
            decorators.record_function(&f);
            declarations.insert_function(f, false);
        }
        AnalysisResult {
            summary: Summary {
                files_analyzed: 1,
                total_lines: 12345,
                functions_found: declarations.functions.len(),
                insights_generated: insights.len(),
                ..Default::default()
            },
            declarations,
            decorators,
            imports: ImportIndex::new(),
            insights,
            timestamp: Local::now(),
            parse_errors: BTreeMap::new(),
            missing_directories: Vec::new(),
            graph: DependencyGraph::new(),
        }
    }

    #[test]
    fn test_summary_block() {
        let md = generate_markdown(&result_with(vec![], vec![]), &ReportConfig::default());
        assert!(md.starts_with("# 🏗️ Code Architecture Analysis Report\n\n## 📊 Summary\n\n"));
        assert!(md.contains("- **Files Analyzed**: 1\n"));
        assert!(md.contains("- **Total Lines**: 12,345\n"));
        assert!(!md.contains("Files Failed"));
        assert!(md.contains("✅ No high-complexity functions found!"));
        assert!(md.contains("\n---\n*Report generated on "));
    }

    #[test]
    fn test_insight_section() {
        let insight = Insight::new(
            InsightKind::Warning,
            Severity::Medium,
            "High Complexity Functions Detected",
            "Found 1 functions with complexity > 10. Consider refactoring.",
        )
        .with_files(vec![PathBuf::from("src/app.py")]);
        let md = generate_markdown(&result_with(vec![], vec![insight]), &ReportConfig::default());
        assert!(md.contains("### ⚠️ High Complexity Functions Detected\n**Severity**: MEDIUM\n\n"));
        assert!(md.contains("**Files Affected**:\n- `src/app.py`\n"));
    }

    #[test]
    fn test_decorator_overflow() {
        let functions: Vec<FunctionDecl> = (1..=7)
            .map(|i| func(&format!("f{}", i), i, 1, &["cache"]))
            .collect();
        let md = generate_markdown(&result_with(functions, vec![]), &ReportConfig::default());
        assert!(md.contains("### `@cache` (7 usages)\n"));
        assert!(md.contains("- `f5` in `src/app.py:5`\n"));
        assert!(!md.contains("`f6`"));
        assert!(md.contains("- ... and 2 more\n"));
    }

    #[test]
    fn test_complexity_ranking_with_ties() {
        let functions = vec![
            func("low", 1, 8, &[]),
            func("first_tie", 2, 9, &[]),
            func("top", 3, 15, &[]),
            func("second_tie", 4, 9, &[]),
        ];
        let md = generate_markdown(&result_with(functions, vec![]), &ReportConfig::default());
        assert!(md.contains("### Functions with High Complexity (>8)\n\n"));

        let top = md.find("`top`").unwrap();
        let first = md.find("`first_tie`").unwrap();
        let second = md.find("`second_tie`").unwrap();
        assert!(top < first && first < second);
        assert!(!md.contains("`low`"));
        assert!(md.contains("- `top` (complexity: 15) - `src/app.py:3`\n"));
    }

    #[test]
    fn test_complexity_ties_across_files_keep_discovery_order() {
        let mut result = result_with(vec![], vec![]);
        let mut method = FunctionDecl::new("m", PathBuf::from("a.py"), 2);
        method.complexity = 9;
        let mut class = ClassDecl::new("A", PathBuf::from("a.py"), 1);
        class.methods.push(method);
        let mut f = FunctionDecl::new("f", PathBuf::from("b.py"), 1);
        f.complexity = 9;

        let decls = &mut result.declarations;
        decls.push_file(Path::new("a.py"));
        decls.push_file(Path::new("b.py"));
        decls.insert_function(f, false);
        decls.insert_class(class, false);

        let md = generate_markdown(&result, &ReportConfig::default());
        let m = md.find("- `m` (complexity: 9) - `a.py:2`").unwrap();
        let f = md.find("- `f` (complexity: 9) - `b.py:1`").unwrap();
        assert!(m < f);
    }

    #[test]
    fn test_not_analyzed_section() {
        let mut result = result_with(vec![], vec![]);
        result
            .parse_errors
            .insert(PathBuf::from("src/bad.py"), "invalid syntax at line 1, column 9".to_string());
        result.summary.files_failed = 1;
        let md = generate_markdown(&result, &ReportConfig::default());
        assert!(md.contains("- **Files Failed**: 1\n"));
        assert!(md.contains("## ❌ Not Analyzed"));
        assert!(md.contains("`src/bad.py`: invalid syntax"));
    }
}
