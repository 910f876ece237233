// Integration tests for Archlens

use archlens::analysis::{EdgeKind, InsightKind, Severity};
use archlens::output::{from_json, generate_markdown, to_json, CursorExport, PageSet};
use archlens::{Analyzer, Config, Error};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Lay out a project under a temp root; paths are relative to the root
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (path, contents) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }
    dir
}

fn analyzer_with(config: Config) -> Analyzer {
    Analyzer::new(config).expect("Failed to create analyzer")
}

// Helper to create an analyzer with default config
fn create_analyzer() -> Analyzer {
    analyzer_with(Config::default())
}

const FOO_BAZ: &str = "class Foo:\n    def bar(self):\n        pass\n\ndef baz():\n    if True:\n        pass\n";

fn branchy(name: &str, branches: usize) -> String {
    let mut src = format!("def {}(x):\n", name);
    for i in 0..branches {
        src.push_str(&format!("    if x == {}:\n        return {}\n", i, i));
    }
    src.push_str("    return -1\n");
    src
}

// ============================================================================
// Analysis Tests
// ============================================================================

#[test]
fn test_analyze_foo_baz_scenario() {
    let root = project(&[("src/app.py", FOO_BAZ)]);
    let result = create_analyzer().analyze(root.path()).expect("Analysis failed");

    assert_eq!(result.summary.files_analyzed, 1);
    assert_eq!(result.summary.classes_found, 1);
    assert!(result.insights.is_empty());

    let foo = &result.declarations.classes[0];
    assert_eq!(foo.name, "Foo");
    assert_eq!(foo.methods.len(), 1);
    assert_eq!(foo.methods[0].name, "bar");
    assert_eq!(foo.methods[0].complexity, 1);

    let baz: Vec<_> = result.declarations.functions_named("baz").collect();
    assert_eq!(baz.len(), 1);
    assert_eq!(baz[0].complexity, 2);

    assert!(result.graph.has_edge("Foo", "bar"));
    assert_eq!(result.graph.edge_kind("Foo", "bar"), Some(EdgeKind::Member));
    assert!(!result.graph.contains("baz"));
}

#[test]
fn test_traversal_modes() {
    let root = project(&[("src/app.py", FOO_BAZ)]);

    let scoped = create_analyzer().analyze(root.path()).unwrap();
    assert_eq!(scoped.declarations.functions.len(), 1);
    assert_eq!(scoped.summary.functions_found, 2);

    let mut config = Config::default();
    config.analysis.methods_as_functions = true;
    let flat = analyzer_with(config).analyze(root.path()).unwrap();
    assert_eq!(flat.declarations.functions.len(), 2);
    assert!(flat.declarations.functions_named("bar").next().is_some());
    // Each callable still counted once
    assert_eq!(flat.summary.functions_found, 2);
    assert_eq!(flat.declarations.classes[0].methods.len(), 1);
}

#[test]
fn test_one_bad_file_among_good_ones() {
    let mut files: Vec<(String, String)> = (0..9)
        .map(|i| (format!("src/mod_{}.py", i), format!("def f{}():\n    return {}\n", i, i)))
        .collect();
    files.push(("src/mod_9.py".to_string(), "def broken(:\n    pass\n".to_string()));
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    let root = project(&refs);

    let result = create_analyzer().analyze(root.path()).expect("Run should complete");

    assert_eq!(result.summary.files_analyzed, 9);
    assert_eq!(result.summary.files_failed, 1);
    assert!(result.has_parse_errors());
    let failed: Vec<_> = result.parse_errors.keys().collect();
    assert!(failed[0].ends_with("mod_9.py"));
    assert!(result.declarations.functions_named("broken").next().is_none());
}

#[test]
fn test_same_name_in_two_files_is_kept() {
    let root = project(&[
        ("src/a.py", "class Config:\n    pass\n\ndef load():\n    pass\n"),
        ("src/b.py", "class Config:\n    pass\n\ndef load():\n    pass\n"),
    ]);

    let result = create_analyzer().analyze(root.path()).unwrap();
    assert_eq!(result.declarations.classes_named("Config").count(), 2);
    assert_eq!(result.declarations.functions_named("load").count(), 2);

    let mut config = Config::default();
    config.analysis.last_write_wins = true;
    let lossy = analyzer_with(config).analyze(root.path()).unwrap();
    let configs: Vec<_> = lossy.declarations.classes_named("Config").collect();
    assert_eq!(configs.len(), 1);
    assert!(configs[0].source_file.ends_with("b.py"));
}

#[test]
fn test_missing_target_directory() {
    let root = project(&[("src/app.py", FOO_BAZ)]);
    let mut config = Config::default();
    config.analysis.target_directories = vec!["src".to_string(), "lib".to_string()];

    let result = analyzer_with(config).analyze(root.path()).unwrap();
    assert_eq!(result.summary.files_analyzed, 1);
    assert_eq!(result.missing_directories, vec![root.path().join("lib")]);
}

#[test]
fn test_missing_root_is_an_error() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope");
    let err = create_analyzer().analyze(&missing).unwrap_err();
    assert!(matches!(err, Error::PathNotFound(_)));
}

#[test]
fn test_imports_are_indexed() {
    let root = project(&[
        ("src/a.py", "import os\nfrom typing import List\n"),
        ("src/b.py", "import os\nimport os\n"),
    ]);
    let result = create_analyzer().analyze(root.path()).unwrap();
    assert_eq!(result.imports.get("os").map(|files| files.len()), Some(2));
    assert_eq!(result.imports.get("typing.List").map(|files| files.len()), Some(1));
}

#[test]
fn test_future_imports_are_indexed() {
    let root = project(&[("src/future.py", "from __future__ import annotations\n")]);
    let result = create_analyzer().analyze(root.path()).unwrap();
    assert_eq!(
        result.imports.get("__future__.annotations").map(|files| files.len()),
        Some(1)
    );
}

#[test]
fn test_default_config_prunes_no_directories() {
    let root = project(&[
        ("src/app.py", "x = 1\n"),
        ("src/venv_tools/helpers.py", "def help_me():\n    pass\n"),
        ("src/environments/dev.py", "y = 2\n"),
    ]);
    let result = create_analyzer().analyze(root.path()).unwrap();
    assert_eq!(result.summary.files_analyzed, 3);
    assert!(result.declarations.functions_named("help_me").next().is_some());
}

#[test]
fn test_complexity_ties_follow_discovery_order() {
    let mut method = String::from("class A:\n    def m(self, x):\n");
    for i in 0..8 {
        method.push_str(&format!("        if x == {}:\n            return {}\n", i, i));
    }
    let root = project(&[
        ("src/a.py", method.as_str()),
        ("src/b.py", branchy("f", 8).as_str()),
    ]);
    let config = Config::default();
    let result = analyzer_with(config.clone()).analyze(root.path()).unwrap();

    let order: Vec<&str> = result.callables().map(|f| f.name.as_str()).collect();
    assert_eq!(order, vec!["m", "f"]);

    let md = generate_markdown(&result, &config.report);
    let m = md.find("- `m` (complexity: 9)").unwrap();
    let f = md.find("- `f` (complexity: 9)").unwrap();
    assert!(m < f);
}

// ============================================================================
// Insight Tests
// ============================================================================

#[test]
fn test_high_complexity_insight() {
    let root = project(&[
        ("src/busy.py", branchy("busy", 11).as_str()),
        ("src/calm.py", branchy("calm", 3).as_str()),
    ]);
    let result = create_analyzer().analyze(root.path()).unwrap();

    assert_eq!(result.insights.len(), 1);
    let insight = &result.insights[0];
    assert_eq!(insight.kind, InsightKind::Warning);
    assert_eq!(insight.severity, Severity::Medium);
    assert_eq!(
        insight.description,
        "Found 1 functions with complexity > 10. Consider refactoring."
    );
    assert_eq!(insight.files_affected.len(), 1);
    assert!(insight
        .files_affected
        .iter()
        .all(|f| f.ends_with("busy.py")));
}

#[test]
fn test_checksum_decorators_recommendation() {
    let root = project(&[(
        "src/handlers.py",
        "@ChecksumA\ndef one():\n    pass\n\n@ChecksumB\ndef two():\n    pass\n",
    )]);
    let result = create_analyzer().analyze(root.path()).unwrap();

    assert_eq!(result.insights.len(), 1);
    assert_eq!(result.insights[0].kind, InsightKind::Recommendation);
    assert!(result.insights[0].files_affected.is_empty());
}

#[test]
fn test_reused_decorator_insight() {
    let root = project(&[(
        "src/api.py",
        "@route\ndef a():\n    pass\n\n@route\ndef b():\n    pass\n",
    )]);
    let result = create_analyzer().analyze(root.path()).unwrap();

    assert_eq!(result.decorators.get("route").map(|u| u.len()), Some(2));
    assert_eq!(result.insights.len(), 1);
    assert_eq!(result.insights[0].kind, InsightKind::Info);
}

// ============================================================================
// Output Tests
// ============================================================================

#[test]
fn test_json_round_trip() {
    let root = project(&[
        ("src/app.py", FOO_BAZ),
        ("src/busy.py", branchy("busy", 12).as_str()),
    ]);
    let result = create_analyzer().analyze(root.path()).unwrap();

    let json = to_json(&result).unwrap();
    let parsed = from_json(&json).unwrap();
    assert_eq!(parsed.summary, result.summary);
    assert_eq!(parsed.declarations.classes.len(), 1);
    assert_eq!(parsed.insights.len(), result.insights.len());
}

#[test]
fn test_markdown_report() {
    let root = project(&[("src/busy.py", branchy("busy", 9).as_str())]);
    let config = Config::default();
    let result = analyzer_with(config.clone()).analyze(root.path()).unwrap();

    let md = generate_markdown(&result, &config.report);
    assert!(md.contains("- **Files Analyzed**: 1\n"));
    assert!(md.contains("### Functions with High Complexity (>8)"));
    assert!(md.contains("`busy` (complexity: 10)"));
}

#[test]
fn test_cursor_export_hotspots() {
    let root = project(&[("src/busy.py", branchy("busy", 11).as_str())]);
    let result = create_analyzer().analyze(root.path()).unwrap();

    let export = CursorExport::from_result(&result, 10);
    assert_eq!(export.hotspots.len(), 1);
    assert_eq!(export.hotspots[0].function, "busy");
    assert_eq!(export.recommendations.len(), 1);
}

#[test]
fn test_pages_written_under_root() {
    let root = project(&[("src/app.py", FOO_BAZ)]);
    let result = create_analyzer().analyze(root.path()).unwrap();

    let dir = PageSet::build(&result).write(root.path()).unwrap();
    assert_eq!(dir, root.path().join("MD"));

    let foo = fs::read_to_string(dir.join("Foo.md")).unwrap();
    assert!(foo.starts_with("# Foo\n\nCalled by: [[Main]](main.md)\n\n- bar\n"));
    assert!(Path::new(&dir.join("index.md")).exists());
    assert!(Path::new(&dir.join("main.md")).exists());
}
