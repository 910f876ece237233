// Cross-linked per-class Markdown pages
//
// One page per distinct class name, plus an index and the entry page every
// class page links back to.

use crate::analysis::AnalysisResult;
use crate::error::Result;
use crate::output::write_output;
use crate::parser::ClassDecl;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Directory under the analyzed root that receives the pages
pub const PAGES_DIR: &str = "MD";

pub const INDEX_PAGE: &str = "index.md";
pub const MAIN_PAGE: &str = "main.md";

/// A rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub file_name: String,
    pub contents: String,
}

/// All classes sharing one name
struct ClassGroup<'a> {
    name: &'a str,
    decls: Vec<&'a ClassDecl>,
}

impl ClassGroup<'_> {
    fn attributes(&self) -> Vec<&str> {
        unique(self.decls.iter().flat_map(|c| c.attributes.iter().map(|a| a.name.as_str())))
    }

    fn methods(&self) -> Vec<&str> {
        unique(self.decls.iter().flat_map(|c| c.methods.iter().map(|m| m.name.as_str())))
    }

    fn locations(&self) -> Vec<String> {
        self.decls
            .iter()
            .map(|c| format!("{}:{}", c.source_file.display(), c.line))
            .collect()
    }
}

fn unique<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    names.filter(|n| seen.insert(*n)).collect()
}

/// Page file for a class; names that would clash with the index or entry
/// page get a suffix
pub fn page_file_name(class_name: &str) -> String {
    let lower = class_name.to_lowercase();
    if lower == "index" || lower == "main" {
        format!("{}_class.md", class_name)
    } else {
        format!("{}.md", class_name)
    }
}

/// The full set of pages for a run
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pages: Vec<Page>,
}

impl PageSet {
    pub fn build(analysis: &AnalysisResult) -> Self {
        let groups = group_classes(&analysis.declarations.classes);
        let known: HashMap<&str, String> = groups
            .iter()
            .map(|g| (g.name, page_file_name(g.name)))
            .collect();

        let mut pages: Vec<Page> = groups
            .iter()
            .map(|group| Page {
                file_name: page_file_name(group.name),
                contents: render_class_page(group, analysis, &known),
            })
            .collect();

        pages.push(Page {
            file_name: INDEX_PAGE.to_string(),
            contents: render_index(&groups),
        });
        pages.push(Page {
            file_name: MAIN_PAGE.to_string(),
            contents: render_main(&groups, analysis),
        });

        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.pages
            .iter()
            .find(|p| p.file_name == file_name)
            .map(|p| p.contents.as_str())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Write every page into `<root>/MD`, returning the directory
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let dir = root.join(PAGES_DIR);
        for page in &self.pages {
            write_output(&dir.join(&page.file_name), &page.contents)?;
        }
        tracing::debug!("Wrote {} pages to {}", self.pages.len(), dir.display());
        Ok(dir)
    }
}

/// Group classes by name, in order of first appearance
fn group_classes(classes: &[ClassDecl]) -> Vec<ClassGroup<'_>> {
    let mut groups: Vec<ClassGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for class in classes {
        match positions.get(class.name.as_str()) {
            Some(&i) => groups[i].decls.push(class),
            None => {
                positions.insert(class.name.as_str(), groups.len());
                groups.push(ClassGroup {
                    name: class.name.as_str(),
                    decls: vec![class],
                });
            }
        }
    }
    groups
}

fn render_class_page(
    group: &ClassGroup,
    analysis: &AnalysisResult,
    known: &HashMap<&str, String>,
) -> String {
    let mut md = String::new();
    md.push_str(&format!("# {}\n\n", group.name));
    md.push_str(&format!("Called by: [[Main]]({})\n\n", MAIN_PAGE));

    for neighbor in analysis.graph.neighbors(group.name) {
        match known.get(neighbor) {
            Some(file) => md.push_str(&format!("- [[{}]]({})\n", neighbor, file)),
            None => md.push_str(&format!("- {}\n", neighbor)),
        }
    }
    md.push('\n');

    let attributes = group.attributes();
    if !attributes.is_empty() {
        md.push_str("## Attributes\n\n");
        for attr in attributes {
            md.push_str(&format!("- `{}`\n", attr));
        }
        md.push('\n');
    }

    let methods = group.methods();
    if !methods.is_empty() {
        md.push_str("## Methods\n\n");
        for method in methods {
            md.push_str(&format!("- [{}]({}.md)\n", method, method));
        }
        md.push('\n');
    }

    md.push_str("## Defined In\n\n");
    for location in group.locations() {
        md.push_str(&format!("- `{}`\n", location));
    }
    md
}

fn render_index(groups: &[ClassGroup]) -> String {
    let mut md = String::from("# Class Index\n\n");
    if groups.is_empty() {
        md.push_str("No classes found.\n");
        return md;
    }
    for group in groups {
        let locations: Vec<String> = group
            .locations()
            .into_iter()
            .map(|l| format!("`{}`", l))
            .collect();
        md.push_str(&format!(
            "- [{}]({}) - {}\n",
            group.name,
            page_file_name(group.name),
            locations.join(", ")
        ));
    }
    md
}

fn render_main(groups: &[ClassGroup], analysis: &AnalysisResult) -> String {
    let mut md = String::from("# Main\n\n");
    md.push_str(&format!(
        "{} classes across {} files. See the [class index]({}).\n\n",
        groups.len(),
        analysis.summary.files_analyzed,
        INDEX_PAGE
    ));
    for group in groups {
        md.push_str(&format!(
            "- [[{}]]({})\n",
            group.name,
            page_file_name(group.name)
        ));
    }
    md
}
