// Template engine for the HTML report

use crate::error::Result;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

pub const REPORT_TEMPLATE: &str = "report.html";

/// Template engine wrapping Tera with custom filters and templates
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create a new template engine with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template(
            REPORT_TEMPLATE,
            include_str!("../../templates/report.html.tera"),
        )?;

        tera.register_filter("pluralize", pluralize);
        tera.register_filter("slugify", slugify_filter);

        Ok(Self { tera })
    }

    /// Render a template with context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// `3 classes`, `1 class`; the plural defaults to the noun plus `s`
fn count_noun(count: u64, singular: &str, plural: Option<&str>) -> String {
    match (count, plural) {
        (1, _) => format!("1 {}", singular),
        (n, Some(plural)) => format!("{} {}", n, plural),
        (n, None) => format!("{} {}s", n, singular),
    }
}

/// `{{ n | pluralize(singular="usage") }}`
fn pluralize(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let count = value
        .as_u64()
        .ok_or_else(|| tera::Error::msg("pluralize expects a non-negative integer"))?;
    let singular = args
        .get("singular")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("pluralize requires a `singular` argument"))?;
    let plural = args.get("plural").and_then(Value::as_str);
    Ok(Value::String(count_noun(count, singular, plural)))
}

fn slugify_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().unwrap_or("");
    Ok(Value::String(slugify(s)))
}

/// Convert text to an anchor-friendly slug
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
