// Output generation: reports, exports and per-class pages

pub mod browser;
pub mod cursor;
pub mod html;
pub mod json;
pub mod markdown;
pub mod pages;
pub mod templates;

pub use browser::open_in_browser;
pub use cursor::CursorExport;
pub use html::HtmlReport;
pub use json::{from_json, to_json};
pub use markdown::generate_markdown;
pub use pages::PageSet;
pub use templates::TemplateEngine;

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Write an output artifact, creating its parent directory if needed
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
        }
    }
    fs::write(path, contents).map_err(|e| Error::write(path, e))
}

/// Format an integer with thousands separators
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
