// Open a generated report with the platform's default handler

use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;

const NO_ARGS: &[&str] = &[];
const WINDOWS_START: &[&str] = &["/C", "start", ""];

/// Program and leading arguments used to open a file
pub fn opener_command() -> Option<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "macos") {
        Some(("open", NO_ARGS))
    } else if cfg!(target_os = "windows") {
        Some(("cmd", WINDOWS_START))
    } else if cfg!(unix) {
        Some(("xdg-open", NO_ARGS))
    } else {
        None
    }
}

/// Open `path` in the default browser or viewer
pub fn open_in_browser(path: &Path) -> Result<()> {
    let (program, args) = opener_command()
        .ok_or_else(|| Error::other("Opening files is not supported on this platform"))?;

    Command::new(program)
        .args(args)
        .arg(path)
        .spawn()
        .map_err(|e| Error::other(format!("Failed to open {}: {}", path.display(), e)))?;
    tracing::info!("Opened {}", path.display());
    Ok(())
}
