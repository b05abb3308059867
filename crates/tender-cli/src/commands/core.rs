//! Shared command utilities

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tender_core::SentinelMatcher;
use tracing::debug;

/// Load sentinel patterns from an explicit path or the default locations
pub fn load_sentinels(path: Option<&Path>) -> Result<SentinelMatcher> {
    let matcher = match path {
        Some(p) => SentinelMatcher::from_file(p)
            .with_context(|| format!("Failed to load sentinels from {}", p.display()))?,
        None => SentinelMatcher::load().context("Failed to load sentinel patterns")?,
    };
    debug!(source = %matcher.source(), "Using sentinel patterns");
    Ok(matcher)
}

/// Read a UTF-8 input file
pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Render JSON pretty or compact
pub fn render_json(value: &Value, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}

/// Print JSON to stdout, or write it to `output`
pub fn emit_json(value: &Value, output: Option<&Path>, compact: bool) -> Result<()> {
    let rendered = render_json(value, compact)?;
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
