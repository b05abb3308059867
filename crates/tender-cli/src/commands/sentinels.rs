//! Sentinel inspection command

use std::path::Path;

use anyhow::Result;
use tender_core::sentinel::default_config_path;

use super::core::load_sentinels;

/// List active sentinel patterns, optionally checking a value against them
pub fn cmd_sentinels(path: Option<&Path>, check: Option<&str>) -> Result<()> {
    let matcher = load_sentinels(path)?;

    println!("Sentinel patterns ({}):\n", matcher.source());
    if matcher.patterns().is_empty() {
        println!("  (none)");
    }
    for pattern in matcher.patterns() {
        println!("  - {}", pattern);
    }

    println!();
    println!(
        "Override file: {}",
        default_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    if let Some(value) = check {
        println!();
        if matcher.is_informative(value) {
            println!("\"{}\" is a real value", value);
        } else if value.trim().is_empty() {
            println!("\"{}\" is blank", value);
        } else {
            println!("\"{}\" is a sentinel", value);
        }
    }

    Ok(())
}
