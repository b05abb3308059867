//! Template command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tender_core::{parse_stored_result, AnalysisMerger, TemplateKind, TemplateRequest};

use super::core::{emit_json, load_sentinels, read_input};

/// List the template catalogue with placeholders
pub fn cmd_templates() -> Result<()> {
    println!("Available Templates:\n");
    for kind in TemplateKind::all() {
        println!("{}", kind);
        println!("  Output: {}", kind.output_filename());
        println!("  Placeholders: {}", kind.placeholders().join(", "));
        println!();
    }
    Ok(())
}

/// Build the template generation request body from a stored result
pub fn build_template_request(
    template: &str,
    result: &Path,
    merger: &AnalysisMerger,
) -> Result<TemplateRequest> {
    let kind: TemplateKind = template.parse()?;
    let content = read_input(result)?;
    let merged = parse_stored_result(&content, merger)
        .with_context(|| format!("Failed to load tender result from {}", result.display()))?;
    Ok(TemplateRequest::new(kind, merged))
}

pub fn cmd_template_request(
    template: &str,
    result: &Path,
    sentinels: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let merger = AnalysisMerger::new(load_sentinels(sentinels)?);
    let request = build_template_request(template, result, &merger)?;
    emit_json(&serde_json::to_value(&request)?, output, false)
}
