//! Merge and parse command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tender_core::{
    parse_analysis_response, parse_upload_response, AnalysisMerger, MergedAnalysis,
    SourcedAnalysis,
};
use tracing::info;

use super::core::{emit_json, load_sentinels, read_input};

/// Collect analyses from every input file (in argument order) and merge them
pub fn merge_files(files: &[PathBuf], merger: &AnalysisMerger) -> Result<MergedAnalysis> {
    let mut records = Vec::new();
    for path in files {
        let content = read_input(path)?;
        let batch = parse_upload_response(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        records.extend(batch);
    }

    let merged = merger.merge(&records)?;
    info!(
        sources = records.len(),
        files = files.len(),
        "Merged tender analyses"
    );
    Ok(merged)
}

/// Merge upload responses and print the consolidated record
pub fn cmd_merge(
    files: &[PathBuf],
    sentinels: Option<&Path>,
    output: Option<&Path>,
    compact: bool,
) -> Result<()> {
    let merger = AnalysisMerger::new(load_sentinels(sentinels)?);
    let merged = merge_files(files, &merger)?;
    emit_json(&serde_json::to_value(&merged)?, output, compact)
}

/// Extract one analysis from raw model output
pub fn parse_response_file(file: &Path, source: Option<&str>) -> Result<SourcedAnalysis> {
    let content = read_input(file)?;
    let analysis = parse_analysis_response(&content)
        .with_context(|| format!("Failed to parse analysis in {}", file.display()))?;

    let source = match source {
        Some(s) => s.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string()),
    };
    Ok(SourcedAnalysis::new(source, analysis))
}

/// Print a parsed analysis as a sourced record
pub fn cmd_parse(file: &Path, source: Option<&str>) -> Result<()> {
    let sourced = parse_response_file(file, source)?;
    emit_json(&serde_json::to_value(&sourced)?, None, false)
}
