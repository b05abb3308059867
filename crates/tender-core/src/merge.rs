//! Multi-source analysis merge
//!
//! A tender is often split across several uploaded files (main notice,
//! annexes, technical specification). Each file is analysed separately; the
//! merger reduces those per-file records into one:
//!
//! - scalar text fields: first informative value in input order, falling back
//!   to the first record's raw value
//! - `required_documents`: union, first-seen order, no duplicates
//! - `avk5_required`: true if any record says so
//! - `additional_requirements`: union, later sources win, omitted when empty
//! - `filename`: all sources joined with `"; "`

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{AnalysisRecord, MergedAnalysis, ScalarField, SourcedAnalysis};
use crate::sentinel::SentinelMatcher;

/// Separator between source names in [`MergedAnalysis::filename`]
pub const FILENAME_SEPARATOR: &str = "; ";

/// Reconciles per-document analyses into one record
#[derive(Debug, Clone, Default)]
pub struct AnalysisMerger {
    sentinels: SentinelMatcher,
}

impl AnalysisMerger {
    pub fn new(sentinels: SentinelMatcher) -> Self {
        Self { sentinels }
    }

    pub fn sentinels(&self) -> &SentinelMatcher {
        &self.sentinels
    }

    /// Merge a non-empty batch of analyses
    ///
    /// A single record goes through the same reduction as a batch, so the
    /// output shape never depends on the batch size.
    pub fn merge(&self, records: &[SourcedAnalysis]) -> Result<MergedAnalysis> {
        let first = records.first().ok_or(Error::EmptyInput)?;

        let mut analysis = AnalysisRecord::default();

        for field in ScalarField::all() {
            let picked = records
                .iter()
                .map(|r| field.get(&r.analysis))
                .find(|v| self.sentinels.is_informative(v));

            let value = match picked {
                Some(v) => v,
                None => {
                    debug!(field = %field, "No informative value, keeping first record's");
                    field.get(&first.analysis)
                }
            };
            field.set(&mut analysis, value.to_string());
        }

        analysis.required_documents = union_documents(records);
        analysis.avk5_required = records.iter().any(|r| r.analysis.avk5_required);
        analysis.additional_requirements = union_extras(records);

        let filename = records
            .iter()
            .map(|r| r.source.as_str())
            .collect::<Vec<_>>()
            .join(FILENAME_SEPARATOR);

        debug!(
            sources = records.len(),
            documents = analysis.required_documents.len(),
            "Merged analyses"
        );

        Ok(MergedAnalysis { analysis, filename })
    }
}

/// Merge with the built-in sentinel patterns
pub fn merge(records: &[SourcedAnalysis]) -> Result<MergedAnalysis> {
    AnalysisMerger::default().merge(records)
}

fn union_documents(records: &[SourcedAnalysis]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut documents = Vec::new();
    for doc in records.iter().flat_map(|r| &r.analysis.required_documents) {
        if seen.insert(doc.as_str()) {
            documents.push(doc.clone());
        }
    }
    documents
}

fn union_extras(records: &[SourcedAnalysis]) -> Option<BTreeMap<String, String>> {
    let mut extras = BTreeMap::new();
    for map in records
        .iter()
        .filter_map(|r| r.analysis.additional_requirements.as_ref())
    {
        extras.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    (!extras.is_empty()).then_some(extras)
}
