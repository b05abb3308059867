//! Parsing helpers for analysis backend payloads
//!
//! The analysis model answers with a JSON object that is sometimes wrapped in
//! extra prose, may carry keys beyond the fixed schema, and on failure is
//! replaced by `{"error": "..."}`. Batch uploads wrap one such object per file.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::merge::AnalysisMerger;
use crate::models::{
    value_text, AnalysisRecord, MergedAnalysis, RawResult, ScalarField, SourcedAnalysis,
    UploadResponse,
};

const ERROR_SNIPPET_LEN: usize = 200;

/// Truncate long payloads for error messages (char-boundary safe)
fn snippet(text: &str) -> String {
    if text.chars().count() > ERROR_SNIPPET_LEN {
        let head: String = text.chars().take(ERROR_SNIPPET_LEN).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Locate the outermost JSON object in a model response
pub fn extract_json(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in analysis response | Raw: {}",
            snippet(response)
        ))),
    }
}

/// Parse an analysis record from raw model output
pub fn parse_analysis_response(response: &str) -> Result<AnalysisRecord> {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid analysis JSON: {} | Raw: {}",
            e,
            snippet(json_str)
        ))
    })?;
    record_from_value(value)
}

/// Convert a backend analysis object into a record
///
/// Top-level keys outside the fixed schema are folded into
/// `additional_requirements`; explicit entries there take precedence.
pub fn record_from_value(value: Value) -> Result<AnalysisRecord> {
    let Value::Object(object) = value else {
        return Err(Error::InvalidData("Analysis must be a JSON object".into()));
    };

    if let Some(message) = backend_error(&object) {
        return Err(Error::Analysis(message));
    }

    let (mut known, extra): (Map<String, Value>, Map<String, Value>) = object
        .into_iter()
        .partition(|(key, _)| ScalarField::is_known_key(key));

    // Both spellings present would be a duplicate field for serde
    if known.contains_key("payment_terms") {
        known.remove("pyment_terms");
    }

    let mut record: AnalysisRecord = serde_json::from_value(Value::Object(known))?;

    let folded: Vec<(String, String)> = extra
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k, value_text(v)))
        .collect();

    if !folded.is_empty() {
        debug!(count = folded.len(), "Folding extra analysis keys into additional_requirements");
        let extras = record.additional_requirements.get_or_insert_with(Default::default);
        for (key, value) in folded {
            extras.entry(key).or_insert(value);
        }
    }

    Ok(record)
}

/// Error message of a `{"error": "..."}` payload, if that is what this is
fn backend_error(object: &Map<String, Value>) -> Option<String> {
    let message = object.get("error")?;
    let has_schema_keys = object.keys().any(|k| k != "error" && ScalarField::is_known_key(k));
    if has_schema_keys {
        return None;
    }
    Some(match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Convert one upload entry, or explain why it was skipped
fn sourced_from_raw(raw: RawResult) -> Result<SourcedAnalysis> {
    if !raw.is_success() {
        return Err(Error::Analysis(
            raw.message
                .unwrap_or_else(|| format!("status '{}'", raw.status)),
        ));
    }
    let analysis = raw
        .analysis
        .ok_or_else(|| Error::InvalidData("missing analysis".into()))?;
    Ok(SourcedAnalysis::new(raw.source, record_from_value(analysis)?))
}

/// Collect the usable analyses of a batch upload, in upload order
///
/// Failed entries are skipped with a warning; a batch with nothing usable
/// is an error.
pub fn sourced_from_upload(response: UploadResponse) -> Result<Vec<SourcedAnalysis>> {
    let total = response.files.len();
    let mut records = Vec::with_capacity(total);

    for raw in response.files {
        let source = raw.source.clone();
        match sourced_from_raw(raw) {
            Ok(record) => records.push(record),
            Err(e) => warn!(source = %source, error = %e, "Skipping upload entry"),
        }
    }

    if records.is_empty() {
        return Err(Error::NoRecords);
    }

    debug!(usable = records.len(), total, "Collected upload analyses");
    Ok(records)
}

/// Parse an upload payload: `{"files": [...]}`, a bare array of entries, or a
/// single `{"source": ..., "analysis": ...}` entry
pub fn parse_upload_response(json: &str) -> Result<Vec<SourcedAnalysis>> {
    let value: Value = serde_json::from_str(json)?;
    upload_from_value(value)
}

fn upload_from_value(value: Value) -> Result<Vec<SourcedAnalysis>> {
    let response = if value.is_array() {
        UploadResponse {
            files: serde_json::from_value(value)?,
        }
    } else if has_key(&value, "files") {
        serde_json::from_value(value)?
    } else if has_key(&value, "analysis") {
        UploadResponse {
            files: vec![serde_json::from_value(value)?],
        }
    } else {
        return Err(Error::InvalidData(
            "Expected an upload response, a list of results, or a single result".into(),
        ));
    };
    sourced_from_upload(response)
}

fn has_key(value: &Value, key: &str) -> bool {
    value.as_object().is_some_and(|o| o.contains_key(key))
}

/// Load a stored tender result
///
/// Stored results are either already merged (they carry `filename`) or the
/// raw list of per-file results, which is merged here.
pub fn parse_stored_result(json: &str, merger: &AnalysisMerger) -> Result<MergedAnalysis> {
    let value: Value = serde_json::from_str(json)?;
    if has_key(&value, "filename") {
        return Ok(serde_json::from_value(value)?);
    }
    merger.merge(&upload_from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_prose() {
        let response = "Ось результат:\n{\"title\": \"Ремонт\"}\nДякую!";
        assert_eq!(extract_json(response).unwrap(), "{\"title\": \"Ремонт\"}");
    }

    #[test]
    fn test_extract_json_missing() {
        let err = extract_json("Вибачте, не можу проаналізувати").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_error_snippet_truncates_on_char_boundary() {
        let long = "ї".repeat(500);
        let err = extract_json(&long).unwrap_err();
        assert!(err.to_string().ends_with("..."));
    }

    #[test]
    fn test_parse_analysis_response() {
        let response = r#"```json
{"title": "Ремонт школи", "avk5_required": true, "required_documents": ["Ліцензія"]}
```"#;
        let record = parse_analysis_response(response).unwrap();
        assert_eq!(record.title, "Ремонт школи");
        assert!(record.avk5_required);
        assert_eq!(record.required_documents, vec!["Ліцензія"]);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_analysis_response("{title: broken}");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_backend_error_payload() {
        let result = parse_analysis_response(r#"{"error": "Model returned invalid JSON."}"#);
        match result {
            Err(Error::Analysis(msg)) => assert_eq!(msg, "Model returned invalid JSON."),
            other => panic!("Expected analysis error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_key_alongside_schema_is_extra() {
        let record = parse_analysis_response(r#"{"title": "T", "error": "partial"}"#).unwrap();
        assert_eq!(record.title, "T");
        assert_eq!(
            record.additional_requirements.unwrap()["error"],
            "partial"
        );
    }

    #[test]
    fn test_extra_keys_folded() {
        let value = serde_json::json!({
            "title": "T",
            "compliance_requirements": "ISO 9001",
            "subcontractor_rules": ["до 20%"],
            "ignored": null,
            "additional_requirements": {"compliance_requirements": "explicit"}
        });
        let record = record_from_value(value).unwrap();
        let extras = record.additional_requirements.unwrap();
        assert_eq!(extras["compliance_requirements"], "explicit");
        assert_eq!(extras["subcontractor_rules"], "[\"до 20%\"]");
        assert!(!extras.contains_key("ignored"));
    }

    #[test]
    fn test_both_payment_spellings() {
        let record =
            parse_analysis_response(r#"{"payment_terms": "A", "pyment_terms": "B"}"#).unwrap();
        assert_eq!(record.payment_terms, "A");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            record_from_value(serde_json::json!(["a"])),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_upload_response_skips_failures() {
        let json = r#"{"files": [
            {"status": "success", "source": "a.pdf", "analysis": {"title": "A"}},
            {"status": "error", "source": "b.pdf", "message": "Unsupported file type"},
            {"status": "success", "source": "c.pdf", "analysis": {"error": "timeout"}},
            {"status": "success", "source": "d.pdf"},
            {"status": "success", "source": "e.pdf", "analysis": {"title": "E"}}
        ]}"#;
        let records = parse_upload_response(json).unwrap();
        let sources: Vec<_> = records.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["a.pdf", "e.pdf"]);
        assert_eq!(records[1].analysis.title, "E");
    }

    #[test]
    fn test_upload_response_all_failed() {
        let json = r#"{"files": [{"status": "error", "source": "a.pdf"}]}"#;
        assert!(matches!(parse_upload_response(json), Err(Error::NoRecords)));

        assert!(matches!(
            parse_upload_response(r#"{"files": []}"#),
            Err(Error::NoRecords)
        ));
    }

    #[test]
    fn test_upload_bare_array_and_single() {
        let array = r#"[{"status": "success", "source": "a.pdf", "analysis": {"title": "A"}}]"#;
        assert_eq!(parse_upload_response(array).unwrap().len(), 1);

        let single = r#"{"source": "a.pdf", "analysis": {"title": "A"}}"#;
        let records = parse_upload_response(single).unwrap();
        assert_eq!(records[0].source, "a.pdf");
    }

    #[test]
    fn test_upload_unrecognized_shape() {
        assert!(matches!(
            parse_upload_response(r#"{"title": "A"}"#),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            parse_upload_response("42"),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_stored_merged_result() {
        let json = r#"{"title": "T", "filename": "a.pdf; b.pdf", "avk5_required": true}"#;
        let merged = parse_stored_result(json, &AnalysisMerger::default()).unwrap();
        assert_eq!(merged.filename, "a.pdf; b.pdf");
        assert!(merged.analysis.avk5_required);
    }

    #[test]
    fn test_stored_raw_list_is_merged() {
        let json = r#"[
            {"status": "success", "source": "a.pdf", "analysis": {"title": "не вказано"}},
            {"status": "success", "source": "b.pdf", "analysis": {"title": "Міст"}}
        ]"#;
        let merged = parse_stored_result(json, &AnalysisMerger::default()).unwrap();
        assert_eq!(merged.analysis.title, "Міст");
        assert_eq!(merged.filename, "a.pdf; b.pdf");
    }
}
