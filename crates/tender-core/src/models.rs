//! Domain models for tender analysis
//!
//! Records arrive from the analysis backend as loosely-typed JSON. Field
//! deserializers here are lenient: a missing or `null` field becomes empty,
//! and scalars of the wrong type are kept as their JSON text, so records with
//! heterogeneous shapes can still be merged.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured analysis of one tender document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// Procuring entity
    #[serde(default, deserialize_with = "lenient_string")]
    pub issuer: String,
    /// Free-form date or text, not guaranteed to parse
    #[serde(default, deserialize_with = "lenient_string")]
    pub deadline: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub budget: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_type: String,
    /// Documents a bidder must submit (may contain duplicates before merge)
    #[serde(default, deserialize_with = "lenient_list")]
    pub required_documents: Vec<String>,
    /// Whether an AVK-5 cost estimate is required
    #[serde(default, deserialize_with = "lenient_bool")]
    pub avk5_required: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub technical_specs: String,
    /// The analysis prompt spells this key `pyment_terms`
    #[serde(default, alias = "pyment_terms", deserialize_with = "lenient_string")]
    pub payment_terms: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub resource_requirements: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timeline_feasibility: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profitability: String,
    /// Open-schema extras discovered per document
    #[serde(
        default,
        deserialize_with = "lenient_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_requirements: Option<BTreeMap<String, String>>,
}

/// An analysis tagged with the document it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcedAnalysis {
    /// Usually the uploaded filename
    pub source: String,
    pub analysis: AnalysisRecord,
}

impl SourcedAnalysis {
    pub fn new(source: impl Into<String>, analysis: AnalysisRecord) -> Self {
        Self {
            source: source.into(),
            analysis,
        }
    }
}

/// Consolidated analysis across all documents of one tender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedAnalysis {
    #[serde(flatten)]
    pub analysis: AnalysisRecord,
    /// Contributing sources joined with `"; "`
    pub filename: String,
}

/// Scalar string fields of an [`AnalysisRecord`], in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    Title,
    Issuer,
    Deadline,
    Budget,
    Location,
    ProjectType,
    TechnicalSpecs,
    PaymentTerms,
    ResourceRequirements,
    TimelineFeasibility,
    Profitability,
}

impl ScalarField {
    /// JSON key for this field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Issuer => "issuer",
            Self::Deadline => "deadline",
            Self::Budget => "budget",
            Self::Location => "location",
            Self::ProjectType => "project_type",
            Self::TechnicalSpecs => "technical_specs",
            Self::PaymentTerms => "payment_terms",
            Self::ResourceRequirements => "resource_requirements",
            Self::TimelineFeasibility => "timeline_feasibility",
            Self::Profitability => "profitability",
        }
    }

    pub fn all() -> &'static [ScalarField] {
        &[
            Self::Title,
            Self::Issuer,
            Self::Deadline,
            Self::Budget,
            Self::Location,
            Self::ProjectType,
            Self::TechnicalSpecs,
            Self::PaymentTerms,
            Self::ResourceRequirements,
            Self::TimelineFeasibility,
            Self::Profitability,
        ]
    }

    pub fn get<'a>(&self, record: &'a AnalysisRecord) -> &'a str {
        match self {
            Self::Title => &record.title,
            Self::Issuer => &record.issuer,
            Self::Deadline => &record.deadline,
            Self::Budget => &record.budget,
            Self::Location => &record.location,
            Self::ProjectType => &record.project_type,
            Self::TechnicalSpecs => &record.technical_specs,
            Self::PaymentTerms => &record.payment_terms,
            Self::ResourceRequirements => &record.resource_requirements,
            Self::TimelineFeasibility => &record.timeline_feasibility,
            Self::Profitability => &record.profitability,
        }
    }

    pub fn set(&self, record: &mut AnalysisRecord, value: String) {
        let slot = match self {
            Self::Title => &mut record.title,
            Self::Issuer => &mut record.issuer,
            Self::Deadline => &mut record.deadline,
            Self::Budget => &mut record.budget,
            Self::Location => &mut record.location,
            Self::ProjectType => &mut record.project_type,
            Self::TechnicalSpecs => &mut record.technical_specs,
            Self::PaymentTerms => &mut record.payment_terms,
            Self::ResourceRequirements => &mut record.resource_requirements,
            Self::TimelineFeasibility => &mut record.timeline_feasibility,
            Self::Profitability => &mut record.profitability,
        };
        *slot = value;
    }

    /// Whether `key` names a known field of the record (including the
    /// non-scalar ones and the `pyment_terms` alias)
    pub fn is_known_key(key: &str) -> bool {
        matches!(
            key,
            "required_documents" | "avk5_required" | "additional_requirements" | "pyment_terms"
        ) || Self::all().iter().any(|f| f.as_str() == key)
    }
}

impl std::fmt::Display for ScalarField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a batch upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub source: String,
    /// Left untyped: a failed analysis arrives as `{"error": "..."}`
    #[serde(default)]
    pub analysis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RawResult {
    pub fn is_success(&self) -> bool {
        self.status.is_empty() || self.status.eq_ignore_ascii_case("success")
    }
}

/// Response body of the batch upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub files: Vec<RawResult>,
}

/// Render a JSON value as plain text (strings unquoted, null empty)
pub(crate) fn value_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(value_text).unwrap_or_default())
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|v| !v.is_null())
            .map(value_text)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_map<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(
            map.into_iter()
                .map(|(k, v)| (k, value_text(v)))
                .collect(),
        ),
        _ => None,
    })
}
