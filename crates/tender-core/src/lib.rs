//! Tender Core Library
//!
//! Shared functionality for the tender analysis tool:
//! - Analysis record models with lenient deserialization
//! - Multi-source analysis merge
//! - Configurable "not specified" sentinel detection
//! - Parsing of analysis backend and batch upload payloads
//! - Template catalogue and placeholder filling

pub mod error;
pub mod merge;
pub mod models;
pub mod parsing;
pub mod sentinel;
pub mod template;

pub use error::{Error, Result};
pub use merge::{merge, AnalysisMerger};
pub use models::{AnalysisRecord, MergedAnalysis, RawResult, SourcedAnalysis, UploadResponse};
pub use parsing::{parse_analysis_response, parse_stored_result, parse_upload_response};
pub use sentinel::{SentinelMatcher, SentinelSource};
pub use template::{fill_placeholders, template_values, TemplateKind, TemplateRequest};
