//! Document templates filled from a merged analysis
//!
//! Template rendering itself happens in the template service; this module
//! knows the catalogue, builds the request body, and performs the same
//! `<placeholder>` substitution the service applies to document text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{MergedAnalysis, ScalarField};

/// Fillable document templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    ContractNotice,
    DeclarationOfObjectivity,
    TenderFormSupplies,
    RetentionGuarantee,
    InvitationToTenderWorks,
}

impl TemplateKind {
    /// Template name as known to the template service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContractNotice => "Contract notice",
            Self::DeclarationOfObjectivity => {
                "Declaration objectivity confidentiality tender preparation"
            }
            Self::TenderFormSupplies => "Tender Form supplies",
            Self::RetentionGuarantee => "Retention guarantee_rev",
            Self::InvitationToTenderWorks => "Invitation to tender_works",
        }
    }

    pub fn all() -> &'static [TemplateKind] {
        &[
            Self::ContractNotice,
            Self::DeclarationOfObjectivity,
            Self::TenderFormSupplies,
            Self::RetentionGuarantee,
            Self::InvitationToTenderWorks,
        ]
    }

    /// Placeholder names the document contains
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            Self::ContractNotice => &[
                "Назва контракту",
                "Місцезнаходження",
                "Дата",
                "Назва установи",
                "Опис контракту",
            ],
            Self::DeclarationOfObjectivity => &["Ім'я", "Дата", "Підпис"],
            Self::TenderFormSupplies => &["Tender Title", "Tender ID", "Supplier Name", "Date"],
            Self::RetentionGuarantee => &[
                "Guarantee Amount",
                "Project Name",
                "Valid Until",
                "Bank Name",
            ],
            Self::InvitationToTenderWorks => &["Tender Name", "Deadline", "Location", "Client Name"],
        }
    }

    /// Name of the generated document
    pub fn output_filename(&self) -> String {
        format!("{}_filled.docx", self.as_str())
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownTemplate(s.to_string()))
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body for the template generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRequest {
    pub template_name: String,
    pub tender_result: MergedAnalysis,
}

impl TemplateRequest {
    pub fn new(template: TemplateKind, tender_result: MergedAnalysis) -> Self {
        Self {
            template_name: template.as_str().to_string(),
            tender_result,
        }
    }
}

/// Flatten a merged analysis into placeholder values
///
/// Schema fields use their JSON keys. Lists are joined with `", "`, the AVK-5
/// flag becomes `"true"`/`"false"`, and additional requirements are added
/// under their own keys unless they collide with a schema field.
pub fn template_values(merged: &MergedAnalysis) -> BTreeMap<String, String> {
    let analysis = &merged.analysis;
    let mut values: BTreeMap<String, String> = ScalarField::all()
        .iter()
        .map(|f| (f.as_str().to_string(), f.get(analysis).to_string()))
        .collect();

    values.insert(
        "required_documents".into(),
        analysis.required_documents.join(", "),
    );
    values.insert("avk5_required".into(), analysis.avk5_required.to_string());
    values.insert("filename".into(), merged.filename.clone());

    if let Some(extras) = &analysis.additional_requirements {
        for (key, value) in extras {
            values.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    values
}

/// Replace every `<key>` in `text` with its value
pub fn fill_placeholders(text: &str, values: &BTreeMap<String, String>) -> String {
    let mut filled = text.to_string();
    for (key, value) in values {
        let placeholder = format!("<{}>", key);
        if filled.contains(&placeholder) {
            filled = filled.replace(&placeholder, value);
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisRecord;

    fn merged() -> MergedAnalysis {
        MergedAnalysis {
            analysis: AnalysisRecord {
                title: "Ремонт мосту".into(),
                deadline: "2024-09-01".into(),
                required_documents: vec!["Ліцензія".into(), "Кошторис".into()],
                avk5_required: true,
                additional_requirements: Some(
                    [
                        ("warranty".to_string(), "5 років".to_string()),
                        ("title".to_string(), "ignored".to_string()),
                    ]
                    .into_iter()
                    .collect(),
                ),
                ..Default::default()
            },
            filename: "a.pdf; b.pdf".into(),
        }
    }

    #[test]
    fn test_template_catalogue() {
        assert_eq!(TemplateKind::all().len(), 5);
        for kind in TemplateKind::all() {
            assert!(!kind.placeholders().is_empty());
            assert_eq!(kind.as_str().parse::<TemplateKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_parse_template_name() {
        assert_eq!(
            " contract NOTICE ".parse::<TemplateKind>().unwrap(),
            TemplateKind::ContractNotice
        );
        assert!(matches!(
            "Purchase order".parse::<TemplateKind>(),
            Err(Error::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(
            TemplateKind::RetentionGuarantee.output_filename(),
            "Retention guarantee_rev_filled.docx"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = TemplateRequest::new(TemplateKind::TenderFormSupplies, merged());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["template_name"], "Tender Form supplies");
        assert_eq!(json["tender_result"]["title"], "Ремонт мосту");
        assert_eq!(json["tender_result"]["filename"], "a.pdf; b.pdf");
    }

    #[test]
    fn test_template_values() {
        let values = template_values(&merged());
        assert_eq!(values["title"], "Ремонт мосту");
        assert_eq!(values["required_documents"], "Ліцензія, Кошторис");
        assert_eq!(values["avk5_required"], "true");
        assert_eq!(values["warranty"], "5 років");
        assert_eq!(values["filename"], "a.pdf; b.pdf");
        assert_eq!(values["budget"], "");
    }

    #[test]
    fn test_fill_placeholders() {
        let values = template_values(&merged());
        let text = "Тендер: <title>, строк <deadline>. Гарантія: <warranty>. <unknown>";
        assert_eq!(
            fill_placeholders(text, &values),
            "Тендер: Ремонт мосту, строк 2024-09-01. Гарантія: 5 років. <unknown>"
        );
    }

    #[test]
    fn test_fill_repeated_placeholder() {
        let mut values = BTreeMap::new();
        values.insert("Дата".to_string(), "01.09.2024".to_string());
        assert_eq!(
            fill_placeholders("<Дата> / <Дата>", &values),
            "01.09.2024 / 01.09.2024"
        );
    }
}
