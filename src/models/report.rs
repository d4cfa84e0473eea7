//! Report selection and rendered document models.

use serde::{Deserialize, Serialize};

use super::fields;

/// The kind of pay stub a batch is printed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    /// Regular pay stub ("boleta de pago").
    Standard,
    /// Thirteenth-month bonus stub.
    Aguinaldo,
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportCategory::Standard => write!(f, "standard"),
            ReportCategory::Aguinaldo => write!(f, "aguinaldo"),
        }
    }
}

/// A printable report registered in the backend (`ir.actions.report`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportAction {
    /// The report action id.
    pub id: i64,
    /// Technical report name, used in the document URL
    /// (e.g. `l10n_ni_formatos_dgi.report_boleta_pago_template`).
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub report_name: String,
    /// Human-readable report name.
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub name: String,
}

/// How a report was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    /// A matching rule for the category hit this report.
    Matched,
    /// No rule matched; this is the first registered report.
    Fallback,
}

/// The backend report picked for one render request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSelection {
    /// The category the batch was classified as.
    pub category: ReportCategory,
    /// The backend report action id.
    pub report_id: i64,
    /// Technical report name.
    pub report_name: String,
    /// Human-readable report name.
    pub display_name: String,
    /// Whether the report matched a rule or is the fallback.
    pub confidence: MatchConfidence,
}

impl ReportSelection {
    /// Builds a selection from a registered report.
    pub fn from_action(
        category: ReportCategory,
        action: &ReportAction,
        confidence: MatchConfidence,
    ) -> Self {
        Self {
            category,
            report_id: action.id,
            report_name: action.report_name.clone(),
            display_name: action.name.clone(),
            confidence,
        }
    }

    /// Whether this selection came from the fallback rather than a rule.
    pub fn is_fallback(&self) -> bool {
        self.confidence == MatchConfidence::Fallback
    }
}

/// Raw bytes of a rendered document.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// The document bytes.
    pub bytes: Vec<u8>,
    /// The declared content type, or `application/pdf` when the backend
    /// declared none.
    pub content_kind: String,
}

impl std::fmt::Debug for RenderedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedDocument")
            .field("len", &self.bytes.len())
            .field("content_kind", &self.content_kind)
            .finish()
    }
}
