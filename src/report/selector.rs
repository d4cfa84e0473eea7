//! Deciding which backend report prints a batch.

use serde_json::json;
use tracing::{info, warn};

use crate::error::SelectionError;
use crate::models::{
    MatchConfidence, Payslip, ReportAction, ReportCategory, ReportSelection, SessionIdentity,
};
use crate::odoo::{RecordQuery, RecordService, model};

/// Substring of a structure name that marks a thirteenth-month payslip.
/// Matched case-sensitively.
pub const AGUINALDO_MARKER: &str = "Aguinaldo";

/// Fields read for each registered report.
pub const REPORT_FIELDS: &[&str] = &["id", "report_name", "name"];

/// Ties a report-name substring to the category it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRule {
    /// Lowercase substring looked for in the report's technical name.
    pub needle: &'static str,
    /// The category this rule selects for.
    pub category: ReportCategory,
}

impl MatchRule {
    /// Whether `report` satisfies this rule. Case-insensitive on the report
    /// name only; the needle is already lowercase.
    pub fn matches(&self, report: &ReportAction) -> bool {
        report.report_name.to_lowercase().contains(self.needle)
    }
}

/// Matching rules, in priority order.
pub const MATCH_RULES: &[MatchRule] = &[
    MatchRule {
        needle: "pago",
        category: ReportCategory::Standard,
    },
    MatchRule {
        needle: "aguinaldo",
        category: ReportCategory::Aguinaldo,
    },
];

/// Classifies a batch by the structures of its payslips.
///
/// One thirteenth-month payslip is enough to print the whole batch as
/// [`ReportCategory::Aguinaldo`]. An empty batch is
/// [`ReportCategory::Standard`].
///
/// # Example
///
/// ```
/// use colillas::models::ReportCategory;
/// use colillas::report::classify;
///
/// assert_eq!(classify(&[]), ReportCategory::Standard);
/// ```
pub fn classify(payslips: &[Payslip]) -> ReportCategory {
    if payslips
        .iter()
        .any(|payslip| payslip.struct_name.contains(AGUINALDO_MARKER))
    {
        ReportCategory::Aguinaldo
    } else {
        ReportCategory::Standard
    }
}

/// Picks a report for `category` from the registered `reports`.
///
/// Rules for the category are tried in [`MATCH_RULES`] order against every
/// report, in registry order; the first hit wins. With no hit, the first
/// registered report is returned as a [`MatchConfidence::Fallback`],
/// whatever category it was meant for. Returns `None` only when `reports`
/// is empty.
///
/// # Example
///
/// ```
/// use colillas::models::{MatchConfidence, ReportAction, ReportCategory};
/// use colillas::report::select_report;
///
/// let reports = vec![
///     ReportAction { id: 1, report_name: "hr.otro_reporte".into(), name: "Otro Reporte".into() },
///     ReportAction { id: 2, report_name: "l10n_ni.boleta_PAGO".into(), name: "Boleta de Pago".into() },
/// ];
/// let selection = select_report(&reports, ReportCategory::Standard).unwrap();
/// assert_eq!(selection.report_id, 2);
/// assert_eq!(selection.confidence, MatchConfidence::Matched);
/// ```
pub fn select_report(reports: &[ReportAction], category: ReportCategory) -> Option<ReportSelection> {
    let matched = MATCH_RULES
        .iter()
        .filter(|rule| rule.category == category)
        .find_map(|rule| reports.iter().find(|report| rule.matches(report)));

    match matched {
        Some(report) => Some(ReportSelection::from_action(
            category,
            report,
            MatchConfidence::Matched,
        )),
        None => reports.first().map(|report| {
            ReportSelection::from_action(category, report, MatchConfidence::Fallback)
        }),
    }
}

/// Queries the backend's payslip reports and picks one for `category`.
pub async fn resolve_backend_report(
    records: &dyn RecordService,
    identity: &SessionIdentity,
    category: ReportCategory,
) -> Result<ReportSelection, SelectionError> {
    let reports: Vec<ReportAction> = RecordQuery::new(records, identity)
        .search_read(
            model::REPORT_ACTION,
            json!([["model", "=", model::PAYSLIP]]),
            REPORT_FIELDS,
        )
        .await?;

    let selection =
        select_report(&reports, category).ok_or_else(|| SelectionError::NoReportsRegistered {
            model: model::PAYSLIP.to_string(),
        })?;

    if selection.is_fallback() {
        warn!(
            category = %category,
            report = %selection.report_name,
            registered = reports.len(),
            "No report matched the category, falling back to the first registered report"
        );
    } else {
        info!(category = %category, report = %selection.report_name, "Resolved report");
    }
    Ok(selection)
}
