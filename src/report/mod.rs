//! Report selection and document rendering.
//!
//! Rendering a batch goes through two steps:
//!
//! 1. [`classify`] the batch's payslips into a [`ReportCategory`], then
//!    [`resolve_backend_report`] to pick a registered backend report for it.
//! 2. [`render`] that report for the payslip ids over an open document
//!    session, validating that what comes back is a PDF.
//!
//! Unlike the batch reader, both steps surface their failures: an empty or
//! wrong document is worse than an explicit error.
//!
//! [`ReportCategory`]: crate::models::ReportCategory

mod renderer;
mod selector;

pub use renderer::{PDF_SIGNATURE, is_document, render, report_path};
pub use selector::{
    AGUINALDO_MARKER, MATCH_RULES, MatchRule, REPORT_FIELDS, classify, resolve_backend_report,
    select_report,
};
