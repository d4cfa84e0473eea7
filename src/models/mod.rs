//! Core data models for the payslip rendering service.
//!
//! Every type here is a request-scoped value: built fresh for one API call
//! and never mutated after construction.

mod batch;
mod credential;
pub mod fields;
mod payslip;
mod report;

pub use batch::PayrollBatch;
pub use credential::{Credential, SessionIdentity};
pub use fields::Many2One;
pub use payslip::{NET_CODE, Payslip, PayslipLine, PayslipRecord, net_wage};
pub use report::{
    MatchConfidence, RenderedDocument, ReportAction, ReportCategory, ReportSelection,
};
