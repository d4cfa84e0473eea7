//! Reading the payslips of one payroll run.

use std::collections::{HashMap, HashSet};

use serde_json::json;
use tracing::{error, info};

use super::Recovered;
use crate::error::ReadError;
use crate::models::{Payslip, PayslipLine, PayslipRecord, SessionIdentity};
use crate::odoo::{RecordQuery, RecordService, model};

/// Fields read for each payslip.
pub const PAYSLIP_FIELDS: &[&str] = &[
    "id",
    "name",
    "employee_id",
    "date_from",
    "date_to",
    "line_ids",
    "company_id",
    "struct_id",
];

/// Fields read for each payslip line.
pub const LINE_FIELDS: &[&str] = &["id", "name", "code", "total", "quantity", "slip_id"];

/// Reads the payslips of `batch_id` with their lines joined in.
/// Failures degrade to an empty list.
pub async fn read_batch_details(
    records: &dyn RecordService,
    identity: &SessionIdentity,
    batch_id: i64,
) -> Recovered<Vec<Payslip>> {
    let result = fetch_batch_details(records, identity, batch_id).await;
    match &result {
        Ok(payslips) => info!(batch_id, count = payslips.len(), "Read batch payslips"),
        Err(err) => error!(batch_id, error = %err, "Failed to read batch payslips"),
    }
    Recovered::from_result(result)
}

/// Reads the payslips of `batch_id`, propagating failures.
///
/// Costs at most three backend calls regardless of batch size: one search,
/// one read of the payslips and one read of all their lines. An empty
/// batch stops after the search.
pub async fn fetch_batch_details(
    records: &dyn RecordService,
    identity: &SessionIdentity,
    batch_id: i64,
) -> Result<Vec<Payslip>, ReadError> {
    let query = RecordQuery::new(records, identity);

    let ids = query
        .search(model::PAYSLIP, json!([["payslip_run_id", "=", batch_id]]))
        .await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let slips: Vec<PayslipRecord> = query.read(model::PAYSLIP, &ids, PAYSLIP_FIELDS).await?;

    let line_ids: Vec<i64> = slips
        .iter()
        .flat_map(|slip| slip.line_ids.iter().copied())
        .collect();
    let lines: Vec<PayslipLine> = if line_ids.is_empty() {
        Vec::new()
    } else {
        query.read(model::PAYSLIP_LINE, &line_ids, LINE_FIELDS).await?
    };

    assemble_payslips(slips, lines)
}

/// Joins lines onto their payslips and derives each net wage.
///
/// Payslips keep the order they were read in. Every line must belong to
/// exactly one of the given payslips; any line that does not is reported
/// as [`ReadError::OrphanLines`].
pub fn assemble_payslips(
    slips: Vec<PayslipRecord>,
    lines: Vec<PayslipLine>,
) -> Result<Vec<Payslip>, ReadError> {
    let known: HashSet<i64> = slips.iter().map(|slip| slip.id).collect();

    let mut by_slip: HashMap<i64, Vec<PayslipLine>> = HashMap::new();
    let mut orphans = Vec::new();
    for line in lines {
        match line.owner() {
            Some(owner) if known.contains(&owner) => by_slip.entry(owner).or_default().push(line),
            _ => orphans.push(line.id),
        }
    }
    if !orphans.is_empty() {
        return Err(ReadError::OrphanLines { line_ids: orphans });
    }

    Ok(slips
        .into_iter()
        .map(|slip| {
            let lines = by_slip.remove(&slip.id).unwrap_or_default();
            Payslip::assemble(slip, lines)
        })
        .collect())
}
