//! Listing payroll runs.

use serde_json::json;
use tracing::{error, info};

use super::Recovered;
use crate::error::ReadError;
use crate::models::{PayrollBatch, SessionIdentity};
use crate::odoo::{RecordQuery, RecordService, model};

/// Fields read for each payroll run.
pub const BATCH_FIELDS: &[&str] = &["id", "name", "date_start", "company_id"];

/// Lists every payroll run visible to `identity`, ordered by
/// [`order_batches`]. Failures degrade to an empty list.
pub async fn list_batches(
    records: &dyn RecordService,
    identity: &SessionIdentity,
) -> Recovered<Vec<PayrollBatch>> {
    let result = fetch_batches(records, identity).await;
    match &result {
        Ok(batches) => info!(uid = identity.uid, count = batches.len(), "Listed payroll batches"),
        Err(err) => error!(uid = identity.uid, error = %err, "Failed to list payroll batches"),
    }
    Recovered::from_result(result)
}

/// Lists every payroll run, propagating failures.
pub async fn fetch_batches(
    records: &dyn RecordService,
    identity: &SessionIdentity,
) -> Result<Vec<PayrollBatch>, ReadError> {
    let query = RecordQuery::new(records, identity);
    let ids = query.search(model::PAYSLIP_RUN, json!([])).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut batches: Vec<PayrollBatch> = query.read(model::PAYSLIP_RUN, &ids, BATCH_FIELDS).await?;
    order_batches(&mut batches);
    Ok(batches)
}

/// Orders batches by start date descending, then stably by company name
/// ascending.
///
/// The second sort must be stable: it groups batches by company while
/// keeping the date order inside each group. A missing date sorts as the
/// smallest value (last when descending); a missing company sorts as `""`.
///
/// # Example
///
/// ```
/// use colillas::models::{Many2One, PayrollBatch};
/// use colillas::payroll::order_batches;
/// use chrono::NaiveDate;
///
/// let batch = |id, company: &str, month| PayrollBatch {
///     id,
///     name: format!("Lote {}", id),
///     date_start: NaiveDate::from_ymd_opt(2026, month, 1),
///     company_id: Some(Many2One::new(1, company)),
/// };
/// let mut batches = vec![batch(1, "B", 1), batch(2, "A", 1), batch(3, "B", 2)];
/// order_batches(&mut batches);
/// let ids: Vec<i64> = batches.iter().map(|b| b.id).collect();
/// assert_eq!(ids, vec![2, 3, 1]);
/// ```
pub fn order_batches(batches: &mut [PayrollBatch]) {
    batches.sort_by(|a, b| b.date_start.cmp(&a.date_start));
    batches.sort_by(|a, b| a.company_name().cmp(b.company_name()));
}
