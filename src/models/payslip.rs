//! Payslip ("colilla") and payslip line models.
//!
//! [`PayslipRecord`] and [`PayslipLine`] mirror rows read from the backend.
//! [`Payslip`] is the assembled view: a record joined with its lines plus
//! the derived net wage.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fields::{self, Many2One};

/// The line code whose total is the employee's net pay.
pub const NET_CODE: &str = "NET";

/// One itemized component of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipLine {
    /// The line id.
    pub id: i64,
    /// The line label (e.g. "Salario Básico").
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub name: String,
    /// The salary rule code (e.g. "BASIC", "INSS", "NET").
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub code: String,
    /// The computed amount of the line.
    #[serde(deserialize_with = "fields::amount::deserialize")]
    pub total: Decimal,
    /// The quantity the rule was applied to.
    #[serde(default, deserialize_with = "fields::amount::deserialize")]
    pub quantity: Decimal,
    /// The payslip this line belongs to.
    #[serde(default, with = "fields::many2one")]
    pub slip_id: Option<Many2One>,
}

impl PayslipLine {
    /// The owning payslip id, if the backend reported one.
    pub fn owner(&self) -> Option<i64> {
        self.slip_id.as_ref().map(|slip| slip.id)
    }

    /// Whether this line carries the net pay.
    pub fn is_net(&self) -> bool {
        self.code == NET_CODE
    }
}

/// A payslip row as read from the backend, before its lines are joined in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayslipRecord {
    /// The payslip id.
    pub id: i64,
    /// The payslip reference.
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub name: String,
    /// The employee the payslip is for.
    #[serde(default, deserialize_with = "fields::many2one::deserialize")]
    pub employee_id: Option<Many2One>,
    /// The company the payslip belongs to.
    #[serde(default, deserialize_with = "fields::many2one::deserialize")]
    pub company_id: Option<Many2One>,
    /// The salary structure used to compute the payslip.
    #[serde(default, deserialize_with = "fields::many2one::deserialize")]
    pub struct_id: Option<Many2One>,
    /// Period start.
    #[serde(default, deserialize_with = "fields::date::deserialize")]
    pub date_from: Option<NaiveDate>,
    /// Period end.
    #[serde(default, deserialize_with = "fields::date::deserialize")]
    pub date_to: Option<NaiveDate>,
    /// Ids of the lines that belong to this payslip.
    #[serde(default)]
    pub line_ids: Vec<i64>,
}

/// A payslip with its lines joined in and the net wage derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payslip {
    /// The payslip id.
    pub id: i64,
    /// Employee display name, `"Unknown"` when unset.
    pub employee_name: String,
    /// Company display name, `""` when unset.
    pub company_name: String,
    /// Salary structure display name, `""` when unset.
    pub struct_name: String,
    /// Period start.
    pub date_from: Option<NaiveDate>,
    /// Period end.
    pub date_to: Option<NaiveDate>,
    /// The lines of this payslip, in backend order.
    pub lines: Vec<PayslipLine>,
    /// Sum of the totals of every `NET` line; zero when there is none.
    pub net_wage: Decimal,
}

impl Payslip {
    /// Builds the assembled payslip from its record and its own lines.
    pub fn assemble(record: PayslipRecord, lines: Vec<PayslipLine>) -> Self {
        let net_wage = net_wage(&lines);
        Self {
            id: record.id,
            employee_name: record
                .employee_id
                .map(|employee| employee.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            company_name: record.company_id.map(|c| c.name).unwrap_or_default(),
            struct_name: record.struct_id.map(|s| s.name).unwrap_or_default(),
            date_from: record.date_from,
            date_to: record.date_to,
            lines,
            net_wage,
        }
    }
}

/// Sums the totals of the `NET` lines.
///
/// # Example
///
/// ```
/// use colillas::models::net_wage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(net_wage(&[]), Decimal::ZERO);
/// ```
pub fn net_wage(lines: &[PayslipLine]) -> Decimal {
    lines
        .iter()
        .filter(|line| line.is_net())
        .map(|line| line.total)
        .sum()
}
