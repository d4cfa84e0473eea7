//! Payroll batch ("lote") model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fields::{self, Many2One};

/// A payroll run as listed to the caller.
///
/// Serializes in the backend's own encoding (`date_start` and `company_id`
/// become `false` when unset), which is what API clients consume.
///
/// # Example
///
/// ```
/// use colillas::models::{Many2One, PayrollBatch};
/// use chrono::NaiveDate;
///
/// let batch = PayrollBatch {
///     id: 12,
///     name: "Nómina Enero 2026".to_string(),
///     date_start: NaiveDate::from_ymd_opt(2026, 1, 1),
///     company_id: Some(Many2One::new(1, "Empresa Uno")),
/// };
/// assert_eq!(batch.company_name(), "Empresa Uno");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBatch {
    /// The batch id.
    pub id: i64,
    /// The batch display name.
    #[serde(default, deserialize_with = "fields::text::deserialize")]
    pub name: String,
    /// The first day the batch covers.
    #[serde(default, with = "fields::date")]
    pub date_start: Option<NaiveDate>,
    /// The owning company.
    #[serde(default, with = "fields::many2one")]
    pub company_id: Option<Many2One>,
}

impl PayrollBatch {
    /// The owning company's display name, or `""` when there is none.
    pub fn company_name(&self) -> &str {
        self.company_id
            .as_ref()
            .map(|company| company.name.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_row() {
        let json = r#"{
            "id": 4,
            "name": "Quincena 1",
            "date_start": "2026-02-01",
            "company_id": [2, "Empresa Dos"]
        }"#;
        let batch: PayrollBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.id, 4);
        assert_eq!(batch.date_start, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert_eq!(batch.company_name(), "Empresa Dos");
    }

    #[test]
    fn test_missing_company_has_empty_name() {
        let json = r#"{"id": 4, "name": "Quincena 1", "date_start": false, "company_id": false}"#;
        let batch: PayrollBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.company_name(), "");
        assert_eq!(batch.date_start, None);
    }

    #[test]
    fn test_serializes_for_clients() {
        let batch = PayrollBatch {
            id: 9,
            name: "Aguinaldo 2025".to_string(),
            date_start: None,
            company_id: Some(Many2One::new(1, "Empresa Uno")),
        };
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 9,
                "name": "Aguinaldo 2025",
                "date_start": false,
                "company_id": [1, "Empresa Uno"]
            })
        );
    }
}
