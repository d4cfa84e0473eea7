//! Batch reader: payroll runs and their payslips.
//!
//! Reads here favour availability. A failed backend call does not propagate:
//! it is logged and the operation yields an empty result wrapped in
//! [`Recovered`], which keeps the cause so callers that need to can tell
//! "empty because there is no data" from "empty because the read failed".

mod details;
mod listing;

pub use details::{
    LINE_FIELDS, PAYSLIP_FIELDS, assemble_payslips, fetch_batch_details, read_batch_details,
};
pub use listing::{BATCH_FIELDS, fetch_batches, list_batches, order_batches};

use crate::error::ReadError;

/// A value recovered after a read, plus the failure it replaced, if any.
///
/// # Example
///
/// ```
/// use colillas::error::{ReadError, RemoteError};
/// use colillas::payroll::Recovered;
///
/// let failed: Result<Vec<i64>, ReadError> = Err(RemoteError::Transport {
///     message: "timed out".to_string(),
/// }
/// .into());
/// let recovered = Recovered::from_result(failed);
/// assert!(recovered.is_degraded());
/// assert!(recovered.into_value().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered<T> {
    /// The read value, or the default when the read failed.
    pub value: T,
    /// Why the read failed, when it did.
    pub failure: Option<ReadError>,
}

impl<T: Default> Recovered<T> {
    /// Keeps the value of a successful read, or falls back to `T::default()`.
    pub fn from_result(result: Result<T, ReadError>) -> Self {
        match result {
            Ok(value) => Self {
                value,
                failure: None,
            },
            Err(failure) => Self {
                value: T::default(),
                failure: Some(failure),
            },
        }
    }
}

impl<T> Recovered<T> {
    /// Whether the value is a fallback for a failed read.
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    /// Discards the failure and returns the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;

    #[test]
    fn test_success_is_not_degraded() {
        let recovered = Recovered::from_result(Ok(vec![1, 2, 3]));
        assert!(!recovered.is_degraded());
        assert_eq!(recovered.into_value(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_success_is_not_degraded() {
        let recovered: Recovered<Vec<i64>> = Recovered::from_result(Ok(vec![]));
        assert!(!recovered.is_degraded());
        assert!(recovered.value.is_empty());
    }

    #[test]
    fn test_failure_keeps_cause() {
        let recovered: Recovered<Vec<i64>> = Recovered::from_result(Err(ReadError::Remote(
            RemoteError::Rpc {
                message: "Access Denied".to_string(),
            },
        )));
        assert!(recovered.is_degraded());
        assert!(recovered.value.is_empty());
        assert!(matches!(recovered.failure, Some(ReadError::Remote(_))));
    }
}
