//! In-memory backend for testing without a live Odoo.
//!
//! [`MockOdoo`] implements both [`RecordService`] and [`DocumentGateway`]
//! over JSON rows held in memory. It supports `=` domains, field
//! projection, fault injection, and keeps a log of every call so tests can
//! assert which backend round trips happened.
//!
//! # Example
//!
//! ```
//! use colillas::odoo::mock::MockOdoo;
//! use serde_json::json;
//!
//! let backend = MockOdoo::new()
//!     .with_user("admin", "admin", 2)
//!     .with_records("hr.payslip.run", vec![json!({"id": 1, "name": "Enero"})]);
//! assert!(backend.calls().is_empty());
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{DocumentGateway, DocumentResponse, DocumentSession, RecordService};
use crate::error::{AuthError, RemoteError};
use crate::models::{Credential, SessionIdentity};

#[derive(Debug, Clone)]
struct MockUser {
    login: String,
    password: String,
    uid: i64,
}

/// The response every document fetch returns.
#[derive(Debug, Clone)]
pub struct MockDocument {
    /// HTTP status.
    pub status: u16,
    /// `Content-Type` header.
    pub content_type: Option<String>,
    /// Body, or the error reading it.
    pub body: Result<Vec<u8>, String>,
}

impl Default for MockDocument {
    fn default() -> Self {
        Self {
            status: 200,
            content_type: Some("application/pdf".to_string()),
            body: Ok(b"%PDF-1.4\n% mock\n".to_vec()),
        }
    }
}

/// A scriptable in-memory backend.
#[derive(Debug, Default)]
pub struct MockOdoo {
    users: Vec<MockUser>,
    tables: HashMap<String, Vec<Value>>,
    failing: HashSet<(String, String)>,
    rpc_down: bool,
    handshake_status: Option<u16>,
    document: MockDocument,
    calls: Mutex<Vec<String>>,
}

impl MockOdoo {
    /// Creates an empty backend with no users and no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user. A `uid` of zero mimics a backend that answers the
    /// credential check with a falsy id.
    pub fn with_user(mut self, login: &str, password: &str, uid: i64) -> Self {
        self.users.push(MockUser {
            login: login.to_string(),
            password: password.to_string(),
            uid,
        });
        self
    }

    /// Replaces the rows of `model`.
    pub fn with_records(mut self, model: &str, rows: Vec<Value>) -> Self {
        self.tables.insert(model.to_string(), rows);
        self
    }

    /// Makes `method` on `model` answer with an RPC error.
    pub fn failing(mut self, model: &str, method: &str) -> Self {
        self.failing.insert((model.to_string(), method.to_string()));
        self
    }

    /// Makes every call fail as if the backend were unreachable.
    pub fn rpc_unavailable(mut self) -> Self {
        self.rpc_down = true;
        self
    }

    /// Makes the session handshake answer with `status`.
    pub fn with_handshake_status(mut self, status: u16) -> Self {
        self.handshake_status = Some(status);
        self
    }

    /// Sets the response every document fetch returns.
    pub fn with_document(mut self, document: MockDocument) -> Self {
        self.document = document;
        self
    }

    /// Every call made so far, in order (e.g. `rpc:hr.payslip.read`,
    /// `web:login`, `web:GET /report/pdf/...`).
    pub fn calls(&self) -> Vec<String> {
        self.lock_calls().clone()
    }

    /// How many logged calls start with `prefix`.
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.lock_calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: String) {
        self.lock_calls().push(call);
    }

    fn rows(&self, model: &str) -> &[Value] {
        self.tables.get(model).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Whether `row` satisfies every `[field, "=", value]` term of `domain`.
/// Relational values stored as `[id, name]` match on their id.
fn matches(row: &Value, domain: &Value) -> bool {
    let Some(terms) = domain.as_array() else {
        return true;
    };
    terms.iter().filter_map(Value::as_array).all(|term| {
        let (Some(field), Some(op), Some(expected)) =
            (term.first().and_then(Value::as_str), term.get(1).and_then(Value::as_str), term.get(2))
        else {
            return false;
        };
        if op != "=" {
            return false;
        }
        match row.get(field) {
            Some(Value::Array(pair)) => pair.first() == Some(expected),
            Some(actual) => actual == expected,
            None => false,
        }
    })
}

fn project(row: &Value, kwargs: &Value) -> Value {
    let fields: Vec<&str> = kwargs
        .get("fields")
        .and_then(Value::as_array)
        .map(|fields| fields.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if fields.is_empty() {
        return row.clone();
    }
    let mut projected = Map::new();
    if let Some(id) = row.get("id") {
        projected.insert("id".to_string(), id.clone());
    }
    for field in fields {
        if let Some(value) = row.get(field) {
            projected.insert(field.to_string(), value.clone());
        }
    }
    Value::Object(projected)
}

fn row_id(row: &Value) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

#[async_trait]
impl RecordService for MockOdoo {
    async fn authenticate(&self, credential: &Credential) -> Result<Option<i64>, RemoteError> {
        self.record("rpc:authenticate".to_string());
        if self.rpc_down {
            return Err(RemoteError::Transport {
                message: "connection refused".to_string(),
            });
        }
        Ok(self
            .users
            .iter()
            .find(|user| user.login == credential.username && user.password == credential.password)
            .map(|user| user.uid)
            .filter(|uid| *uid != 0))
    }

    async fn execute_kw(
        &self,
        identity: &SessionIdentity,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, RemoteError> {
        self.record(format!("rpc:{}.{}", model, method));
        if self.rpc_down {
            return Err(RemoteError::Transport {
                message: "connection refused".to_string(),
            });
        }
        let known = self
            .users
            .iter()
            .any(|user| user.uid == identity.uid && user.password == identity.password);
        if !known {
            return Err(RemoteError::Rpc {
                message: "Access Denied".to_string(),
            });
        }
        if self
            .failing
            .contains(&(model.to_string(), method.to_string()))
        {
            return Err(RemoteError::Rpc {
                message: format!("simulated failure in {}.{}", model, method),
            });
        }

        let rows = self.rows(model);
        let first_arg = args.get(0).cloned().unwrap_or(Value::Null);
        match method {
            "search" => Ok(Value::from(
                rows.iter()
                    .filter(|row| matches(row, &first_arg))
                    .filter_map(row_id)
                    .collect::<Vec<_>>(),
            )),
            "read" => {
                let ids: Vec<i64> = first_arg
                    .as_array()
                    .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
                    .unwrap_or_default();
                Ok(Value::Array(
                    ids.iter()
                        .filter_map(|id| rows.iter().find(|row| row_id(row) == Some(*id)))
                        .map(|row| project(row, &kwargs))
                        .collect(),
                ))
            }
            "search_read" => Ok(Value::Array(
                rows.iter()
                    .filter(|row| matches(row, &first_arg))
                    .map(|row| project(row, &kwargs))
                    .collect(),
            )),
            other => Err(RemoteError::Rpc {
                message: format!("unsupported method {}", other),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl DocumentGateway for MockOdoo {
    async fn login(&self, credential: &Credential) -> Result<DocumentSession, AuthError> {
        self.record("web:login".to_string());
        if self.rpc_down {
            return Err(AuthError::Unavailable);
        }
        if let Some(status) = self.handshake_status.filter(|status| *status != 200) {
            return Err(AuthError::HandshakeStatus { status });
        }
        self.users
            .iter()
            .find(|user| user.login == credential.username && user.password == credential.password)
            .map(|user| DocumentSession::new(format!("mock-session-{}", user.uid)))
            .ok_or_else(|| AuthError::HandshakeRejected {
                message: "Access Denied".to_string(),
            })
    }

    async fn fetch(
        &self,
        _session: &DocumentSession,
        path: &str,
    ) -> Result<DocumentResponse, RemoteError> {
        self.record(format!("web:GET {}", path));
        if self.rpc_down {
            return Err(RemoteError::Transport {
                message: "connection refused".to_string(),
            });
        }
        Ok(DocumentResponse {
            status: self.document.status,
            content_type: self.document.content_type.clone(),
            body: self.document.body.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity() -> SessionIdentity {
        SessionIdentity::new(2, "admin")
    }

    fn backend() -> MockOdoo {
        MockOdoo::new().with_user("admin", "admin", 2).with_records(
            "hr.payslip",
            vec![
                json!({"id": 10, "name": "SLIP/10", "payslip_run_id": [1, "Enero"]}),
                json!({"id": 11, "name": "SLIP/11", "payslip_run_id": [2, "Febrero"]}),
                json!({"id": 12, "name": "SLIP/12", "payslip_run_id": [1, "Enero"]}),
            ],
        )
    }

    #[tokio::test]
    async fn test_search_matches_relational_ids() {
        let backend = backend();
        let ids = backend
            .execute_kw(
                &identity(),
                "hr.payslip",
                "search",
                json!([[["payslip_run_id", "=", 1]]]),
                json!({}),
            )
            .await
            .unwrap();
        assert_eq!(ids, json!([10, 12]));
    }

    #[tokio::test]
    async fn test_read_projects_fields_in_requested_order() {
        let backend = backend();
        let rows = backend
            .execute_kw(
                &identity(),
                "hr.payslip",
                "read",
                json!([[12, 10]]),
                json!({"fields": ["name"]}),
            )
            .await
            .unwrap();
        assert_eq!(
            rows,
            json!([{"id": 12, "name": "SLIP/12"}, {"id": 10, "name": "SLIP/10"}])
        );
    }

    #[tokio::test]
    async fn test_unknown_identity_is_denied() {
        let backend = backend();
        let result = backend
            .execute_kw(
                &SessionIdentity::new(2, "wrong"),
                "hr.payslip",
                "search",
                json!([[]]),
                json!({}),
            )
            .await;
        assert!(matches!(result, Err(RemoteError::Rpc { .. })));
    }

    #[tokio::test]
    async fn test_failing_method_is_injected() {
        let backend = backend().failing("hr.payslip", "read");
        let result = backend
            .execute_kw(&identity(), "hr.payslip", "read", json!([[10]]), json!({}))
            .await;
        assert!(matches!(result, Err(RemoteError::Rpc { .. })));
    }

    #[tokio::test]
    async fn test_calls_are_logged() {
        let backend = backend();
        let _ = backend.authenticate(&Credential::new("admin", "admin")).await;
        let _ = backend
            .execute_kw(&identity(), "hr.payslip", "search", json!([[]]), json!({}))
            .await;
        assert_eq!(
            backend.calls(),
            vec!["rpc:authenticate".to_string(), "rpc:hr.payslip.search".to_string()]
        );
        assert_eq!(backend.count_calls("rpc:"), 2);
    }
}
