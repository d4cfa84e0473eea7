//! Access to the Odoo backend.
//!
//! The backend is reached over two independent channels:
//!
//! ```text
//!               ┌──────────────────────┐
//!  RecordQuery ─► RecordService        │  POST /jsonrpc
//!               │   authenticate()     │  (stateless, credentials per call)
//!               │   execute_kw()       │
//!               └──────────────────────┘
//!               ┌──────────────────────┐
//!  renderer ────► DocumentGateway      │  POST /web/session/authenticate
//!               │   login()            │  GET  /report/pdf/<report>/<ids>
//!               │   fetch()            │  (session cookie)
//!               └──────────────────────┘
//! ```
//!
//! Both traits are object-safe and used as `Arc<dyn ...>`, so the pipeline
//! runs unchanged against [`mock::MockOdoo`] in tests.

pub mod mock;
mod rpc;
mod session;
mod web;

pub use rpc::JsonRpcClient;
pub use session::{authenticate, open_document_session};
pub use web::WebSessionClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{AuthError, RemoteError};
use crate::models::{Credential, SessionIdentity};

/// Backend model names used by the service.
pub mod model {
    /// Payroll runs.
    pub const PAYSLIP_RUN: &str = "hr.payslip.run";
    /// Payslips.
    pub const PAYSLIP: &str = "hr.payslip";
    /// Payslip lines.
    pub const PAYSLIP_LINE: &str = "hr.payslip.line";
    /// Printable report actions.
    pub const REPORT_ACTION: &str = "ir.actions.report";
}

/// The stateless RPC channel.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Checks a username/password pair, returning the user id when the
    /// backend accepts it and `None` when it answers with a falsy value.
    async fn authenticate(&self, credential: &Credential) -> Result<Option<i64>, RemoteError>;

    /// Calls `method` on `model` with positional and keyword arguments.
    async fn execute_kw(
        &self,
        identity: &SessionIdentity,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, RemoteError>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// An authenticated web session, valid for the operation that opened it.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentSession {
    token: String,
}

impl DocumentSession {
    /// Wraps a session token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The session token sent back as the `session_id` cookie.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// A document endpoint response, with the body read separately from the
/// status so a body failure can be told apart from a rejected request.
#[derive(Debug)]
pub struct DocumentResponse {
    /// HTTP status code.
    pub status: u16,
    /// The `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// The response body, or why it could not be read.
    pub body: Result<Vec<u8>, String>,
}

/// The stateful web channel used only for document rendering.
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// Performs the session login handshake.
    async fn login(&self, credential: &Credential) -> Result<DocumentSession, AuthError>;

    /// Issues a GET for `path` (relative to the backend root) within `session`.
    async fn fetch(
        &self,
        session: &DocumentSession,
        path: &str,
    ) -> Result<DocumentResponse, RemoteError>;
}

/// Typed `search`/`read`/`search_read` on top of [`RecordService::execute_kw`].
pub struct RecordQuery<'a> {
    service: &'a dyn RecordService,
    identity: &'a SessionIdentity,
}

impl<'a> RecordQuery<'a> {
    /// Binds a service to the identity every call is made as.
    pub fn new(service: &'a dyn RecordService, identity: &'a SessionIdentity) -> Self {
        Self { service, identity }
    }

    /// Returns the ids of `model` records matching `domain`.
    pub async fn search(&self, model: &str, domain: Value) -> Result<Vec<i64>, RemoteError> {
        let value = self
            .service
            .execute_kw(self.identity, model, "search", json!([domain]), json!({}))
            .await?;
        decode(model, "search", value)
    }

    /// Reads `fields` of the given `ids` into typed rows.
    pub async fn read<T: DeserializeOwned>(
        &self,
        model: &str,
        ids: &[i64],
        fields: &[&str],
    ) -> Result<Vec<T>, RemoteError> {
        let value = self
            .service
            .execute_kw(
                self.identity,
                model,
                "read",
                json!([ids]),
                json!({ "fields": fields }),
            )
            .await?;
        decode(model, "read", value)
    }

    /// Searches and reads in one call.
    pub async fn search_read<T: DeserializeOwned>(
        &self,
        model: &str,
        domain: Value,
        fields: &[&str],
    ) -> Result<Vec<T>, RemoteError> {
        let value = self
            .service
            .execute_kw(
                self.identity,
                model,
                "search_read",
                json!([domain]),
                json!({ "fields": fields }),
            )
            .await?;
        decode(model, "search_read", value)
    }
}

fn decode<T: DeserializeOwned>(model: &str, method: &str, value: Value) -> Result<T, RemoteError> {
    serde_json::from_value(value).map_err(|e| RemoteError::UnexpectedPayload {
        message: format!("{}.{}: {}", model, method, e),
    })
}

/// Extracts the human-readable message from an Odoo JSON-RPC `error` object.
///
/// Prefers `error.data.message`, then `error.message`.
pub(crate) fn fault_message(error: &Value) -> Option<String> {
    error
        .pointer("/data/message")
        .and_then(Value::as_str)
        .or_else(|| error.get("message").and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
