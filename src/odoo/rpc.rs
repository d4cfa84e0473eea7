//! JSON-RPC implementation of [`RecordService`].

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{RecordService, fault_message};
use crate::config::OdooSettings;
use crate::error::RemoteError;
use crate::models::{Credential, SessionIdentity};

/// Talks to `POST {url}/jsonrpc`.
///
/// Holds no credentials: every call carries the caller's identity, so a
/// single instance is shared by all requests.
#[derive(Debug)]
pub struct JsonRpcClient {
    http: Client,
    endpoint: String,
    database: String,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl JsonRpcClient {
    /// Creates a client for the configured backend.
    pub fn new(http: Client, settings: &OdooSettings) -> Self {
        Self {
            http,
            endpoint: format!("{}/jsonrpc", settings.url),
            database: settings.database.clone(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, service: &str, method: &str, args: Value) -> Result<Value, RemoteError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "service": service,
                "method": method,
                "args": args,
            },
            "id": id,
        });

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Transport {
                message: format!("{} answered HTTP {}", self.endpoint, status.as_u16()),
            });
        }

        let envelope: Envelope =
            response
                .json()
                .await
                .map_err(|e| RemoteError::UnexpectedPayload {
                    message: format!("JSON-RPC envelope: {}", e),
                })?;

        if let Some(error) = envelope.error {
            return Err(RemoteError::Rpc {
                message: fault_message(&error).unwrap_or_else(|| "Unknown".to_string()),
            });
        }
        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

/// Interprets the result of `common.authenticate`: a positive number is a
/// user id, anything else means the credentials were refused.
pub(crate) fn parse_uid(result: &Value) -> Option<i64> {
    result.as_i64().filter(|uid| *uid != 0)
}

#[async_trait]
impl RecordService for JsonRpcClient {
    async fn authenticate(&self, credential: &Credential) -> Result<Option<i64>, RemoteError> {
        let result = self
            .call(
                "common",
                "authenticate",
                json!([self.database, credential.username, credential.password, {}]),
            )
            .await?;
        Ok(parse_uid(&result))
    }

    async fn execute_kw(
        &self,
        identity: &SessionIdentity,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, RemoteError> {
        debug!(model, method, uid = identity.uid, "execute_kw");
        self.call(
            "object",
            "execute_kw",
            json!([
                self.database,
                identity.uid,
                identity.password,
                model,
                method,
                args,
                kwargs
            ]),
        )
        .await
    }

    fn name(&self) -> &'static str {
        "jsonrpc"
    }
}
