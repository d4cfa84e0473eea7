//! Session-cookie implementation of [`DocumentGateway`].

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, SET_COOKIE};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{DocumentGateway, DocumentResponse, DocumentSession, fault_message};
use crate::config::OdooSettings;
use crate::error::{AuthError, RemoteError};
use crate::models::Credential;

const SESSION_COOKIE: &str = "session_id";

/// Talks to the backend's web interface.
///
/// The shared [`Client`] keeps no cookie jar; the session token lives in the
/// [`DocumentSession`] returned by [`login`](DocumentGateway::login) and is
/// sent explicitly on each fetch.
#[derive(Debug, Clone)]
pub struct WebSessionClient {
    http: Client,
    base_url: String,
    database: String,
}

impl WebSessionClient {
    /// Creates a client for the configured backend.
    pub fn new(http: Client, settings: &OdooSettings) -> Self {
        Self {
            http,
            base_url: settings.url.clone(),
            database: settings.database.clone(),
        }
    }
}

/// Finds the `session_id` value among `Set-Cookie` headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Interprets a handshake body: an `error` member is a rejection, otherwise
/// `result.session_id` is returned when present.
fn handshake_body(body: &Value) -> Result<Option<String>, AuthError> {
    if let Some(error) = body.get("error") {
        return Err(AuthError::HandshakeRejected {
            message: fault_message(error).unwrap_or_else(|| "Unknown".to_string()),
        });
    }
    Ok(body
        .pointer("/result/session_id")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string))
}

#[async_trait]
impl DocumentGateway for WebSessionClient {
    async fn login(&self, credential: &Credential) -> Result<DocumentSession, AuthError> {
        let url = format!("{}/web/session/authenticate", self.base_url);
        let body = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "db": self.database,
                "login": credential.username,
                "password": credential.password,
            },
            "id": 1,
        });

        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            warn!(error = %e, "Document session handshake could not be sent");
            AuthError::Unavailable
        })?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(AuthError::HandshakeStatus {
                status: status.as_u16(),
            });
        }

        let cookie = session_cookie(response.headers());
        let body: Value = response.json().await.map_err(|e| {
            warn!(error = %e, "Document session handshake returned an unreadable body");
            AuthError::HandshakeRejected {
                message: "unreadable handshake response".to_string(),
            }
        })?;
        let from_body = handshake_body(&body)?;

        cookie
            .or(from_body)
            .map(DocumentSession::new)
            .ok_or(AuthError::MissingSessionToken)
    }

    async fn fetch(
        &self,
        session: &DocumentSession,
        path: &str,
    ) -> Result<DocumentResponse, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Fetching document");

        let response = self
            .http
            .get(&url)
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, session.token()))
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| e.to_string());

        Ok(DocumentResponse {
            status,
            content_type,
            body,
        })
    }
}
