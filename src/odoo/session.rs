//! Credential checks over both backend channels.

use tracing::{info, warn};

use super::{DocumentGateway, DocumentSession, RecordService};
use crate::error::AuthError;
use crate::models::{Credential, SessionIdentity};

/// Checks `credential` over the RPC channel.
///
/// A falsy or zero user id is [`AuthError::InvalidCredentials`]; a transport
/// or RPC failure is [`AuthError::Unavailable`]. Neither carries backend text.
pub async fn authenticate(
    records: &dyn RecordService,
    credential: &Credential,
) -> Result<SessionIdentity, AuthError> {
    match records.authenticate(credential).await {
        Ok(Some(uid)) if uid != 0 => {
            info!(uid, username = %credential.username, "User authenticated");
            Ok(SessionIdentity::new(uid, credential.password.clone())
                .with_username(credential.username.clone()))
        }
        Ok(_) => {
            warn!(username = %credential.username, "Backend refused credentials");
            Err(AuthError::InvalidCredentials)
        }
        Err(err) => {
            warn!(
                backend = records.name(),
                error = %err,
                "Could not reach backend to check credentials"
            );
            Err(AuthError::Unavailable)
        }
    }
}

/// Opens a web session for document rendering.
pub async fn open_document_session(
    documents: &dyn DocumentGateway,
    credential: &Credential,
) -> Result<DocumentSession, AuthError> {
    documents.login(credential).await.inspect_err(|err| match err {
        AuthError::HandshakeRejected { message } => warn!(
            username = %credential.username,
            backend_message = %message,
            "Document session login rejected"
        ),
        _ => warn!(username = %credential.username, error = %err, "Document session login failed"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odoo::mock::MockOdoo;

    #[tokio::test]
    async fn test_valid_credentials_produce_identity() {
        let backend = MockOdoo::new().with_user("nomina", "pw", 6);
        let identity = authenticate(&backend, &Credential::new("nomina", "pw"))
            .await
            .unwrap();
        assert_eq!(identity.uid, 6);
        assert_eq!(identity.username.as_deref(), Some("nomina"));
        assert_eq!(identity.password, "pw");
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let backend = MockOdoo::new().with_user("nomina", "pw", 6);
        let result = authenticate(&backend, &Credential::new("nomina", "nope")).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_zero_uid_is_invalid_credentials() {
        let backend = MockOdoo::new().with_user("ghost", "pw", 0);
        let result = authenticate(&backend, &Credential::new("ghost", "pw")).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic() {
        let backend = MockOdoo::new().with_user("nomina", "pw", 6).rpc_unavailable();
        let result = authenticate(&backend, &Credential::new("nomina", "pw")).await;
        assert_eq!(result, Err(AuthError::Unavailable));
    }

    #[tokio::test]
    async fn test_document_session_login() {
        let backend = MockOdoo::new().with_user("nomina", "pw", 6);
        let session = open_document_session(&backend, &Credential::new("nomina", "pw"))
            .await
            .unwrap();
        assert!(!session.token().is_empty());
    }

    #[tokio::test]
    async fn test_document_session_status_failure() {
        let backend = MockOdoo::new()
            .with_user("nomina", "pw", 6)
            .with_handshake_status(502);
        let result = open_document_session(&backend, &Credential::new("nomina", "pw")).await;
        assert_eq!(result, Err(AuthError::HandshakeStatus { status: 502 }));
    }
}
