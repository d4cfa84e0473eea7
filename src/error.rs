//! Error types for the payslip rendering service.
//!
//! Each layer of the pipeline owns a strongly-typed error built with the
//! `thiserror` crate. The orchestrator folds them into [`PipelineError`],
//! which is the only error the HTTP layer ever sees.

use thiserror::Error;

/// A failure talking to the Odoo backend over either channel.
///
/// # Example
///
/// ```
/// use colillas::error::RemoteError;
///
/// let error = RemoteError::Rpc {
///     message: "Access Denied".to_string(),
/// };
/// assert_eq!(error.to_string(), "Backend RPC error: Access Denied");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never produced a usable HTTP response.
    #[error("Backend transport error: {message}")]
    Transport {
        /// A description of the transport failure.
        message: String,
    },

    /// The backend answered with an explicit error payload.
    #[error("Backend RPC error: {message}")]
    Rpc {
        /// The backend's own error message.
        message: String,
    },

    /// The backend answered, but not in the shape we expected.
    #[error("Unexpected backend payload: {message}")]
    UnexpectedPayload {
        /// What did not match.
        message: String,
    },
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        RemoteError::Transport {
            message: error.to_string(),
        }
    }
}

/// A failure while reading batches or payslips.
///
/// The batch reader never surfaces this to callers directly; it is kept
/// next to the recovered default so the cause stays inspectable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// A backend call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Lines came back whose owning payslip is not part of the batch.
    #[error("Lines {line_ids:?} do not belong to any payslip of the batch")]
    OrphanLines {
        /// Ids of the unassigned lines.
        line_ids: Vec<i64>,
    },
}

/// A failure to establish who the caller is.
///
/// The `Display` text of every variant is safe to show to an end user;
/// backend detail is only carried where it came from the handshake's
/// own error payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The backend rejected the username/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The backend could not be reached to check the credentials.
    #[error("Could not connect to the payroll backend")]
    Unavailable,

    /// The web session handshake returned a non-success HTTP status.
    #[error("Document session login failed with HTTP status {status}")]
    HandshakeStatus {
        /// The HTTP status returned by the handshake endpoint.
        status: u16,
    },

    /// The web session handshake returned an error payload.
    ///
    /// `message` is for logs only and never part of the display text.
    #[error("Document session login failed")]
    HandshakeRejected {
        /// The message from the handshake's error payload.
        message: String,
    },

    /// The handshake succeeded but no session token could be found.
    #[error("Document session login returned no session token")]
    MissingSessionToken,
}

/// A failure to pick the backend report for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The backend has no printable report registered for the model.
    #[error("No reports registered for {model}")]
    NoReportsRegistered {
        /// The record model that was queried.
        model: String,
    },

    /// The report registry could not be queried.
    #[error("Could not query the report registry: {0}")]
    Remote(#[from] RemoteError),
}

/// A failure while fetching the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Rendering was requested for an empty set of records.
    #[error("No records to render")]
    NoRecords,

    /// The backend answered, but not with a PDF document.
    #[error(
        "Could not fetch PDF. Status: {status}. Check that report '{report_name}' exists in the backend"
    )]
    Rejected {
        /// HTTP status of the document response.
        status: u16,
        /// Internal name of the report that was requested.
        report_name: String,
    },

    /// The document request failed before a response arrived.
    #[error("Document request for report '{report_name}' failed: {message}")]
    Transport {
        /// Internal name of the report that was requested.
        report_name: String,
        /// A description of the transport failure.
        message: String,
    },

    /// The response body could not be read as bytes.
    #[error("Could not decode the document body: {message}")]
    Decode {
        /// A description of the decode failure.
        message: String,
    },
}

/// Caller-visible outcome of a failed pipeline operation.
///
/// # Example
///
/// ```
/// use colillas::error::PipelineError;
///
/// let error = PipelineError::NothingToRender { batch_id: 7 };
/// assert_eq!(error.to_string(), "No payslips found for batch 7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The caller could not be authenticated.
    #[error("{message}")]
    Unauthorized {
        /// A short, non-leaking message.
        message: String,
    },

    /// The batch has no payslips, so there is nothing to render.
    #[error("No payslips found for batch {batch_id}")]
    NothingToRender {
        /// The batch that was requested.
        batch_id: i64,
    },

    /// Report selection or rendering failed.
    #[error("{message}")]
    CannotRender {
        /// The failing component's message.
        message: String,
    },

    /// An unexpected failure while producing the final document.
    #[error("Error processing the PDF: {message}")]
    Internal {
        /// The underlying cause, for operators.
        message: String,
    },
}

impl From<AuthError> for PipelineError {
    fn from(error: AuthError) -> Self {
        PipelineError::Unauthorized {
            message: error.to_string(),
        }
    }
}

impl From<SelectionError> for PipelineError {
    fn from(error: SelectionError) -> Self {
        PipelineError::CannotRender {
            message: error.to_string(),
        }
    }
}

impl From<RenderError> for PipelineError {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::Decode { message } => PipelineError::Internal { message },
            other => PipelineError::CannotRender {
                message: other.to_string(),
            },
        }
    }
}

/// A failure loading the service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    Parse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required setting has no value after all sources were merged.
    #[error("Missing required setting '{key}' (set it in the config file or via {env})")]
    Missing {
        /// The dotted key of the setting.
        key: String,
        /// The environment variable that can supply it.
        env: String,
    },

    /// A setting has a value that cannot be used.
    #[error("Invalid value for '{key}': {message}")]
    Invalid {
        /// The dotted key of the setting.
        key: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// A type alias for Results that return PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_do_not_leak_backend_detail() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(
            AuthError::Unavailable.to_string(),
            "Could not connect to the payroll backend"
        );
    }

    #[test]
    fn test_auth_error_becomes_unauthorized() {
        let error: PipelineError = AuthError::HandshakeStatus { status: 503 }.into();
        assert_eq!(
            error,
            PipelineError::Unauthorized {
                message: "Document session login failed with HTTP status 503".to_string()
            }
        );
    }

    #[test]
    fn test_rejected_handshake_message_is_generic() {
        let error: PipelineError = AuthError::HandshakeRejected {
            message: "Access Denied".to_string(),
        }
        .into();
        assert_eq!(
            error,
            PipelineError::Unauthorized {
                message: "Document session login failed".to_string()
            }
        );
    }

    #[test]
    fn test_rejected_render_carries_status_and_report() {
        let error = RenderError::Rejected {
            status: 200,
            report_name: "l10n_ni.report_boleta_pago".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("Status: 200"));
        assert!(message.contains("l10n_ni.report_boleta_pago"));
    }

    #[test]
    fn test_render_errors_become_cannot_render() {
        let error: PipelineError = RenderError::Rejected {
            status: 404,
            report_name: "x".to_string(),
        }
        .into();
        assert!(matches!(error, PipelineError::CannotRender { .. }));
    }

    #[test]
    fn test_decode_error_becomes_internal() {
        let error: PipelineError = RenderError::Decode {
            message: "connection reset".to_string(),
        }
        .into();
        assert_eq!(
            error,
            PipelineError::Internal {
                message: "connection reset".to_string()
            }
        );
        assert_eq!(error.to_string(), "Error processing the PDF: connection reset");
    }

    #[test]
    fn test_selection_error_wraps_remote_error() {
        let error: SelectionError = RemoteError::Transport {
            message: "timed out".to_string(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Could not query the report registry: Backend transport error: timed out"
        );
    }

    #[test]
    fn test_orphan_lines_lists_ids() {
        let error = ReadError::OrphanLines {
            line_ids: vec![40, 41],
        };
        assert_eq!(
            error.to_string(),
            "Lines [40, 41] do not belong to any payslip of the batch"
        );
    }

    #[test]
    fn test_config_missing_names_env_var() {
        let error = ConfigError::Missing {
            key: "odoo.url".to_string(),
            env: "ODOO_URL".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Missing required setting 'odoo.url' (set it in the config file or via ODOO_URL)"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<RemoteError>();
        assert_error::<ReadError>();
        assert_error::<AuthError>();
        assert_error::<SelectionError>();
        assert_error::<RenderError>();
        assert_error::<PipelineError>();
        assert_error::<ConfigError>();
    }
}
