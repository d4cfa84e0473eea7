//! Fetching and validating rendered documents.

use tracing::{debug, info, warn};

use crate::error::RenderError;
use crate::models::RenderedDocument;
use crate::odoo::{DocumentGateway, DocumentSession};

/// The leading bytes of every PDF file.
pub const PDF_SIGNATURE: &[u8] = b"%PDF";

const DEFAULT_CONTENT_KIND: &str = "application/pdf";

/// Builds the document path for `report_name` over the given record ids.
///
/// # Example
///
/// ```
/// use colillas::report::report_path;
///
/// assert_eq!(
///     report_path("l10n_ni.report_boleta_pago", &[10, 11, 12]),
///     "/report/pdf/l10n_ni.report_boleta_pago/10,11,12"
/// );
/// ```
pub fn report_path(report_name: &str, ids: &[i64]) -> String {
    let ids: Vec<String> = ids.iter().map(i64::to_string).collect();
    format!("/report/pdf/{}/{}", report_name, ids.join(","))
}

/// Whether a response is a PDF document.
///
/// The status must be 200, and either the declared content type mentions
/// `pdf` or the body starts with [`PDF_SIGNATURE`]. A misrouted request can
/// still answer 200 with an HTML error page, which this rejects.
///
/// # Example
///
/// ```
/// use colillas::report::is_document;
///
/// assert!(is_document(200, Some("application/pdf"), b""));
/// assert!(is_document(200, None, b"%PDF-1.7"));
/// assert!(!is_document(200, Some("text/html"), b"<html>"));
/// assert!(!is_document(404, Some("application/pdf"), b"%PDF-1.7"));
/// ```
pub fn is_document(status: u16, content_type: Option<&str>, body: &[u8]) -> bool {
    if status != 200 {
        return false;
    }
    let declared = content_type
        .map(|kind| kind.to_ascii_lowercase().contains("pdf"))
        .unwrap_or(false);
    declared || body.starts_with(PDF_SIGNATURE)
}

/// Renders `report_name` for `ids` within an open document session.
///
/// # Errors
///
/// - [`RenderError::NoRecords`] when `ids` is empty; nothing is fetched
/// - [`RenderError::Transport`] when the request gets no response
/// - [`RenderError::Decode`] when a 200 response body cannot be read
/// - [`RenderError::Rejected`] when the response is not a PDF
pub async fn render(
    documents: &dyn DocumentGateway,
    session: &DocumentSession,
    report_name: &str,
    ids: &[i64],
) -> Result<RenderedDocument, RenderError> {
    if ids.is_empty() {
        return Err(RenderError::NoRecords);
    }

    let path = report_path(report_name, ids);
    debug!(path = %path, "Fetching rendered document");

    let response = documents
        .fetch(session, &path)
        .await
        .map_err(|err| RenderError::Transport {
            report_name: report_name.to_string(),
            message: err.to_string(),
        })?;

    let rejected = || RenderError::Rejected {
        status: response.status,
        report_name: report_name.to_string(),
    };

    if response.status != 200 {
        warn!(status = response.status, report = report_name, "Document request rejected");
        return Err(rejected());
    }

    let bytes = match &response.body {
        Ok(bytes) => bytes,
        Err(message) => {
            warn!(report = report_name, error = %message, "Could not read document body");
            return Err(RenderError::Decode {
                message: message.clone(),
            });
        }
    };

    let content_type = response.content_type.as_deref();
    if !is_document(response.status, content_type, bytes) {
        warn!(
            report = report_name,
            content_type = content_type.unwrap_or("<none>"),
            "Backend answered without a PDF document"
        );
        return Err(rejected());
    }

    info!(report = report_name, records = ids.len(), size = bytes.len(), "Rendered document");
    Ok(RenderedDocument {
        bytes: bytes.clone(),
        content_kind: content_type.unwrap_or(DEFAULT_CONTENT_KIND).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odoo::mock::{MockDocument, MockOdoo};

    fn session() -> DocumentSession {
        DocumentSession::new("mock-session-2")
    }

    #[test]
    fn test_report_path_single_id() {
        assert_eq!(report_path("r.x", &[5]), "/report/pdf/r.x/5");
    }

    #[test]
    fn test_content_type_check_is_case_insensitive() {
        assert!(is_document(200, Some("Application/PDF; charset=binary"), b""));
    }

    #[test]
    fn test_html_200_is_not_a_document() {
        assert!(!is_document(
            200,
            Some("text/html; charset=utf-8"),
            b"<!DOCTYPE html><html>Odoo Server Error</html>"
        ));
    }

    #[test]
    fn test_signature_without_content_type_is_a_document() {
        assert!(is_document(200, Some("application/octet-stream"), b"%PDF-1.4\n"));
    }

    #[tokio::test]
    async fn test_render_returns_bytes() {
        let backend = MockOdoo::new();
        let document = render(&backend, &session(), "l10n_ni.report_boleta_pago", &[10, 11])
            .await
            .unwrap();
        assert!(document.bytes.starts_with(PDF_SIGNATURE));
        assert_eq!(document.content_kind, "application/pdf");
        assert_eq!(
            backend.calls(),
            vec!["web:GET /report/pdf/l10n_ni.report_boleta_pago/10,11".to_string()]
        );
    }

    #[tokio::test]
    async fn test_render_defaults_content_kind() {
        let backend = MockOdoo::new().with_document(MockDocument {
            content_type: None,
            ..MockDocument::default()
        });
        let document = render(&backend, &session(), "r", &[1]).await.unwrap();
        assert_eq!(document.content_kind, "application/pdf");
    }

    #[tokio::test]
    async fn test_render_rejects_empty_ids_without_fetching() {
        let backend = MockOdoo::new();
        let result = render(&backend, &session(), "r", &[]).await;
        assert_eq!(result, Err(RenderError::NoRecords));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_render_rejects_html_error_page() {
        let backend = MockOdoo::new().with_document(MockDocument {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: Ok(b"<html><body>Report not found</body></html>".to_vec()),
        });
        let result = render(&backend, &session(), "missing.report", &[1]).await;
        assert_eq!(
            result,
            Err(RenderError::Rejected {
                status: 200,
                report_name: "missing.report".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_render_rejects_error_status() {
        let backend = MockOdoo::new().with_document(MockDocument {
            status: 500,
            ..MockDocument::default()
        });
        let result = render(&backend, &session(), "r", &[1]).await;
        assert!(matches!(result, Err(RenderError::Rejected { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_render_unreadable_body_is_decode_error() {
        let backend = MockOdoo::new().with_document(MockDocument {
            body: Err("connection reset".to_string()),
            ..MockDocument::default()
        });
        let result = render(&backend, &session(), "r", &[1]).await;
        assert_eq!(
            result,
            Err(RenderError::Decode {
                message: "connection reset".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_render_transport_failure_names_report() {
        let backend = MockOdoo::new().rpc_unavailable();
        let result = render(&backend, &session(), "l10n_ni.report_boleta_pago", &[1]).await;
        match result {
            Err(RenderError::Transport { report_name, .. }) => {
                assert_eq!(report_name, "l10n_ni.report_boleta_pago")
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }
}
