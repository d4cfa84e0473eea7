//! The pipeline orchestrator.
//!
//! [`Pipeline`] composes the backend channels, the batch reader and the
//! report steps into the three operations the HTTP layer calls:
//! authenticate, list batches and render a batch. Every operation runs its
//! steps in sequence and owns all the state it creates; the only things
//! shared between requests are the two channel handles, which carry no
//! credentials.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{
    Credential, PayrollBatch, RenderedDocument, ReportSelection, SessionIdentity,
};
use crate::odoo::{self, DocumentGateway, RecordService};
use crate::payroll;
use crate::report;

/// Message returned when a render request carries no username.
pub const MISSING_USERNAME: &str = "username is required to open a document session";

/// A rendered batch and the report it was printed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBatch {
    /// The PDF bytes.
    pub document: RenderedDocument,
    /// The report that produced them.
    pub selection: ReportSelection,
    /// How many payslips went into the document.
    pub payslip_count: usize,
}

/// Runs the service operations against a backend.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use colillas::models::Credential;
/// use colillas::odoo::mock::MockOdoo;
/// use colillas::pipeline::Pipeline;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backend = Arc::new(MockOdoo::new().with_user("admin", "admin", 2));
/// let pipeline = Pipeline::new(backend.clone(), backend);
/// let identity = pipeline
///     .authenticate(&Credential::new("admin", "admin"))
///     .await
///     .unwrap();
/// assert_eq!(identity.uid, 2);
/// assert!(pipeline.list_batches(&identity).await.is_empty());
/// # }
/// ```
#[derive(Clone)]
pub struct Pipeline {
    records: Arc<dyn RecordService>,
    documents: Arc<dyn DocumentGateway>,
}

impl Pipeline {
    /// Creates a pipeline over the given channels.
    pub fn new(records: Arc<dyn RecordService>, documents: Arc<dyn DocumentGateway>) -> Self {
        Self { records, documents }
    }

    /// Checks `credential` and returns the identity later calls are made as.
    pub async fn authenticate(&self, credential: &Credential) -> PipelineResult<SessionIdentity> {
        Ok(odoo::authenticate(self.records.as_ref(), credential).await?)
    }

    /// Lists every payroll batch, grouped by company and newest first.
    ///
    /// Never fails: a backend failure yields an empty list and is logged.
    pub async fn list_batches(&self, identity: &SessionIdentity) -> Vec<PayrollBatch> {
        payroll::list_batches(self.records.as_ref(), identity)
            .await
            .into_value()
    }

    /// Renders the pay stubs of every payslip in `batch_id` as one PDF.
    ///
    /// Steps, in order: read the batch's payslips, classify them, resolve
    /// the backend report, open a document session with the identity's
    /// username and password, and fetch the document.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NothingToRender`] when the batch has no payslips
    ///   (or they could not be read); no report is resolved or fetched
    /// - [`PipelineError::CannotRender`] when no report is registered, the
    ///   identity has no username, or the document is rejected
    /// - [`PipelineError::Unauthorized`] when the document session login fails
    /// - [`PipelineError::Internal`] when the document body cannot be read
    pub async fn render_batch(
        &self,
        identity: &SessionIdentity,
        batch_id: i64,
    ) -> PipelineResult<RenderedBatch> {
        let details = payroll::read_batch_details(self.records.as_ref(), identity, batch_id).await;
        if let Some(failure) = &details.failure {
            warn!(batch_id, error = %failure, "Batch details unavailable, nothing to render");
        }
        let payslips = details.into_value();
        if payslips.is_empty() {
            return Err(PipelineError::NothingToRender { batch_id });
        }

        let category = report::classify(&payslips);
        let selection =
            report::resolve_backend_report(self.records.as_ref(), identity, category).await?;

        let credential = identity
            .credential()
            .ok_or_else(|| PipelineError::CannotRender {
                message: MISSING_USERNAME.to_string(),
            })?;
        let session = odoo::open_document_session(self.documents.as_ref(), &credential).await?;

        let ids: Vec<i64> = payslips.iter().map(|payslip| payslip.id).collect();
        let document =
            report::render(self.documents.as_ref(), &session, &selection.report_name, &ids)
                .await?;

        info!(
            batch_id,
            payslips = ids.len(),
            category = %category,
            report = %selection.report_name,
            "Rendered batch"
        );
        Ok(RenderedBatch {
            document,
            selection,
            payslip_count: ids.len(),
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("records", &self.records.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchConfidence, ReportCategory};
    use crate::odoo::mock::{MockDocument, MockOdoo};
    use crate::odoo::model;
    use serde_json::{Value, json};

    fn payslip_row(id: i64, batch: i64, structure: &str, line_ids: &[i64]) -> Value {
        json!({
            "id": id,
            "name": format!("SLIP/{}", id),
            "payslip_run_id": [batch, "Lote"],
            "employee_id": [id + 100, format!("Empleado {}", id)],
            "company_id": [1, "Empresa Uno"],
            "struct_id": [1, structure],
            "date_from": "2026-12-01",
            "date_to": "2026-12-15",
            "line_ids": line_ids
        })
    }

    fn backend() -> MockOdoo {
        MockOdoo::new()
            .with_user("admin", "admin", 2)
            .with_records(
                model::PAYSLIP_RUN,
                vec![json!({"id": 1, "name": "Diciembre", "date_start": "2026-12-01", "company_id": [1, "Empresa Uno"]})],
            )
            .with_records(
                model::PAYSLIP,
                vec![
                    payslip_row(10, 1, "Planilla Quincenal", &[100]),
                    payslip_row(11, 1, "Aguinaldo Anual", &[101]),
                    payslip_row(20, 2, "Planilla Quincenal", &[]),
                ],
            )
            .with_records(
                model::PAYSLIP_LINE,
                vec![
                    json!({"id": 100, "name": "Neto", "code": "NET", "total": 500.0, "quantity": 1.0, "slip_id": [10, "SLIP/10"]}),
                    json!({"id": 101, "name": "Neto", "code": "NET", "total": 900.0, "quantity": 1.0, "slip_id": [11, "SLIP/11"]}),
                ],
            )
            .with_records(
                model::REPORT_ACTION,
                vec![
                    json!({"id": 1, "report_name": "l10n_ni.report_boleta_pago", "name": "Boleta de Pago", "model": "hr.payslip"}),
                    json!({"id": 2, "report_name": "l10n_ni.report_aguinaldo", "name": "Colilla Aguinaldo", "model": "hr.payslip"}),
                ],
            )
    }

    fn identity() -> SessionIdentity {
        SessionIdentity::new(2, "admin").with_username("admin")
    }

    fn pipeline(backend: MockOdoo) -> (Pipeline, Arc<MockOdoo>) {
        let backend = Arc::new(backend);
        (Pipeline::new(backend.clone(), backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_authenticate_ok() {
        let (pipeline, _) = pipeline(backend());
        let identity = pipeline
            .authenticate(&Credential::new("admin", "admin"))
            .await
            .unwrap();
        assert_eq!(identity.uid, 2);
    }

    #[tokio::test]
    async fn test_authenticate_bad_password_is_unauthorized() {
        let (pipeline, _) = pipeline(backend());
        let result = pipeline.authenticate(&Credential::new("admin", "nope")).await;
        assert_eq!(
            result,
            Err(PipelineError::Unauthorized {
                message: "Invalid credentials".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_list_batches_never_fails() {
        let (pipeline, _) = pipeline(backend().rpc_unavailable());
        assert!(pipeline.list_batches(&identity()).await.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_batch_renders_as_aguinaldo() {
        let (pipeline, backend) = pipeline(backend());
        let rendered = pipeline.render_batch(&identity(), 1).await.unwrap();

        assert_eq!(rendered.selection.category, ReportCategory::Aguinaldo);
        assert_eq!(rendered.selection.display_name, "Colilla Aguinaldo");
        assert_eq!(rendered.selection.confidence, MatchConfidence::Matched);
        assert_eq!(rendered.payslip_count, 2);
        assert!(rendered.document.bytes.starts_with(b"%PDF"));
        assert_eq!(
            backend.calls(),
            vec![
                "rpc:hr.payslip.search".to_string(),
                "rpc:hr.payslip.read".to_string(),
                "rpc:hr.payslip.line.read".to_string(),
                "rpc:ir.actions.report.search_read".to_string(),
                "web:login".to_string(),
                "web:GET /report/pdf/l10n_ni.report_aguinaldo/10,11".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_standard_batch_uses_pay_stub_report() {
        let (pipeline, _) = pipeline(backend());
        let rendered = pipeline.render_batch(&identity(), 2).await.unwrap();
        assert_eq!(rendered.selection.category, ReportCategory::Standard);
        assert_eq!(rendered.selection.report_name, "l10n_ni.report_boleta_pago");
    }

    #[tokio::test]
    async fn test_empty_batch_is_nothing_to_render() {
        let (pipeline, backend) = pipeline(backend());
        let result = pipeline.render_batch(&identity(), 99).await;
        assert_eq!(result, Err(PipelineError::NothingToRender { batch_id: 99 }));
        assert_eq!(backend.count_calls("rpc:ir.actions.report"), 0);
        assert_eq!(backend.count_calls("web:"), 0);
    }

    #[tokio::test]
    async fn test_unreadable_batch_is_nothing_to_render() {
        let (pipeline, backend) = pipeline(backend().failing(model::PAYSLIP, "read"));
        let result = pipeline.render_batch(&identity(), 1).await;
        assert_eq!(result, Err(PipelineError::NothingToRender { batch_id: 1 }));
        assert_eq!(backend.count_calls("web:"), 0);
    }

    #[tokio::test]
    async fn test_no_registered_reports_cannot_render() {
        let (pipeline, _) = pipeline(backend().with_records(model::REPORT_ACTION, vec![]));
        let result = pipeline.render_batch(&identity(), 1).await;
        assert_eq!(
            result,
            Err(PipelineError::CannotRender {
                message: "No reports registered for hr.payslip".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_missing_username_cannot_render() {
        let (pipeline, backend) = pipeline(backend());
        let result = pipeline
            .render_batch(&SessionIdentity::new(2, "admin"), 1)
            .await;
        assert_eq!(
            result,
            Err(PipelineError::CannotRender {
                message: MISSING_USERNAME.to_string()
            })
        );
        assert_eq!(backend.count_calls("web:"), 0);
    }

    #[tokio::test]
    async fn test_failed_handshake_is_unauthorized() {
        let (pipeline, backend) = pipeline(backend().with_handshake_status(502));
        let result = pipeline.render_batch(&identity(), 1).await;
        assert!(matches!(result, Err(PipelineError::Unauthorized { .. })));
        assert_eq!(backend.count_calls("web:GET"), 0);
    }

    #[tokio::test]
    async fn test_rejected_document_cannot_render() {
        let (pipeline, _) = pipeline(backend().with_document(MockDocument {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: Ok(b"<html></html>".to_vec()),
        }));
        let result = pipeline.render_batch(&identity(), 1).await;
        match result {
            Err(PipelineError::CannotRender { message }) => {
                assert!(message.contains("Status: 200"));
                assert!(message.contains("l10n_ni.report_aguinaldo"));
            }
            other => panic!("Expected CannotRender, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreadable_document_is_internal() {
        let (pipeline, _) = pipeline(backend().with_document(MockDocument {
            body: Err("body truncated".to_string()),
            ..MockDocument::default()
        }));
        let result = pipeline.render_batch(&identity(), 1).await;
        assert_eq!(
            result,
            Err(PipelineError::Internal {
                message: "body truncated".to_string()
            })
        );
    }
}
