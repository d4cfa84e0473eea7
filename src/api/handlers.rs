//! HTTP request handlers for the colillas API.
//!
//! This module contains the router and the handler functions for all API
//! endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::request::{BatchListRequest, LoginRequest, PrintRequest};
use super::response::{ApiError, ApiErrorResponse, HealthResponse, LoginResponse};
use super::state::AppState;

/// Header naming the backend report a document was printed with.
pub const REPORT_USED_HEADER: &str = "x-report-used";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/nomina/lotes", post(batches_handler))
        .route("/api/v1/nomina/print", post(print_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handler for POST /api/v1/auth/login.
///
/// Answers 200 with the user id on success and 401 otherwise.
async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(rejection) => return rejection.into_response(),
    };

    let span = info_span!("login", correlation_id = %correlation_id);
    let result = state
        .pipeline()
        .authenticate(&request.credential())
        .instrument(span)
        .await;

    match result {
        Ok(identity) => {
            info!(correlation_id = %correlation_id, uid = identity.uid, "Login succeeded");
            Json(LoginResponse::from_identity(&identity)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Login failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /api/v1/nomina/lotes.
///
/// Always answers 200; a backend failure yields an empty array.
async fn batches_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchListRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(rejection) => return rejection.into_response(),
    };

    let span = info_span!("list_batches", correlation_id = %correlation_id, uid = request.uid);
    let batches = state
        .pipeline()
        .list_batches(&request.identity())
        .instrument(span)
        .await;

    info!(correlation_id = %correlation_id, count = batches.len(), "Returning batches");
    Json(batches).into_response()
}

/// Handler for POST /api/v1/nomina/print.
///
/// Answers with the PDF inline, or with a 401/404/400/500 error body.
async fn print_handler(
    State(state): State<AppState>,
    payload: Result<Json<PrintRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(rejection) => return rejection.into_response(),
    };

    let start_time = Instant::now();
    let span = info_span!(
        "render_batch",
        correlation_id = %correlation_id,
        uid = request.uid,
        batch_id = request.lot_id
    );
    let result = state
        .pipeline()
        .render_batch(&request.identity(), request.lot_id)
        .instrument(span)
        .await;

    match result {
        Ok(rendered) => {
            info!(
                correlation_id = %correlation_id,
                batch_id = request.lot_id,
                report = %rendered.selection.report_name,
                payslips = rendered.payslip_count,
                size = rendered.document.bytes.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Print completed"
            );
            let headers = document_headers(request.lot_id, &rendered.selection.display_name);
            (StatusCode::OK, headers, rendered.document.bytes).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                batch_id = request.lot_id,
                error = %err,
                "Print failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Headers for an inline PDF of `batch_id`.
///
/// A report name that is not a valid header value is left out rather than
/// failing the response.
fn document_headers(batch_id: i64, report_display_name: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    if let Ok(value) =
        HeaderValue::from_str(&format!("inline; filename=\"colillas_lote_{}.pdf\"", batch_id))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(report_display_name) {
        headers.insert(HeaderName::from_static(REPORT_USED_HEADER), value);
    }
    headers
}

/// Unwraps a JSON body or turns the rejection into a 400 error.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}
