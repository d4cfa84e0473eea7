//! HTTP API module for the colillas service.
//!
//! This module provides the REST endpoints used by the desktop client:
//! login, batch listing and pay-stub printing, plus a health check.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{REPORT_USED_HEADER, create_router};
pub use request::{BatchListRequest, LoginRequest, PrintRequest};
pub use response::{ApiError, ApiErrorResponse, HealthResponse, LoginResponse};
pub use state::AppState;
