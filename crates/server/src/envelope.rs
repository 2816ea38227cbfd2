//! The uniform response envelope and its error/status mapping.
//!
//! Every handler funnels its outcome through this module, so envelope
//! construction and status mapping exist exactly once. Exactly one
//! envelope is written per request.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use tracing::{error, warn};

use records::ServiceError;

/// Fixed wrapper around every client-facing response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Map an error to its response status.
///
/// Validation -> 400, NotFound -> 404, everything else (storage, upstream,
/// persistence) -> 500.
fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::StorageIo { .. }
        | ServiceError::Upstream(_)
        | ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Shape a pipeline outcome into the envelope, with an optional success
/// message.
pub fn respond<T: Serialize>(
    result: Result<T, ServiceError>,
    message: Option<&str>,
) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(Envelope {
            success: true,
            data: Some(data),
            message: message.map(str::to_string),
        }),
        Err(err) => failure(&err),
    }
}

/// Shape an error into the envelope. Every error is logged here before it
/// leaves the process; client-side mistakes at warn, everything else at
/// error.
pub fn failure(err: &ServiceError) -> HttpResponse {
    let status = status_for(err);
    if status.is_client_error() {
        warn!(status = status.as_u16(), "request rejected: {err}");
    } else {
        error!(status = status.as_u16(), "request failed: {err}");
    }

    HttpResponse::build(status).json(Envelope::<()> {
        success: false,
        data: None,
        message: Some(err.to_string()),
    })
}
