//! API route definitions.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use complihr_core::sequencing::SequenceError;
use complihr_shared::AppError;
use serde_json::json;
use tracing::error;

use crate::AppState;

pub mod health;
pub mod id_patterns;

/// Creates the API router with all routes.
pub fn api_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .merge(health::routes())
        .merge(id_patterns::routes())
}

/// Converts a sequencing failure into a JSON error response.
///
/// Storage failures are logged and reported without their details.
pub(crate) fn sequence_error_response(err: SequenceError) -> Response {
    let app_error = AppError::from(err);
    let status =
        StatusCode::from_u16(app_error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if app_error.is_client_error() {
        app_error.to_string()
    } else {
        error!(error = %app_error, "Sequencing request failed");
        "An error occurred".to_string()
    };

    (
        status,
        Json(json!({
            "error": app_error.error_code(),
            "message": message
        })),
    )
        .into_response()
}
