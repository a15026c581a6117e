//! ID pattern and sequence routes.
//!
//! Malformed paths, queries and bodies answer with the same JSON
//! `VALIDATION_ERROR` body as domain validation failures.

use std::fmt;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use complihr_core::sequencing::{EffectivePattern, IdCategory, IdPattern, IdSequencer};
use complihr_shared::{
    id_patterns::{
        GenerateIdRequest, GeneratedIdResponse, IdPatternResponse, IdPreviewQuery,
        IdPreviewResponse, UpdateIdPatternRequest,
    },
    types::OrganizationId,
};
use serde_json::json;
use tracing::info;

use super::sequence_error_response;
use crate::AppState;

/// Creates the ID pattern routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/id-patterns/validate", post(validate_pattern))
        .route("/organizations/{org_id}/id-patterns", get(list_patterns))
        .route(
            "/organizations/{org_id}/id-patterns/{category}",
            put(update_pattern).delete(reset_pattern),
        )
        .route(
            "/organizations/{org_id}/id-patterns/{category}/preview",
            get(preview_id),
        )
        .route(
            "/organizations/{org_id}/id-sequences/{category}/next",
            post(generate_id),
        )
}

fn pattern_response(effective: &EffectivePattern) -> IdPatternResponse {
    IdPatternResponse {
        category: effective.category.as_str().to_string(),
        pattern: effective.pattern.as_str().to_string(),
        is_default: effective.is_default,
        reset_policy: effective.reset_policy.as_str().to_string(),
    }
}

fn stored_pattern_response(
    category: IdCategory,
    pattern: IdPattern,
    is_default: bool,
) -> IdPatternResponse {
    pattern_response(&EffectivePattern {
        category,
        reset_policy: pattern.reset_policy(category),
        is_default,
        pattern,
    })
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "VALIDATION_ERROR",
            "message": message.into()
        })),
    )
        .into_response()
}

type OrganizationPath = Result<Path<OrganizationId>, PathRejection>;
type CategoryPath = Result<Path<(OrganizationId, String)>, PathRejection>;

/// Malformed path, query or body as a `VALIDATION_ERROR` response.
fn rejection_response(rejection: impl fmt::Display) -> Response {
    bad_request(rejection.to_string())
}

fn resolve_category(path: CategoryPath) -> Result<(OrganizationId, IdCategory), Response> {
    let Path((org_id, category)) = path.map_err(rejection_response)?;
    let category = category
        .parse::<IdCategory>()
        .map_err(sequence_error_response)?;
    Ok((org_id, category))
}

/// GET /organizations/{org_id}/id-patterns
async fn list_patterns(State(state): State<AppState>, path: OrganizationPath) -> Response {
    let Path(org_id) = match path {
        Ok(path) => path,
        Err(e) => return rejection_response(e),
    };

    match state.sequencer.list_patterns(org_id).await {
        Ok(patterns) => {
            let body: Vec<IdPatternResponse> = patterns.iter().map(pattern_response).collect();
            Json(body).into_response()
        }
        Err(e) => sequence_error_response(e),
    }
}

/// PUT /organizations/{org_id}/id-patterns/{category}
async fn update_pattern(
    State(state): State<AppState>,
    path: CategoryPath,
    body: Result<Json<UpdateIdPatternRequest>, JsonRejection>,
) -> Response {
    let (org_id, category) = match resolve_category(path) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    let Json(req) = match body {
        Ok(body) => body,
        Err(e) => return rejection_response(e),
    };

    match state
        .sequencer
        .update_pattern(org_id, category, &req.pattern)
        .await
    {
        Ok(pattern) => Json(stored_pattern_response(category, pattern, false)).into_response(),
        Err(e) => sequence_error_response(e),
    }
}

/// DELETE /organizations/{org_id}/id-patterns/{category}
async fn reset_pattern(State(state): State<AppState>, path: CategoryPath) -> Response {
    let (org_id, category) = match resolve_category(path) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    match state.sequencer.reset_pattern(org_id, category).await {
        Ok(pattern) => Json(stored_pattern_response(category, pattern, true)).into_response(),
        Err(e) => sequence_error_response(e),
    }
}

/// GET /organizations/{org_id}/id-patterns/{category}/preview
async fn preview_id(
    State(state): State<AppState>,
    path: CategoryPath,
    query: Result<Query<IdPreviewQuery>, QueryRejection>,
) -> Response {
    let (org_id, category) = match resolve_category(path) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(e) => return rejection_response(e),
    };

    match state
        .sequencer
        .preview_id(org_id, category, query.as_of)
        .await
    {
        Ok(preview) => Json(IdPreviewResponse {
            id: preview.value,
            category: category.as_str().to_string(),
            next_sequence: preview.sequence,
        })
        .into_response(),
        Err(e) => sequence_error_response(e),
    }
}

/// POST /organizations/{org_id}/id-sequences/{category}/next
///
/// The body is optional; an empty body issues an ID for today.
async fn generate_id(State(state): State<AppState>, path: CategoryPath, body: Bytes) -> Response {
    let (org_id, category) = match resolve_category(path) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let req = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateIdRequest::default()
    } else {
        match serde_json::from_slice::<GenerateIdRequest>(&body) {
            Ok(req) => req,
            Err(e) => return bad_request(format!("Invalid request body: {e}")),
        }
    };

    match state.sequencer.generate_id(org_id, category, req.as_of).await {
        Ok(generated) => {
            info!(
                organization_id = %org_id,
                category = %category,
                id = %generated.value,
                "Identifier generated"
            );
            (
                StatusCode::CREATED,
                Json(GeneratedIdResponse {
                    id: generated.value,
                    category: category.as_str().to_string(),
                    sequence: generated.sequence,
                }),
            )
                .into_response()
        }
        Err(e) => sequence_error_response(e),
    }
}

/// POST /id-patterns/validate
async fn validate_pattern(body: Result<Json<UpdateIdPatternRequest>, JsonRejection>) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(e) => return rejection_response(e),
    };

    match IdSequencer::validate_pattern(&req.pattern) {
        Ok(pattern) => Json(json!({
            "valid": true,
            "pattern": pattern.as_str(),
            "has_month_component": pattern.has_month_component(),
            "has_year_component": pattern.has_year_component()
        }))
        .into_response(),
        Err(e) => sequence_error_response(e),
    }
}
