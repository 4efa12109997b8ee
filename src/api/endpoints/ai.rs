//! AI endpoints — drafting, summarization, illustration.
//!
//! The model client is blocking; each handler runs exactly one model
//! round inside `spawn_blocking`. Duplicate-submission guarding is the
//! client's job (an in-flight flag on the form) — the server performs
//! no request coalescing, cancellation, or retry.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::genai::drafting::{self, DraftRequest, DraftResponse};
use crate::genai::illustration::{self, IllustrationRequest, IllustrationResponse};
use crate::genai::summarize::{self, SummaryRequest, SummaryResponse};

/// `POST /api/ai/draft` — expand shorthand notes into a report draft.
pub async fn draft(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<DraftResponse>, ApiError> {
    for (field, value) in [
        ("patient_name", &req.patient_name),
        ("report_type", &req.report_type),
        ("notes", &req.notes),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("{field} must not be empty")));
        }
    }

    let model = ctx.core.genai.clone();
    let response = tokio::task::spawn_blocking(move || {
        drafting::generate_draft(model.as_ref(), &req)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(response))
}

/// `POST /api/ai/summarize` — rewrite technical text for the patient.
///
/// Empty input is not a validation error: the service short-circuits
/// to an empty summary without a model call.
pub async fn summarize(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Json(req): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let model = ctx.core.genai.clone();
    let response = tokio::task::spawn_blocking(move || {
        summarize::summarize(model.as_ref(), &req)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(response))
}

/// `POST /api/ai/illustration` — illustrative image for exam reports.
///
/// Always 200: absence of an image (gate miss or generation failure)
/// is `image_url: null`, not an error.
pub async fn illustration(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Json(req): Json<IllustrationRequest>,
) -> Result<Json<IllustrationResponse>, ApiError> {
    let model = ctx.core.genai.clone();
    let response = tokio::task::spawn_blocking(move || {
        illustration::generate_illustration(model.as_ref(), &req)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(response))
}
