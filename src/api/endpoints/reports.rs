//! Report endpoints: draft creation, listing, and the review workflow.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::db::repository::{get_report, insert_report, list_reports};
use crate::events::{ChangeAction, Collection};
use crate::lifecycle::{self, ReviewDecision};
use crate::models::{Report, ReportStatus};

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub patient_name: String,
    pub report_type: String,
    pub date: NaiveDate,
    pub content: String,
    pub notes: Option<String>,
}

/// `POST /api/reports` — persist a new draft.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Json(req): Json<CreateReportRequest>,
) -> Result<Json<Report>, ApiError> {
    for (field, value) in [
        ("patient_name", &req.patient_name),
        ("report_type", &req.report_type),
        ("content", &req.content),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("{field} must not be empty")));
        }
    }

    let report = Report {
        id: Uuid::new_v4(),
        patient_name: req.patient_name.trim().to_string(),
        report_type: req.report_type.trim().to_string(),
        date: req.date,
        status: ReportStatus::Draft,
        content: req.content,
        notes: req.notes,
        signed_by: None,
        signed_at: None,
    };

    let conn = ctx.core.open_db()?;
    insert_report(&conn, &report)?;

    ctx.core.hub.publish(
        Collection::Reports,
        &report.id.to_string(),
        ChangeAction::Created,
    );

    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<ReportStatus>,
}

#[derive(Serialize)]
pub struct ReportsResponse {
    pub reports: Vec<Report>,
}

/// `GET /api/reports` — list reports, optionally filtered by status.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ReportsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let reports = list_reports(&conn, query.status)?;
    Ok(Json(ReportsResponse { reports }))
}

/// `GET /api/reports/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError> {
    let conn = ctx.core.open_db()?;
    let report = get_report(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("report {id} not found")))?;
    Ok(Json(report))
}

/// `POST /api/reports/:id/submit` — Draft → Pending.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError> {
    let conn = ctx.core.open_db()?;
    let report = lifecycle::submit(&conn, &id)?;

    ctx.core
        .hub
        .publish(Collection::Reports, &id.to_string(), ChangeAction::Updated);

    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
}

/// `POST /api/reports/:id/review` — Pending → Approved | Rejected.
pub async fn review(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<Report>, ApiError> {
    let conn = ctx.core.open_db()?;
    let report = lifecycle::review(&conn, &id, req.decision)?;

    ctx.core
        .hub
        .publish(Collection::Reports, &id.to_string(), ChangeAction::Updated);

    Ok(Json(report))
}

/// `POST /api/reports/:id/sign` — sign an approved report.
///
/// The signer identity is the caller's stored profile name, never a
/// client-supplied string.
pub async fn sign(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError> {
    let conn = ctx.core.open_db()?;
    let report = lifecycle::sign(&conn, &id, &user.profile.name)?;

    ctx.core
        .hub
        .publish(Collection::Reports, &id.to_string(), ChangeAction::Updated);

    Ok(Json(report))
}
