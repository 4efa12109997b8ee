//! Appointment endpoints.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::appointment::{self, ScheduleRequest};
use crate::events::{ChangeAction, Collection};
use crate::models::{Appointment, AppointmentStatus};

/// `POST /api/appointments` — schedule a visit for the caller.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.core.open_db()?;
    let created = appointment::schedule(&conn, &user.profile, &req)?;

    ctx.core.hub.publish(
        Collection::Appointments,
        &created.id.to_string(),
        ChangeAction::Created,
    );

    Ok(Json(created))
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

/// `GET /api/appointments` — list appointments, soonest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = appointment::list(&conn)?;
    Ok(Json(AppointmentsResponse { appointments }))
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: AppointmentStatus,
}

/// `PATCH /api/appointments/:id/status` — unrestricted status overwrite.
pub async fn set_status(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.core.open_db()?;
    let updated = appointment::set_status(&conn, &id, req.status)?;

    ctx.core.hub.publish(
        Collection::Appointments,
        &id.to_string(),
        ChangeAction::Updated,
    );

    Ok(Json(updated))
}
