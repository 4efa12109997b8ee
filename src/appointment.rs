//! Appointment scheduling.
//!
//! Thin business layer over the appointment repository: shape validation,
//! doctor-name denormalization, and the unrestricted status overwrite.
//! Unlike reports, appointment statuses have no state machine — any of
//! the four statuses is reachable from any other. That asymmetry is
//! intentional (front-desk staff reclassify visits freely; a signed
//! medical document cannot be reclassified).

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repository::{
    get_appointment, insert_appointment, list_appointments as repo_list,
    update_appointment_status,
};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentStatus, UserProfile};

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("appointment {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Input for scheduling a visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub patient_name: String,
    pub date: NaiveDate,
    /// Wall-clock time as "HH:MM".
    pub time: String,
}

/// Schedule a new appointment for the given doctor, status Agendada.
pub fn schedule(
    conn: &Connection,
    doctor: &UserProfile,
    request: &ScheduleRequest,
) -> Result<Appointment, AppointmentError> {
    if request.patient_name.trim().is_empty() {
        return Err(AppointmentError::Validation(
            "patient name must not be empty".into(),
        ));
    }
    if !is_valid_time(&request.time) {
        return Err(AppointmentError::Validation(format!(
            "invalid time '{}', expected HH:MM",
            request.time
        )));
    }

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_name: request.patient_name.trim().to_string(),
        doctor_uid: doctor.uid.clone(),
        doctor_name: doctor.name.clone(),
        date: request.date,
        time: request.time.clone(),
        status: AppointmentStatus::Scheduled,
    };
    insert_appointment(conn, &appointment)?;
    tracing::info!(appointment = %appointment.id, date = %appointment.date, "appointment scheduled");
    Ok(appointment)
}

/// Overwrite the status. Always succeeds regardless of the current
/// status — there is no transition restriction here.
pub fn set_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
) -> Result<Appointment, AppointmentError> {
    update_appointment_status(conn, id, status).map_err(|e| match e {
        DatabaseError::NotFound { .. } => AppointmentError::NotFound(*id),
        other => AppointmentError::Database(other),
    })?;
    let appointment = get_appointment(conn, id)?.ok_or(AppointmentError::NotFound(*id))?;
    tracing::info!(appointment = %id, status = status.as_str(), "appointment status updated");
    Ok(appointment)
}

/// Upcoming-first listing (date then time ascending).
pub fn list(conn: &Connection) -> Result<Vec<Appointment>, AppointmentError> {
    Ok(repo_list(conn)?)
}

/// "HH:MM" with 00 <= HH < 24 and 00 <= MM < 60.
fn is_valid_time(time: &str) -> bool {
    let Some((h, m)) = time.split_once(':') else {
        return false;
    };
    if h.len() != 2 || m.len() != 2 {
        return false;
    }
    matches!(h.parse::<u32>(), Ok(h) if h < 24) && matches!(m.parse::<u32>(), Ok(m) if m < 60)
}
