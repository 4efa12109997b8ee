use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

/// A scheduled visit. `doctor_name` is denormalized from the profile at
/// scheduling time so listings don't join against profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    pub doctor_uid: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    /// Wall-clock time as "HH:MM".
    pub time: String,
    pub status: AppointmentStatus,
}
