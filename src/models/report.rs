use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ReportStatus;

/// A medical report moving through the review workflow.
///
/// `signed_by` / `signed_at` are set together, and only ever from the
/// Approved status — see the lifecycle module for the transition rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub patient_name: String,
    pub report_type: String,
    pub date: NaiveDate,
    pub status: ReportStatus,
    pub content: String,
    pub notes: Option<String>,
    pub signed_by: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
}

impl Report {
    /// True once the report carries a signature.
    pub fn is_signed(&self) -> bool {
        self.signed_by.is_some()
    }
}
