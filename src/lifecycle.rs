//! Report lifecycle — the review workflow state machine.
//!
//! A report moves Draft → Pending on submission, Pending → Approved or
//! Rejected on review, and an Approved report can be signed exactly once.
//! No other transition exists. Each transition persists the full record
//! and leaves it untouched on a rule violation.
//!
//! Appointment statuses deliberately do NOT go through this module —
//! they are unrestricted field overwrites (see `appointment`).

use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repository::{get_report, update_report};
use crate::db::DatabaseError;
use crate::models::{Report, ReportStatus};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Reviewer verdict on a pending report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// The status a report lands in for this decision.
    pub fn as_status(self) -> ReportStatus {
        match self {
            Self::Approve => ReportStatus::Approved,
            Self::Reject => ReportStatus::Rejected,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("invalid transition: cannot {operation} a report in status {from}")]
    InvalidTransition {
        operation: &'static str,
        from: &'static str,
    },

    #[error("report already signed by {0}")]
    AlreadySigned(String),

    #[error("report {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Submit a draft for review: Draft → Pending.
pub fn submit(conn: &Connection, id: &Uuid) -> Result<Report, LifecycleError> {
    let mut report = load(conn, id)?;

    if report.status != ReportStatus::Draft {
        return Err(LifecycleError::InvalidTransition {
            operation: "submit",
            from: report.status.as_str(),
        });
    }

    report.status = ReportStatus::Pending;
    update_report(conn, &report)?;
    tracing::info!(report = %report.id, "report submitted for review");
    Ok(report)
}

/// Review a pending report: Pending → Approved | Rejected.
pub fn review(
    conn: &Connection,
    id: &Uuid,
    decision: ReviewDecision,
) -> Result<Report, LifecycleError> {
    let mut report = load(conn, id)?;

    if report.status != ReportStatus::Pending {
        return Err(LifecycleError::InvalidTransition {
            operation: "review",
            from: report.status.as_str(),
        });
    }

    report.status = decision.as_status();
    update_report(conn, &report)?;
    tracing::info!(report = %report.id, status = report.status.as_str(), "report reviewed");
    Ok(report)
}

/// Sign an approved report. Terminal: records signer identity and time,
/// status stays Approved, and a second signature is refused.
pub fn sign(conn: &Connection, id: &Uuid, signer: &str) -> Result<Report, LifecycleError> {
    let mut report = load(conn, id)?;

    if report.status != ReportStatus::Approved {
        return Err(LifecycleError::InvalidTransition {
            operation: "sign",
            from: report.status.as_str(),
        });
    }
    if let Some(existing) = &report.signed_by {
        return Err(LifecycleError::AlreadySigned(existing.clone()));
    }

    report.signed_by = Some(signer.to_string());
    report.signed_at = Some(Utc::now());
    update_report(conn, &report)?;
    tracing::info!(report = %report.id, signer, "report signed");
    Ok(report)
}

fn load(conn: &Connection, id: &Uuid) -> Result<Report, LifecycleError> {
    get_report(conn, id)?.ok_or(LifecycleError::NotFound(*id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_report;
    use crate::db::sqlite::open_memory_database;
    use chrono::NaiveDate;

    fn seeded(conn: &Connection, status: ReportStatus) -> Report {
        let report = Report {
            id: Uuid::new_v4(),
            patient_name: "Maria Santos".to_string(),
            report_type: "Ecocardiograma".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            status,
            content: "Função sistólica preservada.".to_string(),
            notes: None,
            signed_by: None,
            signed_at: None,
        };
        insert_report(conn, &report).unwrap();
        report
    }

    #[test]
    fn submit_moves_draft_to_pending() {
        let conn = open_memory_database().unwrap();
        let report = seeded(&conn, ReportStatus::Draft);

        let updated = submit(&conn, &report.id).unwrap();
        assert_eq!(updated.status, ReportStatus::Pending);
    }

    #[test]
    fn submit_rejects_non_draft() {
        let conn = open_memory_database().unwrap();
        for status in [
            ReportStatus::Pending,
            ReportStatus::Approved,
            ReportStatus::Rejected,
        ] {
            let report = seeded(&conn, status);
            let err = submit(&conn, &report.id).unwrap_err();
            assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
            // Record left unmodified
            let stored = get_report(&conn, &report.id).unwrap().unwrap();
            assert_eq!(stored.status, status);
        }
    }

    #[test]
    fn review_succeeds_iff_pending() {
        let conn = open_memory_database().unwrap();

        let pending = seeded(&conn, ReportStatus::Pending);
        let approved = review(&conn, &pending.id, ReviewDecision::Approve).unwrap();
        assert_eq!(approved.status, ReportStatus::Approved);

        let pending = seeded(&conn, ReportStatus::Pending);
        let rejected = review(&conn, &pending.id, ReviewDecision::Reject).unwrap();
        assert_eq!(rejected.status, ReportStatus::Rejected);

        for status in [
            ReportStatus::Draft,
            ReportStatus::Approved,
            ReportStatus::Rejected,
        ] {
            let report = seeded(&conn, status);
            let err = review(&conn, &report.id, ReviewDecision::Approve).unwrap_err();
            assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn sign_succeeds_only_from_approved_and_once() {
        let conn = open_memory_database().unwrap();
        let report = seeded(&conn, ReportStatus::Approved);

        let signed = sign(&conn, &report.id, "Dra. Ana Souza").unwrap();
        assert_eq!(signed.signed_by.as_deref(), Some("Dra. Ana Souza"));
        assert!(signed.signed_at.is_some());
        // Status remains Approved after signing
        assert_eq!(signed.status, ReportStatus::Approved);

        let err = sign(&conn, &report.id, "Dr. Outro").unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadySigned(_)));
        // The original signature is untouched
        let stored = get_report(&conn, &report.id).unwrap().unwrap();
        assert_eq!(stored.signed_by.as_deref(), Some("Dra. Ana Souza"));
    }

    #[test]
    fn sign_rejects_unapproved_statuses() {
        let conn = open_memory_database().unwrap();
        for status in [
            ReportStatus::Draft,
            ReportStatus::Pending,
            ReportStatus::Rejected,
        ] {
            let report = seeded(&conn, status);
            let err = sign(&conn, &report.id, "Dra. Ana Souza").unwrap_err();
            assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
            let stored = get_report(&conn, &report.id).unwrap().unwrap();
            assert!(stored.signed_by.is_none());
        }
    }

    #[test]
    fn missing_report_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = submit(&conn, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, LifecycleError::NotFound(_)));
    }
}
