use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Report, ReportStatus};

pub fn insert_report(conn: &Connection, report: &Report) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO reports (id, patient_name, report_type, date, status, content, notes,
         signed_by, signed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            report.id.to_string(),
            report.patient_name,
            report.report_type,
            report.date.to_string(),
            report.status.as_str(),
            report.content,
            report.notes,
            report.signed_by,
            report.signed_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

/// Full-record overwrite keyed by id. Every lifecycle transition persists
/// the whole report — there is no partial-field update path.
pub fn update_report(conn: &Connection, report: &Report) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE reports SET patient_name = ?2, report_type = ?3, date = ?4, status = ?5,
         content = ?6, notes = ?7, signed_by = ?8, signed_at = ?9
         WHERE id = ?1",
        params![
            report.id.to_string(),
            report.patient_name,
            report.report_type,
            report.date.to_string(),
            report.status.as_str(),
            report.content,
            report.notes,
            report.signed_by,
            report.signed_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "report".into(),
            id: report.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Option<Report>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_name, report_type, date, status, content, notes, signed_by, signed_at
         FROM reports WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], report_row);
    match result {
        Ok(raw) => Ok(Some(report_from_row(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Reports, newest first, optionally filtered by status.
pub fn list_reports(
    conn: &Connection,
    status: Option<ReportStatus>,
) -> Result<Vec<Report>, DatabaseError> {
    let mut reports = Vec::new();

    match status {
        Some(status) => {
            let mut stmt = conn.prepare(
                "SELECT id, patient_name, report_type, date, status, content, notes,
                 signed_by, signed_at
                 FROM reports WHERE status = ?1 ORDER BY date DESC",
            )?;
            let rows = stmt.query_map(params![status.as_str()], report_row)?;
            for row in rows {
                reports.push(report_from_row(row?)?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, patient_name, report_type, date, status, content, notes,
                 signed_by, signed_at
                 FROM reports ORDER BY date DESC",
            )?;
            let rows = stmt.query_map([], report_row)?;
            for row in rows {
                reports.push(report_from_row(row?)?);
            }
        }
    }

    Ok(reports)
}

type ReportRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn report_row(row: &rusqlite::Row<'_>) -> Result<ReportRow, rusqlite::Error> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn report_from_row(row: ReportRow) -> Result<Report, DatabaseError> {
    let (id, patient_name, report_type, date, status, content, notes, signed_by, signed_at) = row;
    Ok(Report {
        id: Uuid::parse_str(&id).unwrap_or_default(),
        patient_name,
        report_type,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap_or_default(),
        status: ReportStatus::from_str(&status)?,
        content,
        notes,
        signed_by,
        signed_at: signed_at
            .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
            .map(|t| t.with_timezone(&Utc)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn sample(date: &str) -> Report {
        Report {
            id: Uuid::new_v4(),
            patient_name: "Maria Santos".to_string(),
            report_type: "Raio-X de Tórax".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            status: ReportStatus::Draft,
            content: "Laudo em elaboração.".to_string(),
            notes: Some("dor torácica".to_string()),
            signed_by: None,
            signed_at: None,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let report = sample("2026-02-01");
        insert_report(&conn, &report).unwrap();

        let loaded = get_report(&conn, &report.id).unwrap().unwrap();
        assert_eq!(loaded.patient_name, "Maria Santos");
        assert_eq!(loaded.status, ReportStatus::Draft);
        assert!(loaded.signed_at.is_none());
    }

    #[test]
    fn update_overwrites_full_record() {
        let conn = open_memory_database().unwrap();
        let mut report = sample("2026-02-01");
        insert_report(&conn, &report).unwrap();

        report.status = ReportStatus::Approved;
        report.signed_by = Some("Dra. Ana Souza".to_string());
        report.signed_at = Some(Utc::now());
        update_report(&conn, &report).unwrap();

        let loaded = get_report(&conn, &report.id).unwrap().unwrap();
        assert_eq!(loaded.status, ReportStatus::Approved);
        assert_eq!(loaded.signed_by.as_deref(), Some("Dra. Ana Souza"));
        assert!(loaded.signed_at.is_some());
    }

    #[test]
    fn update_missing_report_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = update_report(&conn, &sample("2026-02-01")).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn list_filters_by_status_newest_first() {
        let conn = open_memory_database().unwrap();
        let mut a = sample("2026-02-01");
        a.status = ReportStatus::Pending;
        let mut b = sample("2026-02-05");
        b.status = ReportStatus::Pending;
        let c = sample("2026-02-03");
        insert_report(&conn, &a).unwrap();
        insert_report(&conn, &b).unwrap();
        insert_report(&conn, &c).unwrap();

        let pending = list_reports(&conn, Some(ReportStatus::Pending)).unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].date.to_string(), "2026-02-05");
        assert_eq!(pending[1].date.to_string(), "2026-02-01");

        let all = list_reports(&conn, None).unwrap();
        assert_eq!(all.len(), 3);
    }
}
