use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{format_datetime, map_constraint, parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{AlertLevel, AlertStatus, VitalAlert};

type AlertRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
);

const ALERT_COLUMNS: &str = "id, reading_id, patient_id, template_id, alert_level, reasons,
     recommended_actions, status, created_at, acknowledged_at, resolved_at";

/// Insert an alert. Reasons and actions are stored as JSON arrays.
pub fn insert_vital_alert(conn: &Connection, alert: &VitalAlert) -> Result<(), DatabaseError> {
    let reasons = serde_json::to_string(&alert.reasons)?;
    let actions = serde_json::to_string(&alert.recommended_actions)?;

    conn.execute(
        "INSERT INTO vital_alerts (id, reading_id, patient_id, template_id, alert_level, reasons,
         recommended_actions, status, created_at, acknowledged_at, resolved_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            alert.id.to_string(),
            alert.reading_id.to_string(),
            alert.patient_id,
            alert.template_id.to_string(),
            alert.alert_level.as_str(),
            reasons,
            actions,
            alert.status.as_str(),
            format_datetime(&alert.created_at),
            alert.acknowledged_at.as_ref().map(format_datetime),
            alert.resolved_at.as_ref().map(format_datetime),
        ],
    )
    .map_err(|e| map_constraint(e, "vital alert"))?;
    Ok(())
}

pub fn get_vital_alert(conn: &Connection, id: &Uuid) -> Result<Option<VitalAlert>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {ALERT_COLUMNS} FROM vital_alerts WHERE id = ?1"),
            params![id.to_string()],
            read_alert_row,
        )
        .optional()?;
    row.map(alert_from_row).transpose()
}

/// Alerts for a patient, newest first, optionally filtered by status.
pub fn list_vital_alerts(
    conn: &Connection,
    patient_id: &str,
    status: Option<AlertStatus>,
) -> Result<Vec<VitalAlert>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ALERT_COLUMNS}
         FROM vital_alerts
         WHERE patient_id = ?1 AND (?2 IS NULL OR status = ?2)
         ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(
        params![patient_id, status.map(|s| s.as_str())],
        read_alert_row,
    )?;

    let mut alerts = Vec::new();
    for row in rows {
        alerts.push(alert_from_row(row?)?);
    }
    Ok(alerts)
}

/// Set an alert's status and stamp the matching timestamp column.
///
/// Transition rules are enforced by the caller; this only writes.
pub fn update_vital_alert_status(
    conn: &Connection,
    id: &Uuid,
    status: AlertStatus,
    at: &NaiveDateTime,
) -> Result<(), DatabaseError> {
    let stamp = format_datetime(at);
    let affected = match status {
        AlertStatus::Acknowledged => conn.execute(
            "UPDATE vital_alerts SET status = ?1, acknowledged_at = ?2 WHERE id = ?3",
            params![status.as_str(), stamp, id.to_string()],
        )?,
        AlertStatus::Resolved => conn.execute(
            "UPDATE vital_alerts SET status = ?1, resolved_at = ?2 WHERE id = ?3",
            params![status.as_str(), stamp, id.to_string()],
        )?,
        AlertStatus::Active => conn.execute(
            "UPDATE vital_alerts SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id.to_string()],
        )?,
    };
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "vital_alert".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn read_alert_row(row: &rusqlite::Row) -> Result<AlertRow, rusqlite::Error> {
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
        row.get(9)?,
        row.get(10)?,
    ))
}

fn alert_from_row(row: AlertRow) -> Result<VitalAlert, DatabaseError> {
    let (
        id,
        reading_id,
        patient_id,
        template_id,
        level,
        reasons,
        actions,
        status,
        created_at,
        acknowledged_at,
        resolved_at,
    ) = row;

    Ok(VitalAlert {
        id: parse_uuid(&id)?,
        reading_id: parse_uuid(&reading_id)?,
        patient_id,
        template_id: parse_uuid(&template_id)?,
        alert_level: AlertLevel::from_str(&level)?,
        reasons: serde_json::from_str(&reasons)?,
        recommended_actions: serde_json::from_str(&actions)?,
        status: AlertStatus::from_str(&status)?,
        created_at: parse_datetime(&created_at)?,
        acknowledged_at: acknowledged_at.as_deref().map(parse_datetime).transpose()?,
        resolved_at: resolved_at.as_deref().map(parse_datetime).transpose()?,
    })
}
