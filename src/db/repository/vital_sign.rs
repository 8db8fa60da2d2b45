use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{format_datetime, map_constraint, parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{NormalRange, ReadingSource, VitalKind, VitalReading, VitalTemplate};

// ═══════════════════════════════════════════
// Templates
// ═══════════════════════════════════════════

type TemplateRow = (String, String, String, String, Option<f64>, Option<f64>, String);

const TEMPLATE_COLUMNS: &str = "id, name, kind, unit, normal_min, normal_max, created_at";

/// Insert a vital template. Names are unique.
pub fn insert_vital_template(conn: &Connection, t: &VitalTemplate) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO vital_templates (id, name, kind, unit, normal_min, normal_max, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            t.id.to_string(),
            t.name,
            t.kind.as_str(),
            t.unit,
            t.normal_range.min,
            t.normal_range.max,
            format_datetime(&t.created_at),
        ],
    )
    .map_err(|e| map_constraint(e, "vital template"))?;
    Ok(())
}

pub fn get_vital_template(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<VitalTemplate>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {TEMPLATE_COLUMNS} FROM vital_templates WHERE id = ?1"),
            params![id.to_string()],
            read_template_row,
        )
        .optional()?;
    row.map(template_from_row).transpose()
}

/// All templates, ordered by name.
pub fn list_vital_templates(conn: &Connection) -> Result<Vec<VitalTemplate>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM vital_templates ORDER BY name ASC"
    ))?;
    let rows = stmt.query_map([], read_template_row)?;

    let mut templates = Vec::new();
    for row in rows {
        templates.push(template_from_row(row?)?);
    }
    Ok(templates)
}

fn read_template_row(row: &rusqlite::Row) -> Result<TemplateRow, rusqlite::Error> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn template_from_row(row: TemplateRow) -> Result<VitalTemplate, DatabaseError> {
    let (id, name, kind, unit, min, max, created_at) = row;
    Ok(VitalTemplate {
        id: parse_uuid(&id)?,
        name,
        kind: VitalKind::from_str(&kind)?,
        unit,
        normal_range: NormalRange::new(min, max),
        created_at: parse_datetime(&created_at)?,
    })
}

// ═══════════════════════════════════════════
// Readings
// ═══════════════════════════════════════════

type ReadingRow = (String, String, String, f64, String, String, String, Option<String>, String);

const READING_COLUMNS: &str =
    "id, patient_id, template_id, value, unit, recorded_at, source, notes, created_at";

/// Append a reading.
pub fn insert_vital_reading(conn: &Connection, r: &VitalReading) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO vital_readings (id, patient_id, template_id, value, unit, recorded_at, source, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            r.id.to_string(),
            r.patient_id,
            r.template_id.to_string(),
            r.value,
            r.unit,
            format_datetime(&r.recorded_at),
            r.source.as_str(),
            r.notes,
            format_datetime(&r.created_at),
        ],
    )
    .map_err(|e| map_constraint(e, "vital reading"))?;
    Ok(())
}

/// Most recent readings for a patient, newest first.
pub fn get_vital_readings(
    conn: &Connection,
    patient_id: &str,
    template_id: Option<&Uuid>,
    limit: u32,
) -> Result<Vec<VitalReading>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {READING_COLUMNS}
         FROM vital_readings
         WHERE patient_id = ?1 AND (?2 IS NULL OR template_id = ?2)
         ORDER BY recorded_at DESC
         LIMIT ?3"
    ))?;
    let rows = stmt.query_map(
        params![patient_id, template_id.map(|id| id.to_string()), limit],
        read_reading_row,
    )?;
    collect_readings(rows)
}

/// Readings of one vital for one patient recorded in `since..=until`,
/// oldest first.
pub fn get_vital_readings_between(
    conn: &Connection,
    patient_id: &str,
    template_id: &Uuid,
    since: &NaiveDateTime,
    until: &NaiveDateTime,
) -> Result<Vec<VitalReading>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {READING_COLUMNS}
         FROM vital_readings
         WHERE patient_id = ?1 AND template_id = ?2
           AND recorded_at >= ?3 AND recorded_at <= ?4
         ORDER BY recorded_at ASC"
    ))?;
    let rows = stmt.query_map(
        params![
            patient_id,
            template_id.to_string(),
            format_datetime(since),
            format_datetime(until),
        ],
        read_reading_row,
    )?;
    collect_readings(rows)
}

/// The most recent reading of one vital for one patient.
pub fn get_latest_vital_reading(
    conn: &Connection,
    patient_id: &str,
    template_id: &Uuid,
) -> Result<Option<VitalReading>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {READING_COLUMNS}
                 FROM vital_readings
                 WHERE patient_id = ?1 AND template_id = ?2
                 ORDER BY recorded_at DESC, created_at DESC
                 LIMIT 1"
            ),
            params![patient_id, template_id.to_string()],
            read_reading_row,
        )
        .optional()?;
    row.map(reading_from_row).transpose()
}

fn read_reading_row(row: &rusqlite::Row) -> Result<ReadingRow, rusqlite::Error> {
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

fn collect_readings(
    rows: impl Iterator<Item = Result<ReadingRow, rusqlite::Error>>,
) -> Result<Vec<VitalReading>, DatabaseError> {
    let mut readings = Vec::new();
    for row in rows {
        readings.push(reading_from_row(row?)?);
    }
    Ok(readings)
}

fn reading_from_row(row: ReadingRow) -> Result<VitalReading, DatabaseError> {
    let (id, patient_id, template_id, value, unit, recorded_at, source, notes, created_at) = row;
    Ok(VitalReading {
        id: parse_uuid(&id)?,
        patient_id,
        template_id: parse_uuid(&template_id)?,
        value,
        unit,
        recorded_at: parse_datetime(&recorded_at)?,
        source: ReadingSource::from_str(&source)?,
        notes,
        created_at: parse_datetime(&created_at)?,
    })
}
