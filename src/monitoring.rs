//! Vital monitoring: the request flow around the classifier.
//!
//! Record a reading, classify it, persist an alert when it is not
//! `NORMAL`, hand the alert to a notifier, and report the trend against
//! the patient's recent history for the same vital.

use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::classifier::{self, AlertResult, ClassifierError, HistoryPoint, TrendResult};
use crate::config;
use crate::db::{self, DatabaseError};
use crate::models::{AlertStatus, ReadingSource, VitalAlert, VitalReading, VitalTemplate};

// ═══════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Alert {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: Uuid,
        from: &'static str,
        to: &'static str,
    },
}

// ═══════════════════════════════════════════
// Notification seam
// ═══════════════════════════════════════════

/// Receives every persisted alert. Delivery channels live behind this.
pub trait AlertNotifier: Send + Sync {
    fn notify(&self, alert: &VitalAlert, template: &VitalTemplate);
}

/// Default notifier: one structured warning per alert.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl AlertNotifier for LogNotifier {
    fn notify(&self, alert: &VitalAlert, template: &VitalTemplate) {
        tracing::warn!(
            alert_id = %alert.id,
            patient_id = %alert.patient_id,
            vital = %template.name,
            level = alert.alert_level.as_str(),
            reasons = ?alert.reasons,
            "Vital alert raised"
        );
    }
}

// ═══════════════════════════════════════════
// Types
// ═══════════════════════════════════════════

/// Short (7 day) or long (30 day) trend window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMode {
    #[default]
    Short,
    Long,
}

impl TrendMode {
    pub fn window_days(self) -> u32 {
        match self {
            TrendMode::Short => config::SHORT_TREND_WINDOW_DAYS,
            TrendMode::Long => config::LONG_TREND_WINDOW_DAYS,
        }
    }
}

/// A new reading as submitted by a patient, device or clinician.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingInput {
    pub patient_id: String,
    pub template_id: Uuid,
    pub value: f64,
    /// Defaults to the template's unit.
    pub unit: Option<String>,
    /// Defaults to the time of recording.
    pub recorded_at: Option<NaiveDateTime>,
    #[serde(default = "default_source")]
    pub source: ReadingSource,
    pub notes: Option<String>,
    #[serde(default)]
    pub trend_mode: TrendMode,
}

fn default_source() -> ReadingSource {
    ReadingSource::Manual
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub reading: VitalReading,
    pub classification: AlertResult,
    pub alert: Option<VitalAlert>,
    pub trend: TrendResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientTrend {
    pub template: VitalTemplate,
    pub latest: Option<VitalReading>,
    pub window_days: u32,
    pub trend: TrendResult,
}

// ═══════════════════════════════════════════
// Operations
// ═══════════════════════════════════════════

/// Record one reading and run it through classification and trend.
///
/// History for the trend is loaded before the new reading is stored, so
/// the new value is compared against what came before it. The reading and
/// its alert are written in one transaction; the notifier only sees alerts
/// that were committed.
pub fn record_reading(
    conn: &Connection,
    notifier: &dyn AlertNotifier,
    input: &ReadingInput,
    now: NaiveDateTime,
) -> Result<RecordOutcome, MonitoringError> {
    let value = classifier::validate_reading_value(input.value)?;
    if input.patient_id.trim().is_empty() {
        return Err(MonitoringError::Validation("patient_id is required".into()));
    }

    let now = db::to_storage_precision(now);
    let recorded_at = db::to_storage_precision(input.recorded_at.unwrap_or(now));
    if recorded_at > now {
        return Err(MonitoringError::Validation(format!(
            "recorded_at {recorded_at} is in the future"
        )));
    }

    let template = require_template(conn, &input.template_id)?;
    let window_days = input.trend_mode.window_days();

    let history = load_history(conn, &input.patient_id, &template.id, window_days, now)?;

    let reading = VitalReading {
        id: Uuid::new_v4(),
        patient_id: input.patient_id.clone(),
        template_id: template.id,
        value,
        unit: input.unit.clone().unwrap_or_else(|| template.unit.clone()),
        recorded_at,
        source: input.source,
        notes: input.notes.clone(),
        created_at: now,
    };
    let classification = classifier::classify(value, &template);

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
    db::insert_vital_reading(&tx, &reading)?;

    let alert = if classification.is_normal() {
        None
    } else {
        let alert = VitalAlert {
            id: Uuid::new_v4(),
            reading_id: reading.id,
            patient_id: reading.patient_id.clone(),
            template_id: template.id,
            alert_level: classification.alert_level,
            reasons: classification.reasons.clone(),
            recommended_actions: classification.recommended_actions.clone(),
            status: AlertStatus::Active,
            created_at: now,
            acknowledged_at: None,
            resolved_at: None,
        };
        db::insert_vital_alert(&tx, &alert)?;
        Some(alert)
    };
    tx.commit().map_err(DatabaseError::from)?;

    if let Some(alert) = &alert {
        notifier.notify(alert, &template);
    }

    let trend = classifier::compute_trend(value, &history, window_days, now);

    tracing::info!(
        reading_id = %reading.id,
        vital = %template.name,
        level = classification.alert_level.as_str(),
        trend = trend.trend.as_str(),
        "Reading recorded"
    );

    Ok(RecordOutcome {
        reading,
        classification,
        alert,
        trend,
    })
}

/// Trend of the latest reading against the earlier readings in the window.
pub fn patient_trend(
    conn: &Connection,
    patient_id: &str,
    template_id: &Uuid,
    mode: TrendMode,
    now: NaiveDateTime,
) -> Result<PatientTrend, MonitoringError> {
    let template = require_template(conn, template_id)?;
    let window_days = mode.window_days();
    let latest = db::get_latest_vital_reading(conn, patient_id, template_id)?;

    let trend = match &latest {
        Some(latest) => {
            let since = window_start(now, window_days);
            let history: Vec<HistoryPoint> =
                db::get_vital_readings_between(conn, patient_id, template_id, &since, &now)?
                    .into_iter()
                    .filter(|r| r.id != latest.id)
                    .map(to_history_point)
                    .collect();
            classifier::compute_trend(latest.value, &history, window_days, now)
        }
        None => classifier::compute_trend(0.0, &[], window_days, now),
    };

    Ok(PatientTrend {
        template,
        latest,
        window_days,
        trend,
    })
}

pub fn acknowledge_alert(
    conn: &Connection,
    alert_id: &Uuid,
    now: NaiveDateTime,
) -> Result<VitalAlert, MonitoringError> {
    transition_alert(conn, alert_id, AlertStatus::Acknowledged, now)
}

pub fn resolve_alert(
    conn: &Connection,
    alert_id: &Uuid,
    now: NaiveDateTime,
) -> Result<VitalAlert, MonitoringError> {
    transition_alert(conn, alert_id, AlertStatus::Resolved, now)
}

fn transition_alert(
    conn: &Connection,
    alert_id: &Uuid,
    next: AlertStatus,
    now: NaiveDateTime,
) -> Result<VitalAlert, MonitoringError> {
    let alert = db::get_vital_alert(conn, alert_id)?
        .ok_or_else(|| MonitoringError::NotFound(format!("alert {alert_id}")))?;

    if !alert.status.can_transition_to(next) {
        return Err(MonitoringError::InvalidTransition {
            id: *alert_id,
            from: alert.status.as_str(),
            to: next.as_str(),
        });
    }

    db::update_vital_alert_status(conn, alert_id, next, &now)?;
    tracing::info!(alert_id = %alert_id, status = next.as_str(), "Alert status changed");

    db::get_vital_alert(conn, alert_id)?
        .ok_or_else(|| MonitoringError::NotFound(format!("alert {alert_id}")))
}

fn require_template(conn: &Connection, id: &Uuid) -> Result<VitalTemplate, MonitoringError> {
    db::get_vital_template(conn, id)?
        .ok_or_else(|| MonitoringError::NotFound(format!("vital template {id}")))
}

fn load_history(
    conn: &Connection,
    patient_id: &str,
    template_id: &Uuid,
    window_days: u32,
    now: NaiveDateTime,
) -> Result<Vec<HistoryPoint>, MonitoringError> {
    let since = window_start(now, window_days);
    let readings = db::get_vital_readings_between(conn, patient_id, template_id, &since, &now)?;
    Ok(readings.into_iter().map(to_history_point).collect())
}

fn window_start(now: NaiveDateTime, window_days: u32) -> NaiveDateTime {
    now - Duration::days(i64::from(window_days))
}

fn to_history_point(r: VitalReading) -> HistoryPoint {
    HistoryPoint {
        value: r.value,
        recorded_at: r.recorded_at,
    }
}
