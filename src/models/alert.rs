use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AlertLevel, AlertStatus};

/// Alert raised for a reading classified above `NORMAL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalAlert {
    pub id: Uuid,
    pub reading_id: Uuid,
    pub patient_id: String,
    pub template_id: Uuid,
    pub alert_level: AlertLevel,
    pub reasons: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub status: AlertStatus,
    pub created_at: NaiveDateTime,
    pub acknowledged_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
}
