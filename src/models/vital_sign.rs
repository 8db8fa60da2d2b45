use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ReadingSource, VitalKind};

/// Reference range for a vital. Either bound may be absent ("no limit").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NormalRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// A range with no bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Reference metadata for a category of physiological measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalTemplate {
    pub id: Uuid,
    pub name: String,
    pub kind: VitalKind,
    pub unit: String,
    pub normal_range: NormalRange,
    pub created_at: NaiveDateTime,
}

impl VitalTemplate {
    /// Build a template, resolving the kind from the name when none is given.
    pub fn new(
        name: impl Into<String>,
        kind: Option<VitalKind>,
        unit: impl Into<String>,
        normal_range: NormalRange,
    ) -> Self {
        let name = name.into();
        let kind = kind.unwrap_or_else(|| VitalKind::from_display_name(&name));
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            unit: unit.into(),
            normal_range,
            created_at: crate::db::to_storage_precision(chrono::Local::now().naive_local()),
        }
    }
}

/// A single timestamped observation of a vital for one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalReading {
    pub id: Uuid,
    pub patient_id: String,
    pub template_id: Uuid,
    pub value: f64,
    pub unit: String,
    pub recorded_at: NaiveDateTime,
    pub source: ReadingSource,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}
