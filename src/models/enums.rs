use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(VitalKind {
    BloodPressure => "blood_pressure",
    HeartRate => "heart_rate",
    Temperature => "temperature",
    OxygenSaturation => "oxygen_saturation",
    BloodGlucose => "blood_glucose",
    RespiratoryRate => "respiratory_rate",
    Weight => "weight",
    Other => "other",
});

str_enum!(ReadingSource {
    Manual => "manual",
    Device => "device",
    Clinician => "clinician",
});

str_enum!(AlertStatus {
    Active => "active",
    Acknowledged => "acknowledged",
    Resolved => "resolved",
});

impl VitalKind {
    /// Resolve a kind from a human-readable template name.
    ///
    /// Only used at the data boundary when a template arrives without an
    /// explicit kind. Matching is case-insensitive on substrings; the first
    /// pattern found wins. Bare "pulse" does not match: pulse oximetry and
    /// pulse pressure are not heart rates.
    pub fn from_display_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        const PATTERNS: &[(&str, VitalKind)] = &[
            ("oxygen", VitalKind::OxygenSaturation),
            ("oximetry", VitalKind::OxygenSaturation),
            ("spo2", VitalKind::OxygenSaturation),
            ("blood pressure", VitalKind::BloodPressure),
            ("heart rate", VitalKind::HeartRate),
            ("temperature", VitalKind::Temperature),
            ("glucose", VitalKind::BloodGlucose),
            ("respiratory", VitalKind::RespiratoryRate),
            ("weight", VitalKind::Weight),
        ];
        PATTERNS
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|(_, kind)| *kind)
            .unwrap_or(VitalKind::Other)
    }
}

impl AlertStatus {
    /// Whether an alert in this status may move to `next`.
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Active, AlertStatus::Acknowledged)
                | (AlertStatus::Active, AlertStatus::Resolved)
                | (AlertStatus::Acknowledged, AlertStatus::Resolved)
        )
    }
}

/// Ordered severity assigned to a reading.
///
/// Declaration order is the escalation order, so `Ord` compares severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
    Emergency,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Emergency => "EMERGENCY",
        }
    }
}

impl std::str::FromStr for AlertLevel {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(Self::Normal),
            "WARNING" => Ok(Self::Warning),
            "CRITICAL" => Ok(Self::Critical),
            "EMERGENCY" => Ok(Self::Emergency),
            _ => Err(DatabaseError::InvalidEnum {
                field: "AlertLevel".into(),
                value: s.into(),
            }),
        }
    }
}
