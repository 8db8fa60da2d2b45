use super::alert::{ACTION_EMERGENCY, ACTION_URGENT_CONSULT};
use crate::models::{AlertLevel, VitalKind};

/// Strict comparison against a fixed clinical limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Above(f64),
    Below(f64),
}

impl Threshold {
    pub fn is_crossed_by(self, value: f64) -> bool {
        match self {
            Threshold::Above(limit) => value > limit,
            Threshold::Below(limit) => value < limit,
        }
    }
}

/// A fixed limit for one vital kind, independent of the template's range.
#[derive(Debug, Clone, Copy)]
pub struct OverrideRule {
    pub kind: VitalKind,
    pub threshold: Threshold,
    pub level: AlertLevel,
    pub reason: &'static str,
    pub action: &'static str,
}

// Most severe rule per kind first: only the first match fires.
const RULES: &[OverrideRule] = &[
    OverrideRule {
        kind: VitalKind::BloodPressure,
        threshold: Threshold::Above(180.0),
        level: AlertLevel::Emergency,
        reason: "Hypertensive crisis detected",
        action: ACTION_EMERGENCY,
    },
    OverrideRule {
        kind: VitalKind::HeartRate,
        threshold: Threshold::Above(150.0),
        level: AlertLevel::Emergency,
        reason: "Severe tachycardia detected (heart rate above 150)",
        action: ACTION_EMERGENCY,
    },
    OverrideRule {
        kind: VitalKind::HeartRate,
        threshold: Threshold::Below(40.0),
        level: AlertLevel::Emergency,
        reason: "Severe bradycardia detected (heart rate below 40)",
        action: ACTION_EMERGENCY,
    },
    OverrideRule {
        kind: VitalKind::HeartRate,
        threshold: Threshold::Above(120.0),
        level: AlertLevel::Critical,
        reason: "Tachycardia detected (heart rate above 120)",
        action: ACTION_URGENT_CONSULT,
    },
    OverrideRule {
        kind: VitalKind::HeartRate,
        threshold: Threshold::Below(50.0),
        level: AlertLevel::Critical,
        reason: "Bradycardia detected (heart rate below 50)",
        action: ACTION_URGENT_CONSULT,
    },
];

/// The named-vital rule that fires for this kind and value, if any.
pub fn named_override(kind: VitalKind, value: f64) -> Option<&'static OverrideRule> {
    RULES
        .iter()
        .find(|rule| rule.kind == kind && rule.threshold.is_crossed_by(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blood_pressure_limit_is_strict() {
        assert!(named_override(VitalKind::BloodPressure, 180.0).is_none());
        let rule = named_override(VitalKind::BloodPressure, 180.5).unwrap();
        assert_eq!(rule.level, AlertLevel::Emergency);
    }

    #[test]
    fn heart_rate_tiers() {
        assert!(named_override(VitalKind::HeartRate, 72.0).is_none());
        assert!(named_override(VitalKind::HeartRate, 50.0).is_none());
        assert!(named_override(VitalKind::HeartRate, 120.0).is_none());
        assert_eq!(
            named_override(VitalKind::HeartRate, 121.0).unwrap().level,
            AlertLevel::Critical
        );
        assert_eq!(
            named_override(VitalKind::HeartRate, 151.0).unwrap().level,
            AlertLevel::Emergency
        );
        assert_eq!(
            named_override(VitalKind::HeartRate, 49.0).unwrap().level,
            AlertLevel::Critical
        );
        assert_eq!(
            named_override(VitalKind::HeartRate, 39.0).unwrap().level,
            AlertLevel::Emergency
        );
    }

    #[test]
    fn kinds_without_rules_never_fire() {
        for kind in [VitalKind::Temperature, VitalKind::Weight, VitalKind::Other] {
            assert!(named_override(kind, 10_000.0).is_none());
            assert!(named_override(kind, -10_000.0).is_none());
        }
    }
}
