use serde::{Deserialize, Serialize};

use super::overrides::named_override;
use crate::models::{AlertLevel, VitalTemplate};

/// Below `min * 0.8` a low reading is critical rather than a warning.
pub const SIGNIFICANT_LOW_FACTOR: f64 = 0.8;
/// Above `max * 1.2` a high reading is critical rather than a warning.
pub const SIGNIFICANT_HIGH_FACTOR: f64 = 1.2;

pub const ACTION_MONITOR: &str = "Monitor closely and consult provider";
pub const ACTION_URGENT_CONSULT: &str = "Seek immediate medical consultation";
pub const ACTION_EMERGENCY: &str = "Seek emergency care immediately";

/// Classification of a single reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertResult {
    pub alert_level: AlertLevel,
    /// In the order the rules fired. Not de-duplicated.
    pub reasons: Vec<String>,
    /// In the order the rules fired. Not de-duplicated.
    pub recommended_actions: Vec<String>,
}

impl AlertResult {
    pub fn normal() -> Self {
        Self {
            alert_level: AlertLevel::Normal,
            reasons: Vec::new(),
            recommended_actions: Vec::new(),
        }
    }

    pub fn is_normal(&self) -> bool {
        self.alert_level == AlertLevel::Normal
    }

    /// Raise the level to at least `level` and record why.
    /// Never lowers the current level.
    pub fn escalate(&mut self, level: AlertLevel, reason: impl Into<String>, action: &str) {
        self.alert_level = self.alert_level.max(level);
        self.reasons.push(reason.into());
        self.recommended_actions.push(action.to_string());
    }
}

impl Default for AlertResult {
    fn default() -> Self {
        Self::normal()
    }
}

/// Classify a reading against its template.
///
/// Range checks run first (lower, then upper), then the named-vital
/// override for the template's kind. Each step can only raise the level.
pub fn classify(value: f64, template: &VitalTemplate) -> AlertResult {
    let mut result = AlertResult::normal();
    let unit = template.unit.as_str();

    if let Some(min) = template.normal_range.min {
        if value < min {
            if value < min * SIGNIFICANT_LOW_FACTOR {
                result.escalate(
                    AlertLevel::Critical,
                    format!("Value significantly below normal range (min {min} {unit})"),
                    ACTION_URGENT_CONSULT,
                );
            } else {
                result.escalate(
                    AlertLevel::Warning,
                    format!("Value below normal range (min {min} {unit})"),
                    ACTION_MONITOR,
                );
            }
        }
    }

    if let Some(max) = template.normal_range.max {
        if value > max {
            if value > max * SIGNIFICANT_HIGH_FACTOR {
                result.escalate(
                    AlertLevel::Critical,
                    format!("Value significantly above normal range (max {max} {unit})"),
                    ACTION_URGENT_CONSULT,
                );
            } else {
                result.escalate(
                    AlertLevel::Warning,
                    format!("Value above normal range (max {max} {unit})"),
                    ACTION_MONITOR,
                );
            }
        }
    }

    if let Some(rule) = named_override(template.kind, value) {
        result.escalate(rule.level, rule.reason, rule.action);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NormalRange, VitalKind};

    fn template(name: &str, unit: &str, min: Option<f64>, max: Option<f64>) -> VitalTemplate {
        VitalTemplate::new(name, None, unit, NormalRange::new(min, max))
    }

    fn glucose() -> VitalTemplate {
        template("Blood Glucose", "mg/dL", Some(70.0), Some(140.0))
    }

    #[test]
    fn in_range_value_is_normal_with_no_reasons() {
        for value in [70.0, 100.0, 140.0] {
            let result = classify(value, &glucose());
            assert_eq!(result, AlertResult::normal(), "value {value}");
        }
    }

    #[test]
    fn slightly_low_is_warning() {
        let result = classify(65.0, &glucose());
        assert_eq!(result.alert_level, AlertLevel::Warning);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].starts_with("Value below normal range"));
        assert_eq!(result.recommended_actions, vec![ACTION_MONITOR.to_string()]);
    }

    #[test]
    fn far_below_min_is_critical() {
        // 70 * 0.8 = 56
        let result = classify(55.0, &glucose());
        assert_eq!(result.alert_level, AlertLevel::Critical);
        assert!(result.reasons[0].contains("significantly below"));
        assert_eq!(result.recommended_actions[0], ACTION_URGENT_CONSULT);
    }

    #[test]
    fn boundary_of_low_factor_is_still_warning() {
        // exactly min * 0.8 is not "below" it
        let result = classify(56.0, &glucose());
        assert_eq!(result.alert_level, AlertLevel::Warning);
    }

    #[test]
    fn high_side_mirrors_low_side() {
        let warning = classify(150.0, &glucose());
        assert_eq!(warning.alert_level, AlertLevel::Warning);
        assert!(warning.reasons[0].starts_with("Value above normal range"));

        // 140 * 1.2 = 168
        let critical = classify(170.0, &glucose());
        assert_eq!(critical.alert_level, AlertLevel::Critical);
        assert!(critical.reasons[0].contains("significantly above"));
    }

    #[test]
    fn no_bounds_and_no_override_is_always_normal() {
        let weight = template("Weight", "kg", None, None);
        for value in [-10.0, 0.0, 500.0] {
            assert_eq!(classify(value, &weight), AlertResult::normal());
        }
    }

    #[test]
    fn missing_lower_bound_skips_low_check() {
        let t = template("Cholesterol", "mg/dL", None, Some(200.0));
        assert!(classify(0.0, &t).is_normal());
        assert_eq!(classify(210.0, &t).alert_level, AlertLevel::Warning);
    }

    #[test]
    fn degenerate_range_follows_plain_arithmetic() {
        let t = template("Calibration", "u", Some(10.0), Some(10.0));
        assert!(classify(10.0, &t).is_normal());
        assert_eq!(classify(9.0, &t).alert_level, AlertLevel::Warning);
        assert_eq!(classify(7.0, &t).alert_level, AlertLevel::Critical);
        assert_eq!(classify(11.0, &t).alert_level, AlertLevel::Warning);
        assert_eq!(classify(13.0, &t).alert_level, AlertLevel::Critical);
    }

    #[test]
    fn heart_rate_tachycardia_is_critical() {
        let hr = template("Heart Rate", "bpm", Some(60.0), Some(100.0));
        let result = classify(125.0, &hr);
        assert_eq!(result.alert_level, AlertLevel::Critical);
        assert!(result.reasons.iter().any(|r| r.contains("Tachycardia")));
    }

    #[test]
    fn heart_rate_above_150_is_emergency() {
        let hr = template("Heart Rate", "bpm", Some(60.0), Some(100.0));
        let result = classify(155.0, &hr);
        assert_eq!(result.alert_level, AlertLevel::Emergency);
        assert!(result
            .reasons
            .iter()
            .any(|r| r.to_lowercase().contains("tachycardia")));
    }

    #[test]
    fn heart_rate_low_side_reports_bradycardia() {
        let hr = template("Heart Rate", "bpm", Some(60.0), Some(100.0));
        let critical = classify(45.0, &hr);
        assert_eq!(critical.alert_level, AlertLevel::Critical);
        assert!(critical.reasons.iter().any(|r| r.contains("Bradycardia")));

        let emergency = classify(35.0, &hr);
        assert_eq!(emergency.alert_level, AlertLevel::Emergency);
    }

    #[test]
    fn heart_rate_low_boundaries_by_resolved_name() {
        let hr = template("Resting heart rate (clinic)", "bpm", Some(60.0), Some(100.0));
        assert_eq!(hr.kind, VitalKind::HeartRate);

        let at_50 = classify(50.0, &hr);
        assert_eq!(at_50.alert_level, AlertLevel::Warning);
        assert!(!at_50.reasons.iter().any(|r| r.contains("radycardia")));

        let below_50 = classify(49.0, &hr);
        assert_eq!(below_50.alert_level, AlertLevel::Critical);
        assert!(below_50.reasons.iter().any(|r| r.starts_with("Bradycardia")));

        assert_eq!(classify(40.0, &hr).alert_level, AlertLevel::Critical);
        assert_eq!(classify(39.0, &hr).alert_level, AlertLevel::Emergency);
    }

    #[test]
    fn pulse_oximetry_gets_no_heart_rate_override() {
        let spo2 = template("Pulse Oximetry", "%", Some(95.0), Some(100.0));
        assert_eq!(spo2.kind, VitalKind::OxygenSaturation);

        let result = classify(35.0, &spo2);
        assert_eq!(result.alert_level, AlertLevel::Critical);
        assert_eq!(
            result.reasons,
            vec!["Value significantly below normal range (min 95 %)".to_string()]
        );
    }

    #[test]
    fn hypertensive_crisis_overrides_range() {
        let bp = template("Blood Pressure", "mmHg", Some(90.0), Some(120.0));
        let result = classify(190.0, &bp);
        assert_eq!(result.alert_level, AlertLevel::Emergency);
        assert!(result.reasons.contains(&"Hypertensive crisis detected".to_string()));
        // range rule fired first, override appended after it
        assert_eq!(result.reasons.len(), 2);
        assert_eq!(result.recommended_actions[1], ACTION_EMERGENCY);
    }

    #[test]
    fn blood_pressure_185_is_emergency_for_any_range() {
        for (min, max) in [
            (Some(90.0), Some(120.0)),
            (None, None),
            (Some(100.0), Some(300.0)),
            (Some(185.0), Some(185.0)),
        ] {
            let bp = template("Blood Pressure", "mmHg", min, max);
            assert_eq!(
                classify(185.0, &bp).alert_level,
                AlertLevel::Emergency,
                "range {min:?}..{max:?}"
            );
        }
    }

    #[test]
    fn override_is_keyed_by_kind_not_name() {
        let renamed = VitalTemplate::new(
            "Systolic (arm cuff)",
            Some(VitalKind::BloodPressure),
            "mmHg",
            NormalRange::new(Some(90.0), Some(120.0)),
        );
        assert_eq!(classify(185.0, &renamed).alert_level, AlertLevel::Emergency);
    }

    #[test]
    fn level_is_monotonic_in_deviation() {
        let t = template("Respiratory Rate", "breaths/min", Some(12.0), Some(20.0));
        let mut previous = AlertLevel::Normal;
        let mut value = 20.0;
        while value < 60.0 {
            let level = classify(value, &t).alert_level;
            assert!(level >= previous, "level dropped at {value}");
            previous = level;
            value += 0.5;
        }

        let mut previous = AlertLevel::Normal;
        let mut value = 12.0;
        while value > 0.0 {
            let level = classify(value, &t).alert_level;
            assert!(level >= previous, "level dropped at {value}");
            previous = level;
            value -= 0.5;
        }
    }

    #[test]
    fn reasons_are_not_deduplicated() {
        let hr = template("Heart Rate", "bpm", Some(60.0), Some(100.0));
        // 130 > 100 * 1.2 and > 120: range rule and override both fire
        let result = classify(130.0, &hr);
        assert_eq!(result.reasons.len(), 2);
        assert_eq!(
            result.recommended_actions,
            vec![ACTION_URGENT_CONSULT.to_string(), ACTION_URGENT_CONSULT.to_string()]
        );
    }

    #[test]
    fn escalate_never_lowers() {
        let mut result = AlertResult::normal();
        result.escalate(AlertLevel::Critical, "a", ACTION_URGENT_CONSULT);
        result.escalate(AlertLevel::Warning, "b", ACTION_MONITOR);
        assert_eq!(result.alert_level, AlertLevel::Critical);
        assert_eq!(result.reasons, vec!["a".to_string(), "b".to_string()]);
    }
}
