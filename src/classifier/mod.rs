//! Vital-sign alert classification and trend detection.
//!
//! Pure functions only: every call works on its own inputs and returns a
//! fresh result. Callers own lookup of templates and history.
//!
//! - `classify`: range checks plus named-vital overrides → `AlertResult`
//! - `compute_trend`: current value vs. windowed history → `TrendResult`

mod alert;
mod overrides;
mod trend;

pub use alert::*;
pub use overrides::{named_override, OverrideRule, Threshold};
pub use trend::*;

use thiserror::Error;

use crate::models::{NormalRange, VitalTemplate};

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Invalid reading value: {0}")]
    InvalidReading(f64),

    #[error("Invalid normal range: {0}")]
    InvalidRange(String),
}

/// Reject values that cannot be classified (NaN, ±∞).
pub fn validate_reading_value(value: f64) -> Result<f64, ClassifierError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ClassifierError::InvalidReading(value))
    }
}

/// Check a template's reference range before it is stored.
///
/// `min == max` is a valid (degenerate) range.
pub fn validate_range(range: &NormalRange) -> Result<(), ClassifierError> {
    for (label, bound) in [("min", range.min), ("max", range.max)] {
        if let Some(b) = bound {
            if !b.is_finite() {
                return Err(ClassifierError::InvalidRange(format!(
                    "{label} bound must be a finite number"
                )));
            }
        }
    }
    if let (Some(min), Some(max)) = (range.min, range.max) {
        if min > max {
            return Err(ClassifierError::InvalidRange(format!(
                "min ({min}) is greater than max ({max})"
            )));
        }
    }
    Ok(())
}

/// Validate the value, then classify it.
pub fn classify_reading(
    value: f64,
    template: &VitalTemplate,
) -> Result<AlertResult, ClassifierError> {
    let value = validate_reading_value(value)?;
    let result = classify(value, template);
    tracing::debug!(
        template = %template.name,
        kind = template.kind.as_str(),
        value,
        level = result.alert_level.as_str(),
        "Reading classified"
    );
    Ok(result)
}
