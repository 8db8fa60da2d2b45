use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Below this absolute percent change the trend is `STABLE`.
pub const STABLE_PERCENT_THRESHOLD: f64 = 5.0;

/// Fewer samples than this in the window → `INSUFFICIENT_DATA`.
pub const MIN_TREND_SAMPLES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Stable,
    Increasing,
    Decreasing,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "STABLE",
            Self::Increasing => "INCREASING",
            Self::Decreasing => "DECREASING",
            Self::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

/// One historical observation fed into `compute_trend`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub value: f64,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    pub change: f64,
    pub percent_change: f64,
    pub average: f64,
    pub sample_count: usize,
}

impl TrendResult {
    fn insufficient(sample_count: usize) -> Self {
        Self {
            trend: Trend::InsufficientData,
            change: 0.0,
            percent_change: 0.0,
            average: 0.0,
            sample_count,
        }
    }
}

/// Compare `current_value` against the mean of history recorded within
/// `window_days` before `now`. Samples dated after `now` are ignored.
///
/// Non-finite history values are skipped. When the average is exactly zero
/// the percent change is reported as 0 and the direction comes from the
/// sign of the absolute change.
pub fn compute_trend(
    current_value: f64,
    history: &[HistoryPoint],
    window_days: u32,
    now: NaiveDateTime,
) -> TrendResult {
    let cutoff = now - Duration::days(i64::from(window_days));

    let values: Vec<f64> = history
        .iter()
        .filter(|p| (cutoff..=now).contains(&p.recorded_at) && p.value.is_finite())
        .map(|p| p.value)
        .collect();

    if values.len() < MIN_TREND_SAMPLES {
        return TrendResult::insufficient(values.len());
    }

    let average = values.iter().sum::<f64>() / values.len() as f64;
    let change = current_value - average;

    let (trend, percent_change) = if average == 0.0 {
        let trend = if change > 0.0 {
            Trend::Increasing
        } else if change < 0.0 {
            Trend::Decreasing
        } else {
            Trend::Stable
        };
        (trend, 0.0)
    } else {
        let percent_change = change / average * 100.0;
        let trend = if percent_change.abs() < STABLE_PERCENT_THRESHOLD {
            Trend::Stable
        } else if change > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        };
        (trend, percent_change)
    };

    TrendResult {
        trend,
        change: round2(change),
        percent_change: round2(percent_change),
        average: round2(average),
        sample_count: values.len(),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
