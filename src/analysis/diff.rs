//! First and second differences of a cumulative series.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::TimeSeries;

/// Observation with its first and second positional differences.
///
/// The first row has no `diff1`; the first two have no `diff2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifferencedPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub diff1: Option<f64>,
    pub diff2: Option<f64>,
}

/// Differences between consecutive observations (new cases from cumulative
/// totals, then their change).
pub fn differentiate(series: &TimeSeries) -> Vec<DifferencedPoint> {
    let values = series.values();
    let diff1: Vec<Option<f64>> = (0..values.len())
        .map(|i| i.checked_sub(1).map(|j| values[i] - values[j]))
        .collect();

    series
        .iter()
        .enumerate()
        .map(|(i, (date, value))| DifferencedPoint {
            date,
            value,
            diff1: diff1[i],
            diff2: match (diff1[i], i.checked_sub(1).and_then(|j| diff1[j])) {
                (Some(cur), Some(prev)) => Some(cur - prev),
                _ => None,
            },
        })
        .collect()
}
