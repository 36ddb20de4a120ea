//! Calendar summaries of fitted curves.

use std::io::{self, Write};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{CurveKind, TimeSeries};
use crate::models::CurveModel;

/// Completion fractions reported for every model.
pub const MILESTONES: [f64; 5] = [0.10, 0.25, 0.50, 0.75, 0.95];

/// Date at which a curve reaches a fraction of its plateau.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub fraction: f64,
    /// Day offset from the series start (`-inf` when never reached).
    pub offset: f64,
    pub date: Option<NaiveDate>,
}

/// Derived statistics for one model on one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// `Name(p1, p2, ...)`.
    pub model: String,
    pub kind: CurveKind,
    pub params: Vec<f64>,
    pub std_errors: Option<Vec<f64>>,
    pub peak_offset: f64,
    pub peak: Option<NaiveDate>,
    pub milestones: Vec<Milestone>,
    /// Plateau truncated toward zero.
    pub plateau: i64,
}

impl SummaryReport {
    /// Milestone for `fraction`, if it is one of [`MILESTONES`].
    pub fn milestone(&self, fraction: f64) -> Option<&Milestone> {
        self.milestones
            .iter()
            .find(|m| (m.fraction - fraction).abs() < 1e-12)
    }
}

/// Peak, completion dates and plateau of `model`, dated against `series`.
pub fn summarize(model: &CurveModel, series: &TimeSeries) -> SummaryReport {
    let peak_offset = model.peak();
    let milestones = MILESTONES
        .iter()
        .map(|&fraction| {
            let offset = model.inverse_perc(fraction);
            Milestone {
                fraction,
                offset,
                date: series.date_at_offset(offset),
            }
        })
        .collect();

    SummaryReport {
        model: model.to_string(),
        kind: model.kind(),
        params: model.params(),
        std_errors: model.std_errors(),
        peak_offset,
        peak: series.date_at_offset(peak_offset),
        milestones,
        plateau: model.plateau().trunc() as i64,
    }
}

/// Summarize each model independently and write every report to `out`.
pub fn summarize_all<W: Write>(
    models: &[CurveModel],
    series: &TimeSeries,
    out: &mut W,
) -> io::Result<Vec<SummaryReport>> {
    let mut reports = Vec::with_capacity(models.len());
    for model in models {
        let report = summarize(model, series);
        writeln!(out, "{report}")?;
        reports.push(report);
    }
    Ok(reports)
}
