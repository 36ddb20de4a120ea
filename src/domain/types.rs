//! Shared domain types.
//!
//! These types are kept lightweight and serializable so results can be handed
//! to downstream plotting or export code without conversion.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, Result};

/// Growth-curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurveKind {
    Logistic,
    Gompertz,
    GeneralizedLogistic,
}

impl CurveKind {
    pub const ALL: [CurveKind; 3] = [
        CurveKind::Logistic,
        CurveKind::Gompertz,
        CurveKind::GeneralizedLogistic,
    ];

    /// Name used for report headers and table columns.
    pub fn name(self) -> &'static str {
        match self {
            CurveKind::Logistic => "Logistic",
            CurveKind::Gompertz => "Gompertz",
            CurveKind::GeneralizedLogistic => "GeneralizedLogistic",
        }
    }

    /// Number of fitted parameters.
    pub fn param_count(self) -> usize {
        match self {
            CurveKind::Logistic => 3,
            CurveKind::Gompertz => 3,
            CurveKind::GeneralizedLogistic => 4,
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    /// `n · ln(SSE/n) + p · ln(n)`; lower is better.
    pub bic: f64,
    pub n: usize,
    /// Residual evaluations spent by the solver.
    pub evaluations: usize,
}

impl FitQuality {
    pub fn new(sse: f64, n: usize, param_count: usize, evaluations: usize) -> Self {
        let nf = n as f64;
        let rmse = (sse / nf).sqrt();
        let bic = nf * (sse / nf).ln() + param_count as f64 * nf.ln();
        Self {
            sse,
            rmse,
            bic,
            n,
            evaluations,
        }
    }
}

/// A named daily series of observations.
///
/// Dates are strictly increasing but need not be contiguous. Positions on a
/// fitted curve are expressed as day offsets from the first date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series from `(date, value)` pairs.
    pub fn new(
        name: impl Into<String>,
        points: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Result<Self> {
        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = points.into_iter().unzip();
        Self::from_parts(name, dates, values)
    }

    /// Build a series from parallel date and value vectors.
    pub fn from_parts(
        name: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(CurveError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        if dates.is_empty() {
            return Err(CurveError::EmptySeries);
        }
        if let Some(pos) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CurveError::NonMonotonicDates { index: pos + 1 });
        }

        Ok(Self {
            name: name.into(),
            dates,
            values,
        })
    }

    /// Build a contiguous daily series starting at `start`.
    pub fn daily(name: impl Into<String>, start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        let dates = start
            .iter_days()
            .take(values.len())
            .collect::<Vec<_>>();
        Self::from_parts(name, dates, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Iterate `(date, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Observed value on `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Whole days from the first date to `date` (negative before the start).
    pub fn offset_of(&self, date: NaiveDate) -> i64 {
        (date - self.first_date()).num_days()
    }

    /// Day offsets of every observation; this is the x-axis used for fitting.
    pub fn offsets(&self) -> Vec<f64> {
        self.dates
            .iter()
            .map(|&d| self.offset_of(d) as f64)
            .collect()
    }

    /// Calendar date for a curve position.
    ///
    /// The offset is truncated toward zero. Non-finite offsets (e.g. the
    /// `-inf` returned by an inverse below zero) and dates outside the
    /// calendar range yield `None`.
    pub fn date_at_offset(&self, offset: f64) -> Option<NaiveDate> {
        if !offset.is_finite() {
            return None;
        }
        let days = offset.trunc() as i64;
        let first = self.first_date();
        if days >= 0 {
            first.checked_add_days(Days::new(days as u64))
        } else {
            first.checked_sub_days(Days::new(days.unsigned_abs()))
        }
    }
}
