//! Text rendering for summaries and fit diagnostics.
//!
//! Formatting lives here so the fitting and analysis code only produces
//! values.

use std::fmt;

use chrono::NaiveDate;

use crate::analysis::SummaryReport;
use crate::fit::FitSelection;

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.model)?;
        if let Some(se) = &self.std_errors {
            writeln!(f, "  std errors: {}", fmt_vec(se))?;
        }
        writeln!(f, "  Peak: {}", fmt_date(self.peak))?;
        for m in &self.milestones {
            writeln!(
                f,
                "  {}% done: {}",
                (m.fraction * 100.0).round() as i64,
                fmt_date(m.date)
            )?;
        }
        write!(f, "  Plateau: {}", self.plateau)
    }
}

/// One line per fitted family (best marked with `*`), then skipped families.
pub fn format_selection(selection: &FitSelection) -> String {
    let mut out = String::new();

    out.push_str("Model diagnostics:\n");
    for (i, model) in selection.fits.iter().enumerate() {
        let chosen = if i == 0 { "*" } else { " " };
        match model.quality() {
            Some(q) => out.push_str(&format!(
                "{chosen} {:<20} SSE={:.3} RMSE={:.3} BIC={:.3}\n",
                model.name(),
                q.sse,
                q.rmse,
                q.bic
            )),
            None => out.push_str(&format!("{chosen} {:<20} (unfitted)\n", model.name())),
        }
    }
    for (kind, reason) in &selection.skipped {
        out.push_str(&format!("  (skipped {kind}) {reason}\n"));
    }

    out
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::summarize;
    use crate::domain::{CurveKind, FitQuality, TimeSeries};
    use crate::error::CurveError;
    use crate::models::{CurveModel, FittedCurve, Logistic};

    #[test]
    fn summary_lines() {
        let start = NaiveDate::from_ymd_opt(2020, 2, 24).unwrap();
        let series = TimeSeries::daily("totale_casi", start, vec![0.0; 10]).unwrap();
        let fitted = FittedCurve {
            params: Logistic::new(50.0, 0.2, 1000.0),
            std_errors: Some(Logistic::new(0.5, 0.01, 3.0)),
            quality: None,
        };
        let text = summarize(&CurveModel::from(fitted), &series).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Logistic(50, 0.2, 1000)");
        assert_eq!(lines[1], "  std errors: [0.500000, 0.010000, 3.000000]");
        assert_eq!(lines[2], "  Peak: 2020-04-14");
        assert_eq!(lines[3], "  10% done: 2020-04-03");
        assert_eq!(lines[5], "  50% done: 2020-04-14");
        assert_eq!(lines[8], "  Plateau: 1000");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn unreachable_dates_render_as_dash() {
        assert_eq!(fmt_date(None), "-");
    }

    #[test]
    fn selection_marks_best() {
        let quality = Some(FitQuality::new(4.0, 10, 3, 12));
        let best = CurveModel::from(FittedCurve {
            params: Logistic::new(5.0, 1.0, 10.0),
            std_errors: None,
            quality,
        });
        let selection = FitSelection {
            fits: vec![best],
            skipped: vec![(
                CurveKind::GeneralizedLogistic,
                CurveError::InsufficientData { needed: 9, got: 8 },
            )],
        };

        let text = format_selection(&selection);
        assert!(text.contains("* Logistic"));
        assert!(text.contains("RMSE=0.632"));
        assert!(text.contains("(skipped GeneralizedLogistic)"));
    }
}
