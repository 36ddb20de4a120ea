//! Fit several curve families and rank them by BIC.
//!
//! For each requested family we fit and compute:
//! - SSE / RMSE
//! - BIC = n * ln(SSE/n) + k * ln(n)
//!
//! Selection rules:
//! 1. Skip underdetermined families: require `n >= k + 5`
//! 2. Rank the successful fits by BIC
//! 3. If ΔBIC < 2 between the best and a family with fewer parameters, prefer
//!    the simpler family

use crate::domain::{CurveKind, TimeSeries};
use crate::error::{CurveError, Result};
use crate::fit::FitOptions;
use crate::models::CurveModel;

/// Minimum number of extra observations beyond parameter count.
const MIN_N_BUFFER: usize = 5;

/// BIC difference below which two fits are considered equivalent.
const BIC_TIE: f64 = 2.0;

/// Output of fitting several families.
#[derive(Debug, Clone)]
pub struct FitSelection {
    /// Successful fits, best first.
    pub fits: Vec<CurveModel>,
    /// Families that were skipped or failed, and why.
    pub skipped: Vec<(CurveKind, CurveError)>,
}

impl FitSelection {
    /// Preferred model.
    ///
    /// Panics if `fits` is empty; [`fit_all`] never returns an empty selection.
    pub fn best(&self) -> &CurveModel {
        &self.fits[0]
    }
}

/// Fit every family in `kinds` to `(x, y)`.
///
/// Initial guesses and bounds are family specific, so only the solver
/// tolerances of `options` are applied here. Fails only if no family could
/// be fitted.
pub fn fit_all(
    kinds: &[CurveKind],
    x: &[f64],
    y: &[f64],
    options: &FitOptions,
) -> Result<FitSelection> {
    let n = x.len();
    let options = options.solver_only();

    let mut fits = Vec::new();
    let mut skipped = Vec::new();

    for &kind in kinds {
        let k = kind.param_count();
        if n < k + MIN_N_BUFFER {
            log::warn!("skipping {kind}: n={n} < k+{MIN_N_BUFFER}");
            skipped.push((
                kind,
                CurveError::InsufficientData {
                    needed: k + MIN_N_BUFFER,
                    got: n,
                },
            ));
            continue;
        }

        match CurveModel::fit(kind, x, y, &options) {
            Ok(model) => fits.push(model),
            Err(err) => {
                log::warn!("skipping {kind}: {err}");
                skipped.push((kind, err));
            }
        }
    }

    if fits.is_empty() {
        return Err(match skipped.pop() {
            Some((_, err)) => err,
            None => CurveError::InvalidParameter("no curve families requested".to_string()),
        });
    }

    rank_by_bic(&mut fits);
    Ok(FitSelection { fits, skipped })
}

/// [`fit_all`] against a series, using day offsets as `x`.
pub fn fit_all_series(
    kinds: &[CurveKind],
    series: &TimeSeries,
    options: &FitOptions,
) -> Result<FitSelection> {
    fit_all(kinds, &series.offsets(), series.values(), options)
}

fn bic(model: &CurveModel) -> f64 {
    model.quality().map(|q| q.bic).unwrap_or(f64::INFINITY)
}

/// Sort by BIC, then move a simpler near-tie to the front.
fn rank_by_bic(fits: &mut [CurveModel]) {
    fits.sort_by(|a, b| bic(a).partial_cmp(&bic(b)).unwrap_or(std::cmp::Ordering::Equal));

    let Some(best) = fits.first() else {
        return;
    };
    let best_bic = bic(best);
    let best_k = best.kind().param_count();

    let simpler = fits
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, m)| m.kind().param_count() < best_k && bic(m) - best_bic < BIC_TIE)
        .min_by(|(_, a), (_, b)| bic(a).partial_cmp(&bic(b)).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx);

    if let Some(idx) = simpler {
        fits[..=idx].rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneralizedLogistic, GrowthCurve, Logistic};

    fn grid() -> Vec<f64> {
        (0..=100).map(f64::from).collect()
    }

    #[test]
    fn prefers_simpler_family_on_logistic_data() {
        let truth = Logistic::new(50.0, 0.2, 1000.0);
        let x = grid();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| truth.compute(xi) + 2.0 * ((i as f64) * 0.9).cos())
            .collect();

        let selection = fit_all(
            &[CurveKind::GeneralizedLogistic, CurveKind::Logistic],
            &x,
            &y,
            &FitOptions::default(),
        )
        .unwrap();

        assert_eq!(selection.best().kind(), CurveKind::Logistic);
        assert_eq!(selection.fits.len() + selection.skipped.len(), 2);
    }

    #[test]
    fn underdetermined_families_are_skipped() {
        let truth = GeneralizedLogistic::new(3.0, 1.0, 10.0, 1.0);
        let x: Vec<f64> = (0..8).map(f64::from).collect();
        let y = truth.compute_many(&x);

        let selection = fit_all(
            &[CurveKind::GeneralizedLogistic, CurveKind::Logistic],
            &x,
            &y,
            &FitOptions::default(),
        )
        .unwrap();

        assert_eq!(selection.fits.len(), 1);
        assert_eq!(selection.best().kind(), CurveKind::Logistic);
        assert_eq!(
            selection.skipped,
            vec![(
                CurveKind::GeneralizedLogistic,
                CurveError::InsufficientData { needed: 9, got: 8 }
            )]
        );
    }

    #[test]
    fn fails_when_nothing_fits() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        let err = fit_all(&CurveKind::ALL, &x, &y, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, CurveError::InsufficientData { .. }));
    }

    #[test]
    fn tie_rule_moves_simpler_model_forward() {
        use crate::domain::FitQuality;
        use crate::models::FittedCurve;

        let with_bic = |model: CurveModel, bic: f64| -> CurveModel {
            let quality = Some(FitQuality {
                sse: 1.0,
                rmse: 1.0,
                bic,
                n: 10,
                evaluations: 1,
            });
            match model {
                CurveModel::Logistic(c) => CurveModel::Logistic(FittedCurve { quality, ..c }),
                CurveModel::GeneralizedLogistic(c) => {
                    CurveModel::GeneralizedLogistic(FittedCurve { quality, ..c })
                }
                other => other,
            }
        };

        let mut fits = vec![
            with_bic(Logistic::new(1.0, 1.0, 1.0).into(), 11.0),
            with_bic(GeneralizedLogistic::new(1.0, 1.0, 1.0, 1.0).into(), 10.0),
        ];
        rank_by_bic(&mut fits);
        assert_eq!(fits[0].kind(), CurveKind::Logistic);

        let mut fits = vec![
            with_bic(Logistic::new(1.0, 1.0, 1.0).into(), 15.0),
            with_bic(GeneralizedLogistic::new(1.0, 1.0, 1.0, 1.0).into(), 10.0),
        ];
        rank_by_bic(&mut fits);
        assert_eq!(fits[0].kind(), CurveKind::GeneralizedLogistic);
    }
}
