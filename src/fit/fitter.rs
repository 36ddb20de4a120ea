//! Nonlinear least-squares fitting for a single curve family.
//!
//! Given observations `(x_i, y_i)` we minimize
//!
//! ```text
//! Σ (y_i - f(x_i; p))^2
//! ```
//!
//! over the family's parameters `p` with Levenberg–Marquardt, using the
//! analytic parameter gradient of `f` for the Jacobian. Uncertainties come
//! from the covariance `(JᵀJ)⁻¹ · SSE / (n - p)` at the solution.

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{DMatrix, DVector, Dyn, Owned};
use serde::{Deserialize, Serialize};

use crate::domain::{CurveKind, FitQuality, TimeSeries};
use crate::error::{CurveError, Result};
use crate::math::{parameter_covariance, standard_errors};
use crate::models::{FittedCurve, GrowthCurve};

/// Solver knobs, passed through to the optimizer.
///
/// Only vector lengths are checked against the family's parameter count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Starting parameters in the family's `to_vec` order. When absent a guess
    /// is derived from the data.
    pub initial_guess: Option<Vec<f64>>,
    /// Inclusive `(lower, upper)` box per parameter. Trial points are
    /// projected onto the box.
    pub bounds: Option<Vec<(f64, f64)>>,
    /// Evaluation budget factor: at most `patience · (p + 1)` evaluations.
    pub patience: usize,
    /// Relative reduction in the sum of squares considered converged.
    pub ftol: f64,
    /// Relative change in the parameters considered converged.
    pub xtol: f64,
    /// Orthogonality between residuals and Jacobian columns considered
    /// converged.
    pub gtol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            initial_guess: None,
            bounds: None,
            patience: 100,
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: f64::EPSILON,
        }
    }
}

impl FitOptions {
    pub fn with_initial_guess(mut self, guess: Vec<f64>) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    pub fn with_bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// Same solver tolerances without the family-specific vectors.
    pub fn solver_only(&self) -> Self {
        Self {
            initial_guess: None,
            bounds: None,
            ..self.clone()
        }
    }
}

/// Fit a curve family to `(x, y)`.
pub fn fit_curve<C: GrowthCurve>(
    x: &[f64],
    y: &[f64],
    options: &FitOptions,
) -> Result<FittedCurve<C>> {
    let kind = C::KIND;
    let p = kind.param_count();
    let n = x.len();

    if y.len() != n {
        return Err(CurveError::DimensionMismatch {
            expected: n,
            got: y.len(),
        });
    }
    if n <= p {
        return Err(CurveError::InsufficientData {
            needed: p + 1,
            got: n,
        });
    }

    let bounds = match &options.bounds {
        Some(b) => Some(validate_bounds(b, p)?),
        None => None,
    };

    let start = match &options.initial_guess {
        Some(guess) if guess.len() != p => {
            return Err(CurveError::DimensionMismatch {
                expected: p,
                got: guess.len(),
            });
        }
        Some(guess) => C::from_slice(guess),
        None => C::initial_guess(x, y),
    };

    let mut problem = CurveProblem::<C> {
        params: start,
        bounds,
        x: x.to_vec(),
        y: y.to_vec(),
    };
    problem.set_params(&DVector::from_vec(start.to_vec()));

    log::debug!("fitting {kind} to {n} points from {:?}", problem.params);

    let (problem, report) = LevenbergMarquardt::new()
        .with_ftol(options.ftol)
        .with_xtol(options.xtol)
        .with_gtol(options.gtol)
        .with_patience(options.patience)
        .minimize(problem);

    if !report.termination.was_successful() {
        log::warn!(
            "{kind} fit stopped after {} evaluations: {:?}",
            report.number_of_evaluations,
            report.termination
        );
        return Err(CurveError::FitConvergence {
            kind,
            reason: format!("{:?}", report.termination),
        });
    }

    let params = problem.params;
    if params.to_vec().iter().any(|v| !v.is_finite()) {
        return Err(CurveError::FitConvergence {
            kind,
            reason: "non-finite parameters".to_string(),
        });
    }

    let sse = problem
        .sum_of_squares()
        .ok_or_else(|| CurveError::FitConvergence {
            kind,
            reason: "non-finite residuals at solution".to_string(),
        })?;

    let jacobian = problem.model_jacobian();
    let cov = parameter_covariance(&jacobian, sse)
        .ok_or(CurveError::SingularCovariance { kind })?;
    let sigmas = standard_errors(&cov).ok_or(CurveError::SingularCovariance { kind })?;

    let quality = FitQuality::new(sse, n, p, report.number_of_evaluations);
    log::debug!(
        "{kind} fit converged: params={params:?} sigmas={sigmas:?} sse={sse:.6} evals={}",
        report.number_of_evaluations
    );

    Ok(FittedCurve {
        params,
        std_errors: Some(C::from_slice(&sigmas)),
        quality: Some(quality),
    })
}

/// Fit a curve family to a series, using day offsets as `x`.
pub fn fit_series<C: GrowthCurve>(
    series: &TimeSeries,
    options: &FitOptions,
) -> Result<FittedCurve<C>> {
    fit_curve(&series.offsets(), series.values(), options)
}

fn validate_bounds(bounds: &[(f64, f64)], p: usize) -> Result<Vec<(f64, f64)>> {
    if bounds.len() != p {
        return Err(CurveError::DimensionMismatch {
            expected: p,
            got: bounds.len(),
        });
    }
    if let Some((lo, hi)) = bounds.iter().find(|(lo, hi)| !(lo <= hi)) {
        return Err(CurveError::InvalidParameter(format!(
            "bound lower {lo} exceeds upper {hi}"
        )));
    }
    Ok(bounds.to_vec())
}

/// Least-squares problem for one curve family.
///
/// Residuals are `y_i - f(x_i)`, so the Jacobian is the negated parameter
/// gradient of the curve.
struct CurveProblem<C> {
    params: C,
    bounds: Option<Vec<(f64, f64)>>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl<C: GrowthCurve> CurveProblem<C> {
    fn sum_of_squares(&self) -> Option<f64> {
        let sse: f64 = self
            .x
            .iter()
            .zip(&self.y)
            .map(|(&xi, &yi)| {
                let r = yi - self.params.compute(xi);
                r * r
            })
            .sum();
        sse.is_finite().then_some(sse)
    }

    /// `∂f(x_i)/∂p_j` for every observation.
    fn model_jacobian(&self) -> DMatrix<f64> {
        let p = C::KIND.param_count();
        let mut jac = DMatrix::<f64>::zeros(self.x.len(), p);
        let mut row = vec![0.0; p];
        for (i, &xi) in self.x.iter().enumerate() {
            self.params.gradient(xi, &mut row);
            for (j, &g) in row.iter().enumerate() {
                jac[(i, j)] = g;
            }
        }
        jac
    }
}

impl<C: GrowthCurve> LeastSquaresProblem<f64, Dyn, Dyn> for CurveProblem<C> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, p: &DVector<f64>) {
        let mut values: Vec<f64> = p.iter().copied().collect();
        if let Some(bounds) = &self.bounds {
            for (v, &(lo, hi)) in values.iter_mut().zip(bounds) {
                *v = v.clamp(lo, hi);
            }
        }
        self.params = C::from_slice(&values);
    }

    fn params(&self) -> DVector<f64> {
        DVector::from_vec(self.params.to_vec())
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        let r = DVector::from_iterator(
            self.x.len(),
            self.x
                .iter()
                .zip(&self.y)
                .map(|(&xi, &yi)| yi - self.params.compute(xi)),
        );
        r.iter().all(|v| v.is_finite()).then_some(r)
    }

    fn jacobian(&self) -> Option<DMatrix<f64>> {
        let jac = -self.model_jacobian();
        jac.iter().all(|v| v.is_finite()).then_some(jac)
    }
}
