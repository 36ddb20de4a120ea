//! The capability shared by every growth-curve family.
//!
//! Each family is a small `Copy` struct holding its parameters. The fitter is
//! generic over [`GrowthCurve`], so adding a family means implementing the
//! trait; nothing else dispatches on the concrete type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{CurveKind, FitQuality};
use crate::error::Result;
use crate::fit::{FitOptions, fit_curve};

/// Closed-form growth curve with analytic inverse and derivative.
pub trait GrowthCurve: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Family tag; also fixes the parameter count.
    const KIND: CurveKind;

    /// Curve value at `x`.
    fn compute(&self, x: f64) -> f64;

    /// Solve `y = compute(x)` for `x`.
    ///
    /// Returns `f64::NEG_INFINITY` for `y <= 0`. At the plateau the algebra
    /// diverges to `+inf`; above it the result is NaN.
    fn compute_inverse(&self, y: f64) -> f64;

    /// First derivative of `compute` with respect to `x`.
    fn compute_derivative(&self, x: f64) -> f64;

    /// Asymptotic maximum as `x → ∞`.
    fn plateau(&self) -> f64;

    /// Position of maximum growth rate.
    fn peak(&self) -> f64;

    /// Partial derivatives of `compute(x)` with respect to each parameter, in
    /// [`to_vec`](Self::to_vec) order.
    ///
    /// # Panics
    /// Panics if `out.len()` is smaller than the parameter count.
    fn gradient(&self, x: f64, out: &mut [f64]);

    /// Parameters in declaration order.
    fn to_vec(&self) -> Vec<f64>;

    /// Inverse of [`to_vec`](Self::to_vec).
    ///
    /// # Panics
    /// Panics if `params` is shorter than the parameter count. The fitter
    /// validates lengths before calling this.
    fn from_slice(params: &[f64]) -> Self;

    /// Data-driven starting point for the solver.
    fn initial_guess(x: &[f64], y: &[f64]) -> Self;

    /// Position where the curve reaches `perc` of its plateau.
    fn inverse_perc(&self, perc: f64) -> f64 {
        self.compute_inverse(perc * self.plateau())
    }

    /// Evaluate the curve at every position in `xs`.
    fn compute_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.compute(x)).collect()
    }

    /// Least-squares estimate of this family's parameters.
    fn fit(x: &[f64], y: &[f64], options: &FitOptions) -> Result<FittedCurve<Self>> {
        fit_curve(x, y, options)
    }
}

/// A curve together with what is known about how it was obtained.
///
/// `std_errors` is laid out field-for-field like `params` and is `None` for
/// curves built directly from known parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedCurve<C> {
    pub params: C,
    pub std_errors: Option<C>,
    pub quality: Option<FitQuality>,
}

impl<C: GrowthCurve> FittedCurve<C> {
    /// Wrap known parameters (no uncertainty information).
    pub fn new(params: C) -> Self {
        Self {
            params,
            std_errors: None,
            quality: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.std_errors.is_some()
    }
}

impl<C: GrowthCurve> From<C> for FittedCurve<C> {
    fn from(params: C) -> Self {
        Self::new(params)
    }
}

/// Starting values shared by the sigmoid-shaped families.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SigmoidGuess {
    pub midpoint: f64,
    pub rate: f64,
    pub plateau: f64,
}

/// ln(3): a logistic curve goes from 25% to 75% of its plateau over
/// `2 ln 3 / k`.
const QUARTILE_SPAN: f64 = 2.0 * 1.098_612_288_668_109_8;

/// Heuristic starting point from the data's shape.
///
/// - plateau: 10% above the largest observation
/// - midpoint: first crossing of half the plateau
/// - rate: from the spacing of the 25% and 75% crossings
pub(crate) fn sigmoid_guess(x: &[f64], y: &[f64]) -> SigmoidGuess {
    let (x_min, x_max) = x
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (x_min, x_max) = if x_min.is_finite() && x_max.is_finite() {
        (x_min, x_max)
    } else {
        (0.0, 1.0)
    };
    let x_range = (x_max - x_min).max(1.0);

    let y_max = y
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let plateau = if y_max.is_finite() && y_max > 0.0 {
        y_max * 1.1
    } else {
        1.0
    };

    let midpoint = first_crossing(x, y, 0.5 * plateau).unwrap_or((x_min + x_max) / 2.0);

    let rate = match (
        first_crossing(x, y, 0.25 * plateau),
        first_crossing(x, y, 0.75 * plateau),
    ) {
        (Some(lo), Some(hi)) if hi > lo => QUARTILE_SPAN / (hi - lo),
        _ => 4.0 / x_range,
    };

    SigmoidGuess {
        midpoint,
        rate,
        plateau,
    }
}

/// First position where the observations reach `level`, linearly
/// interpolated between the neighbouring samples.
pub(crate) fn first_crossing(x: &[f64], y: &[f64], level: f64) -> Option<f64> {
    let idx = y.iter().position(|&v| v >= level)?;
    if idx == 0 {
        return x.first().copied();
    }
    let (x0, y0) = (x[idx - 1], y[idx - 1]);
    let (x1, y1) = (x[idx], y[idx]);
    if !(y0.is_finite() && (y1 - y0).abs() > 1e-12) {
        return Some(x1);
    }
    Some(x0 + (level - y0) / (y1 - y0) * (x1 - x0))
}
