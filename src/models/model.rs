//! `CurveModel`: any fitted curve, whatever its family.
//!
//! Analysis code works on collections of models from different families, so
//! this enum forwards every [`GrowthCurve`] operation to the variant it holds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{CurveKind, FitQuality};
use crate::error::Result;
use crate::fit::FitOptions;
use crate::models::{FittedCurve, GeneralizedLogistic, Gompertz, GrowthCurve, Logistic};

/// A curve of one of the supported families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CurveModel {
    Logistic(FittedCurve<Logistic>),
    Gompertz(FittedCurve<Gompertz>),
    GeneralizedLogistic(FittedCurve<GeneralizedLogistic>),
}

macro_rules! with_curve {
    ($model:expr, $fitted:ident => $body:expr) => {
        match $model {
            CurveModel::Logistic($fitted) => $body,
            CurveModel::Gompertz($fitted) => $body,
            CurveModel::GeneralizedLogistic($fitted) => $body,
        }
    };
}

impl CurveModel {
    /// Fit the requested family to `(x, y)`.
    pub fn fit(kind: CurveKind, x: &[f64], y: &[f64], options: &FitOptions) -> Result<Self> {
        Ok(match kind {
            CurveKind::Logistic => Logistic::fit(x, y, options)?.into(),
            CurveKind::Gompertz => Gompertz::fit(x, y, options)?.into(),
            CurveKind::GeneralizedLogistic => GeneralizedLogistic::fit(x, y, options)?.into(),
        })
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            CurveModel::Logistic(_) => CurveKind::Logistic,
            CurveModel::Gompertz(_) => CurveKind::Gompertz,
            CurveModel::GeneralizedLogistic(_) => CurveKind::GeneralizedLogistic,
        }
    }

    /// Family name; used as the prediction column key.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn params(&self) -> Vec<f64> {
        with_curve!(self, c => c.params.to_vec())
    }

    /// One-sigma uncertainties, present only for fitted curves.
    pub fn std_errors(&self) -> Option<Vec<f64>> {
        with_curve!(self, c => c.std_errors.map(|se| se.to_vec()))
    }

    pub fn quality(&self) -> Option<FitQuality> {
        with_curve!(self, c => c.quality)
    }

    pub fn compute(&self, x: f64) -> f64 {
        with_curve!(self, c => c.params.compute(x))
    }

    pub fn compute_many(&self, xs: &[f64]) -> Vec<f64> {
        with_curve!(self, c => c.params.compute_many(xs))
    }

    pub fn compute_inverse(&self, y: f64) -> f64 {
        with_curve!(self, c => c.params.compute_inverse(y))
    }

    pub fn compute_derivative(&self, x: f64) -> f64 {
        with_curve!(self, c => c.params.compute_derivative(x))
    }

    pub fn plateau(&self) -> f64 {
        with_curve!(self, c => c.params.plateau())
    }

    pub fn peak(&self) -> f64 {
        with_curve!(self, c => c.params.peak())
    }

    pub fn inverse_perc(&self, perc: f64) -> f64 {
        with_curve!(self, c => c.params.inverse_perc(perc))
    }
}

impl fmt::Display for CurveModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params().iter().map(|v| v.to_string()).collect();
        write!(f, "{}({})", self.name(), params.join(", "))
    }
}

macro_rules! impl_from_curve {
    ($($variant:ident),*) => {
        $(
            impl From<FittedCurve<$variant>> for CurveModel {
                fn from(fitted: FittedCurve<$variant>) -> Self {
                    CurveModel::$variant(fitted)
                }
            }

            impl From<$variant> for CurveModel {
                fn from(params: $variant) -> Self {
                    CurveModel::$variant(FittedCurve::new(params))
                }
            }
        )*
    };
}

impl_from_curve!(Logistic, Gompertz, GeneralizedLogistic);
