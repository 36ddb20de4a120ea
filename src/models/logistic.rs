//! Logistic growth: `y = L / (1 + exp(-k (x - x0)))`.

use serde::{Deserialize, Serialize};

use crate::domain::CurveKind;
use crate::math::sigmoid;
use crate::models::curve::{GrowthCurve, sigmoid_guess};

/// Symmetric sigmoid with midpoint `x0`, rate `k` and plateau `l`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Logistic {
    pub x0: f64,
    pub k: f64,
    pub l: f64,
}

impl Logistic {
    pub fn new(x0: f64, k: f64, l: f64) -> Self {
        Self { x0, k, l }
    }

    /// Fraction of the plateau reached at `x`.
    fn share(&self, x: f64) -> f64 {
        sigmoid(self.k * (x - self.x0))
    }
}

impl GrowthCurve for Logistic {
    const KIND: CurveKind = CurveKind::Logistic;

    fn compute(&self, x: f64) -> f64 {
        self.l * self.share(x)
    }

    fn compute_inverse(&self, y: f64) -> f64 {
        if y <= 0.0 {
            return f64::NEG_INFINITY;
        }
        self.x0 - (self.l / y - 1.0).ln() / self.k
    }

    fn compute_derivative(&self, x: f64) -> f64 {
        let s = self.share(x);
        self.k * self.l * s * (1.0 - s)
    }

    fn plateau(&self) -> f64 {
        self.l
    }

    fn peak(&self) -> f64 {
        self.x0
    }

    fn gradient(&self, x: f64, out: &mut [f64]) {
        let s = self.share(x);
        let ds = s * (1.0 - s);
        out[0] = -self.l * self.k * ds;
        out[1] = self.l * (x - self.x0) * ds;
        out[2] = s;
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.x0, self.k, self.l]
    }

    fn from_slice(params: &[f64]) -> Self {
        Self::new(params[0], params[1], params[2])
    }

    fn initial_guess(x: &[f64], y: &[f64]) -> Self {
        let g = sigmoid_guess(x, y);
        Self::new(g.midpoint, g.rate, g.plateau)
    }
}
