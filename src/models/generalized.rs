//! Generalized logistic (Richards) growth:
//! `y = L · (1 + exp(-k (x - x0)))^(-1/m)`.
//!
//! With `m = 1` this is the plain logistic curve. The shape parameter `m`
//! skews the sigmoid; the reported peak is the half-plateau crossing, which
//! only coincides with the inflection point when `m = 1`.

use serde::{Deserialize, Serialize};

use crate::domain::CurveKind;
use crate::math::{sigmoid, softplus};
use crate::models::curve::{GrowthCurve, sigmoid_guess};

/// Richards curve with midpoint `x0`, rate `k`, plateau `l` and shape `m`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneralizedLogistic {
    pub x0: f64,
    pub k: f64,
    pub l: f64,
    pub m: f64,
}

impl GeneralizedLogistic {
    pub fn new(x0: f64, k: f64, l: f64, m: f64) -> Self {
        Self { x0, k, l, m }
    }

    /// `ln(1 + exp(-k (x - x0)))`.
    fn log_base(&self, x: f64) -> f64 {
        softplus(-self.k * (x - self.x0))
    }
}

impl GrowthCurve for GeneralizedLogistic {
    const KIND: CurveKind = CurveKind::GeneralizedLogistic;

    fn compute(&self, x: f64) -> f64 {
        self.l * (-self.log_base(x) / self.m).exp()
    }

    fn compute_inverse(&self, y: f64) -> f64 {
        if y <= 0.0 {
            return f64::NEG_INFINITY;
        }
        self.x0 - ((self.l / y).powf(self.m) - 1.0).ln() / self.k
    }

    fn compute_derivative(&self, x: f64) -> f64 {
        // (L k / m) · E/(1+E) · (1+E)^(-1/m), with E = exp(-k (x - x0)).
        let z = -self.k * (x - self.x0);
        let scaled = (-softplus(z) / self.m).exp();
        self.l * self.k / self.m * sigmoid(z) * scaled
    }

    fn plateau(&self) -> f64 {
        self.l
    }

    fn peak(&self) -> f64 {
        self.compute_inverse(self.l / 2.0)
    }

    fn gradient(&self, x: f64, out: &mut [f64]) {
        let z = -self.k * (x - self.x0);
        let sp = softplus(z);
        let scaled = (-sp / self.m).exp();
        let tail = sigmoid(z) * scaled;
        out[0] = -self.l * self.k / self.m * tail;
        out[1] = self.l * (x - self.x0) / self.m * tail;
        out[2] = scaled;
        out[3] = self.l * scaled * sp / (self.m * self.m);
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.x0, self.k, self.l, self.m]
    }

    fn from_slice(params: &[f64]) -> Self {
        Self::new(params[0], params[1], params[2], params[3])
    }

    fn initial_guess(x: &[f64], y: &[f64]) -> Self {
        let g = sigmoid_guess(x, y);
        Self::new(g.midpoint, g.rate, g.plateau, 1.0)
    }
}
