//! Gompertz growth: `y = L · exp(-ln(L/y0) · exp(-k x))`.
//!
//! `y0` is the value at `x = 0`. Unlike the logistic curve the Gompertz curve
//! is asymmetric: growth slows down more gradually than it speeds up, and the
//! inflection sits at `L / e` rather than `L / 2`.

use serde::{Deserialize, Serialize};

use crate::domain::CurveKind;
use crate::models::curve::{GrowthCurve, first_crossing, sigmoid_guess};

/// Gompertz curve with initial value `y0`, rate `k` and plateau `l`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gompertz {
    pub y0: f64,
    pub k: f64,
    pub l: f64,
}

impl Gompertz {
    pub fn new(y0: f64, k: f64, l: f64) -> Self {
        Self { y0, k, l }
    }

    /// `ln(L / y0)`, the displacement along the log axis.
    fn displacement(&self) -> f64 {
        (self.l / self.y0).ln()
    }
}

impl GrowthCurve for Gompertz {
    const KIND: CurveKind = CurveKind::Gompertz;

    fn compute(&self, x: f64) -> f64 {
        self.l * (-self.displacement() * (-self.k * x).exp()).exp()
    }

    fn compute_inverse(&self, y: f64) -> f64 {
        if y <= 0.0 {
            return f64::NEG_INFINITY;
        }
        -((self.l / y).ln() / self.displacement()).ln() / self.k
    }

    fn compute_derivative(&self, x: f64) -> f64 {
        let a = self.displacement();
        let g = (-self.k * x).exp();
        self.compute(x) * a * self.k * g
    }

    fn plateau(&self) -> f64 {
        self.l
    }

    fn peak(&self) -> f64 {
        self.displacement().ln() / self.k
    }

    fn gradient(&self, x: f64, out: &mut [f64]) {
        let a = self.displacement();
        let g = (-self.k * x).exp();
        let e = (-a * g).exp();
        let f = self.l * e;
        out[0] = f * g / self.y0;
        out[1] = f * a * x * g;
        out[2] = e * (1.0 - g);
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.y0, self.k, self.l]
    }

    fn from_slice(params: &[f64]) -> Self {
        Self::new(params[0], params[1], params[2])
    }

    fn initial_guess(x: &[f64], y: &[f64]) -> Self {
        let g = sigmoid_guess(x, y);
        let l = g.plateau;

        // Value at x = 0: the first positive observation, kept strictly
        // inside (0, L) so that ln(L / y0) > 0.
        let first = y
            .iter()
            .copied()
            .find(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(l * 1e-3);
        let y0 = first.clamp(l * 1e-6, l * 0.3);

        // Half-plateau crossing: exp(-k x) ln(L/y0) = ln 2.
        let a = (l / y0).ln();
        let k = match first_crossing(x, y, 0.5 * l) {
            Some(x_half) if x_half > 0.0 => (a / std::f64::consts::LN_2).ln() / x_half,
            _ => g.rate,
        };

        Self::new(y0, k, l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> Gompertz {
        Gompertz::new(10.0, 0.08, 1000.0)
    }

    #[test]
    fn starts_at_y0() {
        let c = curve();
        assert!((c.compute(0.0) - 10.0).abs() < 1e-9);
        assert!(c.compute(200.0) < 1000.0);
        assert!((c.compute(200.0) - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn peak_is_inflection() {
        let c = curve();
        let peak = c.peak();
        let expected = (1000.0_f64 / 10.0).ln().ln() / 0.08;
        assert!((peak - expected).abs() < 1e-12);
        assert!((c.compute(peak) - 1000.0 / std::f64::consts::E).abs() < 1e-9);

        let rate = c.compute_derivative(peak);
        assert!(rate > c.compute_derivative(peak - 1.0));
        assert!(rate > c.compute_derivative(peak + 1.0));
    }

    #[test]
    fn inverse_perc_edges() {
        let c = curve();
        assert_eq!(c.inverse_perc(0.0), f64::NEG_INFINITY);
        assert_eq!(c.inverse_perc(1.0), f64::INFINITY);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let c = curve();
        let h = 1e-6;
        let mut grad = [0.0; 3];
        for &x in &[0.0, 20.0, 45.0, 90.0] {
            c.gradient(x, &mut grad);
            let p = c.to_vec();
            for j in 0..3 {
                let mut up = p.clone();
                let mut dn = p.clone();
                up[j] += h;
                dn[j] -= h;
                let fd = (Gompertz::from_slice(&up).compute(x) - Gompertz::from_slice(&dn).compute(x)) / (2.0 * h);
                let tol = 1e-4 * fd.abs().max(1.0);
                assert!((grad[j] - fd).abs() < tol, "x={x} j={j}: {} vs {fd}", grad[j]);
            }
        }
    }

    #[test]
    fn guess_is_inside_domain() {
        let c = curve();
        let x: Vec<f64> = (0..=100).map(f64::from).collect();
        let y = c.compute_many(&x);
        let g = Gompertz::initial_guess(&x, &y);
        assert!(g.y0 > 0.0 && g.y0 < g.l);
        assert!(g.k > 0.0);
        assert!((g.y0 - 10.0).abs() < 1e-9);
    }
}
