//! Overflow-safe building blocks for the logistic family.
//!
//! The curves are all compositions of:
//!
//! - `sigmoid(t) = 1 / (1 + exp(-t))`
//! - `softplus(z) = ln(1 + exp(z))`
//!
//! Evaluated naively, `exp` overflows for large arguments and the ratio
//! becomes `inf / inf`. Both helpers branch on the sign so the exponential is
//! only ever taken of a non-positive number.

/// Compute `1 / (1 + exp(-t))` without overflow.
pub fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}

/// Compute `ln(1 + exp(z))` without overflow.
pub fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_matches_closed_form_in_range() {
        for &t in &[-20.0, -3.0, -0.5, 0.0, 0.5, 3.0, 20.0] {
            let naive = 1.0 / (1.0 + f64::exp(-t));
            assert!((sigmoid(t) - naive).abs() < 1e-15, "t={t}");
        }
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn helpers_stay_finite_at_extremes() {
        assert_eq!(sigmoid(1e4), 1.0);
        assert_eq!(sigmoid(-1e4), 0.0);
        assert!((softplus(1e4) - 1e4).abs() < 1e-9);
        assert_eq!(softplus(-1e4), 0.0);
        assert!((softplus(0.0) - std::f64::consts::LN_2).abs() < 1e-15);
    }
}
