//! Parameter covariance for nonlinear least squares.
//!
//! At the solution of `minimize Σ r_i(p)^2` the usual estimate is
//!
//! ```text
//! cov(p) = (JᵀJ)⁻¹ · SSE / (n - p)
//! ```
//!
//! where `J` is the `n × p` Jacobian of the residuals.
//!
//! Implementation choices:
//! - We go through the SVD of `J` rather than forming and inverting `JᵀJ`
//!   directly. With `J = U S Vᵀ`, `(JᵀJ)⁻¹ = V S⁻² Vᵀ`, and the singular values
//!   tell us when the problem is rank deficient.
//! - A singular value below `ε · max(n, p) · s_max` is treated as zero and the
//!   covariance is reported as unavailable instead of returning huge numbers.

use nalgebra::DMatrix;

/// Covariance of the fitted parameters.
///
/// Returns `None` when the Jacobian is rank deficient, there are no residual
/// degrees of freedom, or the result is not finite.
pub fn parameter_covariance(jacobian: &DMatrix<f64>, sse: f64) -> Option<DMatrix<f64>> {
    let (n, p) = jacobian.shape();
    if p == 0 || n <= p || !sse.is_finite() {
        return None;
    }
    if jacobian.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let svd = jacobian.clone().svd(false, true);
    let v_t = svd.v_t?;
    let s = &svd.singular_values;

    let s_max = s.iter().copied().fold(0.0_f64, f64::max);
    let tol = f64::EPSILON * n.max(p) as f64 * s_max;
    if s.len() != p || s.iter().any(|&v| !(v > tol)) {
        return None;
    }

    // S⁻¹ Vᵀ, so that (S⁻¹ Vᵀ)ᵀ (S⁻¹ Vᵀ) = V S⁻² Vᵀ.
    let mut scaled = v_t;
    for i in 0..p {
        let mut row = scaled.row_mut(i);
        row /= s[i];
    }

    let s_sq = sse / (n - p) as f64;
    let cov = scaled.transpose() * scaled * s_sq;

    if cov.iter().all(|v| v.is_finite()) {
        Some(cov)
    } else {
        None
    }
}

/// One-sigma parameter uncertainties: `sqrt(diag(cov))`.
pub fn standard_errors(cov: &DMatrix<f64>) -> Option<Vec<f64>> {
    let diag = cov.diagonal();
    if diag.iter().any(|v| !(v.is_finite() && *v >= 0.0)) {
        return None;
    }
    Some(diag.iter().map(|v| v.sqrt()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covariance_of_straight_line_fit() {
        // Linear model y = a + b x on x = [0, 1, 2]; J has rows [1, x].
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let sse = 2.0;
        let cov = parameter_covariance(&j, sse).unwrap();

        // (JᵀJ)⁻¹ = [[5/6, -1/2], [-1/2, 1/2]], s² = 2 / (3 - 2) = 2.
        assert!((cov[(0, 0)] - 5.0 / 3.0).abs() < 1e-12);
        assert!((cov[(0, 1)] + 1.0).abs() < 1e-12);
        assert!((cov[(1, 0)] + 1.0).abs() < 1e-12);
        assert!((cov[(1, 1)] - 1.0).abs() < 1e-12);

        let se = standard_errors(&cov).unwrap();
        assert!((se[0] - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((se[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rank_deficient_jacobian_has_no_covariance() {
        // Second column duplicates the first.
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        assert!(parameter_covariance(&j, 1.0).is_none());
    }

    #[test]
    fn no_degrees_of_freedom_has_no_covariance() {
        let j = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        assert!(parameter_covariance(&j, 1.0).is_none());
    }
}
