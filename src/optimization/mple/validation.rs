//! Validation helpers for pseudo-likelihood optimization.
//!
//! Consistency checks shared across the optimizer surface: tolerance
//! finiteness/positivity, gradient dimension and finiteness, and the
//! finiteness of estimated parameters and objective values. All helpers
//! report through [`OptError`] so higher layers stay uniform.
use crate::optimization::{
    errors::{OptError, OptResult},
    mple::types::{Grad, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// Accepts `None` (no gradient stopping rule); otherwise the value must be
/// finite and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if the length does not match `dim`.
/// - [`OptError::InvalidGradient`] for the first non-finite element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was produced by the solver.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar log-likelihood value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn tolerances_reject_non_finite_and_non_positive_values() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-6)).is_ok());
        assert!(verify_tol_grad(Some(0.0)).is_err());
        assert!(verify_tol_grad(Some(f64::NAN)).is_err());
        assert!(verify_tol_cost(Some(-1.0)).is_err());
        assert!(verify_tol_cost(Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn validate_grad_flags_dimension_and_nan() {
        let good = array![0.1, -0.2];
        assert!(validate_grad(&good, 2).is_ok());
        assert!(matches!(
            validate_grad(&good, 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 2 })
        ));
        let bad = array![0.1, f64::NAN];
        assert!(matches!(validate_grad(&bad, 2), Err(OptError::InvalidGradient { index: 1, .. })));
    }

    #[test]
    fn validate_theta_hat_requires_present_finite_vector() {
        assert!(matches!(validate_theta_hat(None), Err(OptError::MissingThetaHat)));
        assert!(validate_theta_hat(Some(array![1.0, 2.0])).is_ok());
        assert!(validate_theta_hat(Some(array![f64::INFINITY])).is_err());
    }
}
