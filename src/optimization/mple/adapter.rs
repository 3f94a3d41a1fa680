//! Adapter that exposes a [`LogLikelihood`] as an argmin problem.
//!
//! The maximization of ℓ(θ) becomes a minimization of `c(θ) = -ℓ(θ)`.
//! Analytic gradients, when implemented, are negated accordingly; otherwise
//! the **cost** closure is finite-differenced, so no sign flip is needed in
//! that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    mple::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a [`LogLikelihood`] to argmin's `CostFunction` and `Gradient`.
///
/// - `cost` returns `-ℓ(θ)` and rejects non-finite values.
/// - `gradient` returns `-∇ℓ(θ)` when the model provides one, or a
///   finite-difference gradient of the cost otherwise (central differences
///   first, with a forward-difference retry when evaluation or validation
///   fails near a domain boundary).
#[derive(Debug, Clone)]
pub struct ArgminAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostFunction for ArgminAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgminAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at θ.
    ///
    /// The FD closure must return `f64`, so errors raised inside it cannot
    /// use `?`; the first one is captured in `closure_err` and the closure
    /// returns `NaN`, which is converted back into a real error afterwards.
    ///
    /// # Errors
    /// - Propagates model errors from `grad` other than
    ///   [`OptError::GradientNotImplemented`].
    /// - Propagates errors raised by cost evaluations during FD.
    /// - Returns validation errors for wrong-dimension or non-finite
    ///   gradients.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_some() || validate_grad(&fd_grad, dim).is_err() {
                    return forward_fd(theta, &cost_func, &closure_err);
                }
                Ok(fd_grad)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgminAdapter<'a, F> {
    /// Construct a new adapter over a model and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

/// Forward-difference retry with error capture.
///
/// Clears `closure_err`, runs `forward_diff`, surfaces any captured error,
/// and validates the resulting gradient before returning it.
fn forward_fd<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // Concave quadratic ℓ(θ) = -(θ - 2)², maximized at θ = 2.
    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            Ok(-(theta[0] - 2.0).powi(2))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // The adapter must expose the negated objective as the cost.
    fn cost_is_negated_log_likelihood() {
        let adapter = ArgminAdapter::new(&Quadratic, &());
        let c = adapter.cost(&array![3.0]).unwrap();
        assert!((c - 1.0).abs() < 1e-12, "expected cost 1.0, got {c}");
    }

    #[test]
    // Without an analytic gradient, the FD gradient of the cost at θ = 3
    // should be ≈ d/dθ (θ-2)² = 2.
    fn finite_difference_gradient_matches_analytic_slope() {
        let adapter = ArgminAdapter::new(&Quadratic, &());
        let g = adapter.gradient(&array![3.0]).unwrap();
        assert!((g[0] - 2.0).abs() < 1e-4, "expected FD gradient near 2.0, got {}", g[0]);
    }
}
