//! Public API surface for pseudo-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait each copula family's objective implements.
//! - [`MpleOptions`] and [`Tolerances`]: optimizer configuration.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by `maximize`.
//!
//! Convention: we *maximize* a pseudo-log-likelihood ℓ(θ) by minimizing the
//! cost `c(θ) = -ℓ(θ)`. An analytic gradient, when provided, is the gradient
//! of ℓ; the adapter flips the sign.
use crate::optimization::{
    errors::{OptError, OptResult},
    mple::{
        types::{Cost, FnEvalMap, Grad, Theta},
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented pseudo-log-likelihood interface.
///
/// Implementors evaluate ℓ(θ) over their data; the optimizer minimizes
/// `-ℓ(θ)` internally. `θ` lives in an unconstrained space — any mapping to
/// a constrained family domain happens inside the implementation.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate ℓ(θ). Invalid
///   inputs are reported as descriptive [`OptError`] values, never panics.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject obviously invalid
///   (θ, data) pairs once, before optimization begins.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic ∇ℓ(θ). When absent,
///   robust finite differences are used automatically.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parses case-insensitively from `"MoreThuente"` or `"HagerZhang"`; unknown
/// names return [`OptError::InvalidLineSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols`: numerical tolerances and the iteration cap.
/// - `line_searcher`: line-search algorithm used by L-BFGS.
/// - `lbfgs_mem`: optional L-BFGS history size (default 7 when `None`).
///
/// Defaults: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 200`,
/// More–Thuente line search.
#[derive(Debug, Clone, PartialEq)]
pub struct MpleOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
}

impl MpleOptions {
    /// Create a new set of optimizer options.
    ///
    /// Numeric validation of the tolerances happens in [`Tolerances::new`];
    /// this constructor only rejects a zero L-BFGS memory.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLbfgsMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, lbfgs_mem })
    }
}

impl Default for MpleOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(200) },
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None`, but at least one of the three must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found (unconstrained space).
/// - `value`: best pseudo-log-likelihood ℓ(θ̂), not the cost.
/// - `converged`: `true` when the solver stopped for any reason other
///   than exhausting its iteration cap.
/// - `status`: human-readable termination status string.
/// - `iterations`: optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by argmin.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Checks that `theta_hat` is present and finite and that `value` is
    /// finite, then maps the argmin termination status into
    /// `(converged, status)`.
    ///
    /// # Errors
    /// Propagates validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status: String;
        let converged = match &termination {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            TerminationStatus::Terminated(reason) => {
                status = format!("{termination:?}");
                // Hitting the iteration cap is a stop, not a solution.
                !matches!(reason, TerminationReason::MaxItersReached)
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::collections::HashMap;

    #[test]
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("morethuente".parse::<LineSearcher>().unwrap(), LineSearcher::MoreThuente);
        assert_eq!("HAGERZHANG".parse::<LineSearcher>().unwrap(), LineSearcher::HagerZhang);
        assert!("brent".parse::<LineSearcher>().is_err());
    }

    #[test]
    fn tolerances_require_at_least_one_stopping_rule() {
        assert!(matches!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided)));
        assert!(Tolerances::new(None, None, Some(10)).is_ok());
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
    }

    #[test]
    fn mple_options_reject_zero_lbfgs_memory() {
        let tols = Tolerances::new(Some(1e-6), None, Some(100)).unwrap();
        assert!(matches!(
            MpleOptions::new(tols, LineSearcher::MoreThuente, Some(0)),
            Err(OptError::InvalidLbfgsMem { .. })
        ));
    }

    #[test]
    fn optim_outcome_maps_termination_status() {
        let outcome = OptimOutcome::new(
            Some(array![0.3]),
            -12.5,
            TerminationStatus::NotTerminated,
            7,
            HashMap::new(),
            None,
        )
        .unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.status, "Not terminated");
        assert_eq!(outcome.iterations, 7);
        assert_eq!(outcome.value, -12.5);
    }

    #[test]
    fn iteration_cap_is_not_convergence() {
        let capped = OptimOutcome::new(
            Some(array![0.3]),
            -1.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            200,
            HashMap::new(),
            None,
        )
        .unwrap();
        assert!(!capped.converged);

        let solved = OptimOutcome::new(
            Some(array![0.3]),
            -1.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            HashMap::new(),
            None,
        )
        .unwrap();
        assert!(solved.converged);
    }
}
