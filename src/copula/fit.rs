//! Maximum pseudo-likelihood fitting of copula families.
//!
//! Purpose
//! -------
//! Turn a pair of pseudo-observation margins into a fitted [`CopulaFit`]
//! per candidate family. Each parametric family maximizes its pseudo-
//! log-likelihood through [`crate::optimization::mple::maximize`]; the
//! optimizer works in an unconstrained space and the maps in
//! [`natural_params`] carry θ into each family's domain, so no box
//! constraints are needed.
//!
//! Key behaviors
//! -------------
//! - Starting values come from the empirical Kendall τ via each family's
//!   τ(θ) inversion, so the optimizer starts near the moment estimate.
//! - The comonotonic family skips optimization entirely and carries the
//!   [`COMONOTONIC_AIC`] sentinel, keeping it in every comparison table
//!   without ever winning.
//! - [`fit_all`] records per-family failures and keeps going; one
//!   ill-conditioned family never sinks a condition.
//!
//! Invariants & assumptions
//! ------------------------
//! - Pseudo-observations lie strictly in (0, 1); [`PseudoSample::new`]
//!   enforces this once so the optimizer's hot loop can assume it.
//! - Reported parameters are on the natural scale; the unconstrained
//!   optimizer space never leaks out of this module.
use ndarray::{array, Array1};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use tracing::warn;

use crate::copula::{
    density::{
        clayton_log_density, frank_log_density, gaussian_log_density, gumbel_log_density,
        t_log_density,
    },
    dependence::{empirical_tau, model_tau, tail_dependence},
    errors::{FitError, FitResult},
    family::CopulaFamily,
};
use crate::optimization::{
    errors::{OptError, OptResult},
    mple::{maximize, LogLikelihood, MpleOptions, Theta},
    stability::{atanh_clamped, safe_softplus, safe_softplus_inv, RHO_MARGIN},
};

/// Sentinel AIC/BIC for the parameter-free comonotonic reference model.
///
/// Its density is singular, so no finite log-likelihood exists; a fixed,
/// documented constant keeps it comparable (and always losing) in AIC
/// tables.
pub const COMONOTONIC_AIC: f64 = 1.0e9;

/// Fitted copula for one family on one condition's pseudo-observations.
#[derive(Debug, Clone)]
pub struct CopulaFit {
    pub family: CopulaFamily,
    /// Natural-scale parameters: [ρ], [ρ, ν], [θ], or empty.
    pub params: Vec<f64>,
    pub n: usize,
    pub loglik: f64,
    pub aic: f64,
    pub bic: f64,
    pub tau_model: f64,
    pub tau_empirical: f64,
    pub tail_lower: f64,
    pub tail_upper: f64,
    pub converged: bool,
    pub iterations: usize,
}

/// Validated pseudo-observation pair sample.
///
/// Carries the normal scores of both margins so the Gaussian likelihood
/// avoids re-inverting Φ on every optimizer evaluation.
#[derive(Debug, Clone)]
pub struct PseudoSample {
    u: Vec<f64>,
    v: Vec<f64>,
    zu: Vec<f64>,
    zv: Vec<f64>,
}

impl PseudoSample {
    /// # Errors
    /// - [`FitError::MarginLengthMismatch`] / [`FitError::EmptySample`].
    /// - [`FitError::InvalidPseudoObservation`] for values outside (0, 1).
    pub fn new(u: Vec<f64>, v: Vec<f64>) -> FitResult<Self> {
        if u.len() != v.len() {
            return Err(FitError::MarginLengthMismatch { u_len: u.len(), v_len: v.len() });
        }
        if u.len() < 2 {
            return Err(FitError::EmptySample);
        }
        for (index, &x) in u.iter().chain(v.iter()).enumerate() {
            if !(x > 0.0 && x < 1.0) {
                return Err(FitError::InvalidPseudoObservation { index: index % u.len(), value: x });
            }
        }
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| FitError::Distribution { text: e.to_string() })?;
        let zu = u.iter().map(|&x| normal.inverse_cdf(x)).collect();
        let zv = v.iter().map(|&x| normal.inverse_cdf(x)).collect();
        Ok(PseudoSample { u, v, zu, zv })
    }

    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }
}

/// Map the optimizer's unconstrained θ onto a family's natural parameters.
///
/// ρ = tanh(z) pulled a margin inside (−1, 1); Clayton θ = softplus(z);
/// Gumbel θ = 1 + softplus(z); t-copula ν = 2 + softplus(z₂) so the tail
/// formula stays finite; Frank θ = z unchanged.
pub fn natural_params(family: CopulaFamily, theta: &Theta) -> Vec<f64> {
    let rho_of = |z: f64| z.tanh().clamp(-(1.0 - RHO_MARGIN), 1.0 - RHO_MARGIN);
    match family {
        CopulaFamily::Gaussian => vec![rho_of(theta[0])],
        CopulaFamily::StudentT => vec![rho_of(theta[0]), 2.0 + safe_softplus(theta[1])],
        CopulaFamily::Clayton => vec![safe_softplus(theta[0]).max(1e-8)],
        CopulaFamily::Gumbel => vec![1.0 + safe_softplus(theta[0])],
        CopulaFamily::Frank => vec![theta[0]],
        CopulaFamily::Comonotonic => Vec::new(),
    }
}

/// Starting point in the unconstrained space, seeded from the empirical τ
/// through each family's τ(θ) relation.
fn initial_theta(family: CopulaFamily, tau_hat: f64) -> Theta {
    match family {
        CopulaFamily::Gaussian => {
            array![atanh_clamped((std::f64::consts::FRAC_PI_2 * tau_hat).sin())]
        }
        CopulaFamily::StudentT => array![
            atanh_clamped((std::f64::consts::FRAC_PI_2 * tau_hat).sin()),
            // ν₀ = 8, a moderately heavy tail to descend from.
            safe_softplus_inv(6.0)
        ],
        CopulaFamily::Clayton => {
            let theta0 = if tau_hat < 1.0 { (2.0 * tau_hat / (1.0 - tau_hat)).max(0.2) } else { 5.0 };
            array![safe_softplus_inv(theta0)]
        }
        CopulaFamily::Gumbel => {
            let theta0 = if tau_hat < 1.0 { (1.0 / (1.0 - tau_hat)).max(1.05) } else { 5.0 };
            array![safe_softplus_inv(theta0 - 1.0)]
        }
        CopulaFamily::Frank => {
            // τ ≈ θ/9 for small θ; a crude inversion is enough to start.
            let theta0 = 10.0 * tau_hat;
            array![if theta0.abs() < 0.5 { 0.5 } else { theta0.clamp(-30.0, 30.0) }]
        }
        CopulaFamily::Comonotonic => Array1::zeros(0),
    }
}

/// Pseudo-log-likelihood of one parametric family over a [`PseudoSample`].
struct CopulaLogLik {
    family: CopulaFamily,
}

impl LogLikelihood for CopulaLogLik {
    type Data = PseudoSample;

    fn value(&self, theta: &Theta, data: &PseudoSample) -> OptResult<f64> {
        let params = natural_params(self.family, theta);
        let total = match self.family {
            CopulaFamily::Gaussian => {
                let rho = params[0];
                data.zu
                    .iter()
                    .zip(&data.zv)
                    .map(|(&zu, &zv)| gaussian_log_density(rho, zu, zv))
                    .sum()
            }
            CopulaFamily::StudentT => {
                let (rho, nu) = (params[0], params[1]);
                let t_dist = StudentsT::new(0.0, 1.0, nu)
                    .map_err(|_| OptError::ParamOutOfDomain { family: "t", value: nu })?;
                data.u
                    .iter()
                    .zip(&data.v)
                    .map(|(&u, &v)| {
                        t_log_density(rho, nu, t_dist.inverse_cdf(u), t_dist.inverse_cdf(v))
                    })
                    .sum()
            }
            CopulaFamily::Clayton => {
                let theta_n = params[0];
                data.u
                    .iter()
                    .zip(&data.v)
                    .map(|(&u, &v)| clayton_log_density(theta_n, u, v))
                    .sum()
            }
            CopulaFamily::Gumbel => {
                let theta_n = params[0];
                data.u
                    .iter()
                    .zip(&data.v)
                    .map(|(&u, &v)| gumbel_log_density(theta_n, u, v))
                    .sum()
            }
            CopulaFamily::Frank => {
                let theta_n = params[0];
                data.u
                    .iter()
                    .zip(&data.v)
                    .map(|(&u, &v)| frank_log_density(theta_n, u, v))
                    .sum()
            }
            CopulaFamily::Comonotonic => f64::NEG_INFINITY,
        };
        Ok(total)
    }

    fn check(&self, theta: &Theta, _data: &PseudoSample) -> OptResult<()> {
        let expected = self.family.param_count();
        if theta.len() != expected {
            return Err(OptError::ThetaLengthMismatch { expected, actual: theta.len() });
        }
        Ok(())
    }
}

/// Fit one copula family to a pair of pseudo-observation margins.
///
/// # Errors
/// - Sample validation errors from [`PseudoSample::new`].
/// - [`FitError::Optimization`] when the solver fails outright; a solver
///   that merely stops at its iteration cap still yields `Ok` with
///   `converged = false`.
/// - [`FitError::NonFiniteLogLik`] if the optimum is not finite.
pub fn fit_family(
    u: &[f64], v: &[f64], family: CopulaFamily, opts: &MpleOptions,
) -> FitResult<CopulaFit> {
    let sample = PseudoSample::new(u.to_vec(), v.to_vec())?;
    let tau_empirical = empirical_tau(u, v)?;
    let n = sample.len();

    if family == CopulaFamily::Comonotonic {
        return Ok(CopulaFit {
            family,
            params: Vec::new(),
            n,
            loglik: f64::NEG_INFINITY,
            aic: COMONOTONIC_AIC,
            bic: COMONOTONIC_AIC,
            tau_model: 1.0,
            tau_empirical,
            tail_lower: 1.0,
            tail_upper: 1.0,
            converged: true,
            iterations: 0,
        });
    }

    let theta0 = initial_theta(family, tau_empirical);
    let outcome = maximize(&CopulaLogLik { family }, theta0, &sample, opts)?;
    let params = natural_params(family, &outcome.theta_hat);
    let loglik = outcome.value;
    if !loglik.is_finite() {
        return Err(FitError::NonFiniteLogLik { value: loglik });
    }
    let k = family.param_count() as f64;
    let aic = -2.0 * loglik + 2.0 * k;
    let bic = -2.0 * loglik + k * (n as f64).ln();
    let tau_model = model_tau(family, &params)?;
    let (tail_lower, tail_upper) = tail_dependence(family, &params)?;

    Ok(CopulaFit {
        family,
        params,
        n,
        loglik,
        aic,
        bic,
        tau_model,
        tau_empirical,
        tail_lower,
        tail_upper,
        converged: outcome.converged,
        iterations: outcome.iterations,
    })
}

/// Fit every requested family, collecting per-family results.
///
/// Failures are logged and returned alongside successes; callers decide
/// whether a partially fitted condition is still usable.
pub fn fit_all(
    u: &[f64], v: &[f64], families: &[CopulaFamily], opts: &MpleOptions,
) -> Vec<(CopulaFamily, FitResult<CopulaFit>)> {
    families
        .iter()
        .map(|&family| {
            let result = fit_family(u, v, family, opts);
            if let Err(err) = &result {
                warn!(family = %family, error = %err, "copula fit failed");
            }
            (family, result)
        })
        .collect()
}
