//! Seeded simulation from each copula family.
//!
//! Every entry point takes an explicit `u64` seed and draws through
//! `StdRng`, so a given (family, parameters, n, seed) tuple reproduces the
//! same sample on every run and platform.
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{ChiSquared, Distribution, Exp1, Gamma, StandardNormal};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::copula::{
    errors::{FitError, FitResult},
    family::CopulaFamily,
};
use crate::transform::kernel::standard_normal_cdf;
use crate::transform::CLAMP_EPS;

/// Draw `n` pseudo-observation pairs from a copula.
///
/// Output values are clamped to [ε, 1 − ε] so downstream log-densities and
/// quantile functions stay finite.
///
/// # Errors
/// - [`FitError::ParamLengthMismatch`] / [`FitError::ParamOutOfDomain`] for
///   malformed parameters.
/// - [`FitError::Distribution`] if a sampling distribution rejects its
///   arguments.
pub fn simulate(
    family: CopulaFamily, params: &[f64], n: usize, seed: u64,
) -> FitResult<(Vec<f64>, Vec<f64>)> {
    validate_params(family, params)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut u = Vec::with_capacity(n);
    let mut v = Vec::with_capacity(n);
    match family {
        CopulaFamily::Gaussian => {
            let rho = params[0];
            let orth = (1.0 - rho * rho).sqrt();
            for _ in 0..n {
                let z1: f64 = rng.sample(StandardNormal);
                let z2: f64 = rng.sample(StandardNormal);
                u.push(standard_normal_cdf(z1));
                v.push(standard_normal_cdf(rho * z1 + orth * z2));
            }
        }
        CopulaFamily::StudentT => {
            let (rho, nu) = (params[0], params[1]);
            let orth = (1.0 - rho * rho).sqrt();
            let chi = ChiSquared::new(nu)
                .map_err(|e| FitError::Distribution { text: e.to_string() })?;
            let t_dist = StudentsT::new(0.0, 1.0, nu)
                .map_err(|e| FitError::Distribution { text: e.to_string() })?;
            for _ in 0..n {
                let z1: f64 = rng.sample(StandardNormal);
                let z2: f64 = rng.sample(StandardNormal);
                let w: f64 = chi.sample(&mut rng);
                let scale = (nu / w).sqrt();
                u.push(t_dist.cdf(z1 * scale));
                v.push(t_dist.cdf((rho * z1 + orth * z2) * scale));
            }
        }
        CopulaFamily::Clayton => {
            // Marshall-Olkin: Gamma(1/θ) frailty mixed with unit exponentials.
            let theta = params[0];
            let gamma = Gamma::new(1.0 / theta, 1.0)
                .map_err(|e| FitError::Distribution { text: e.to_string() })?;
            for _ in 0..n {
                let m: f64 = gamma.sample(&mut rng);
                let e1: f64 = rng.sample(Exp1);
                let e2: f64 = rng.sample(Exp1);
                u.push((1.0 + e1 / m).powf(-1.0 / theta));
                v.push((1.0 + e2 / m).powf(-1.0 / theta));
            }
        }
        CopulaFamily::Gumbel => {
            let theta = params[0];
            if theta <= 1.0 + 1e-9 {
                // θ = 1 is the independence copula.
                for _ in 0..n {
                    u.push(rng.gen::<f64>());
                    v.push(rng.gen::<f64>());
                }
            } else {
                // Marshall-Olkin with a positive α-stable frailty, α = 1/θ,
                // drawn by the Chambers-Mallows-Stuck construction.
                let alpha = 1.0 / theta;
                for _ in 0..n {
                    let s = positive_stable(alpha, &mut rng);
                    let e1: f64 = rng.sample(Exp1);
                    let e2: f64 = rng.sample(Exp1);
                    u.push((-(e1 / s).powf(alpha)).exp());
                    v.push((-(e2 / s).powf(alpha)).exp());
                }
            }
        }
        CopulaFamily::Frank => {
            let theta = params[0];
            for _ in 0..n {
                let ui: f64 = rng.gen();
                let w: f64 = rng.gen();
                u.push(ui);
                v.push(frank_conditional_inverse(theta, ui, w));
            }
        }
        CopulaFamily::Comonotonic => {
            for _ in 0..n {
                let ui: f64 = rng.gen();
                u.push(ui);
                v.push(ui);
            }
        }
    }
    for x in u.iter_mut().chain(v.iter_mut()) {
        *x = x.clamp(CLAMP_EPS, 1.0 - CLAMP_EPS);
    }
    Ok((u, v))
}

/// Positive α-stable draw (Laplace transform exp(−t^α)), α ∈ (0, 1).
fn positive_stable(alpha: f64, rng: &mut StdRng) -> f64 {
    let theta_angle = std::f64::consts::PI * rng.gen::<f64>();
    let w: f64 = rng.sample(Exp1);
    let sin_t = theta_angle.sin();
    (alpha * theta_angle).sin() / sin_t.powf(1.0 / alpha)
        * (((1.0 - alpha) * theta_angle).sin() / w).powf((1.0 - alpha) / alpha)
}

/// Invert the Frank conditional distribution v ↦ C(v | u) at probability w.
fn frank_conditional_inverse(theta: f64, u: f64, w: f64) -> f64 {
    if theta.abs() < crate::copula::density::FRANK_INDEPENDENCE_EPS {
        return w;
    }
    let em = (-theta).exp();
    let emu = (-theta * u).exp();
    -(1.0 / theta) * (1.0 + (w * (1.0 - em)) / (w * (emu - 1.0) - emu)).ln()
}

pub(crate) fn validate_params(family: CopulaFamily, params: &[f64]) -> FitResult<()> {
    let expected = family.param_count();
    if params.len() != expected {
        return Err(FitError::ParamLengthMismatch {
            family: family.name(),
            expected,
            actual: params.len(),
        });
    }
    let bad = |value: f64| FitError::ParamOutOfDomain { family: family.name(), value };
    match family {
        CopulaFamily::Gaussian => {
            if !(params[0].abs() < 1.0) {
                return Err(bad(params[0]));
            }
        }
        CopulaFamily::StudentT => {
            if !(params[0].abs() < 1.0) {
                return Err(bad(params[0]));
            }
            if !(params[1] > 0.0 && params[1].is_finite()) {
                return Err(bad(params[1]));
            }
        }
        CopulaFamily::Clayton => {
            if !(params[0] > 0.0 && params[0].is_finite()) {
                return Err(bad(params[0]));
            }
        }
        CopulaFamily::Gumbel => {
            if !(params[0] >= 1.0 && params[0].is_finite()) {
                return Err(bad(params[0]));
            }
        }
        CopulaFamily::Frank => {
            if !params[0].is_finite() || params[0] == 0.0 {
                return Err(bad(params[0]));
            }
        }
        CopulaFamily::Comonotonic => {}
    }
    Ok(())
}
