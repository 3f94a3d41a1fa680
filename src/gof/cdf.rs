//! Theoretical copula CDF C_θ(u, v) per family.
//!
//! Archimedean families and the comonotonic bound have closed forms. The
//! Gaussian CDF reduces to a one-dimensional integral over the correlation
//! (Drezner–Wesolowsky's device), evaluated with Simpson's rule. The
//! Student-t CDF has no workable closed form, so it is approximated by the
//! empirical copula of a large seeded simulation from the fitted family.
use statrs::distribution::{ContinuousCDF, Normal};

use crate::copula::{
    density::FRANK_INDEPENDENCE_EPS,
    errors::{FitError, FitResult},
    family::CopulaFamily,
    simulate::simulate,
};

/// Cloud size backing the Monte-Carlo Student-t CDF approximation.
pub const T_CDF_CLOUD: usize = 20_000;

/// Evaluable C_θ for a fitted family, built once per test.
#[derive(Debug, Clone)]
pub enum TheoreticalCdf {
    Gaussian { rho: f64, normal: Normal },
    StudentT { cloud_u: Vec<f64>, cloud_v: Vec<f64> },
    Clayton { theta: f64 },
    Gumbel { theta: f64 },
    Frank { theta: f64 },
    Comonotonic,
}

impl TheoreticalCdf {
    /// Build the CDF evaluator; `seed` feeds the Student-t simulation
    /// cloud and is ignored by every other family.
    ///
    /// # Errors
    /// Parameter validation and simulation errors from the copula layer.
    pub fn new(family: CopulaFamily, params: &[f64], seed: u64) -> FitResult<Self> {
        crate::copula::simulate::validate_params(family, params)?;
        Ok(match family {
            CopulaFamily::Gaussian => {
                let normal = Normal::new(0.0, 1.0)
                    .map_err(|e| FitError::Distribution { text: e.to_string() })?;
                TheoreticalCdf::Gaussian { rho: params[0], normal }
            }
            CopulaFamily::StudentT => {
                let (cloud_u, cloud_v) = simulate(family, params, T_CDF_CLOUD, seed)?;
                TheoreticalCdf::StudentT { cloud_u, cloud_v }
            }
            CopulaFamily::Clayton => TheoreticalCdf::Clayton { theta: params[0] },
            CopulaFamily::Gumbel => TheoreticalCdf::Gumbel { theta: params[0] },
            CopulaFamily::Frank => TheoreticalCdf::Frank { theta: params[0] },
            CopulaFamily::Comonotonic => TheoreticalCdf::Comonotonic,
        })
    }

    /// Evaluate C_θ(u, v) for interior (u, v).
    pub fn eval(&self, u: f64, v: f64) -> f64 {
        match self {
            TheoreticalCdf::Gaussian { rho, normal } => {
                bivariate_normal_cdf(normal.inverse_cdf(u), normal.inverse_cdf(v), *rho)
            }
            TheoreticalCdf::StudentT { cloud_u, cloud_v } => {
                let m = cloud_u.len();
                let count = cloud_u
                    .iter()
                    .zip(cloud_v)
                    .filter(|&(&cu, &cv)| cu <= u && cv <= v)
                    .count();
                count as f64 / m as f64
            }
            TheoreticalCdf::Clayton { theta } => {
                (u.powf(-theta) + v.powf(-theta) - 1.0).powf(-1.0 / theta)
            }
            TheoreticalCdf::Gumbel { theta } => {
                let s = (-u.ln()).powf(*theta) + (-v.ln()).powf(*theta);
                (-s.powf(1.0 / theta)).exp()
            }
            TheoreticalCdf::Frank { theta } => {
                if theta.abs() < FRANK_INDEPENDENCE_EPS {
                    return u * v;
                }
                let em = (-theta).exp_m1();
                let emu = (-theta * u).exp_m1();
                let emv = (-theta * v).exp_m1();
                -(1.0 / theta) * (1.0 + emu * emv / em).ln()
            }
            TheoreticalCdf::Comonotonic => u.min(v),
        }
    }
}

/// Φ₂(h, k, ρ) = Φ(h)Φ(k) + (1/2π) ∫₀^ρ exp(−(h² − 2hks + k²)/(2(1 − s²)))
/// / √(1 − s²) ds, by Simpson's rule over the correlation.
pub fn bivariate_normal_cdf(h: f64, k: f64, rho: f64) -> f64 {
    let phi = crate::transform::kernel::standard_normal_cdf;
    if rho == 0.0 {
        return phi(h) * phi(k);
    }
    let integrand = |s: f64| {
        let omr = 1.0 - s * s;
        (-(h * h - 2.0 * h * k * s + k * k) / (2.0 * omr)).exp() / omr.sqrt()
    };
    let panels = 256;
    let step = rho / panels as f64;
    let mut total = integrand(0.0) + integrand(rho);
    for i in 1..panels {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        total += weight * integrand(i as f64 * step);
    }
    let integral = total * step / 3.0;
    (phi(h) * phi(k) + integral / (2.0 * std::f64::consts::PI)).clamp(0.0, 1.0)
}
