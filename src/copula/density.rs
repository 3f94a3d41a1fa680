//! Per-point copula log-densities on the natural parameter scale.
//!
//! Callers validate parameter domains once per evaluation; these functions
//! assume a valid parameter and interior pseudo-observations, and stay
//! finite there. The Frank density treats |θ| below
//! [`FRANK_INDEPENDENCE_EPS`] as exact independence to avoid catastrophic
//! cancellation near θ = 0.
use statrs::function::gamma::ln_gamma;

/// Below this |θ| the Frank copula is evaluated as independence.
pub const FRANK_INDEPENDENCE_EPS: f64 = 1e-4;

/// Gaussian copula log-density in terms of the normal scores
/// `zu = Φ⁻¹(u)`, `zv = Φ⁻¹(v)`. Requires |ρ| < 1.
pub fn gaussian_log_density(rho: f64, zu: f64, zv: f64) -> f64 {
    let r2 = rho * rho;
    let denom = 1.0 - r2;
    -0.5 * denom.ln() - (r2 * (zu * zu + zv * zv) - 2.0 * rho * zu * zv) / (2.0 * denom)
}

/// Student-t copula log-density in terms of the t-scores
/// `tu = T_ν⁻¹(u)`, `tv = T_ν⁻¹(v)`. Requires |ρ| < 1 and ν > 0.
pub fn t_log_density(rho: f64, nu: f64, tu: f64, tv: f64) -> f64 {
    let denom = 1.0 - rho * rho;
    let quad = (tu * tu - 2.0 * rho * tu * tv + tv * tv) / (nu * denom);
    ln_gamma((nu + 2.0) / 2.0) + ln_gamma(nu / 2.0)
        - 2.0 * ln_gamma((nu + 1.0) / 2.0)
        - 0.5 * denom.ln()
        - 0.5 * (nu + 2.0) * (1.0 + quad).ln()
        + 0.5 * (nu + 1.0) * ((1.0 + tu * tu / nu).ln() + (1.0 + tv * tv / nu).ln())
}

/// Clayton copula log-density. Requires θ > 0.
pub fn clayton_log_density(theta: f64, u: f64, v: f64) -> f64 {
    let s = u.powf(-theta) + v.powf(-theta) - 1.0;
    (1.0 + theta).ln() - (1.0 + theta) * (u.ln() + v.ln()) - (2.0 + 1.0 / theta) * s.ln()
}

/// Gumbel copula log-density. Requires θ ≥ 1.
///
/// With ũ = −ln u, ṽ = −ln v, S = ũ^θ + ṽ^θ and A = S^{1/θ}:
/// c(u, v) = exp(−A) (ũṽ)^{θ−1} S^{1/θ−2} (A + θ − 1) / (uv).
pub fn gumbel_log_density(theta: f64, u: f64, v: f64) -> f64 {
    let ut = -u.ln();
    let vt = -v.ln();
    let s = ut.powf(theta) + vt.powf(theta);
    let a = s.powf(1.0 / theta);
    -a + (theta - 1.0) * (ut.ln() + vt.ln()) + (1.0 / theta - 2.0) * s.ln()
        + (a + theta - 1.0).ln()
        - u.ln()
        - v.ln()
}

/// Frank copula log-density. Requires θ ≠ 0; |θ| below
/// [`FRANK_INDEPENDENCE_EPS`] evaluates as independence (log-density 0).
pub fn frank_log_density(theta: f64, u: f64, v: f64) -> f64 {
    if theta.abs() < FRANK_INDEPENDENCE_EPS {
        return 0.0;
    }
    // c = θ(1 − e^{−θ}) e^{−θ(u+v)} / [(1 − e^{−θ}) − (1 − e^{−θu})(1 − e^{−θv})]²
    // The numerator factor θ(1 − e^{−θ}) is positive for either sign of θ.
    let em = -(-theta).exp_m1();
    let emu = -(-theta * u).exp_m1();
    let emv = -(-theta * v).exp_m1();
    (theta * em).ln() - theta * (u + v) - 2.0 * (em - emu * emv).abs().ln()
}

#[cfg(test)]
mod tests {
    /*
    Scope
    -----
    Spot checks of the log-densities: independence limits, symmetry, and
    agreement with directly computed reference values.
    */
    use super::*;

    #[test]
    // Purpose: at ρ = 0 the Gaussian copula density is 1 everywhere.
    fn gaussian_independence_limit() {
        for &(zu, zv) in &[(0.0, 0.0), (1.3, -0.4), (-2.0, 2.0)] {
            assert!(gaussian_log_density(0.0, zu, zv).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose: Gaussian log-density matches a direct evaluation of the
    // closed form at ρ = 0.5, z = (1, 1).
    fn gaussian_matches_reference() {
        let rho: f64 = 0.5;
        let z = 1.0;
        let expected = -0.5 * (1.0f64 - 0.25).ln()
            - (0.25 * 2.0 - 2.0 * rho) * z * z / (2.0 * 0.75);
        assert!((gaussian_log_density(rho, z, z) - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose: all exchangeable densities are symmetric in (u, v).
    fn densities_are_exchangeable() {
        let (u, v) = (0.3, 0.7);
        assert!((clayton_log_density(2.0, u, v) - clayton_log_density(2.0, v, u)).abs() < 1e-12);
        assert!((gumbel_log_density(1.5, u, v) - gumbel_log_density(1.5, v, u)).abs() < 1e-12);
        assert!((frank_log_density(4.0, u, v) - frank_log_density(4.0, v, u)).abs() < 1e-12);
        assert!((t_log_density(0.4, 5.0, 1.0, -0.5) - t_log_density(0.4, 5.0, -0.5, 1.0)).abs()
            < 1e-12);
    }

    #[test]
    // Purpose: tiny |θ| Frank evaluates as exact independence.
    fn frank_near_zero_is_independence() {
        assert_eq!(frank_log_density(1e-6, 0.2, 0.9), 0.0);
        assert_eq!(frank_log_density(-1e-6, 0.2, 0.9), 0.0);
    }

    #[test]
    // Purpose: Clayton log-density at theta = 1, u = v = 0.5, expanded by
    // hand: s = 2 + 2 - 1 = 3, ln c = ln 2 - 2(ln u + ln v) - 3 ln 3
    //     = 5 ln 2 - 3 ln 3.
    fn clayton_matches_reference() {
        let expected = 5.0 * 2.0f64.ln() - 3.0 * 3.0f64.ln();
        let got = clayton_log_density(1.0, 0.5, 0.5);
        assert!((got - expected).abs() < 1e-12, "got {got}, expected {expected}");
    }
}
