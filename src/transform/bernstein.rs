//! Bernstein polynomial CDF estimator.
//!
//! Smooths the empirical CDF with a degree-m Bernstein polynomial over the
//! sample range. Coefficients are the empirical CDF evaluated at m + 1
//! equispaced knots, projected to a monotone sequence with the endpoints
//! pinned to 0 and 1, so the fitted curve is a genuine CDF on [min, max].
use statrs::function::gamma::ln_gamma;

use crate::transform::{
    errors::{TransformError, TransformResult},
    validate_sample, CLAMP_EPS,
};

/// Fitted Bernstein polynomial CDF over the sample range.
#[derive(Debug, Clone)]
pub struct BernsteinCdf {
    min: f64,
    max: f64,
    /// Monotone coefficients, length degree + 1, endpoints 0 and 1.
    coeffs: Vec<f64>,
}

impl BernsteinCdf {
    /// Fit a degree-`degree` Bernstein CDF to a sample.
    ///
    /// # Errors
    /// - [`TransformError::InvalidDegree`] if `degree == 0`.
    /// - Sample validation errors (empty, non-finite, degenerate).
    pub fn fit(xs: &[f64], degree: usize) -> TransformResult<Self> {
        if degree == 0 {
            return Err(TransformError::InvalidDegree { degree });
        }
        let (min, max) = validate_sample(xs)?;

        let n = xs.len() as f64;
        let mut coeffs = Vec::with_capacity(degree + 1);
        for k in 0..=degree {
            let knot = min + (max - min) * (k as f64 / degree as f64);
            let below = xs.iter().filter(|&&x| x <= knot).count() as f64;
            coeffs.push(below / n);
        }
        // Monotone projection: running maximum, then pin the endpoints.
        for k in 1..=degree {
            if coeffs[k] < coeffs[k - 1] {
                coeffs[k] = coeffs[k - 1];
            }
        }
        coeffs[0] = 0.0;
        coeffs[degree] = 1.0;

        Ok(BernsteinCdf { min, max, coeffs })
    }

    /// Evaluate the fitted CDF, clamped to [ε, 1 − ε].
    pub fn forward(&self, x: f64) -> f64 {
        let s = ((x - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        clamp_unit(self.bernstein_sum(s))
    }

    /// Invert the fitted CDF by bisection over the sample range.
    ///
    /// # Errors
    /// [`TransformError::ProbabilityOutOfRange`] if `p` is outside (0, 1).
    pub fn inverse(&self, p: f64) -> TransformResult<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(TransformError::ProbabilityOutOfRange { value: p });
        }
        Ok(bisect_cdf(|x| self.forward(x), p, self.min, self.max))
    }

    /// Σ_k c_k · C(m, k) s^k (1 − s)^{m − k}, evaluated in log space so
    /// large degrees do not overflow the binomial coefficient.
    fn bernstein_sum(&self, s: f64) -> f64 {
        let m = self.coeffs.len() - 1;
        if s <= 0.0 {
            return self.coeffs[0];
        }
        if s >= 1.0 {
            return self.coeffs[m];
        }
        let ln_s = s.ln();
        let ln_1ms = (1.0 - s).ln();
        let ln_fact_m = ln_gamma(m as f64 + 1.0);
        let mut total = 0.0;
        for (k, &c) in self.coeffs.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let ln_binom =
                ln_fact_m - ln_gamma(k as f64 + 1.0) - ln_gamma((m - k) as f64 + 1.0);
            let ln_weight = ln_binom + k as f64 * ln_s + (m - k) as f64 * ln_1ms;
            total += c * ln_weight.exp();
        }
        total
    }
}

/// Clamp a probability to the interior band [ε, 1 − ε].
pub(crate) fn clamp_unit(p: f64) -> f64 {
    p.clamp(CLAMP_EPS, 1.0 - CLAMP_EPS)
}

/// Bisection solve of `cdf(x) = p` for a nondecreasing `cdf` on [lo, hi].
pub(crate) fn bisect_cdf<F: Fn(f64) -> f64>(cdf: F, p: f64, mut lo: f64, mut hi: f64) -> f64 {
    for _ in 0..80 {
        let mid = 0.5 * (lo + hi);
        if cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    /*
    Scope
    -----
    Monotonicity, endpoint clamping, and forward/inverse round-trip of the
    Bernstein CDF on a smooth synthetic sample.
    */
    use super::*;

    fn smooth_sample() -> Vec<f64> {
        // Deterministic spread over [0, 10] with mild clustering.
        (0..200).map(|i| 10.0 * ((i as f64 + 0.5) / 200.0).powf(1.3)).collect()
    }

    #[test]
    // Purpose: forward is nondecreasing across the sample range.
    fn forward_is_monotone() {
        let cdf = BernsteinCdf::fit(&smooth_sample(), 30).unwrap();
        let mut prev = 0.0;
        for i in 0..=100 {
            let x = 10.0 * i as f64 / 100.0;
            let p = cdf.forward(x);
            assert!(p >= prev, "forward dropped at x = {x}: {p} < {prev}");
            prev = p;
        }
    }

    #[test]
    // Purpose: forward clamps to [1e-6, 1 - 1e-6] at and beyond the range.
    fn forward_clamps_at_range_edges() {
        let cdf = BernsteinCdf::fit(&smooth_sample(), 20).unwrap();
        assert_eq!(cdf.forward(-5.0), 1e-6);
        assert_eq!(cdf.forward(50.0), 1.0 - 1e-6);
    }

    #[test]
    // Purpose: inverse(forward(x)) recovers x within tolerance away from
    // the range edges.
    fn round_trip_within_tolerance() {
        let cdf = BernsteinCdf::fit(&smooth_sample(), 40).unwrap();
        for &x in &[1.0, 3.0, 5.0, 7.0, 9.0] {
            let back = cdf.inverse(cdf.forward(x)).unwrap();
            assert!((back - x).abs() < 1e-3, "round trip at {x} gave {back}");
        }
    }

    #[test]
    // Purpose: pushing the training sample through an adequately flexible
    // fit leaves the margin close to Uniform(0, 1); a coarse fit distorts
    // it. Closeness is measured as the Kolmogorov-Smirnov distance between
    // the transformed sample and the uniform CDF.
    fn transformed_margin_is_near_uniform() {
        use statrs::distribution::{ContinuousCDF, Normal};

        let normal = Normal::new(500.0, 50.0).unwrap();
        let xs: Vec<f64> =
            (0..400).map(|i| normal.inverse_cdf((i as f64 + 0.5) / 400.0)).collect();

        let fit = |degree: usize| {
            let cdf = BernsteinCdf::fit(&xs, degree).unwrap();
            ks_to_uniform(xs.iter().map(|&x| cdf.forward(x)).collect())
        };
        let d_fine = fit(50);
        assert!(d_fine < 0.05, "KS distance to uniform = {d_fine}");
        // Too little flexibility visibly bends the margin.
        assert!(fit(2) > d_fine);
    }

    fn ks_to_uniform(mut us: Vec<f64>) -> f64 {
        us.sort_by(f64::total_cmp);
        let n = us.len() as f64;
        us.iter()
            .enumerate()
            .map(|(i, &u)| {
                let above = (i as f64 + 1.0) / n - u;
                let below = u - i as f64 / n;
                above.abs().max(below.abs())
            })
            .fold(0.0, f64::max)
    }

    #[test]
    // Purpose: invalid inputs are rejected with the matching error.
    fn rejects_invalid_inputs() {
        assert!(matches!(
            BernsteinCdf::fit(&[1.0, 2.0], 0),
            Err(TransformError::InvalidDegree { degree: 0 })
        ));
        assert!(matches!(
            BernsteinCdf::fit(&[3.0, 3.0, 3.0], 5),
            Err(TransformError::DegenerateSample { .. })
        ));
        let cdf = BernsteinCdf::fit(&smooth_sample(), 10).unwrap();
        assert!(matches!(cdf.inverse(1.0), Err(TransformError::ProbabilityOutOfRange { .. })));
    }
}
