//! Gaussian-kernel-smoothed CDF estimator.
use statrs::function::erf::erf;

use crate::transform::{
    bernstein::{bisect_cdf, clamp_unit},
    errors::{TransformError, TransformResult},
    validate_sample,
};

/// Fitted Gaussian-kernel CDF estimate.
///
/// `F̂(x) = (1/n) Σᵢ Φ((x − xᵢ)/h)` with a fixed bandwidth `h`. Unlike the
/// Bernstein fit this has unbounded support, so the inverse searches a
/// padded interval around the sample range.
#[derive(Debug, Clone)]
pub struct KernelCdf {
    xs: Vec<f64>,
    bandwidth: f64,
    min: f64,
    max: f64,
}

impl KernelCdf {
    /// Fit a kernel CDF; `bandwidth = None` uses Silverman's rule of thumb
    /// `h = 1.06 σ n^{-1/5}`.
    ///
    /// # Errors
    /// - Sample validation errors (empty, non-finite, degenerate).
    /// - [`TransformError::InvalidBandwidth`] for a non-positive or
    ///   non-finite explicit bandwidth.
    pub fn fit(xs: &[f64], bandwidth: Option<f64>) -> TransformResult<Self> {
        let (min, max) = validate_sample(xs)?;
        let h = match bandwidth {
            Some(h) if h.is_finite() && h > 0.0 => h,
            Some(h) => return Err(TransformError::InvalidBandwidth { bandwidth: h }),
            None => silverman_bandwidth(xs),
        };
        Ok(KernelCdf { xs: xs.to_vec(), bandwidth: h, min, max })
    }

    /// Bandwidth in use (explicit or Silverman).
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Evaluate the smoothed CDF, clamped to [ε, 1 − ε].
    pub fn forward(&self, x: f64) -> f64 {
        let n = self.xs.len() as f64;
        let total: f64 =
            self.xs.iter().map(|&xi| standard_normal_cdf((x - xi) / self.bandwidth)).sum();
        clamp_unit(total / n)
    }

    /// Invert the smoothed CDF by bisection over the padded sample range.
    ///
    /// # Errors
    /// [`TransformError::ProbabilityOutOfRange`] if `p` is outside (0, 1).
    pub fn inverse(&self, p: f64) -> TransformResult<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(TransformError::ProbabilityOutOfRange { value: p });
        }
        // 8 bandwidths of padding puts the clamp band outside the bracket.
        let lo = self.min - 8.0 * self.bandwidth;
        let hi = self.max + 8.0 * self.bandwidth;
        Ok(bisect_cdf(|x| self.forward(x), p, lo, hi))
    }
}

/// Silverman's rule-of-thumb bandwidth, `1.06 σ n^{-1/5}` with the sample
/// standard deviation. The caller guarantees a non-degenerate sample.
fn silverman_bandwidth(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = xs.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);
    1.06 * var.sqrt() * n.powf(-0.2)
}

/// Φ(z) via the error function.
pub(crate) fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

#[cfg(test)]
mod tests {
    /*
    Scope
    -----
    Bandwidth defaulting, monotonicity, and round-trip of the kernel CDF.
    */
    use super::*;

    fn sample() -> Vec<f64> {
        (0..150).map(|i| (i as f64 * 0.73).sin() * 3.0 + i as f64 * 0.02).collect()
    }

    #[test]
    // Purpose: Silverman default matches the formula on a known sample.
    fn silverman_default_matches_formula() {
        let xs = sample();
        let cdf = KernelCdf::fit(&xs, None).unwrap();
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let sd =
            (xs.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
        let expected = 1.06 * sd * n.powf(-0.2);
        assert!((cdf.bandwidth() - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose: forward is monotone and interior to (0, 1).
    fn forward_monotone_and_interior() {
        let cdf = KernelCdf::fit(&sample(), None).unwrap();
        let mut prev = 0.0;
        for i in -20..=20 {
            let x = i as f64 * 0.5;
            let p = cdf.forward(x);
            assert!(p >= prev && p >= 1e-6 && p <= 1.0 - 1e-6);
            prev = p;
        }
    }

    #[test]
    // Purpose: inverse(forward(x)) recovers x within tolerance.
    fn round_trip_within_tolerance() {
        let cdf = KernelCdf::fit(&sample(), Some(0.5)).unwrap();
        for &x in &[-2.0, -0.5, 0.0, 1.0, 2.5] {
            let back = cdf.inverse(cdf.forward(x)).unwrap();
            assert!((back - x).abs() < 1e-6, "round trip at {x} gave {back}");
        }
    }

    #[test]
    // Purpose: the training sample pushed through a Silverman-bandwidth
    // fit has a near-uniform margin (Kolmogorov-Smirnov distance to the
    // uniform CDF stays within the smoothing-bias budget).
    fn transformed_margin_is_near_uniform() {
        use statrs::distribution::{ContinuousCDF, Normal};

        let normal = Normal::new(500.0, 50.0).unwrap();
        let xs: Vec<f64> =
            (0..400).map(|i| normal.inverse_cdf((i as f64 + 0.5) / 400.0)).collect();
        let cdf = KernelCdf::fit(&xs, None).unwrap();

        let mut us: Vec<f64> = xs.iter().map(|&x| cdf.forward(x)).collect();
        us.sort_by(f64::total_cmp);
        let n = us.len() as f64;
        let d = us
            .iter()
            .enumerate()
            .map(|(i, &u)| {
                let above = (i as f64 + 1.0) / n - u;
                let below = u - i as f64 / n;
                above.abs().max(below.abs())
            })
            .fold(0.0, f64::max);
        assert!(d < 0.05, "KS distance to uniform = {d}");
    }

    #[test]
    // Purpose: non-positive explicit bandwidth is rejected.
    fn rejects_bad_bandwidth() {
        assert!(matches!(
            KernelCdf::fit(&sample(), Some(0.0)),
            Err(TransformError::InvalidBandwidth { .. })
        ));
    }
}
