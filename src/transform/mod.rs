//! transform — marginal transforms to the copula scale.
//!
//! Purpose
//! -------
//! Map raw scale scores into (0, 1) pseudo-observations. Family selection
//! always runs on plain empirical ranks ([`pseudo_observations`]); the two
//! smoothed estimators ([`BernsteinCdf`], [`KernelCdf`]) serve callers that
//! also need an invertible marginal, e.g. for simulation back onto the
//! score scale.
//!
//! Key behaviors
//! -------------
//! - Rank transform: average-tie ranks scaled by 1/(n + 1), strictly
//!   interior to (0, 1) by construction.
//! - Smoothed transforms clamp their output to [ε, 1 − ε] with ε = 1e-6
//!   and invert by bisection.
//!
//! Invariants & assumptions
//! ------------------------
//! - Samples are validated once (non-empty, finite, non-degenerate) before
//!   any estimator is fit.
//! - Fitted estimators are immutable; `forward` never fails.
//!
//! Testing notes
//! -------------
//! Unit tests cover the exact rank grid, monotonicity, clamping,
//! forward/inverse round-trips, and near-uniformity of each smoothed
//! estimator's transformed margin; the integration suite runs family
//! selection under both the rank and Bernstein transforms.

pub mod bernstein;
pub mod errors;
pub mod kernel;
pub mod ranks;

pub use self::bernstein::BernsteinCdf;
pub use self::errors::{TransformError, TransformResult};
pub use self::kernel::KernelCdf;
pub use self::ranks::pseudo_observations;

/// Interior clamp band for smoothed CDF output.
pub const CLAMP_EPS: f64 = 1e-6;

/// Validate a sample for CDF estimation and return its (min, max).
///
/// # Errors
/// - [`TransformError::EmptySample`] for empty input.
/// - [`TransformError::NonFiniteValue`] for NaN/infinite entries.
/// - [`TransformError::DegenerateSample`] when min == max.
pub(crate) fn validate_sample(xs: &[f64]) -> TransformResult<(f64, f64)> {
    if xs.is_empty() {
        return Err(TransformError::EmptySample);
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (index, &x) in xs.iter().enumerate() {
        if !x.is_finite() {
            return Err(TransformError::NonFiniteValue { index, value: x });
        }
        min = min.min(x);
        max = max.max(x);
    }
    if min == max {
        return Err(TransformError::DegenerateSample { value: min });
    }
    Ok((min, max))
}
