//! copula — candidate dependence families and their fitting machinery.
//!
//! Purpose
//! -------
//! Everything family-specific lives here: the [`CopulaFamily`] vocabulary,
//! per-point log-densities, model-implied Kendall τ and tail-dependence
//! formulas, seeded simulation, and maximum pseudo-likelihood fitting into
//! a [`CopulaFit`].
//!
//! Key behaviors
//! -------------
//! - Fitting maximizes ℓ(θ) through the shared optimizer; parameter-domain
//!   constraints are handled by smooth unconstrained maps, not boxes.
//! - The comonotonic reference model never optimizes and always loses on
//!   its fixed sentinel AIC.
//! - The empirical τ runs in O(n log n) via Knight's algorithm, with the
//!   τ_b tie correction.
//!
//! Downstream usage
//! ----------------
//! `gof` simulates and refits through this module's public surface;
//! `select` consumes the AIC/BIC carried on [`CopulaFit`]; `bootstrap`
//! refits families on resampled margins.

pub mod density;
pub mod dependence;
pub mod errors;
pub mod family;
pub mod fit;
pub mod simulate;

pub use self::dependence::{debye1, empirical_tau, frank_tau, model_tau, tail_dependence};
pub use self::errors::{FitError, FitResult};
pub use self::family::CopulaFamily;
pub use self::fit::{fit_all, fit_family, natural_params, CopulaFit, PseudoSample, COMONOTONIC_AIC};
pub use self::simulate::simulate;
