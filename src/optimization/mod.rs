//! Numerical optimization layer for maximum pseudo-likelihood fitting.
//!
//! Purpose
//! -------
//! Provide the argmin-backed machinery that turns a copula family's
//! pseudo-log-likelihood ℓ(θ) into a solved estimate θ̂. Family code
//! implements [`mple::LogLikelihood`] and calls [`mple::maximize`]; this
//! module owns solver construction, gradient fallbacks, validation, and the
//! error taxonomy shared by everything that optimizes.
//!
//! Key behaviors
//! -------------
//! - L-BFGS with a selectable line search (More–Thuente or Hager–Zhang).
//! - Finite-difference gradients of the cost when no analytic gradient is
//!   supplied — the copula densities here never supply one.
//! - Stable constrained↔unconstrained parameter maps in [`stability`], used
//!   by the family layer to keep θ inside each copula's domain.
//!
//! Conventions
//! -----------
//! - We always *maximize* ℓ(θ) by minimizing `c(θ) = -ℓ(θ)`; all public
//!   values (including [`mple::OptimOutcome::value`]) are in ℓ-space.
//! - Errors surface as [`errors::OptError`] via [`errors::OptResult`]; argmin
//!   errors are downcast at the boundary and never leak.

pub mod errors;
pub mod mple;
pub mod stability;
