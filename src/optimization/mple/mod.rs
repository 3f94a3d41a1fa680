//! mple — argmin-powered maximum pseudo-likelihood estimation.
//!
//! Purpose
//! -------
//! Maximize a pseudo-log-likelihood ℓ(θ) for a copula family. Callers
//! implement [`LogLikelihood`] over their pseudo-observation payload and
//! invoke [`maximize`], which runs L-BFGS with a configurable line search
//! and finite-difference gradient fallback.
//!
//! Key behaviors
//! -------------
//! - Convert ℓ(θ) into an argmin-compatible cost `c(θ) = -ℓ(θ)` via
//!   [`adapter::ArgminAdapter`].
//! - Validate the initial guess with [`LogLikelihood::check`] before any
//!   solver work starts.
//! - Select an L-BFGS solver via [`builders`] based on the configured
//!   [`traits::LineSearcher`], execute it in [`run::run_lbfgs`], and
//!   normalize results into an [`OptimOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - θ lives in an unconstrained space; the family layer owns the map into
//!   each copula's parameter domain (see `optimization::stability`).
//! - `value` treats invalid inputs as recoverable
//!   [`crate::optimization::errors::OptError`] values, never panics.
//! - All user-facing values, including [`OptimOutcome::value`], are in
//!   ℓ-space; the sign flip is internal.

pub mod adapter;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::traits::{LineSearcher, LogLikelihood, MpleOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

use crate::optimization::errors::OptResult;
use adapter::ArgminAdapter;
use builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente};
use run::run_lbfgs;

/// Maximize a pseudo-log-likelihood ℓ(θ) with L-BFGS.
///
/// Validates the initial guess via `f.check`, wraps `(f, data)` in an
/// [`ArgminAdapter`] exposing the minimization problem `c(θ) = -ℓ(θ)`, and
/// runs the solver selected by `opts.line_searcher`.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors (invalid tolerances).
/// - Propagates runtime solver errors (e.g. line-search failures).
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MpleOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgminAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
