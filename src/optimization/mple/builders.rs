//! L-BFGS solver construction helpers.
//!
//! Small builders that hide argmin's generic wiring: construct an L-BFGS
//! solver with the requested line search, apply optional tolerances from
//! [`MpleOptions`], and leave the initial parameter vector and iteration cap
//! to the runner. Invalid tolerances surface as [`crate::optimization::
//! errors::OptError`] through the crate's `From<argmin::core::Error>`.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    mple::{
        traits::MpleOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct L-BFGS with Hager–Zhang line search.
///
/// Consults `opts.lbfgs_mem` (falling back to [`DEFAULT_LBFGS_MEM`]) and the
/// optional tolerances in `opts.tols`. Initial parameters and `max_iters`
/// are runtime concerns applied by the runner.
///
/// # Errors
/// Returns an error if argmin rejects a tolerance setting.
pub fn build_optimizer_hager_zhang(opts: &MpleOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search.
///
/// # Errors
/// Returns an error if argmin rejects a tolerance setting.
pub fn build_optimizer_more_thuente(opts: &MpleOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional tolerances to an L-BFGS solver, generic over the
/// line-search type. When a tolerance is `None` the corresponding
/// `with_tolerance_*` call is skipped and argmin's default stays in effect.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MpleOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::mple::traits::{LineSearcher, MpleOptions, Tolerances};

    #[test]
    // Both builders must succeed with default memory and with an explicit
    // memory setting, given valid tolerances.
    fn builders_accept_default_and_explicit_memory() {
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).unwrap();
        let default_mem = MpleOptions::new(tols, LineSearcher::HagerZhang, None).unwrap();
        assert!(build_optimizer_hager_zhang(&default_mem).is_ok());

        let explicit = MpleOptions::new(tols, LineSearcher::MoreThuente, Some(11)).unwrap();
        assert!(build_optimizer_more_thuente(&explicit).is_ok());
    }

    #[test]
    // Absent tolerances leave argmin defaults in effect without erroring.
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        let opts = MpleOptions::new(tols, LineSearcher::MoreThuente, None).unwrap();
        assert!(configure_lbfgs(raw, &opts).is_ok());
    }
}
