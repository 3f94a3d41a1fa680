//! Execution helper that runs an argmin solver on a pseudo-likelihood
//! problem and returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    mple::{
        adapter::ArgminAdapter,
        traits::{LogLikelihood, MpleOptions, OptimOutcome},
        types::{Grad, Theta},
    },
};
use argmin::core::{Executor, State};

/// Run an argmin optimization for a pseudo-likelihood problem.
///
/// Shared runner for both line-search variants: wires the adapted problem
/// and a fully constructed solver into an `Executor`, sets the initial
/// parameter vector and the optional iteration cap, executes, and converts
/// the terminal state into an [`OptimOutcome`] (flipping the best cost back
/// into ℓ-space).
///
/// # Errors
/// - Propagates any argmin runtime error (solver or line-search failures)
///   via the crate's `From<argmin::core::Error>` conversion.
/// - Propagates validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MpleOptions, problem: ArgminAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgminAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}
