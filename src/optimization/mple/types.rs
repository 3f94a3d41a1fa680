//! Shared numeric aliases and solver wiring for the MPLE layer.
//!
//! Centralizing these aliases keeps the rest of the optimizer agnostic to
//! `ndarray` and argmin generics: parameter vectors, gradients, and scalar
//! costs all flow through [`Theta`], [`Grad`], and [`Cost`], and concrete
//! L-BFGS solvers are instantiated through the pre-wired aliases below.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector θ in the unconstrained optimizer space.
pub type Theta = Array1<f64>;

/// Gradient vector ∇ℓ(θ) or ∇c(θ), matching the shape of [`Theta`].
pub type Grad = Array1<f64>;

/// Scalar objective value; internally always the cost `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver
/// (e.g. `"cost_count"`, `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
