//! copula_select — copula family selection for longitudinal score pairs.
//!
//! Purpose
//! -------
//! Decide which bivariate copula family best describes the dependence
//! between students' prior and current assessment scores, across many
//! (dataset, grade-progression) conditions at once. The crate extracts
//! matched score pairs from long-format tables, rank-transforms them to
//! the copula scale, fits six candidate families by maximum
//! pseudo-likelihood, tests fit quality with a parametric-bootstrap
//! Cramér–von Mises statistic, and aggregates per-condition AIC rankings
//! into a single deterministic selection decision.
//!
//! Key behaviors
//! -------------
//! - Family selection always runs on empirical-rank pseudo-observations;
//!   smoothed (Bernstein / kernel) marginals exist for callers that need
//!   invertibility.
//! - Every stochastic step takes an explicit seed; batch results are
//!   reproducible regardless of thread scheduling.
//! - Per-condition insufficiency and per-family convergence failures
//!   degrade into a run manifest, never into batch failure.
//!
//! Conventions
//! -----------
//! - Copula parameters are reported on their natural scale; the
//!   unconstrained optimizer space is internal to `copula::fit`.
//! - The library emits `tracing` events but installs no subscriber;
//!   embedding applications choose their own.
//!
//! Downstream usage
//! ----------------
//! Typical callers build [`pipeline::BatchDataset`]s from CSV via
//! [`data::LongTable::from_csv_path`], configure a
//! [`pipeline::PipelineConfig`], and hand both to [`pipeline::run_batch`];
//! the returned records, manifest, and decision are all serde-serializable.

pub mod bootstrap;
pub mod copula;
pub mod data;
pub mod gof;
pub mod optimization;
pub mod pipeline;
pub mod select;
pub mod transform;
