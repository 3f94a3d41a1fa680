//! pipeline — batch execution over (dataset × condition) units.
//!
//! Purpose
//! -------
//! Drive the whole engine: validate a run configuration once, fan the
//! independent (dataset, condition) units out over rayon, and merge the
//! per-unit outputs into the flat record list, the run manifest, and the
//! batch-level selection decision.
//!
//! Key behaviors
//! -------------
//! - Each unit owns its pairs, transform, fits, and GoF; no mutable state
//!   is shared across units, so the fan-out is a plain `par_iter`.
//! - Unit u derives its seed as `base_seed.wrapping_add(u)`, where u is
//!   the unit's position in the flattened (dataset, condition) order, so
//!   batch results are independent of thread scheduling.
//! - The GoF bootstrap inside a unit runs serially; unit-level parallelism
//!   is the only pool in play.
//! - Insufficient data and per-family fit failures degrade into manifest
//!   entries, never into batch failure.
//!
//! Conventions
//! -----------
//! [`PipelineConfig::new`] is the only constructor; a config that exists
//! has already passed validation.

pub mod errors;

pub use self::errors::{ConfigError, ConfigResult, PipelineError, PipelineResult};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::copula::{fit_all, CopulaFamily};
use crate::data::{extract_pairs, ConditionSpec, LongTable, ScorePair};
use crate::gof::{test_gof, GofOptions};
use crate::optimization::mple::MpleOptions;
use crate::select::{aggregate, Aggregation, FitRecord};
use crate::transform::{pseudo_observations, BernsteinCdf, KernelCdf};

/// Default minimum matched-pair count for a condition to be fit.
pub const DEFAULT_MIN_PAIRS: usize = 100;

/// Marginal transform applied to each unit's score margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Average-tie ranks scaled by 1/(n + 1). The methodological default.
    Ranks,
    /// Bernstein polynomial CDF of the given degree.
    Bernstein { degree: usize },
    /// Gaussian-kernel CDF; `None` bandwidth uses Silverman's rule.
    Kernel { bandwidth: Option<f64> },
}

/// Validated batch configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    families: Vec<CopulaFamily>,
    transform: TransformKind,
    n_gof_bootstrap: usize,
    base_seed: u64,
    min_pairs: usize,
    mple: MpleOptions,
}

impl PipelineConfig {
    /// Validate and freeze a configuration. `min_pairs = None` uses
    /// [`DEFAULT_MIN_PAIRS`].
    ///
    /// # Errors
    /// Any [`ConfigError`]; configuration problems are fatal and abort
    /// before the batch starts.
    pub fn new(
        families: Vec<CopulaFamily>, transform: TransformKind, n_gof_bootstrap: usize,
        base_seed: u64, min_pairs: Option<usize>, mple: MpleOptions,
    ) -> ConfigResult<Self> {
        if families.is_empty() {
            return Err(ConfigError::NoFamilies);
        }
        let min_pairs = min_pairs.unwrap_or(DEFAULT_MIN_PAIRS);
        if min_pairs < 10 {
            return Err(ConfigError::MinPairsTooSmall { min_pairs });
        }
        match transform {
            TransformKind::Bernstein { degree } if degree == 0 => {
                return Err(ConfigError::InvalidBernsteinDegree { degree });
            }
            TransformKind::Kernel { bandwidth: Some(h) } if !(h.is_finite() && h > 0.0) => {
                return Err(ConfigError::InvalidBandwidth { bandwidth: h });
            }
            _ => {}
        }
        Ok(PipelineConfig { families, transform, n_gof_bootstrap, base_seed, min_pairs, mple })
    }

    pub fn families(&self) -> &[CopulaFamily] {
        &self.families
    }

    pub fn min_pairs(&self) -> usize {
        self.min_pairs
    }
}

/// One dataset with its conditions to sweep.
#[derive(Debug, Clone)]
pub struct BatchDataset {
    pub dataset_id: String,
    pub table: LongTable,
    pub conditions: Vec<ConditionSpec>,
}

/// A unit skipped for lack of data (or an unusable margin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsufficientUnit {
    pub dataset_id: String,
    pub condition_id: String,
    pub n_pairs: usize,
    pub reason: String,
}

/// One family that failed to fit on one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFailure {
    pub dataset_id: String,
    pub condition_id: String,
    pub family: CopulaFamily,
    pub error: String,
}

/// What happened to every unit in the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// (dataset_id, condition_id) of units that produced records.
    pub succeeded: Vec<(String, String)>,
    pub insufficient: Vec<InsufficientUnit>,
    pub fit_failures: Vec<FitFailure>,
    /// Records the aggregator rejected for non-finite AIC.
    pub rejected_records: Vec<FitRecord>,
}

/// Merged output of a batch run.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub records: Vec<FitRecord>,
    pub manifest: RunManifest,
    /// `None` when no unit produced a usable record.
    pub aggregation: Option<Aggregation>,
}

struct UnitOutcome {
    records: Vec<FitRecord>,
    insufficient: Option<InsufficientUnit>,
    failures: Vec<FitFailure>,
}

/// Run the full batch: extract, transform, fit, test, aggregate.
///
/// # Errors
/// [`PipelineError::NoUnits`] when the datasets carry no conditions at
/// all. Everything below that degrades into the manifest.
pub fn run_batch(
    datasets: &[BatchDataset], config: &PipelineConfig,
) -> PipelineResult<BatchOutput> {
    let units: Vec<(usize, &BatchDataset, &ConditionSpec)> = datasets
        .iter()
        .flat_map(|dataset| dataset.conditions.iter().map(move |spec| (dataset, spec)))
        .enumerate()
        .map(|(index, (dataset, spec))| (index, dataset, spec))
        .collect();
    if units.is_empty() {
        return Err(PipelineError::NoUnits);
    }

    let outcomes: Vec<UnitOutcome> = units
        .par_iter()
        .map(|&(index, dataset, spec)| run_unit(index, dataset, spec, config))
        .collect();

    let mut records = Vec::new();
    let mut manifest = RunManifest::default();
    for (outcome, &(_, dataset, spec)) in outcomes.into_iter().zip(&units) {
        if !outcome.records.is_empty() {
            manifest.succeeded.push((dataset.dataset_id.clone(), spec.id()));
        }
        records.extend(outcome.records);
        if let Some(unit) = outcome.insufficient {
            manifest.insufficient.push(unit);
        }
        manifest.fit_failures.extend(outcome.failures);
    }

    let aggregation = if records.is_empty() {
        None
    } else {
        match aggregate(&records) {
            Ok(mut agg) => {
                manifest.rejected_records = std::mem::take(&mut agg.rejected);
                Some(agg)
            }
            Err(err) => {
                warn!(error = %err, "aggregation produced no decision");
                None
            }
        }
    };

    info!(
        units = units.len(),
        succeeded = manifest.succeeded.len(),
        insufficient = manifest.insufficient.len(),
        fit_failures = manifest.fit_failures.len(),
        records = records.len(),
        "batch complete"
    );
    Ok(BatchOutput { records, manifest, aggregation })
}

/// Execute one (dataset, condition) unit end to end.
fn run_unit(
    unit_index: usize, dataset: &BatchDataset, spec: &ConditionSpec, config: &PipelineConfig,
) -> UnitOutcome {
    let unit_seed = config.base_seed.wrapping_add(unit_index as u64);
    let pairs = extract_pairs(&dataset.table, spec);
    if pairs.len() < config.min_pairs {
        info!(
            dataset = %dataset.dataset_id,
            condition = %spec.id(),
            n_pairs = pairs.len(),
            min_pairs = config.min_pairs,
            "condition skipped, too few matched pairs"
        );
        return UnitOutcome {
            records: Vec::new(),
            insufficient: Some(InsufficientUnit {
                dataset_id: dataset.dataset_id.clone(),
                condition_id: spec.id(),
                n_pairs: pairs.len(),
                reason: "too few matched pairs".to_owned(),
            }),
            failures: Vec::new(),
        };
    }

    let (u, v) = match transform_margins(&pairs, config.transform) {
        Ok(margins) => margins,
        Err(reason) => {
            warn!(
                dataset = %dataset.dataset_id,
                condition = %spec.id(),
                reason = %reason,
                "condition skipped, margin transform failed"
            );
            return UnitOutcome {
                records: Vec::new(),
                insufficient: Some(InsufficientUnit {
                    dataset_id: dataset.dataset_id.clone(),
                    condition_id: spec.id(),
                    n_pairs: pairs.len(),
                    reason,
                }),
                failures: Vec::new(),
            };
        }
    };

    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (family, result) in fit_all(&u, &v, &config.families, &config.mple) {
        match result {
            Ok(fit) => {
                let gof = if config.n_gof_bootstrap > 0 {
                    let gof_opts = GofOptions {
                        n_bootstrap: config.n_gof_bootstrap,
                        seed: unit_seed,
                        mple: config.mple.clone(),
                    };
                    match test_gof(&fit, &u, &v, &gof_opts) {
                        Ok(outcome) => Some(outcome),
                        Err(err) => {
                            warn!(
                                dataset = %dataset.dataset_id,
                                condition = %spec.id(),
                                family = %family,
                                error = %err,
                                "goodness-of-fit failed, recording fit without it"
                            );
                            None
                        }
                    }
                } else {
                    None
                };
                records.push(FitRecord::from_fit(&dataset.dataset_id, spec, &fit, gof.as_ref()));
            }
            Err(err) => {
                failures.push(FitFailure {
                    dataset_id: dataset.dataset_id.clone(),
                    condition_id: spec.id(),
                    family,
                    error: err.to_string(),
                });
            }
        }
    }
    UnitOutcome { records, insufficient: None, failures }
}

/// Split pairs into margins and push both through the configured transform.
fn transform_margins(
    pairs: &[ScorePair], kind: TransformKind,
) -> Result<(Vec<f64>, Vec<f64>), String> {
    let prior: Vec<f64> = pairs.iter().map(|p| p.prior).collect();
    let current: Vec<f64> = pairs.iter().map(|p| p.current).collect();
    match kind {
        TransformKind::Ranks => {
            Ok((pseudo_observations(&prior), pseudo_observations(&current)))
        }
        TransformKind::Bernstein { degree } => {
            let cdf_p = BernsteinCdf::fit(&prior, degree).map_err(|e| e.to_string())?;
            let cdf_c = BernsteinCdf::fit(&current, degree).map_err(|e| e.to_string())?;
            Ok((
                prior.iter().map(|&x| cdf_p.forward(x)).collect(),
                current.iter().map(|&x| cdf_c.forward(x)).collect(),
            ))
        }
        TransformKind::Kernel { bandwidth } => {
            let cdf_p = KernelCdf::fit(&prior, bandwidth).map_err(|e| e.to_string())?;
            let cdf_c = KernelCdf::fit(&current, bandwidth).map_err(|e| e.to_string())?;
            Ok((
                prior.iter().map(|&x| cdf_p.forward(x)).collect(),
                current.iter().map(|&x| cdf_c.forward(x)).collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    /*
    Scope
    -----
    Configuration validation and unit-level degradation paths; the full
    batch path lives in the integration suite.
    */
    use super::*;

    fn families() -> Vec<CopulaFamily> {
        vec![CopulaFamily::Gaussian, CopulaFamily::Frank]
    }

    #[test]
    // Purpose: valid configurations construct, defaults apply.
    fn config_accepts_valid() {
        let config = PipelineConfig::new(
            families(),
            TransformKind::Ranks,
            0,
            42,
            None,
            MpleOptions::default(),
        )
        .unwrap();
        assert_eq!(config.min_pairs(), DEFAULT_MIN_PAIRS);
        assert_eq!(config.families().len(), 2);
    }

    #[test]
    // Purpose: each invalid knob is rejected with its own error.
    fn config_rejects_invalid() {
        let mple = MpleOptions::default();
        assert!(matches!(
            PipelineConfig::new(vec![], TransformKind::Ranks, 0, 0, None, mple.clone()),
            Err(ConfigError::NoFamilies)
        ));
        assert!(matches!(
            PipelineConfig::new(families(), TransformKind::Ranks, 0, 0, Some(3), mple.clone()),
            Err(ConfigError::MinPairsTooSmall { min_pairs: 3 })
        ));
        assert!(matches!(
            PipelineConfig::new(
                families(),
                TransformKind::Bernstein { degree: 0 },
                0,
                0,
                None,
                mple.clone()
            ),
            Err(ConfigError::InvalidBernsteinDegree { degree: 0 })
        ));
        assert!(matches!(
            PipelineConfig::new(
                families(),
                TransformKind::Kernel { bandwidth: Some(-1.0) },
                0,
                0,
                None,
                mple
            ),
            Err(ConfigError::InvalidBandwidth { .. })
        ));
    }

    #[test]
    // Purpose: an empty batch is the one hard error.
    fn empty_batch_is_error() {
        let config = PipelineConfig::new(
            families(),
            TransformKind::Ranks,
            0,
            0,
            None,
            MpleOptions::default(),
        )
        .unwrap();
        assert!(matches!(run_batch(&[], &config), Err(PipelineError::NoUnits)));
    }
}
