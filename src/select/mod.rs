//! select — cross-condition aggregation and the family-selection decision.
//!
//! Purpose
//! -------
//! Consume the flat [`FitRecord`]s produced per (dataset, condition,
//! family), rank families within each condition by AIC and BIC, compute
//! ΔAIC and Akaike weights, tabulate selection frequencies, and apply the
//! deterministic decision gate.
//!
//! Key behaviors
//! -------------
//! - Grouping is strictly by (dataset_id, condition_id): the same
//!   condition_id under two datasets is two groups.
//! - Records with non-finite AIC are rejected into a side list before any
//!   ranking; they never contaminate an argmin.
//! - Akaike weights use w = exp(−Δ/2)/Σ exp(−Δ/2) on Δ relative to the
//!   within-condition minimum, so the best family's weight is the largest
//!   and very large Δ underflows harmlessly to zero.
//! - The four decision rules run in fixed priority order; the first match
//!   wins.

pub mod errors;
pub mod records;

pub use self::errors::{SelectError, SelectResult};
pub use self::records::FitRecord;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::copula::CopulaFamily;

/// Winner share above which a lone family can be declared.
const SINGLE_WINNER_SHARE: f64 = 0.75;
/// Mean winning-margin bound for the single-winner rule.
const SINGLE_WINNER_MARGIN: f64 = 2.0;
/// Joint share at which the top two families are declared contenders.
const TWO_CONTENDER_SHARE: f64 = 0.90;

/// Outcome category of the decision gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    SingleWinner,
    TwoContenders,
    ContextDependent,
    NoClearWinner,
}

/// Final verdict over the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDecision {
    pub kind: DecisionKind,
    pub winning_families: Vec<CopulaFamily>,
    pub rationale: String,
}

/// Per-condition ranking of the candidate families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub dataset_id: String,
    pub condition_id: String,
    pub year_span: u8,
    pub best_aic: CopulaFamily,
    pub best_bic: CopulaFamily,
    /// Second-best AIC minus best AIC; infinity when only one family fit.
    pub winning_margin: f64,
    pub delta_aic: Vec<(CopulaFamily, f64)>,
    pub aic_weights: Vec<(CopulaFamily, f64)>,
}

/// Full aggregation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub summaries: Vec<ConditionSummary>,
    /// Share of conditions each family wins on AIC, descending.
    pub frequencies: Vec<(CopulaFamily, f64)>,
    /// Records rejected for non-finite AIC.
    pub rejected: Vec<FitRecord>,
    pub decision: SelectionDecision,
}

/// Aggregate fit records into per-condition summaries, selection
/// frequencies, and the batch decision.
///
/// # Errors
/// - [`SelectError::NoRecords`] for empty input.
/// - [`SelectError::NoUsableRecords`] when every record is rejected.
pub fn aggregate(records: &[FitRecord]) -> SelectResult<Aggregation> {
    if records.is_empty() {
        return Err(SelectError::NoRecords);
    }

    let mut rejected = Vec::new();
    let mut groups: BTreeMap<(String, String), Vec<&FitRecord>> = BTreeMap::new();
    for record in records {
        if !record.aic.is_finite() {
            warn!(
                dataset = %record.dataset_id,
                condition = %record.condition_id,
                family = %record.family,
                aic = record.aic,
                "rejecting record with non-finite AIC"
            );
            rejected.push(record.clone());
            continue;
        }
        groups
            .entry((record.dataset_id.clone(), record.condition_id.clone()))
            .or_default()
            .push(record);
    }
    if groups.is_empty() {
        return Err(SelectError::NoUsableRecords);
    }

    let summaries: Vec<ConditionSummary> = groups.values().map(|group| summarize(group)).collect();
    let frequencies = selection_frequencies(&summaries);
    let decision = decide(&summaries, &frequencies);

    Ok(Aggregation { summaries, frequencies, rejected, decision })
}

/// Rank one condition's records.
fn summarize(group: &[&FitRecord]) -> ConditionSummary {
    let first = group[0];
    let mut by_aic: Vec<&&FitRecord> = group.iter().collect();
    by_aic.sort_by(|a, b| a.aic.total_cmp(&b.aic).then(a.family.cmp(&b.family)));
    let best_aic_record = by_aic[0];
    let best_aic_value = best_aic_record.aic;
    let winning_margin =
        by_aic.get(1).map(|r| r.aic - best_aic_value).unwrap_or(f64::INFINITY);

    let best_bic = group
        .iter()
        .min_by(|a, b| a.bic.total_cmp(&b.bic).then(a.family.cmp(&b.family)))
        .map(|r| r.family)
        .unwrap_or(best_aic_record.family);

    let delta_aic: Vec<(CopulaFamily, f64)> =
        by_aic.iter().map(|r| (r.family, r.aic - best_aic_value)).collect();

    // Deltas are relative to the minimum, so the largest raw weight is 1
    // and the sum is at least 1; huge deltas underflow to 0 instead of NaN.
    let raw: Vec<f64> = delta_aic.iter().map(|&(_, d)| (-d / 2.0).exp()).collect();
    let total: f64 = raw.iter().sum();
    let aic_weights: Vec<(CopulaFamily, f64)> =
        delta_aic.iter().zip(&raw).map(|(&(family, _), &w)| (family, w / total)).collect();

    ConditionSummary {
        dataset_id: first.dataset_id.clone(),
        condition_id: first.condition_id.clone(),
        year_span: first.year_span,
        best_aic: best_aic_record.family,
        best_bic,
        winning_margin,
        delta_aic,
        aic_weights,
    }
}

/// Share of conditions each family wins on AIC, descending, losers omitted.
fn selection_frequencies(summaries: &[ConditionSummary]) -> Vec<(CopulaFamily, f64)> {
    let total = summaries.len() as f64;
    let mut counts: BTreeMap<CopulaFamily, usize> = BTreeMap::new();
    for summary in summaries {
        *counts.entry(summary.best_aic).or_default() += 1;
    }
    let mut freqs: Vec<(CopulaFamily, f64)> =
        counts.into_iter().map(|(family, c)| (family, c as f64 / total)).collect();
    freqs.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    freqs
}

/// The four decision rules, evaluated in priority order.
fn decide(
    summaries: &[ConditionSummary], frequencies: &[(CopulaFamily, f64)],
) -> SelectionDecision {
    let (top_family, top_share) = frequencies[0];

    // Rule 1: one family dominates and its victories are near-ties, so a
    // single parsimonious choice costs little anywhere.
    if top_share > SINGLE_WINNER_SHARE {
        let margins: Vec<f64> = summaries
            .iter()
            .filter(|s| s.best_aic == top_family && s.winning_margin.is_finite())
            .map(|s| s.winning_margin)
            .collect();
        let mean_margin = if margins.is_empty() {
            0.0
        } else {
            margins.iter().sum::<f64>() / margins.len() as f64
        };
        if mean_margin < SINGLE_WINNER_MARGIN {
            return SelectionDecision {
                kind: DecisionKind::SingleWinner,
                winning_families: vec![top_family],
                rationale: format!(
                    "{top_family} wins {:.0}% of conditions with mean winning margin \
                     {mean_margin:.2} AIC",
                    top_share * 100.0
                ),
            };
        }
    }

    // Per-span modal winners, shared by rules 2 and 3.
    let mut span_winners: BTreeMap<u8, BTreeMap<CopulaFamily, usize>> = BTreeMap::new();
    for summary in summaries {
        *span_winners.entry(summary.year_span).or_default().entry(summary.best_aic).or_default() +=
            1;
    }
    let modal: Vec<(u8, CopulaFamily)> = span_winners
        .iter()
        .map(|(&span, counts)| {
            let family = counts
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
                .map(|(&family, _)| family)
                .unwrap_or(top_family);
            (span, family)
        })
        .collect();
    let modal_varies = modal.len() >= 2 && modal.windows(2).any(|w| w[0].1 != w[1].1);

    // Rule 2: two families jointly cover nearly everything. Contenders
    // whose victories never overlap in a year span are a span effect, not
    // a genuine two-way race; those fall through to rule 3.
    if frequencies.len() >= 2 {
        let (second_family, second_share) = frequencies[1];
        if top_share + second_share >= TWO_CONTENDER_SHARE {
            let spans_of = |family: CopulaFamily| -> BTreeSet<u8> {
                summaries
                    .iter()
                    .filter(|s| s.best_aic == family)
                    .map(|s| s.year_span)
                    .collect()
            };
            let span_exclusive =
                modal_varies && spans_of(top_family).is_disjoint(&spans_of(second_family));
            if !span_exclusive {
                return SelectionDecision {
                    kind: DecisionKind::TwoContenders,
                    winning_families: vec![top_family, second_family],
                    rationale: format!(
                        "{top_family} and {second_family} jointly win {:.0}% of conditions",
                        (top_share + second_share) * 100.0
                    ),
                };
            }
        }
    }

    // Rule 3: the modal winner changes with the year span.
    if modal_varies {
        let mut families: Vec<CopulaFamily> = modal.iter().map(|&(_, f)| f).collect();
        families.sort();
        families.dedup();
        let detail: Vec<String> =
            modal.iter().map(|(span, family)| format!("span {span}: {family}")).collect();
        return SelectionDecision {
            kind: DecisionKind::ContextDependent,
            winning_families: families,
            rationale: format!("modal winner varies by year span ({})", detail.join(", ")),
        };
    }

    SelectionDecision {
        kind: DecisionKind::NoClearWinner,
        winning_families: frequencies.iter().map(|&(f, _)| f).collect(),
        rationale: format!(
            "no family dominates: top share {:.0}% spread over {} families",
            top_share * 100.0,
            frequencies.len()
        ),
    }
}
