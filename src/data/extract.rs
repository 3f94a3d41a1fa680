//! Longitudinal pair extraction: join two grade/year/content slices of a
//! long-format table on student id.
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::data::table::LongTable;

/// One matched (prior, current) score observation for a student.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePair {
    pub prior: f64,
    pub current: f64,
}

/// A longitudinal progression condition: which prior slice pairs with which
/// current slice.
///
/// The current-year slice is implied: students advance one grade per year,
/// so the current slice sits at `year_prior + year_span()` where
/// `year_span() = grade_current - grade_prior`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionSpec {
    pub grade_prior: u8,
    pub grade_current: u8,
    pub year_prior: i32,
    pub content_prior: String,
    pub content_current: String,
}

impl ConditionSpec {
    /// Years elapsed between the prior and current observations.
    pub fn year_span(&self) -> u8 {
        self.grade_current.saturating_sub(self.grade_prior)
    }

    /// Calendar year of the current slice.
    pub fn year_current(&self) -> i32 {
        self.year_prior + i32::from(self.year_span())
    }

    /// Stable identifier for grouping records across datasets.
    pub fn id(&self) -> String {
        format!(
            "g{}_{}_{}-g{}_{}_{}",
            self.grade_prior,
            self.content_prior,
            self.year_prior,
            self.grade_current,
            self.content_current,
            self.year_current()
        )
    }
}

/// Extract matched (prior, current) score pairs for one condition.
///
/// Inner join on student id between the prior slice
/// (`grade_prior`, `year_prior`, `content_prior`) and the current slice
/// (`grade_current`, `year_prior + span`, `content_current`). Duplicate
/// students within a slice keep the first record; duplicates are counted
/// and logged, never an error. An absent content area or an empty slice
/// yields an empty vector so batch sweeps degrade gracefully.
///
/// Pair order follows the current slice's row order, so extraction is
/// deterministic for a given table.
pub fn extract_pairs(table: &LongTable, spec: &ConditionSpec) -> Vec<ScorePair> {
    let year_current = spec.year_current();

    let mut prior: HashMap<&str, f64> = HashMap::new();
    let mut prior_dups = 0usize;
    for row in 0..table.len() {
        if table.grade(row) == spec.grade_prior
            && table.year(row) == spec.year_prior
            && table.content_area(row) == spec.content_prior
        {
            if prior.contains_key(table.student_id(row)) {
                prior_dups += 1;
            } else {
                prior.insert(table.student_id(row), table.scale_score(row));
            }
        }
    }

    let mut pairs = Vec::new();
    let mut seen_current: HashSet<&str> = HashSet::new();
    let mut current_dups = 0usize;
    for row in 0..table.len() {
        if table.grade(row) == spec.grade_current
            && table.year(row) == year_current
            && table.content_area(row) == spec.content_current
        {
            let sid = table.student_id(row);
            if !seen_current.insert(sid) {
                current_dups += 1;
                continue;
            }
            if let Some(&prior_score) = prior.get(sid) {
                pairs.push(ScorePair { prior: prior_score, current: table.scale_score(row) });
            }
        }
    }

    if prior_dups > 0 || current_dups > 0 {
        debug!(
            condition = %spec.id(),
            prior_duplicates = prior_dups,
            current_duplicates = current_dups,
            "dropped duplicate student records, kept first occurrence"
        );
    }
    pairs
}
