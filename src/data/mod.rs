//! data — long-format score tables and longitudinal pair extraction.
//!
//! Purpose
//! -------
//! Own the input side of the engine: a validated columnar long-format table
//! of assessment scores, the condition vocabulary describing a grade/year/
//! content progression, and the extractor that inner-joins two slices of
//! the table into matched (prior, current) score pairs.
//!
//! Key behaviors
//! -------------
//! - [`LongTable`] validates column shapes and score finiteness once at
//!   construction; the CSV adapter maps header names to columns and treats
//!   a missing required column as fatal.
//! - [`extract_pairs`] joins on student id, keeps the first record for
//!   duplicated students, and returns an empty vector (never an error) when
//!   a condition has no data.
//!
//! Invariants & assumptions
//! ------------------------
//! - Students advance one grade per calendar year, so a condition's current
//!   slice sits at `year_prior + (grade_current - grade_prior)`.
//! - Scores carried by a constructed table are always finite.
//!
//! Downstream usage
//! ----------------
//! `pipeline` extracts pairs per condition and hands them to `transform`;
//! extraction output order is deterministic so seeded downstream stages
//! reproduce exactly.

pub mod errors;
pub mod extract;
pub mod table;

pub use self::errors::{DataError, DataResult};
pub use self::extract::{extract_pairs, ConditionSpec, ScorePair};
pub use self::table::LongTable;
