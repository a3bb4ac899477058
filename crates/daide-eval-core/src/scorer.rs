//! Token-overlap scoring of a translation against a reference.
//!
//! Both inputs are split on the space character and parenthesis-trimmed.
//! Overlap is the size of the multiset intersection, so a token repeated in
//! both sequences is credited once per shared occurrence.
//!
//! ```text
//! precision = overlap / |translation|
//! recall    = overlap / |reference|
//! f_score   = 2 * precision * recall / (precision + recall)
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tokenizer::trim;

/// Occurrence count per distinct token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCounts<'a> {
    counts: HashMap<&'a str, usize>,
    total: usize,
}

impl<'a> TokenCounts<'a> {
    /// Count tokens from an iterator.
    pub fn from_tokens(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = HashMap::new();
        let mut total = 0;
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
            total += 1;
        }
        Self { counts, total }
    }

    /// Split on spaces and parenthesis-trim every token before counting.
    pub fn from_order(order: &'a str) -> Self {
        Self::from_tokens(order.split(' ').map(trim))
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Total number of tokens, duplicates included.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Size of the multiset intersection with `other`.
    pub fn overlap(&self, other: &TokenCounts<'_>) -> usize {
        self.counts
            .iter()
            .map(|(token, &count)| count.min(other.count(token)))
            .sum()
    }
}

/// Breakdown of a single reference/translation comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AccuracyReport {
    /// Shared token occurrences
    pub overlap: usize,

    /// Token count of the reference
    pub reference_len: usize,

    /// Token count of the translation
    pub translation_len: usize,

    pub precision: f64,

    pub recall: f64,

    /// Harmonic mean of precision and recall, rounded to 3 decimals
    pub f_score: f64,
}

impl AccuracyReport {
    fn zero(reference_len: usize, translation_len: usize) -> Self {
        Self {
            overlap: 0,
            reference_len,
            translation_len,
            precision: 0.0,
            recall: 0.0,
            f_score: 0.0,
        }
    }
}

/// Score a translation against a reference, keeping the intermediate values.
///
/// Case is not normalized: `FRA` and `fra` are different tokens.
pub fn score(reference: &str, translation: &str) -> AccuracyReport {
    let reference_counts = TokenCounts::from_order(reference);
    let translation_counts = TokenCounts::from_order(translation);

    let reference_len = reference_counts.total();
    let translation_len = translation_counts.total();

    let overlap = reference_counts.overlap(&translation_counts);
    // Zero overlap would make precision + recall zero
    if overlap == 0 {
        return AccuracyReport::zero(reference_len, translation_len);
    }

    let precision = overlap as f64 / translation_len as f64;
    let recall = overlap as f64 / reference_len as f64;
    let f_score = 2.0 * precision * recall / (precision + recall);

    AccuracyReport {
        overlap,
        reference_len,
        translation_len,
        precision,
        recall,
        f_score: round3(f_score),
    }
}

/// F-score of a translation against a reference, in `[0, 1]`.
pub fn compute_accuracy(reference: &str, translation: &str) -> f64 {
    score(reference, translation).f_score
}

/// Round to 3 decimals on the exact binary value, ties to even.
///
/// `(value * 1000.0).round()` would round 0.3125 up to 0.313; the formatter
/// rounds the exact value and keeps 0.312.
fn round3(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}
