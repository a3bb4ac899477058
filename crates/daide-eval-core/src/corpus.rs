//! Reading reference/translation pairs and scoring them one by one.
//!
//! Two layouts are supported:
//! - two files, where line `i` of the reference file pairs with line `i` of
//!   the translation file;
//! - one interleaved file of alternating reference and translation lines.
//!
//! Results are reported per pair. Nothing is averaged across the corpus.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cleaning::Cleaner;
use crate::scorer::{score, AccuracyReport};

/// Errors from reading a corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reference has {reference} lines but translation has {translation}")]
    LengthMismatch { reference: usize, translation: usize },

    #[error("Line {line} has no translation to pair with")]
    DanglingLine { line: usize },
}

/// A reference order and the translation to score against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderPair {
    /// 1-based line number of the reference
    pub line: usize,

    pub reference: String,

    pub translation: String,
}

impl OrderPair {
    pub fn new(line: usize, reference: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            line,
            reference: reference.into(),
            translation: translation.into(),
        }
    }
}

/// What happened to a pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PairOutcome {
    /// Both sides survived cleaning and were scored
    Scored {
        reference: String,
        translation: String,
        report: AccuracyReport,
    },

    /// Cleaning rejected one side
    Discarded { reason: String },
}

/// Result for one pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairScore {
    pub line: usize,

    #[serde(flatten)]
    pub outcome: PairOutcome,
}

impl PairScore {
    pub fn f_score(&self) -> Option<f64> {
        match &self.outcome {
            PairOutcome::Scored { report, .. } => Some(report.f_score),
            PairOutcome::Discarded { .. } => None,
        }
    }
}

/// Per-pair results of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusRun {
    pub evaluated_at: DateTime<Utc>,

    pub pairs: Vec<PairScore>,
}

impl CorpusRun {
    pub fn scored(&self) -> usize {
        self.pairs.iter().filter(|p| p.f_score().is_some()).count()
    }

    pub fn discarded(&self) -> usize {
        self.pairs.len() - self.scored()
    }
}

fn read(path: &Path) -> Result<String, CorpusError> {
    fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read pairs from a reference file and a translation file.
pub fn read_pairs(
    reference_path: impl AsRef<Path>,
    translation_path: impl AsRef<Path>,
) -> Result<Vec<OrderPair>, CorpusError> {
    let reference = read(reference_path.as_ref())?;
    let translation = read(translation_path.as_ref())?;
    parse_pairs(&reference, &translation)
}

/// Pair lines of two texts by position.
///
/// Pairs where both lines are blank are skipped.
pub fn parse_pairs(reference: &str, translation: &str) -> Result<Vec<OrderPair>, CorpusError> {
    let reference_lines: Vec<&str> = reference.lines().collect();
    let translation_lines: Vec<&str> = translation.lines().collect();

    if reference_lines.len() != translation_lines.len() {
        return Err(CorpusError::LengthMismatch {
            reference: reference_lines.len(),
            translation: translation_lines.len(),
        });
    }

    Ok(reference_lines
        .into_iter()
        .zip(translation_lines)
        .enumerate()
        .filter(|(_, (r, t))| !(r.trim().is_empty() && t.trim().is_empty()))
        .map(|(i, (r, t))| OrderPair::new(i + 1, r, t))
        .collect())
}

/// Read pairs from a file of alternating reference and translation lines.
pub fn read_interleaved(path: impl AsRef<Path>) -> Result<Vec<OrderPair>, CorpusError> {
    let contents = read(path.as_ref())?;
    parse_interleaved(&contents)
}

/// Pair alternating non-blank lines.
pub fn parse_interleaved(contents: &str) -> Result<Vec<OrderPair>, CorpusError> {
    let mut lines = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line));

    let mut pairs = Vec::new();
    while let Some((line, reference)) = lines.next() {
        let Some((_, translation)) = lines.next() else {
            return Err(CorpusError::DanglingLine { line });
        };
        pairs.push(OrderPair::new(line, reference, translation));
    }
    Ok(pairs)
}

/// Clean and score every pair.
pub fn evaluate_pairs(pairs: &[OrderPair], cleaner: &Cleaner) -> CorpusRun {
    let results: Vec<PairScore> = pairs.iter().map(|pair| evaluate_pair(pair, cleaner)).collect();

    let run = CorpusRun {
        evaluated_at: Utc::now(),
        pairs: results,
    };
    info!(
        pairs = run.pairs.len(),
        scored = run.scored(),
        discarded = run.discarded(),
        cleaning = cleaner.config().enabled,
        "Corpus evaluated"
    );
    run
}

/// Clean and score a single pair.
pub fn evaluate_pair(pair: &OrderPair, cleaner: &Cleaner) -> PairScore {
    let cleaned = cleaner.clean_reference(&pair.reference).and_then(|reference| {
        cleaner
            .clean(&pair.translation)
            .map(|translation| (reference, translation))
    });

    let outcome = match cleaned {
        Ok((reference, translation)) => {
            let report = score(&reference, &translation);
            debug!(line = pair.line, f_score = report.f_score, "Pair scored");
            PairOutcome::Scored {
                reference,
                translation,
                report,
            }
        }
        Err(e) => {
            warn!(line = pair.line, error = %e, "Pair discarded");
            PairOutcome::Discarded {
                reason: e.to_string(),
            }
        }
    };

    PairScore {
        line: pair.line,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{create_grammar, GrammarConfig};
    use std::io::Write;

    fn cleaner() -> Cleaner {
        Cleaner::new(create_grammar(GrammarConfig::default()).unwrap())
    }

    #[test]
    fn test_parse_pairs_by_position() {
        let pairs = parse_pairs("PRP (A)\nPRP (B)\n", "PRP (C)\nPRP (D)\n").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], OrderPair::new(2, "PRP (B)", "PRP (D)"));
    }

    #[test]
    fn test_parse_pairs_skips_blank_pairs() {
        let pairs = parse_pairs("PRP (A)\n\nPRP (B)", "PRP (C)\n\nPRP (D)").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].line, 3);
    }

    #[test]
    fn test_parse_pairs_length_mismatch() {
        let result = parse_pairs("A\nB\nC", "A\nB");
        assert!(matches!(
            result,
            Err(CorpusError::LengthMismatch {
                reference: 3,
                translation: 2
            })
        ));
    }

    #[test]
    fn test_parse_interleaved() {
        let pairs = parse_interleaved("PRP (A)\nPRP (B)\n\nPRP (C)\nPRP (D)\n").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], OrderPair::new(1, "PRP (A)", "PRP (B)"));
        assert_eq!(pairs[1], OrderPair::new(4, "PRP (C)", "PRP (D)"));
    }

    #[test]
    fn test_parse_interleaved_dangling_line() {
        let result = parse_interleaved("PRP (A)\nPRP (B)\nPRP (C)\n");
        assert!(matches!(result, Err(CorpusError::DanglingLine { line: 3 })));
    }

    #[test]
    fn test_read_pairs_from_files() {
        let mut reference = tempfile::NamedTempFile::new().unwrap();
        let mut translation = tempfile::NamedTempFile::new().unwrap();
        writeln!(reference, "PRP (DMZ (FRA ITA))").unwrap();
        writeln!(translation, "PRP (DMZ (FRA RUS)).").unwrap();

        let pairs = read_pairs(reference.path(), translation.path()).unwrap();
        assert_eq!(pairs, vec![OrderPair::new(1, "PRP (DMZ (FRA ITA))", "PRP (DMZ (FRA RUS)).")]);
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_interleaved("/nonexistent/corpus.txt");
        assert!(matches!(result, Err(CorpusError::Io { .. })));
    }

    #[test]
    fn test_evaluate_pairs() {
        let pairs = vec![
            OrderPair::new(1, "PRP (DMZ (FRA ITA))", "PRP (DMZ (FRA RUS)).\n"),
            OrderPair::new(2, "PRP (PCE (ENG GER))", "England and Germany make peace"),
            OrderPair::new(3, "PRP (DMZ (FRA ITA))", "PRP (DMZ (FRA ITA)) PRP (DMZ (FRA ITA))"),
        ];
        let run = evaluate_pairs(&pairs, &cleaner());

        assert_eq!(run.scored(), 2);
        assert_eq!(run.discarded(), 1);
        assert_eq!(run.pairs[0].f_score(), Some(0.75));
        assert_eq!(run.pairs[1].f_score(), None);
        // The duplicate is removed before scoring
        assert_eq!(run.pairs[2].f_score(), Some(1.0));
    }

    #[test]
    fn test_pair_score_serializes_flat() {
        let pair = OrderPair::new(7, "PRP (A)", "blah");
        let result = evaluate_pair(&pair, &cleaner());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["line"], 7);
        assert_eq!(value["status"], "discarded");
    }
}
