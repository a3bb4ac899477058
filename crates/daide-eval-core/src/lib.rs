//! # daide-eval-core
//!
//! Scoring of machine-generated DAIDE orders against reference orders.
//!
//! The crate answers one question per pair: how many tokens of the generated
//! order also appear in the reference? Overlap is counted as a multiset
//! intersection and reported as precision, recall and F-score.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same score
//! 2. **Pure**: Tokenizing and scoring touch no I/O or shared state
//! 3. **Bounded**: Every score lies in `[0, 1]`, rounded to 3 decimals
//!
//! ## Example
//!
//! ```rust
//! use daide_eval_core::{compute_accuracy, tokenize};
//!
//! let tokens = tokenize("PRP (DMZ (FRA ITA))").unwrap();
//! assert_eq!(tokens, vec!["prp", "dmz", "fra", "ita"]);
//!
//! let f = compute_accuracy("PRP (DMZ (FRA ITA))", "PRP (DMZ (FRA RUS))");
//! assert_eq!(f, 0.75);
//! ```

pub mod cleaning;
pub mod config;
pub mod corpus;
pub mod grammar;
pub mod scorer;
pub mod tokenizer;

// Re-export main types at crate root
pub use cleaning::{canonicalize, CleanError, Cleaner, CleaningConfig};
pub use config::{ConfigError, EvalConfig};
pub use corpus::{
    evaluate_pair, evaluate_pairs, parse_interleaved, parse_pairs, read_interleaved, read_pairs,
    CorpusError, CorpusRun, OrderPair, PairOutcome, PairScore,
};
pub use grammar::{
    create_grammar, visit, Grammar, GrammarConfig, GrammarError, OrderNode, OrderTree,
    StringType, StructuralGrammar,
};
pub use scorer::{compute_accuracy, score, AccuracyReport, TokenCounts};
pub use tokenizer::{
    tokenize, trim, StripSet, TokenizeError, Tokenizer, DEFAULT_LEADING, DEFAULT_TRAILING,
};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// The message parsed by [`validate_message`] when none is given.
pub const DEMO_MESSAGE: &str = "PRP (DMZ (FRA ITA) (PIE LYO WES TYS))";

/// Errors from any stage of evaluation.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tokenize error: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),
}

/// Build a grammar, parse one message and return its structured form.
///
/// This is the single-message validation entry point: the grammar is built
/// from `config` on every call, so nothing is constructed ahead of time.
pub fn validate_message(message: &str, config: GrammarConfig) -> Result<Value, EvalError> {
    let grammar = create_grammar(config)?;
    debug!(
        level = grammar.level(),
        string_type = ?grammar.string_type(),
        "Parsing message"
    );
    let tree = grammar.parse(message)?;
    Ok(visit(&tree))
}

/// Read, clean and score a two-file corpus.
pub fn evaluate_files(
    reference_path: impl AsRef<std::path::Path>,
    translation_path: impl AsRef<std::path::Path>,
    config: &EvalConfig,
) -> Result<CorpusRun, EvalError> {
    let pairs = read_pairs(reference_path, translation_path)?;
    let cleaner = config.cleaner()?;
    Ok(evaluate_pairs(&pairs, &cleaner))
}

/// Read, clean and score an interleaved corpus.
pub fn evaluate_interleaved_file(
    path: impl AsRef<std::path::Path>,
    config: &EvalConfig,
) -> Result<CorpusRun, EvalError> {
    let pairs = read_interleaved(path)?;
    let cleaner = config.cleaner()?;
    Ok(evaluate_pairs(&pairs, &cleaner))
}
