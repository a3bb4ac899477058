//! Cleaning of generated DAIDE orders before scoring.
//!
//! Few-shot generators produce orders with stray periods and line breaks,
//! repeat the same order several times, emit several orders on one line and
//! sometimes produce text that is not DAIDE at all. The [`Cleaner`] turns such
//! output into one canonical line of valid, distinct orders.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::grammar::Grammar;

lazy_static! {
    /// Keywords that open a new top-level press message.
    static ref MESSAGE_KEYWORDS: Vec<&'static str> = vec![
        "PRP", "YES", "REJ", "BWX", "HUH", "CCL", "FCT", "TRY",
        "INS", "QRY", "SUG", "THK", "IDK", "WHT", "HOW", "EXP", "SRY"
    ];
}

/// Errors that discard a generated line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    #[error("Nothing left after cleaning")]
    Empty,

    #[error("No valid order among {discarded} candidate(s)")]
    NoValidOrder { discarded: usize },
}

/// Which cleaning steps run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleaningConfig {
    /// Run cleaning at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Drop repeated orders
    #[serde(default = "default_true")]
    pub dedupe: bool,

    /// Drop orders the grammar rejects
    #[serde(default = "default_true")]
    pub validate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dedupe: true,
            validate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Open,
    Close,
    Word(String),
}

/// Split text into parentheses and words. Any whitespace, including the
/// line breaks a generator inserts, separates words. Literals opened by a
/// quote at the start of a word stay whole.
fn lex(text: &str) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let mut word = String::new();
    let mut in_quote = false;

    for c in text.chars() {
        if in_quote {
            word.push(c);
            in_quote = c != '\'';
            continue;
        }
        match c {
            '(' | ')' => {
                if !word.is_empty() {
                    lexemes.push(Lexeme::Word(std::mem::take(&mut word)));
                }
                lexemes.push(if c == '(' { Lexeme::Open } else { Lexeme::Close });
            }
            c if c.is_whitespace() => {
                if !word.is_empty() {
                    lexemes.push(Lexeme::Word(std::mem::take(&mut word)));
                }
            }
            // Only a quote opening a word starts a literal; `it's` is a word
            '\'' if word.is_empty() => {
                word.push(c);
                in_quote = true;
            }
            c => word.push(c),
        }
    }
    if !word.is_empty() {
        lexemes.push(Lexeme::Word(word));
    }
    lexemes
}

/// Remove stray periods: period-only words anywhere and trailing periods on
/// the final word.
fn strip_periods(mut lexemes: Vec<Lexeme>) -> Vec<Lexeme> {
    lexemes.retain(|l| !matches!(l, Lexeme::Word(w) if w.chars().all(|c| c == '.')));
    if let Some(Lexeme::Word(last)) = lexemes.last_mut() {
        let trimmed = last.trim_end_matches('.').len();
        last.truncate(trimmed);
    }
    lexemes
}

/// Split at top-level message keywords.
fn split_orders(lexemes: Vec<Lexeme>) -> Vec<Vec<Lexeme>> {
    let mut orders = Vec::new();
    let mut current: Vec<Lexeme> = Vec::new();
    let mut depth: usize = 0;

    for lexeme in lexemes {
        match &lexeme {
            Lexeme::Open => depth += 1,
            Lexeme::Close => depth = depth.saturating_sub(1),
            Lexeme::Word(word) => {
                if depth == 0 && !current.is_empty() && MESSAGE_KEYWORDS.contains(&word.as_str()) {
                    orders.push(std::mem::take(&mut current));
                }
            }
        }
        current.push(lexeme);
    }
    if !current.is_empty() {
        orders.push(current);
    }
    orders
}

/// Render lexemes in canonical form: single spaces, none just inside
/// parentheses.
fn render(lexemes: &[Lexeme]) -> String {
    let mut out = String::new();
    let mut previous: Option<&Lexeme> = None;

    for lexeme in lexemes {
        let needs_space = match (previous, lexeme) {
            (None, _) => false,
            (Some(Lexeme::Open), _) => false,
            (Some(_), Lexeme::Close) => false,
            _ => true,
        };
        if needs_space {
            out.push(' ');
        }
        match lexeme {
            Lexeme::Open => out.push('('),
            Lexeme::Close => out.push(')'),
            Lexeme::Word(word) => out.push_str(word),
        }
        previous = Some(lexeme);
    }
    out
}

/// Reformat text into one canonical line without validating it.
pub fn canonicalize(text: &str) -> String {
    render(&strip_periods(lex(text)))
}

/// Cleans generated orders using a grammar for validation.
pub struct Cleaner {
    grammar: Box<dyn Grammar>,
    config: CleaningConfig,
}

impl Cleaner {
    pub fn new(grammar: impl Grammar + 'static) -> Self {
        Self::with_config(grammar, CleaningConfig::default())
    }

    pub fn with_config(grammar: impl Grammar + 'static, config: CleaningConfig) -> Self {
        Self {
            grammar: Box::new(grammar),
            config,
        }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    pub fn grammar(&self) -> &dyn Grammar {
        self.grammar.as_ref()
    }

    /// Clean a generated line into canonical, distinct, valid orders.
    pub fn clean(&self, generated: &str) -> Result<String, CleanError> {
        if !self.config.enabled {
            return non_empty(generated.to_string());
        }

        let lexemes = strip_periods(lex(generated));
        if lexemes.is_empty() {
            return Err(CleanError::Empty);
        }

        let candidates: Vec<String> = split_orders(lexemes)
            .iter()
            .map(|order| render(order))
            .collect();
        let total = candidates.len();

        let mut kept: Vec<String> = Vec::new();
        for order in candidates {
            if self.config.dedupe && kept.contains(&order) {
                debug!(order = %order, "Dropping duplicate order");
                continue;
            }
            if self.config.validate {
                if let Err(e) = self.grammar.parse(&order) {
                    debug!(order = %order, error = %e, "Dropping invalid order");
                    continue;
                }
            }
            kept.push(order);
        }

        if kept.is_empty() {
            return Err(CleanError::NoValidOrder { discarded: total });
        }
        Ok(kept.join(" "))
    }

    /// Reformat a reference line. References are trusted, so they are only
    /// canonicalized.
    pub fn clean_reference(&self, reference: &str) -> Result<String, CleanError> {
        if !self.config.enabled {
            return non_empty(reference.to_string());
        }
        non_empty(canonicalize(reference))
    }
}

fn non_empty(line: String) -> Result<String, CleanError> {
    if line.trim().is_empty() {
        Err(CleanError::Empty)
    } else {
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{create_grammar, GrammarConfig};

    fn cleaner() -> Cleaner {
        Cleaner::new(create_grammar(GrammarConfig::default()).unwrap())
    }

    #[test]
    fn test_strips_trailing_period_and_newline() {
        let cleaned = cleaner().clean("PRP (DMZ (FRA ITA)).\n").unwrap();
        assert_eq!(cleaned, "PRP (DMZ (FRA ITA))");
    }

    #[test]
    fn test_joins_broken_lines() {
        let cleaned = cleaner().clean("PRP (ALY (GER FRA)\n VSS (ENG))").unwrap();
        assert_eq!(cleaned, "PRP (ALY (GER FRA) VSS (ENG))");
    }

    #[test]
    fn test_removes_spaces_inside_parentheses() {
        let cleaned = cleaner().clean("PRP ( DMZ ( FRA  ITA ) )").unwrap();
        assert_eq!(cleaned, "PRP (DMZ (FRA ITA))");
    }

    #[test]
    fn test_deduplicates_repeated_orders() {
        let cleaned = cleaner()
            .clean("PRP (DMZ (FRA ITA)). PRP (DMZ (FRA ITA)). PRP (PCE (FRA ITA))")
            .unwrap();
        assert_eq!(cleaned, "PRP (DMZ (FRA ITA)) PRP (PCE (FRA ITA))");
    }

    #[test]
    fn test_keeps_inner_keywords_together() {
        // PRP nested inside a group is not a new order
        let cleaned = cleaner().clean("YES (PRP (ALY (GER FRA) VSS (ENG)))").unwrap();
        assert_eq!(cleaned, "YES (PRP (ALY (GER FRA) VSS (ENG)))");
    }

    #[test]
    fn test_discards_invalid_orders() {
        let cleaned = cleaner()
            .clean("PRP (DMZ (FRA ITA) PRP (PCE (FRA ITA))")
            .unwrap_err();
        assert_eq!(cleaned, CleanError::NoValidOrder { discarded: 1 });

        let cleaned = cleaner()
            .clean("PRP (DMZ (FRA ITA)) PRP (ALY (GER FRA)) in the spring")
            .unwrap();
        assert_eq!(cleaned, "PRP (DMZ (FRA ITA))");
    }

    #[test]
    fn test_english_only_output_is_rejected() {
        let result = cleaner().clean("France and Italy agree to a peace.");
        assert_eq!(result, Err(CleanError::NoValidOrder { discarded: 1 }));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(cleaner().clean(" .\n"), Err(CleanError::Empty));
        assert_eq!(cleaner().clean_reference(""), Err(CleanError::Empty));
    }

    #[test]
    fn test_quoted_literal_is_one_word() {
        let cleaned = cleaner().clean("FCT ('peace (now)')").unwrap();
        assert_eq!(cleaned, "FCT ('peace (now)')");
    }

    #[test]
    fn test_apostrophe_inside_word_is_not_a_literal() {
        let cleaned = cleaner()
            .clean("PRP (DMZ (FRA ITA)) it's agreed. PRP (PCE (ENG GER))")
            .unwrap();
        assert_eq!(cleaned, "PRP (PCE (ENG GER))");

        let cleaned = cleaner()
            .clean("PRP (PCE (ENG GER)) PRP (DMZ (FRA ITA)) that's all")
            .unwrap();
        assert_eq!(cleaned, "PRP (PCE (ENG GER))");
    }

    #[test]
    fn test_accessors() {
        let cleaner = cleaner();
        assert_eq!(*cleaner.config(), CleaningConfig::default());
        assert!(cleaner.grammar().is_valid("PRP (DMZ (FRA ITA))"));
        assert!(!cleaner.grammar().is_valid("PRP (DMZ (FRA ITA)"));
    }

    #[test]
    fn test_disabled_steps() {
        let grammar = create_grammar(GrammarConfig::default()).unwrap();
        let cleaner = Cleaner::with_config(
            grammar,
            CleaningConfig {
                enabled: true,
                dedupe: false,
                validate: false,
            },
        );
        let cleaned = cleaner.clean("PRP (FRA) PRP (FRA) not daide").unwrap();
        assert_eq!(cleaned, "PRP (FRA) PRP (FRA) not daide");
    }

    #[test]
    fn test_cleaning_off_passes_through() {
        let grammar = create_grammar(GrammarConfig::default()).unwrap();
        let cleaner = Cleaner::with_config(
            grammar,
            CleaningConfig {
                enabled: false,
                ..Default::default()
            },
        );
        assert_eq!(cleaner.clean("PRP (FRA).\n").unwrap(), "PRP (FRA).\n");
    }

    #[test]
    fn test_reference_is_canonicalized_only() {
        let cleaned = cleaner().clean_reference("PRP ( ALY (GER) VSS (ENG) ).").unwrap();
        assert_eq!(cleaned, "PRP (ALY (GER) VSS (ENG))");
    }
}
