//! Sentence tokenization and parenthesis trimming.
//!
//! Two normalizations live here:
//! - [`Tokenizer`] splits a sentence on the space character, lowercases each
//!   word and strips configured punctuation from both ends.
//! - [`trim`] strips only leading `(` and trailing `)`, which is the
//!   normalization the scorer applies to DAIDE orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters stripped from the front of a word by default.
pub const DEFAULT_LEADING: &str = "\"( ";

/// Characters stripped from the back of a word by default.
pub const DEFAULT_TRAILING: &str = "\".,) ";

/// Errors that can occur while tokenizing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("Word {index} ({word:?}) is empty after trimming")]
    EmptyToken { index: usize, word: String },
}

/// The character sets stripped from each end of a word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StripSet {
    /// Stripped repeatedly from the front
    #[serde(default = "default_leading")]
    pub leading: String,

    /// Stripped repeatedly from the back
    #[serde(default = "default_trailing")]
    pub trailing: String,
}

fn default_leading() -> String {
    DEFAULT_LEADING.to_string()
}

fn default_trailing() -> String {
    DEFAULT_TRAILING.to_string()
}

impl Default for StripSet {
    fn default() -> Self {
        Self {
            leading: default_leading(),
            trailing: default_trailing(),
        }
    }
}

impl StripSet {
    pub fn new(leading: impl Into<String>, trailing: impl Into<String>) -> Self {
        Self {
            leading: leading.into(),
            trailing: trailing.into(),
        }
    }

    /// Strip leading then trailing characters until neither end matches.
    pub fn strip<'a>(&self, word: &'a str) -> &'a str {
        word.trim_start_matches(|c| self.leading.contains(c))
            .trim_end_matches(|c| self.trailing.contains(c))
    }
}

/// Splits sentences into lowercase, punctuation-stripped tokens.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    strip_set: StripSet,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strip_set(strip_set: StripSet) -> Self {
        Self { strip_set }
    }

    pub fn strip_set(&self) -> &StripSet {
        &self.strip_set
    }

    /// Tokenize a sentence.
    ///
    /// Only the space character separates words; tabs and newlines stay
    /// inside their word. Every word yields exactly one token, so a word that
    /// strips down to nothing (including the empty word between two spaces)
    /// is an error rather than being dropped.
    pub fn tokenize(&self, sentence: &str) -> Result<Vec<String>, TokenizeError> {
        sentence
            .split(' ')
            .enumerate()
            .map(|(index, word)| {
                let lowercase = word.to_lowercase();
                let trimmed = self.strip_set.strip(&lowercase);
                if trimmed.is_empty() {
                    return Err(TokenizeError::EmptyToken {
                        index,
                        word: word.to_string(),
                    });
                }
                Ok(trimmed.to_string())
            })
            .collect()
    }
}

/// Tokenize with the default strip set.
pub fn tokenize(sentence: &str) -> Result<Vec<String>, TokenizeError> {
    Tokenizer::new().tokenize(sentence)
}

/// Strip leading `(` and trailing `)` from a token.
///
/// Unlike the tokenizer, no other characters are removed and case is kept.
pub fn trim(token: &str) -> &str {
    token.trim_start_matches('(').trim_end_matches(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_daide_order() {
        let tokens = tokenize("PRP (DMZ (FRA ITA))").unwrap();
        assert_eq!(tokens, vec!["prp", "dmz", "fra", "ita"]);
    }

    #[test]
    fn test_tokenize_strips_quotes_and_punctuation() {
        let tokens = tokenize("\"France, Italy.\"").unwrap();
        assert_eq!(tokens, vec!["france", "italy"]);
    }

    #[test]
    fn test_tokenize_keeps_inner_punctuation() {
        let tokens = tokenize("(it's) o'clock.").unwrap();
        assert_eq!(tokens, vec!["it's", "o'clock"]);
    }

    #[test]
    fn test_tokenize_does_not_split_on_tabs() {
        let tokens = tokenize("FRA\tITA RUS").unwrap();
        assert_eq!(tokens, vec!["fra\tita", "rus"]);
    }

    #[test]
    fn test_leading_only_chars_stay_at_back() {
        // '(' is only stripped from the front
        let tokens = tokenize("abc(").unwrap();
        assert_eq!(tokens, vec!["abc("]);
    }

    #[test]
    fn test_all_punctuation_word_fails() {
        let result = tokenize("PRP .");
        assert_eq!(
            result,
            Err(TokenizeError::EmptyToken {
                index: 1,
                word: ".".to_string()
            })
        );
    }

    #[test]
    fn test_double_space_fails() {
        assert!(matches!(
            tokenize("FRA  ITA"),
            Err(TokenizeError::EmptyToken { index: 1, .. })
        ));
    }

    #[test]
    fn test_empty_sentence_fails() {
        assert!(tokenize("").is_err());
    }

    #[test]
    fn test_custom_strip_set() {
        let tokenizer = Tokenizer::with_strip_set(StripSet::new("[", "];"));
        let tokens = tokenizer.tokenize("[FRA] ITA];").unwrap();
        assert_eq!(tokens, vec!["fra", "ita"]);
        assert_eq!(*tokenizer.strip_set(), StripSet::new("[", "];"));
    }

    #[test]
    fn test_default_strip_set() {
        let tokenizer = Tokenizer::new();
        assert_eq!(*tokenizer.strip_set(), StripSet::default());
    }

    #[test]
    fn test_trim_parentheses() {
        assert_eq!(trim("((FRA"), "FRA");
        assert_eq!(trim("ITA))"), "ITA");
        assert_eq!(trim("(FRA)"), "FRA");
    }

    #[test]
    fn test_trim_only_touches_own_side() {
        assert_eq!(trim(")FRA("), ")FRA(");
        assert_eq!(trim("\"FRA."), "\"FRA.");
        assert_eq!(trim("fra"), "fra");
    }
}
