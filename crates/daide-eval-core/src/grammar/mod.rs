//! Grammar seam for DAIDE message validation.
//!
//! Full DAIDE grammar validation belongs to an external parser. This module
//! defines the contract such a parser fulfils ([`Grammar`]) and ships a
//! structural implementation that checks group balance, token shape and
//! string-literal mode. The cleaning pipeline only depends on the trait.

mod structural;
mod tree;

pub use structural::{create_grammar, StructuralGrammar};
pub use tree::{visit, OrderNode, OrderTree};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest press level a grammar can be built for.
pub const MAX_LEVEL: u32 = 130;

/// Errors from grammar construction or parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Unsupported press level {0}: expected a multiple of 10 up to 130")]
    UnsupportedLevel(u32),

    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },
}

impl GrammarError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// Which characters a quoted string literal may contain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StringType {
    /// ASCII letters, digits and spaces
    Alphanum,
    /// Printable ASCII
    Ascii,
    /// Any character except the closing quote
    #[default]
    All,
}

impl StringType {
    pub fn accepts(&self, c: char) -> bool {
        match self {
            StringType::Alphanum => c.is_ascii_alphanumeric() || c == ' ',
            StringType::Ascii => c.is_ascii() && !c.is_ascii_control(),
            StringType::All => true,
        }
    }
}

/// Parameters a grammar is built from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrammarConfig {
    /// DAIDE press level
    #[serde(default = "default_level")]
    pub level: u32,

    #[serde(default)]
    pub string_type: StringType,
}

fn default_level() -> u32 {
    MAX_LEVEL
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            string_type: StringType::default(),
        }
    }
}

impl GrammarConfig {
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self.level % 10 != 0 || self.level > MAX_LEVEL {
            return Err(GrammarError::UnsupportedLevel(self.level));
        }
        Ok(())
    }
}

/// A parser that turns a DAIDE message into an [`OrderTree`].
///
/// A parse failure means the message does not belong to the configured
/// language; callers cleaning generated orders discard such lines.
pub trait Grammar: Send + Sync {
    fn parse(&self, message: &str) -> Result<OrderTree, GrammarError>;

    /// Whether the message parses.
    fn is_valid(&self, message: &str) -> bool {
        self.parse(message).is_ok()
    }
}
