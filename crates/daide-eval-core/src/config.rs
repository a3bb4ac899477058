//! Evaluation configuration loaded from YAML.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults, which reproduce the fixed punctuation sets, press level 130 and
//! full cleaning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cleaning::{Cleaner, CleaningConfig};
use crate::grammar::{create_grammar, GrammarConfig, GrammarError};
use crate::tokenizer::{StripSet, Tokenizer};

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid grammar settings: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Top-level evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Punctuation stripped by the tokenizer
    #[serde(default)]
    pub tokenizer: StripSet,

    /// Grammar used to validate generated orders
    #[serde(default)]
    pub grammar: GrammarConfig,

    /// Cleaning steps applied before scoring
    #[serde(default)]
    pub cleaning: CleaningConfig,
}

impl EvalConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: EvalConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokenizer.leading.is_empty() && self.tokenizer.trailing.is_empty() {
            return Err(ConfigError::ValidationError(
                "tokenizer needs at least one leading or trailing character".to_string(),
            ));
        }
        self.grammar.validate()?;
        Ok(())
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::with_strip_set(self.tokenizer.clone())
    }

    /// Build the cleaner described by the grammar and cleaning sections.
    pub fn cleaner(&self) -> Result<Cleaner, ConfigError> {
        let grammar = create_grammar(self.grammar)?;
        Ok(Cleaner::with_config(grammar, self.cleaning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::StringType;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = EvalConfig::from_yaml("").unwrap();
        assert_eq!(config, EvalConfig::default());
        assert_eq!(config.grammar.level, 130);
        assert!(config.cleaning.enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config = EvalConfig::from_yaml(
            r#"
grammar:
  level: 40
  string_type: ascii
cleaning:
  dedupe: false
"#,
        )
        .unwrap();
        assert_eq!(config.grammar.level, 40);
        assert_eq!(config.grammar.string_type, StringType::Ascii);
        assert!(!config.cleaning.dedupe);
        assert!(config.cleaning.validate);
        assert_eq!(config.tokenizer, StripSet::default());
    }

    #[test]
    fn test_custom_tokenizer() {
        let config = EvalConfig::from_yaml(
            r#"
tokenizer:
  leading: "["
  trailing: "];"
"#,
        )
        .unwrap();
        let tokens = config.tokenizer().tokenize("[FRA];").unwrap();
        assert_eq!(tokens, vec!["fra"]);
    }

    #[test]
    fn test_rejects_bad_level() {
        let result = EvalConfig::from_yaml("grammar:\n  level: 135\n");
        assert!(matches!(result, Err(ConfigError::Grammar(_))));
    }

    #[test]
    fn test_rejects_empty_strip_sets() {
        let result = EvalConfig::from_yaml("tokenizer:\n  leading: \"\"\n  trailing: \"\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_unknown_section() {
        let result = EvalConfig::from_yaml("scoring:\n  lowercase: true\n");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_from_file_builds_cleaner() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cleaning:\n  validate: false").unwrap();

        let config = EvalConfig::from_yaml_file(file.path()).unwrap();
        let cleaner = config.cleaner().unwrap();
        assert_eq!(cleaner.clean("not daide.").unwrap(), "not daide");
    }
}
