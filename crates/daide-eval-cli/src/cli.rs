//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use daide_eval_core::StringType;

/// daide-eval - Score generated DAIDE orders against references.
#[derive(Debug, Parser)]
#[command(name = "daide-eval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value_t = CliFormat::Text)]
    pub format: CliFormat,

    /// Configuration file path (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Plain text (default)
    Text,
    /// JSON
    Json,
}

/// String-literal modes accepted by the grammar.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliStringType {
    Alphanum,
    Ascii,
    All,
}

impl From<CliStringType> for StringType {
    fn from(value: CliStringType) -> Self {
        match value {
            CliStringType::Alphanum => StringType::Alphanum,
            CliStringType::Ascii => StringType::Ascii,
            CliStringType::All => StringType::All,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a sentence into lowercase tokens
    Tokenize(TokenizeArgs),

    /// Score one translation against one reference
    Score(ScoreArgs),

    /// Parse a DAIDE message and print its structure
    Validate(ValidateArgs),

    /// Clean and score a corpus of reference/translation pairs
    Eval(EvalArgs),
}

/// Arguments for the tokenize command.
#[derive(Debug, Parser)]
pub struct TokenizeArgs {
    /// Sentence to tokenize
    pub sentence: String,
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// Reference order
    pub reference: String,

    /// Generated order
    pub translation: String,

    /// Print overlap, precision and recall too
    #[arg(short, long)]
    pub detail: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Message to parse (defaults to a sample DMZ proposal)
    pub message: Option<String>,

    /// Press level, overriding the config file
    #[arg(short, long)]
    pub level: Option<u32>,

    /// String-literal mode, overriding the config file
    #[arg(short, long, value_enum)]
    pub string_type: Option<CliStringType>,
}

/// Arguments for the eval command.
#[derive(Debug, Parser)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["reference", "interleaved"])
))]
pub struct EvalArgs {
    /// File of reference orders, one per line
    #[arg(short, long, requires = "translation")]
    pub reference: Option<PathBuf>,

    /// File of generated orders, one per line
    #[arg(short, long, requires = "reference")]
    pub translation: Option<PathBuf>,

    /// File of alternating reference and generated lines
    #[arg(short, long, conflicts_with_all = ["reference", "translation"])]
    pub interleaved: Option<PathBuf>,

    /// Score lines as they are, without cleaning
    #[arg(long)]
    pub no_clean: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score() {
        let cli = Cli::parse_from(["daide-eval", "score", "PRP (A)", "PRP (B)", "--detail"]);
        match cli.command {
            Command::Score(args) => {
                assert_eq!(args.reference, "PRP (A)");
                assert!(args.detail);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.format, CliFormat::Text);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["daide-eval", "tokenize", "FRA", "-vv", "--format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, CliFormat::Json);
    }

    #[test]
    fn test_eval_requires_input() {
        assert!(Cli::try_parse_from(["daide-eval", "eval"]).is_err());
        assert!(Cli::try_parse_from(["daide-eval", "eval", "-r", "ref.txt"]).is_err());
        assert!(Cli::try_parse_from(["daide-eval", "eval", "-i", "a.txt", "-r", "b.txt"]).is_err());
        assert!(Cli::try_parse_from(["daide-eval", "eval", "-r", "a.txt", "-t", "b.txt"]).is_ok());
        assert!(Cli::try_parse_from(["daide-eval", "eval", "-i", "a.txt"]).is_ok());
    }
}
