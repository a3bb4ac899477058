//! Command implementations. Each returns the text to print.

use std::path::Path;

use anyhow::{Context, Result};
use daide_eval_core::{
    evaluate_files, evaluate_interleaved_file, score, validate_message, EvalConfig,
    DEMO_MESSAGE,
};
use tracing::{debug, info};

use crate::cli::{Command, EvalArgs, ScoreArgs, TokenizeArgs, ValidateArgs};
use crate::output::Formatter;

/// Load the config file, or defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<EvalConfig> {
    match path {
        Some(path) => {
            let config = EvalConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            info!(path = %path.display(), "Loaded config");
            Ok(config)
        }
        None => Ok(EvalConfig::default()),
    }
}

/// Dispatch a parsed command.
pub fn execute(command: Command, config: &EvalConfig, formatter: &Formatter) -> Result<String> {
    match command {
        Command::Tokenize(args) => execute_tokenize(args, config, formatter),
        Command::Score(args) => execute_score(args, formatter),
        Command::Validate(args) => execute_validate(args, config, formatter),
        Command::Eval(args) => execute_eval(args, config, formatter),
    }
}

pub fn execute_tokenize(
    args: TokenizeArgs,
    config: &EvalConfig,
    formatter: &Formatter,
) -> Result<String> {
    let tokens = config.tokenizer().tokenize(&args.sentence)?;
    formatter.format_tokens(&tokens)
}

pub fn execute_score(args: ScoreArgs, formatter: &Formatter) -> Result<String> {
    let report = score(&args.reference, &args.translation);
    debug!(
        overlap = report.overlap,
        precision = report.precision,
        recall = report.recall,
        "Scored"
    );
    formatter.format_report(&report, args.detail)
}

pub fn execute_validate(
    args: ValidateArgs,
    config: &EvalConfig,
    formatter: &Formatter,
) -> Result<String> {
    let mut grammar = config.grammar;
    if let Some(level) = args.level {
        grammar.level = level;
    }
    if let Some(string_type) = args.string_type {
        grammar.string_type = string_type.into();
    }

    let message = args.message.as_deref().unwrap_or(DEMO_MESSAGE);
    let value = validate_message(message, grammar)
        .with_context(|| format!("Invalid message: {}", message))?;
    formatter.format_value(&value)
}

pub fn execute_eval(args: EvalArgs, config: &EvalConfig, formatter: &Formatter) -> Result<String> {
    let mut config = config.clone();
    if args.no_clean {
        config.cleaning.enabled = false;
    }

    let run = match (args.interleaved, args.reference, args.translation) {
        (Some(path), _, _) => evaluate_interleaved_file(path, &config)?,
        (None, Some(reference), Some(translation)) => {
            evaluate_files(reference, translation, &config)?
        }
        _ => anyhow::bail!("Provide --interleaved or both --reference and --translation"),
    };
    formatter.format_run(&run)
}
