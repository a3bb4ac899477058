//! Output formatting for the CLI.

use anyhow::Result;
use daide_eval_core::{AccuracyReport, CorpusRun, PairOutcome};
use serde_json::Value;

use crate::cli::CliFormat;

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
}

impl Formatter {
    pub fn new(format: CliFormat) -> Self {
        Self { format }
    }

    /// Format tokens, one per line in text mode.
    pub fn format_tokens(&self, tokens: &[String]) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string(tokens)?),
            CliFormat::Text => Ok(tokens.join("\n")),
        }
    }

    /// Format a score, optionally with its breakdown.
    pub fn format_report(&self, report: &AccuracyReport, detail: bool) -> Result<String> {
        match (self.format, detail) {
            (CliFormat::Json, true) => Ok(serde_json::to_string_pretty(report)?),
            (CliFormat::Json, false) => {
                Ok(serde_json::json!({ "f_score": report.f_score }).to_string())
            }
            (CliFormat::Text, false) => Ok(report.f_score.to_string()),
            (CliFormat::Text, true) => Ok(format!(
                "f_score:     {}\nprecision:   {:.3}\nrecall:      {:.3}\noverlap:     {}\nreference:   {} tokens\ntranslation: {} tokens",
                report.f_score,
                report.precision,
                report.recall,
                report.overlap,
                report.reference_len,
                report.translation_len,
            )),
        }
    }

    /// Format a structured parse.
    pub fn format_value(&self, value: &Value) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            CliFormat::Text => Ok(value.to_string()),
        }
    }

    /// Format per-pair results of a corpus run.
    pub fn format_run(&self, run: &CorpusRun) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(run)?),
            CliFormat::Text => Ok(self.format_run_text(run)),
        }
    }

    fn format_run_text(&self, run: &CorpusRun) -> String {
        let mut lines = vec![format!("{:>6}  {:>7}  translation", "line", "f_score")];
        for pair in &run.pairs {
            let line = match &pair.outcome {
                PairOutcome::Scored {
                    translation,
                    report,
                    ..
                } => format!("{:>6}  {:>7.3}  {}", pair.line, report.f_score, translation),
                PairOutcome::Discarded { reason } => {
                    format!("{:>6}  {:>7}  {}", pair.line, "-", reason)
                }
            };
            lines.push(line);
        }
        lines.push(format!(
            "{} pair(s): {} scored, {} discarded",
            run.pairs.len(),
            run.scored(),
            run.discarded()
        ));
        lines.join("\n")
    }
}
