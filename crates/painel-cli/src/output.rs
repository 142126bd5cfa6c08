//! Output renderers for CLI commands.

use std::io::Write;

use anyhow::anyhow;
use painel_filter::{Condition, ConditionDescriptor, FilterPass, MatchOutcome};
use serde::Serialize;
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

pub(crate) fn render_conditions<W: Write>(
    descriptors: &[ConditionDescriptor],
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(out, &descriptors),
        OutputFormat::Table => {
            write_line(out, &format!("{:<14} {:<14} TYPE", "ID", "NAME"))?;
            for descriptor in descriptors {
                write_line(
                    out,
                    &format!(
                        "{:<14} {:<14} {}",
                        descriptor.condition_id(),
                        descriptor.condition_name,
                        descriptor.value_type
                    ),
                )?;
            }
            Ok(())
        }
    }
}

pub(crate) fn render_outcome<W: Write>(
    condition: Condition,
    outcome: MatchOutcome,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(
            out,
            &json!({ "condition_id": condition.id(), "outcome": outcome }),
        ),
        OutputFormat::Table => write_line(out, outcome.as_str()),
    }
}

pub(crate) fn render_filter_pass<W: Write>(
    pass: &FilterPass<'_, Value>,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(
            out,
            &json!({ "records": pass.records, "summary": pass.summary }),
        ),
        OutputFormat::Table => {
            for record in &pass.records {
                let line = serde_json::to_string(record)
                    .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
                write_line(out, &line)?;
            }
            let summary = pass.summary;
            write_line(
                out,
                &format!(
                    "kept {} of {} records ({} indeterminate)",
                    summary.matched, summary.total, summary.indeterminate
                ),
            )
        }
    }
}

pub(crate) fn render_text<W: Write>(text: &str, format: OutputFormat, out: &mut W) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_json(out, &json!({ "value": text })),
        OutputFormat::Table => write_line(out, text),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    write_line(out, &text)
}

fn write_line<W: Write>(out: &mut W, line: &str) -> CliResult<()> {
    writeln!(out, "{line}")
        .map_err(|err| CliError::failure(anyhow!("failed to write output: {err}")))
}
