use std::io::Write;

use painel_filter::{Condition, FilterValue, ValueType, clean_string, evaluate_condition};
use tracing::debug;

use crate::cli::{CleanArgs, EvalArgs, OutputFormat};
use crate::error::CliResult;
use crate::output::{render_outcome, render_text};

pub(crate) fn handle_eval<W: Write>(
    args: &EvalArgs,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let condition: Condition = args.condition.parse()?;
    let hint = match &args.value_type {
        Some(name) => name.parse()?,
        None => ValueType::String,
    };
    let field = FilterValue::from_json(&args.field, hint);
    let comparison = FilterValue::from_json(&args.comparison, hint);
    let outcome = evaluate_condition(condition, &field, &comparison);
    debug!(
        condition = condition.id(),
        outcome = outcome.as_str(),
        "condition evaluated"
    );
    render_outcome(condition, outcome, format, out)
}

pub(crate) fn handle_clean<W: Write>(
    args: &CleanArgs,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    render_text(&clean_string(&args.text), format, out)
}
