use std::io::Write;

use painel_filter::conditions_for_name;

use crate::cli::{ConditionsArgs, OutputFormat};
use crate::error::CliResult;
use crate::output::render_conditions;

pub(crate) fn handle_conditions<W: Write>(
    args: &ConditionsArgs,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let descriptors = conditions_for_name(&args.value_type)?;
    render_conditions(descriptors, format, out)
}
