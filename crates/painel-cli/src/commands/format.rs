use std::io::Write;

use painel_filter::parse_date;
use painel_format::{format_currency, format_date, format_number, format_percentage};

use crate::cli::{FormatCommand, OutputFormat, validation_from_parse};
use crate::error::CliResult;
use crate::output::render_text;

pub(crate) fn handle_format<W: Write>(
    command: &FormatCommand,
    format: OutputFormat,
    out: &mut W,
) -> CliResult<()> {
    let text = match command {
        FormatCommand::Currency(args) => format_currency(args.value),
        FormatCommand::Percent(args) => format_percentage(args.value, args.decimals),
        FormatCommand::Number(args) => format_number(args.value, args.decimals),
        FormatCommand::Date(args) => {
            let stamp =
                parse_date(&args.value).ok_or_else(|| validation_from_parse("date", &args.value))?;
            format_date(stamp.date_naive())
        }
    };
    render_text(&text, format, out)
}
