//! Argument parsing, logging setup and command dispatch.

use std::convert::Infallible;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use painel_format::MAX_DECIMALS;
use painel_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use serde_json::Value;
use tracing::debug;

use crate::commands::conditions::handle_conditions;
use crate::commands::evaluate::{handle_clean, handle_eval};
use crate::commands::filter::handle_filter;
use crate::commands::format::handle_format;
use crate::error::{CliError, CliResult};

const BUILD_SHA: &str = match option_env!("PAINEL_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, installs logging and executes the requested command.
/// Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let stdin = io::stdin();
    let result = init_telemetry(&cli)
        .and_then(|()| dispatch(cli, &mut stdin.lock(), &mut stdout.lock()));

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn init_telemetry(cli: &Cli) -> CliResult<()> {
    let config = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, LogFormat::from),
        build_sha: BUILD_SHA,
    };
    init_logging(&config)?;
    Ok(())
}

pub(crate) fn dispatch<R: Read, W: Write>(cli: Cli, input: &mut R, out: &mut W) -> CliResult<()> {
    debug!(command = command_label(&cli.command), "dispatching command");
    match cli.command {
        Command::Conditions(args) => handle_conditions(&args, cli.output, out),
        Command::Eval(args) => handle_eval(&args, cli.output, out),
        Command::Clean(args) => handle_clean(&args, cli.output, out),
        Command::Filter(args) => handle_filter(&args, cli.output, input, out),
        Command::Format(command) => handle_format(&command, cli.output, out),
    }
}

#[derive(Parser)]
#[command(name = "painel", about = "Filter-condition engine for data table dialogs")]
pub(crate) struct Cli {
    #[arg(
        long = "output",
        global = true,
        env = "PAINEL_OUTPUT",
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for command results"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "PAINEL_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log level or filter directive; RUST_LOG takes precedence"
    )]
    pub(crate) log_level: String,
    #[arg(
        long,
        global = true,
        env = "PAINEL_LOG_FORMAT",
        value_enum,
        help = "Log line format; pretty in debug builds and json otherwise when omitted"
    )]
    pub(crate) log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the conditions registered for a value type.
    Conditions(ConditionsArgs),
    /// Evaluate one condition against a field value.
    Eval(EvalArgs),
    /// Print the normalized form used for text comparisons.
    Clean(CleanArgs),
    /// Filter a JSON array of records with a rule document.
    Filter(FilterArgs),
    /// Render a value with pt-BR display formatting.
    #[command(subcommand)]
    Format(FormatCommand),
}

#[derive(Args)]
pub(crate) struct ConditionsArgs {
    #[arg(help = "Value type: string, number, date or boolean")]
    pub(crate) value_type: String,
}

#[derive(Args)]
pub(crate) struct EvalArgs {
    #[arg(help = "Condition identifier, e.g. $contains")]
    pub(crate) condition: String,
    #[arg(
        value_parser = parse_operand,
        allow_negative_numbers = true,
        help = "Field value as JSON (bare text is taken as a string)"
    )]
    pub(crate) field: Value,
    #[arg(
        value_parser = parse_operand,
        allow_negative_numbers = true,
        help = "Comparison value as JSON (bare text is taken as a string)"
    )]
    pub(crate) comparison: Value,
    #[arg(long = "type", help = "Value type hint; `date` parses date strings")]
    pub(crate) value_type: Option<String>,
}

#[derive(Args)]
pub(crate) struct CleanArgs {
    #[arg(help = "Text to normalize")]
    pub(crate) text: String,
}

#[derive(Args)]
pub(crate) struct FilterArgs {
    #[arg(short = 'r', long, help = "Rule document ({\"rules\": [...]})")]
    pub(crate) rules: PathBuf,
    #[arg(
        short = 'i',
        long,
        help = "JSON array of records; reads stdin when omitted"
    )]
    pub(crate) input: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum FormatCommand {
    /// BRL currency, e.g. R$ 1.234,50.
    Currency(AmountArgs),
    /// Ratio rendered as a percentage.
    Percent(DecimalArgs),
    /// Number with pt-BR separators.
    Number(DecimalArgs),
    /// Date rendered as dd/mm/aaaa.
    Date(DateArgs),
}

#[derive(Args)]
pub(crate) struct AmountArgs {
    #[arg(allow_negative_numbers = true)]
    pub(crate) value: f64,
}

#[derive(Args)]
pub(crate) struct DecimalArgs {
    #[arg(allow_negative_numbers = true)]
    pub(crate) value: f64,
    #[arg(
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_DECIMALS)),
        help = "Fractional digits to render"
    )]
    pub(crate) decimals: u8,
}

#[derive(Args)]
pub(crate) struct DateArgs {
    #[arg(help = "RFC 3339 timestamp or YYYY-MM-DD")]
    pub(crate) value: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

fn parse_operand(raw: &str) -> Result<Value, Infallible> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Conditions(_) => "conditions",
        Command::Eval(_) => "eval",
        Command::Clean(_) => "clean",
        Command::Filter(_) => "filter",
        Command::Format(_) => "format",
    }
}

pub(crate) fn validation_from_parse(field: &str, raw: &str) -> CliError {
    CliError::validation(format!("invalid {field}: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap_or_else(|err| panic!("parse failed: {err}"))
    }

    fn run_args(args: &[&str]) -> (CliResult<()>, String) {
        let cli = parse(args);
        let mut out = Vec::new();
        let result = dispatch(cli, &mut io::empty(), &mut out);
        (result, String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn operands_accept_json_or_bare_text() {
        assert_eq!(parse_operand("10"), Ok(json!(10)));
        assert_eq!(parse_operand("\"x y\""), Ok(json!("x y")));
        assert_eq!(parse_operand("Product-42"), Ok(json!("Product-42")));
        assert_eq!(parse_operand("null"), Ok(Value::Null));
    }

    #[test]
    fn global_flags_have_defaults() {
        let cli = parse(&["painel", "clean", "x"]);
        assert_eq!(cli.output, OutputFormat::Table);
        assert_eq!(cli.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(cli.log_format, None);
    }

    #[test]
    fn negative_numbers_are_values() {
        let cli = parse(&["painel", "format", "currency", "-10"]);
        assert!(matches!(
            cli.command,
            Command::Format(FormatCommand::Currency(AmountArgs { value })) if value < 0.0
        ));
    }

    #[test]
    fn decimals_outside_the_supported_range_are_rejected() {
        for raw in ["21", "300", "70000"] {
            let err = Cli::try_parse_from(["painel", "format", "number", "1", "--decimals", raw]).err();
            assert_eq!(err.map(|err| err.exit_code()), Some(2));
        }
        let cli = parse(&["painel", "format", "percent", "0.5", "--decimals", "20"]);
        assert!(matches!(
            cli.command,
            Command::Format(FormatCommand::Percent(DecimalArgs { decimals: 20, .. }))
        ));
    }

    #[test]
    fn explicit_log_format_is_kept() {
        let cli = parse(&["painel", "--log-format", "json", "clean", "x"]);
        assert_eq!(cli.log_format, Some(LogFormatArg::Json));
    }

    #[test]
    fn command_label_matches_variants() {
        assert_eq!(command_label(&parse(&["painel", "clean", "x"]).command), "clean");
        assert_eq!(
            command_label(&parse(&["painel", "conditions", "date"]).command),
            "conditions"
        );
        assert_eq!(
            command_label(&parse(&["painel", "format", "number", "1"]).command),
            "format"
        );
    }

    #[test]
    fn dispatch_routes_eval() {
        let (result, output) = run_args(&["painel", "eval", "$ne", "10", "10"]);
        assert!(result.is_ok());
        assert_eq!(output.trim(), "no_match");
    }

    #[test]
    fn dispatch_surfaces_validation_errors() {
        let (result, _) = run_args(&["painel", "conditions", "currency"]);
        assert!(matches!(result, Err(CliError::Validation(message)) if message.contains("currency")));
    }

    #[test]
    fn log_format_arg_maps_to_telemetry_format() {
        assert_eq!(LogFormat::from(LogFormatArg::Json), LogFormat::Json);
        assert_eq!(LogFormat::from(LogFormatArg::Pretty), LogFormat::Pretty);
    }
}
