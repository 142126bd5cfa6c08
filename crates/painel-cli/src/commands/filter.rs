use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, anyhow};
use painel_filter::{FilterSet, apply_filters};
use serde_json::Value;
use tracing::info;

use crate::cli::{FilterArgs, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::render_filter_pass;

pub(crate) fn handle_filter<R: Read, W: Write>(
    args: &FilterArgs,
    format: OutputFormat,
    input: &mut R,
    out: &mut W,
) -> CliResult<()> {
    let rules = load_rules(&args.rules)?;
    let filters = rules.to_available()?;
    let records = load_records(args.input.as_deref(), input)?;

    let pass = apply_filters(&records, &filters);
    info!(
        rules = filters.len(),
        total = pass.summary.total,
        matched = pass.summary.matched,
        indeterminate = pass.summary.indeterminate,
        "records filtered"
    );
    render_filter_pass(&pass, format, out)
}

fn load_rules(path: &Path) -> CliResult<FilterSet> {
    let payload = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)?;
    serde_json::from_str(&payload)
        .map_err(|err| CliError::failure(anyhow!("rule document is not valid JSON: {err}")))
}

fn load_records<R: Read>(path: Option<&Path>, input: &mut R) -> CliResult<Vec<Value>> {
    let payload = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .map_err(CliError::failure)?,
        None => {
            let mut buffer = String::new();
            input
                .read_to_string(&mut buffer)
                .context("failed to read records from stdin")
                .map_err(CliError::failure)?;
            buffer
        }
    };
    let parsed: Value = serde_json::from_str(&payload)
        .map_err(|err| CliError::failure(anyhow!("records are not valid JSON: {err}")))?;
    match parsed {
        Value::Array(records) => Ok(records),
        other => Err(CliError::validation(format!(
            "records must be a JSON array, found {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, value.to_string()).unwrap_or_else(|err| panic!("write failed: {err}"));
        path
    }

    fn catalog() -> Value {
        json!([
            { "name": "Cabo USB", "price": 19.9, "active": true },
            { "name": "Carregador", "price": 89.0, "active": true },
            { "name": "Cabo HDMI", "price": null, "active": false }
        ])
    }

    fn rules() -> Value {
        json!({
            "rules": [
                { "field": "name", "type": "string", "condition": "$startsWith", "value": "cabo" },
                { "field": "price", "type": "number", "condition": "$lt", "value": 50 }
            ]
        })
    }

    #[test]
    fn filters_records_from_file() -> CliResult<()> {
        let dir = TempDir::new().map_err(CliError::failure)?;
        let args = FilterArgs {
            rules: write_file(&dir, "rules.json", &rules()),
            input: Some(write_file(&dir, "records.json", &catalog())),
        };
        let mut out = Vec::new();
        handle_filter(&args, OutputFormat::Json, &mut io::empty(), &mut out)?;

        let parsed: Value = serde_json::from_slice(&out).map_err(CliError::failure)?;
        assert_eq!(parsed["records"], json!([catalog()[0]]));
        assert_eq!(
            parsed["summary"],
            json!({ "total": 3, "matched": 1, "indeterminate": 1 })
        );
        Ok(())
    }

    #[test]
    fn reads_records_from_stdin_when_no_input_given() -> CliResult<()> {
        let dir = TempDir::new().map_err(CliError::failure)?;
        let args = FilterArgs {
            rules: write_file(&dir, "rules.json", &json!({ "rules": [] })),
            input: None,
        };
        let stdin = catalog().to_string().into_bytes();
        let mut out = Vec::new();
        handle_filter(&args, OutputFormat::Table, &mut stdin.as_slice(), &mut out)?;

        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with("kept 3 of 3 records (0 indeterminate)\n"));
        Ok(())
    }

    #[test]
    fn unknown_condition_in_rules_is_a_validation_error() -> CliResult<()> {
        let dir = TempDir::new().map_err(CliError::failure)?;
        let args = FilterArgs {
            rules: write_file(
                &dir,
                "rules.json",
                &json!({ "rules": [{ "field": "price", "type": "number", "condition": "$contains", "value": 1 }] }),
            ),
            input: Some(write_file(&dir, "records.json", &catalog())),
        };
        let err = handle_filter(&args, OutputFormat::Table, &mut io::empty(), &mut Vec::new()).err();
        assert!(matches!(err, Some(CliError::Validation(ref message)) if message.contains("$contains")));
        Ok(())
    }

    #[test]
    fn missing_rules_file_is_a_failure() {
        let args = FilterArgs {
            rules: PathBuf::from("/nonexistent/painel/rules.json"),
            input: None,
        };
        let err = handle_filter(&args, OutputFormat::Table, &mut io::empty(), &mut Vec::new()).err();
        assert!(matches!(err, Some(ref err) if err.exit_code() == 3));
    }

    #[test]
    fn non_array_records_are_rejected() {
        let mut input = "{\"name\": \"x\"}".as_bytes();
        let err = load_records(None, &mut input).err();
        assert!(matches!(err, Some(CliError::Validation(ref message)) if message.ends_with("object")));
    }
}
