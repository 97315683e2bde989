pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Format a number for human-facing output; non-numeric slots render "n/a".
pub(crate) fn fmt_num(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map(|f| format!("{f:.4}"))
        .unwrap_or_else(|| "n/a".to_string())
}
