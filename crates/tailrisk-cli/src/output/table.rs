use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::fmt_num;

/// Format output as a table using the tabled crate.
///
/// Study outputs get one row per sample size; everything else falls back to
/// a two-column field/value table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                if let Some(results) = result.get("results").and_then(Value::as_array) {
                    print_study_table(results);
                } else {
                    print_flat_object(result);
                }
                print_envelope_trailer(map);
            } else {
                print_flat_object(value);
            }
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_study_table(results: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record([
        "n",
        "normal?",
        "theo VaR",
        "theo ES",
        "param VaR",
        "param ES",
        "emp VaR",
        "emp ES",
        "emp VaR err",
        "emp ES err",
    ]);

    for rec in results {
        let n = rec
            .get("sample_size")
            .and_then(Value::as_u64)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let confirmed = match rec.pointer("/normality/confirmed").and_then(Value::as_bool) {
            Some(true) => "yes",
            Some(false) => "no",
            None => "?",
        };
        builder.push_record([
            n,
            confirmed.to_string(),
            fmt_num(rec.pointer("/theoretical/var")),
            fmt_num(rec.pointer("/theoretical/es")),
            fmt_num(rec.pointer("/parametric/pair/var")),
            fmt_num(rec.pointer("/parametric/pair/es")),
            fmt_num(rec.pointer("/empirical/var")),
            fmt_num(rec.pointer("/empirical/es")),
            fmt_num(rec.pointer("/empirical_errors/var_abs")),
            fmt_num(rec.pointer("/empirical_errors/es_abs")),
        ]);
    }

    let table = Table::from(builder);
    println!("{}", table);
}

fn print_envelope_trailer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &scalar(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    } else {
        println!("{}", value);
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
