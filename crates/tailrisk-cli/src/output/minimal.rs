use serde_json::Value;

use super::fmt_num;

/// Print just the key answer value from the output.
///
/// Study outputs print one line per sample size; otherwise the first
/// matching well-known field wins, falling back to the first field.
pub fn print_minimal(value: &Value) {
    if let Some(results) = value.pointer("/result/results").and_then(Value::as_array) {
        for rec in results {
            let n = rec
                .get("sample_size")
                .and_then(Value::as_u64)
                .unwrap_or_default();
            println!(
                "n={} VaR={} ES={}",
                n,
                fmt_num(rec.pointer("/empirical/var")),
                fmt_num(rec.pointer("/empirical/es")),
            );
        }
        return;
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority pointers into the known output shapes
    let priority = [
        "/var",
        "/es",
        "/empirical/var",
        "/parametric/var",
        "/confirmed",
        "/ks_p_value",
    ];
    for ptr in &priority {
        if let Some(val) = result_obj.pointer(ptr) {
            if !val.is_null() {
                println!("{}", scalar(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }

    println!("{}", scalar(result_obj));
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
