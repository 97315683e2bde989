use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// Study outputs become one row per sample size; everything else falls back
/// to field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(results) = value.pointer("/result/results").and_then(Value::as_array) {
        write_study_csv(&mut wtr, results);
    } else {
        let flat = value
            .get("result")
            .and_then(Value::as_object)
            .or_else(|| value.as_object());
        if let Some(map) = flat {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &csv_value(val)]);
            }
        } else {
            let _ = wtr.write_record([&csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_study_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, results: &[Value]) {
    let _ = wtr.write_record([
        "sample_size",
        "normality_confirmed",
        "theoretical_var",
        "theoretical_es",
        "parametric_var",
        "parametric_es",
        "empirical_var",
        "empirical_es",
        "empirical_var_abs_error",
        "empirical_es_abs_error",
    ]);

    for rec in results {
        let cell = |ptr: &str| {
            rec.pointer(ptr)
                .map(|v| csv_value(v))
                .unwrap_or_default()
        };
        let _ = wtr.write_record([
            cell("/sample_size"),
            cell("/normality/confirmed"),
            cell("/theoretical/var"),
            cell("/theoretical/es"),
            cell("/parametric/pair/var"),
            cell("/parametric/pair/es"),
            cell("/empirical/var"),
            cell("/empirical/es"),
            cell("/empirical_errors/var_abs"),
            cell("/empirical_errors/es_abs"),
        ]);
    }
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
