use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
    Ok(value)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.exists() {
        return Err(format!("File not found: {}", resolved.display()).into());
    }
    if !resolved.is_file() {
        return Err(format!("Not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}

/// Attempt to read JSON from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)?;
    Ok(Some(value))
}

/// Load a vector of observations from `--input <file>`, `--values`, or piped
/// stdin, in that order of precedence.
pub fn load_values(
    input_path: &Option<String>,
    cli_values: &Option<Vec<f64>>,
) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    if let Some(ref path) = input_path {
        let data: Value = read_json(path)?;
        values_from_json(&data)
    } else if let Some(ref values) = cli_values {
        Ok(values.clone())
    } else if let Some(data) = read_stdin()? {
        values_from_json(&data)
    } else {
        Err("Provide --values or --input file or pipe JSON via stdin".into())
    }
}

fn values_from_json(data: &Value) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let arr = if let Some(arr) = data.as_array() {
        arr
    } else if let Some(arr) = data.get("values").and_then(|v| v.as_array()) {
        arr
    } else {
        return Err("Expected a JSON array of observations or object with a 'values' key".into());
    };

    let mut values = Vec::with_capacity(arr.len());
    for v in arr {
        match v.as_f64() {
            Some(f) => values.push(f),
            None => return Err(format!("Non-numeric observation: {v}").into()),
        }
    }
    Ok(values)
}
