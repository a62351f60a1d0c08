//! Readers for the JSON, YAML and TSV inputs
//!
//! Every reader takes the whole file into memory, parses it, and returns a
//! `serde_json` value so the source mappers work on a single representation.

use crate::error::{ReportError, Result};
use crate::Section;
use serde_json::{Number, Value};
use std::path::Path;
use yaml_rust::{Yaml, YamlLoader};

/// Read a file to a string; content that is not UTF-8 is a `format` parse error.
pub fn read_text(path: &Path, format: &'static str) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| ReportError::parse(path, format, e.to_string()))
}

/// Read and parse a JSON document.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = read_text(path, "JSON")?;
    serde_json::from_str(&text).map_err(|e| ReportError::parse(path, "JSON", e.to_string()))
}

/// Read and parse the first document of a YAML file.
pub fn read_yaml(path: &Path) -> Result<Value> {
    let text = read_text(path, "YAML")?;
    let mut docs =
        YamlLoader::load_from_str(&text).map_err(|e| ReportError::parse(path, "YAML", e.to_string()))?;

    if docs.len() > 1 {
        log::warn!(
            "{} holds {} YAML documents, only the first is used",
            path.display(),
            docs.len()
        );
    }
    if docs.is_empty() {
        return Err(ReportError::parse(path, "YAML", "file contains no YAML document"));
    }
    Ok(yaml_to_json(&docs.swap_remove(0)))
}

/// Require the top level of a parsed document to be a mapping.
pub fn expect_mapping(doc: Value, path: &Path, format: &'static str) -> Result<Section> {
    match doc {
        Value::Object(map) => Ok(map),
        other => Err(ReportError::parse(
            path,
            format,
            format!("expected a mapping at the top level, found {}", kind(&other)),
        )),
    }
}

/// Read a headered two-column TSV of `key<TAB>count` rows.
///
/// Later rows replace earlier rows with the same key.
pub fn read_count_table(path: &Path) -> Result<Section> {
    let text = read_text(path, "TSV")?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut counts = Section::new();
    for (index, record) in reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = record.map_err(|e| ReportError::parse(path, "TSV", e.to_string()))?;

        let (Some(key), Some(count)) = (record.get(0), record.get(1)) else {
            return Err(ReportError::parse(
                path,
                "TSV",
                format!("line {line}: expected a key and a count"),
            ));
        };
        if key.is_empty() {
            return Err(ReportError::parse(path, "TSV", format!("line {line}: empty key")));
        }
        let count: i64 = count.parse().map_err(|_| {
            ReportError::parse(
                path,
                "TSV",
                format!("line {line}: count '{count}' for '{key}' is not an integer"),
            )
        })?;

        if counts.insert(key.to_string(), Value::from(count)).is_some() {
            log::warn!("{}: duplicate key '{}', keeping line {}", path.display(), key, line);
        }
    }
    Ok(counts)
}

/// Convert a YAML node into the equivalent JSON value.
pub fn yaml_to_json(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Integer(i) => Value::from(*i),
        Yaml::Real(raw) => yaml
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.clone())),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Array(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Hash(hash) => Value::Object(
            hash.iter()
                .map(|(key, value)| (yaml_key(key), yaml_to_json(value)))
                .collect(),
        ),
        Yaml::Alias(_) | Yaml::Null | Yaml::BadValue => Value::Null,
    }
}

fn yaml_key(key: &Yaml) -> String {
    match key {
        Yaml::String(s) | Yaml::Real(s) => s.clone(),
        Yaml::Integer(i) => i.to_string(),
        Yaml::Boolean(b) => b.to_string(),
        other => yaml_to_json(other).to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
