//! Annotation metadata records
//!
//! The metadata file is a JSON list of `{"meta_key": ..., "meta_value": ...}`
//! records. Each record becomes one top-level field of the combined report.

use crate::error::{ReportError, Result};
use crate::input::read_json;
use crate::{not_available, Section};
use serde_json::Value;
use std::path::Path;

const META_KEY: &str = "meta_key";
const META_VALUE: &str = "meta_value";

/// Load a metadata file into a flat field mapping.
pub fn load(path: &Path) -> Result<Section> {
    let doc = read_json(path)?;
    flatten(&doc).map_err(|message| ReportError::parse(path, "JSON", message))
}

/// Flatten metadata records into `meta_key -> meta_value`.
///
/// A record without `meta_value` maps to `"N/A"`; later records replace
/// earlier ones with the same key.
pub fn flatten(doc: &Value) -> std::result::Result<Section, String> {
    let records = doc
        .as_array()
        .ok_or_else(|| "metadata must be a list of meta_key/meta_value records".to_string())?;

    let mut fields = Section::new();
    for (index, record) in records.iter().enumerate() {
        let key = record
            .get(META_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| format!("record {index} has no string '{META_KEY}'"))?;

        let value = match record.get(META_VALUE) {
            Some(value) => value.clone(),
            None => {
                log::warn!("metadata '{}' has no {}, using N/A", key, META_VALUE);
                not_available()
            }
        };

        if fields.insert(key.to_string(), value).is_some() {
            log::warn!("metadata '{}' given more than once, keeping the last value", key);
        }
    }
    Ok(fields)
}
