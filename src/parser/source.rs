//! Loading raw SDE files into id-keyed mappings.
//!
//! Three encodings are accepted, chosen by file extension:
//! - `.yaml` / `.yml`: a top-level mapping keyed by type id (classic SDE)
//! - `.json`: an object keyed by the stringified type id
//! - `.jsonl`: one object per line, type id under `_key` (current SDE)
//!
//! Nothing here fails the run. A missing or unreadable file becomes an empty
//! mapping with a logged notice, and entries whose key is not an integer are
//! dropped.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use super::TypeId;

/// Raw source records keyed by type id
pub type RawMapping = BTreeMap<TypeId, Value>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SourceFormat {
    Yaml,
    Json,
    JsonLines,
}

impl SourceFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") => SourceFormat::JsonLines,
            Some("json") => SourceFormat::Json,
            _ => SourceFormat::Yaml,
        }
    }
}

/// Load a source file, degrading to an empty mapping on any file-level problem
pub fn load_mapping(path: &Path) -> RawMapping {
    if !path.exists() {
        warn!(path = %path.display(), "Source file not found, continuing without it");
        return RawMapping::new();
    }

    let result = match SourceFormat::from_path(path) {
        SourceFormat::Yaml => read_yaml(path),
        SourceFormat::Json => read_json(path),
        SourceFormat::JsonLines => read_json_lines(path),
    };

    match result {
        Ok(mapping) => {
            info!(path = %path.display(), entries = mapping.len(), "Loaded source file");
            mapping
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read source file, continuing without it");
            RawMapping::new()
        }
    }
}

fn read_yaml(path: &Path) -> Result<RawMapping, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let yaml: serde_yaml::Value =
        serde_yaml::from_reader(BufReader::new(file)).map_err(|e| e.to_string())?;

    match yaml {
        serde_yaml::Value::Mapping(entries) => Ok(entries
            .into_iter()
            .filter_map(|(key, value)| yaml_type_id(&key).map(|id| (id, yaml_to_json(value))))
            .collect()),
        // An empty YAML document
        serde_yaml::Value::Null => Ok(RawMapping::new()),
        _ => Err("expected a mapping at top level".to_string()),
    }
}

fn yaml_type_id(key: &serde_yaml::Value) -> Option<TypeId> {
    match key {
        serde_yaml::Value::Number(n) => n.as_i64(),
        serde_yaml::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Convert one YAML entry to JSON.
///
/// Scalar keys become strings (`materialTypeID`, `1`, `true`); null and
/// composite keys have no JSON form and are dropped with their value, so one
/// odd key never costs the rest of the file.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(entries) => {
            let mut obj = Map::new();
            for (key, value) in entries {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    other => {
                        debug!(key = ?other, "Dropping YAML entry with a non-scalar key");
                        continue;
                    }
                };
                obj.insert(key, yaml_to_json(value));
            }
            Value::Object(obj)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn read_json(path: &Path) -> Result<RawMapping, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let value: Value = serde_json::from_reader(BufReader::new(file)).map_err(|e| e.to_string())?;
    mapping_from_object(value)
}

fn read_json_lines(path: &Path) -> Result<RawMapping, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let reader = BufReader::new(file);
    let mut mapping = RawMapping::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_keyed_line(&line) {
            Some((id, value)) => {
                mapping.insert(id, value);
            }
            None => debug!(path = %path.display(), line = line_no + 1, "Skipping malformed line"),
        }
    }

    Ok(mapping)
}

/// Split a JSONL record into its `_key` and the remaining fields
fn parse_keyed_line(line: &str) -> Option<(TypeId, Value)> {
    let value: Value = serde_json::from_str(line).ok()?;
    let Value::Object(mut obj) = value else {
        return None;
    };
    let id = obj.remove("_key").as_ref().and_then(parse_key_value)?;
    Some((id, Value::Object(obj)))
}

fn mapping_from_object(value: Value) -> Result<RawMapping, String> {
    match value {
        Value::Object(obj) => Ok(collect_keyed(obj)),
        other => Err(format!("expected a mapping at top level, found {}", kind(&other))),
    }
}

fn collect_keyed(obj: Map<String, Value>) -> RawMapping {
    obj.into_iter()
        .filter_map(|(key, value)| key.trim().parse::<TypeId>().ok().map(|id| (id, value)))
        .collect()
}

fn parse_key_value(value: &Value) -> Option<TypeId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
