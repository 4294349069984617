//! Dataset loading.
//!
//! Accepts the three layouts benchmark result files come in:
//!
//! - a JSON object keyed by example id (the benchmark release format),
//!   read back in id order,
//! - a JSON array of records (ids are array indices),
//! - JSON lines, one record per line (ids are line numbers).
//!
//! Each record is split into the candidate text, read from a configurable
//! column, and a typed domain record validated once here. Any failure at this
//! level is fatal for the run.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a whole evaluation run.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {id:?} is not a JSON object")]
    NotAnObject { id: String },

    #[error("record {id:?} is invalid: {source}")]
    Record {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {id:?} has a non-text value in candidate column {field:?}")]
    CandidateType { id: String, field: String },

    #[error("no record has the candidate column {0:?}")]
    MissingCandidateColumn(String),
}

/// One benchmark instance, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Example<R> {
    /// The record key, array index or line number.
    pub id: String,
    /// The model output being scored. Empty when the column was missing.
    pub candidate: String,
    /// The typed domain payload: constraints and reference plan.
    pub record: R,
}

/// Read and parse a dataset file.
pub fn load_examples<R: DeserializeOwned>(
    path: &Path,
    pred_field: &str,
) -> Result<Vec<Example<R>>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_owned(),
        source,
    })?;
    let examples = parse_examples(&content, pred_field)?;
    info!(path = %path.display(), count = examples.len(), "dataset loaded");
    Ok(examples)
}

/// Parse dataset content already in memory.
pub fn parse_examples<R: DeserializeOwned>(
    content: &str,
    pred_field: &str,
) -> Result<Vec<Example<R>>, DatasetError> {
    let raw = split_records(content, pred_field)?;
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    if !raw.iter().any(|(_, map)| map.contains_key(pred_field)) {
        return Err(DatasetError::MissingCandidateColumn(pred_field.to_owned()));
    }

    raw.into_iter()
        .map(|(id, mut map)| {
            let candidate = take_candidate(&id, &mut map, pred_field)?;
            let record = serde_json::from_value(Value::Object(map))
                .map_err(|source| DatasetError::Record { id: id.clone(), source })?;
            Ok(Example { id, candidate, record })
        })
        .collect()
}

/// Split the file into `(id, record)` pairs.
fn split_records(
    content: &str,
    pred_field: &str,
) -> Result<Vec<(String, Map<String, Value>)>, DatasetError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) if map.is_empty() => Ok(Vec::new()),
        Ok(Value::Object(map)) if is_keyed_collection(&map, pred_field) => map
            .into_iter()
            .map(|(id, value)| into_object(id, value))
            .collect(),
        // A single-line JSON-lines file holds one bare record.
        Ok(Value::Object(map)) => Ok(vec![("0".to_owned(), map)]),
        Ok(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, value)| into_object(i.to_string(), value))
            .collect(),
        Ok(_) => Err(DatasetError::NotAnObject { id: "0".to_owned() }),
        Err(_) => split_json_lines(content),
    }
}

/// An object is a collection keyed by example id, rather than one record,
/// when it has no candidate column of its own and at least half of its values
/// are objects. Stray non-object entries then fail as [`DatasetError::NotAnObject`].
fn is_keyed_collection(map: &Map<String, Value>, pred_field: &str) -> bool {
    if map.is_empty() || map.contains_key(pred_field) {
        return false;
    }
    let objects = map.values().filter(|v| v.is_object()).count();
    objects * 2 >= map.len()
}

fn split_json_lines(content: &str) -> Result<Vec<(String, Map<String, Value>)>, DatasetError> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|source| DatasetError::Json {
            line: idx + 1,
            source,
        })?;
        records.push(into_object(records.len().to_string(), value)?);
    }
    Ok(records)
}

fn into_object(id: String, value: Value) -> Result<(String, Map<String, Value>), DatasetError> {
    match value {
        Value::Object(map) => Ok((id, map)),
        _ => Err(DatasetError::NotAnObject { id }),
    }
}

/// Remove the candidate column from the record and return it as text.
///
/// A list of strings (some runs store one sentence per entry) is joined with
/// newlines. A missing or null value is treated as an empty answer.
fn take_candidate(
    id: &str,
    map: &mut Map<String, Value>,
    pred_field: &str,
) -> Result<String, DatasetError> {
    match map.remove(pred_field) {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) | None => {
            warn!(id, field = pred_field, "record has no candidate; scoring as empty");
            Ok(String::new())
        }
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s),
                _ => Err(DatasetError::CandidateType {
                    id: id.to_owned(),
                    field: pred_field.to_owned(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|lines| lines.join("\n")),
        Some(_) => Err(DatasetError::CandidateType {
            id: id.to_owned(),
            field: pred_field.to_owned(),
        }),
    }
}
