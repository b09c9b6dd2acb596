// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;
use serde_json::Value;
use shelfmark_app::{LoadFailure, Record};

/// Length of `/*O_o*/\ngoogle.visualization.Query.setResponse(`.
pub const WRAPPER_PREFIX_LEN: usize = 47;
/// Length of the closing `);`.
pub const WRAPPER_SUFFIX_LEN: usize = 2;

/// Cuts the fixed-length framing off a response body.
pub fn strip_wrapper(body: &str) -> Result<&str, LoadFailure> {
    let end = body
        .len()
        .checked_sub(WRAPPER_SUFFIX_LEN)
        .filter(|end| *end >= WRAPPER_PREFIX_LEN)
        .ok_or_else(|| {
            LoadFailure::payload(format!(
                "response is {} bytes, too short for the {WRAPPER_PREFIX_LEN}+{WRAPPER_SUFFIX_LEN} byte wrapper",
                body.len()
            ))
        })?;

    body.get(WRAPPER_PREFIX_LEN..end)
        .ok_or_else(|| LoadFailure::payload("response wrapper does not end on a character boundary"))
}

/// Decodes a wrapped response into rows of cell text.
pub fn parse_payload(body: &str) -> Result<Vec<Vec<String>>, LoadFailure> {
    let json = strip_wrapper(body)?;
    let response: QueryResponse = serde_json::from_str(json)
        .map_err(|error| LoadFailure::payload(format!("decode sheet JSON: {error}")))?;

    if response.status.as_deref() == Some("error") {
        let message = response
            .errors
            .iter()
            .flatten()
            .find_map(QueryError::message)
            .unwrap_or_else(|| "unknown error".to_owned());
        return Err(LoadFailure::payload(format!("sheet query failed: {message}")));
    }

    let table = response
        .table
        .ok_or_else(|| LoadFailure::payload("response has no table"))?;

    Ok(table
        .rows
        .into_iter()
        .map(|row| {
            row.c
                .unwrap_or_default()
                .into_iter()
                .map(|cell| cell.map(|cell| cell_text(cell.v)).unwrap_or_default())
                .collect()
        })
        .collect())
}

pub fn records_from_rows(rows: Vec<Vec<String>>) -> Vec<Record> {
    rows.into_iter()
        .enumerate()
        .map(|(index, cells)| Record::from_row(index, cells))
        .collect()
}

/// Text for one cell value. Null and nested values become empty; `0` and
/// `false` keep their text.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Number(number) => match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => number.to_string(),
        },
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: Option<String>,
    errors: Option<Vec<QueryError>>,
    table: Option<QueryTable>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    reason: Option<String>,
    message: Option<String>,
    detailed_message: Option<String>,
}

impl QueryError {
    fn message(&self) -> Option<String> {
        self.detailed_message
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.reason.clone())
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct QueryTable {
    #[serde(default)]
    rows: Vec<QueryRow>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    c: Option<Vec<Option<QueryCell>>>,
}

#[derive(Debug, Deserialize)]
struct QueryCell {
    #[serde(default)]
    v: Value,
}
