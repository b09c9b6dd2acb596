// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde_json::{Value, json};
use shelfmark_app::{Record, RecordId};
use std::path::PathBuf;

/// Framing the sheet endpoint wraps around its JSON body.
pub const GVIZ_PREFIX: &str = "/*O_o*/\ngoogle.visualization.Query.setResponse(";
pub const GVIZ_SUFFIX: &str = ");";

/// The three-row inventory most tests reason about.
pub fn sample_records() -> Vec<Record> {
    records(&[("A1", "S1"), ("B2", "S2"), ("A3", "S1")])
}

pub fn records(rows: &[(&str, &str)]) -> Vec<Record> {
    rows.iter()
        .enumerate()
        .map(|(index, (box_code, shelf))| Record::new(RecordId::new(index), *box_code, *shelf))
        .collect()
}

/// A JSON table body as the sheet endpoint serializes it.
pub fn gviz_table(rows: &[Vec<Value>]) -> Value {
    let rows = rows
        .iter()
        .map(|cells| {
            let cells = cells
                .iter()
                .map(|value| {
                    if value.is_null() {
                        Value::Null
                    } else {
                        json!({ "v": value })
                    }
                })
                .collect::<Vec<_>>();
            json!({ "c": cells })
        })
        .collect::<Vec<_>>();

    json!({
        "version": "0.6",
        "reqId": "0",
        "status": "ok",
        "sig": "1",
        "table": {
            "cols": [
                { "id": "A", "label": "Box", "type": "string" },
                { "id": "B", "label": "Shelf", "type": "string" },
            ],
            "rows": rows,
            "parsedNumHeaders": 1,
        },
    })
}

pub fn wrap_gviz(payload: &Value) -> String {
    format!("{GVIZ_PREFIX}{payload}{GVIZ_SUFFIX}")
}

/// Wrapped body for plain string box/shelf pairs.
pub fn gviz_body(rows: &[(&str, &str)]) -> String {
    let rows = rows
        .iter()
        .map(|(box_code, shelf)| vec![json!(box_code), json!(shelf)])
        .collect::<Vec<_>>();
    wrap_gviz(&gviz_table(&rows))
}

pub fn temp_output_dir() -> Result<(tempfile::TempDir, PathBuf)> {
    let temp = tempfile::tempdir().context("create temp dir")?;
    let path = temp.path().join("labels");
    Ok((temp, path))
}
