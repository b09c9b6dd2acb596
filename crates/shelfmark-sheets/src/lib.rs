// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod demo;
mod payload;

pub use demo::demo_records;
pub use payload::{
    WRAPPER_PREFIX_LEN, WRAPPER_SUFFIX_LEN, parse_payload, records_from_rows, strip_wrapper,
};

use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::Client as HttpClient;
use shelfmark_app::{LoadFailure, Record};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://docs.google.com";

/// A named sheet inside one spreadsheet document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSource {
    sheet_id: String,
    sheet_name: String,
    url: Url,
}

impl SheetSource {
    pub fn new(base_url: &str, sheet_id: &str, sheet_name: &str) -> Result<Self> {
        let sheet_id = sheet_id.trim();
        let sheet_name = sheet_name.trim();
        if sheet_id.is_empty() {
            bail!("source.sheet_id must not be empty");
        }
        if sheet_name.is_empty() {
            bail!("source.sheet_name must not be empty");
        }

        let mut url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid source.base_url {base_url:?}"))?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("source.base_url {base_url:?} cannot carry a path"))?
            .pop_if_empty()
            .extend(["spreadsheets", "d", sheet_id, "gviz", "tq"]);
        url.query_pairs_mut()
            .append_pair("tqx", "out:json")
            .append_pair("sheet", sheet_name);

        Ok(Self {
            sheet_id: sheet_id.to_owned(),
            sheet_name: sheet_name.to_owned(),
            url,
        })
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn query_url(&self) -> &Url {
        &self.url
    }
}

/// Blocking reader for the sheet query endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            bail!("source.timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { timeout, http })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches and parses the sheet in one call. Nothing is retried.
    pub fn load(&self, source: &SheetSource) -> Result<Vec<Record>, LoadFailure> {
        let body = self.fetch_body(source)?;
        let rows = parse_payload(&body)?;
        info!(
            sheet = source.sheet_name(),
            rows = rows.len(),
            "sheet rows parsed"
        );
        Ok(records_from_rows(rows))
    }

    pub fn fetch_body(&self, source: &SheetSource) -> Result<String, LoadFailure> {
        let url = source.query_url();
        debug!(%url, "fetching sheet");

        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|error| LoadFailure::Network {
                url: url.to_string(),
                reason: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|error| LoadFailure::Network {
            url: url.to_string(),
            reason: format!("read body: {error}"),
        })
    }
}
