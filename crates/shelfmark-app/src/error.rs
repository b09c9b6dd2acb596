// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Why the inventory sheet could not be turned into records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("cannot reach {url}: {reason}")]
    Network { url: String, reason: String },
    #[error("sheet request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed sheet payload: {0}")]
    Payload(String),
}

impl LoadFailure {
    pub fn payload(reason: impl Into<String>) -> Self {
        Self::Payload(reason.into())
    }
}

/// Label generation was requested with nothing selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no records selected for printing")]
pub struct EmptySelection;
