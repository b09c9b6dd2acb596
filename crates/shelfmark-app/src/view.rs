// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Counters, HeaderToggle, LoadState, Messages, RecordId, Session, SortColumn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: RecordId,
    pub box_code: String,
    pub shelf: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Loading,
    LoadFailed,
    NoResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBody {
    Rows(Vec<DisplayRow>),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub column: SortColumn,
    pub indicator: &'static str,
}

/// Everything a presentation layer needs to draw one frame of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayList {
    pub header: HeaderToggle,
    pub columns: Vec<ColumnHeader>,
    pub body: DisplayBody,
    pub counters: Counters,
}

impl DisplayList {
    pub fn rows(&self) -> &[DisplayRow] {
        match &self.body {
            DisplayBody::Rows(rows) => rows,
            DisplayBody::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match &self.body {
            DisplayBody::Rows(_) => None,
            DisplayBody::Placeholder(placeholder) => Some(placeholder),
        }
    }
}

pub fn render_view(session: &Session, messages: &Messages) -> DisplayList {
    let columns = SortColumn::ALL
        .iter()
        .map(|column| ColumnHeader {
            column: *column,
            indicator: session.sort().indicator(*column),
        })
        .collect();

    DisplayList {
        header: session.header_toggle(),
        columns,
        body: display_body(session, messages),
        counters: session.counters(),
    }
}

fn display_body(session: &Session, messages: &Messages) -> DisplayBody {
    if session.records().is_empty() {
        match session.load_state() {
            LoadState::Failed(_) => {
                return placeholder(PlaceholderKind::LoadFailed, &messages.load_failed);
            }
            LoadState::Pending { .. } => {
                return placeholder(PlaceholderKind::Loading, &messages.loading);
            }
            LoadState::Idle | LoadState::Ready => {}
        }
    }

    if session.view().is_empty() {
        return placeholder(PlaceholderKind::NoResults, &messages.no_results);
    }

    DisplayBody::Rows(
        session
            .view_records()
            .map(|record| DisplayRow {
                id: record.id,
                box_code: record.box_code.clone(),
                shelf: record.shelf.clone(),
                selected: record.selected,
            })
            .collect(),
    )
}

fn placeholder(kind: PlaceholderKind, message: &str) -> DisplayBody {
    DisplayBody::Placeholder(Placeholder {
        kind,
        message: message.to_owned(),
    })
}
