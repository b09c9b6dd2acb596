// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{FilterCriteria, Record, RecordId, ShelfFilter, SortCriteria, SortDirection};

impl FilterCriteria {
    /// Search hits box or shelf case-insensitively; the shelf filter is exact.
    pub fn matches(&self, record: &Record) -> bool {
        let needle = self.search_text.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || record.box_code.to_lowercase().contains(&needle)
            || record.shelf.to_lowercase().contains(&needle);

        let matches_shelf = match &self.shelf {
            ShelfFilter::All => true,
            ShelfFilter::Exact(shelf) => record.shelf == *shelf,
        };

        matches_search && matches_shelf
    }
}

/// Derives the visible id sequence from the full record set.
///
/// Filtering keeps load order. When a sort column is set the result is
/// stable-sorted on the lowercased column text, so ties stay in load order in
/// both directions.
pub fn apply_filters(
    records: &[Record],
    filter: &FilterCriteria,
    sort: &SortCriteria,
) -> Vec<RecordId> {
    let matched = records
        .iter()
        .filter(|record| filter.matches(record))
        .collect::<Vec<_>>();

    if let Some(column) = sort.column {
        let mut keyed = matched
            .into_iter()
            .map(|record| (record.column(column).to_lowercase(), record))
            .collect::<Vec<_>>();
        keyed.sort_by(|(left, _), (right, _)| match sort.direction {
            SortDirection::Asc => left.cmp(right),
            SortDirection::Desc => right.cmp(left),
        });
        return keyed.into_iter().map(|(_, record)| record.id).collect();
    }

    matched.into_iter().map(|record| record.id).collect()
}

/// Distinct non-empty shelves in sorted order, for the shelf chooser.
pub fn shelf_options(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.shelf.as_str())
        .filter(|shelf| !shelf.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
