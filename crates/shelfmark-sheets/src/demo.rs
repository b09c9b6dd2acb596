// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use shelfmark_app::{Record, RecordId};

const SHELVES: [&str; 6] = ["A-01", "A-02", "B-01", "B-02", "C-01", "Cold"];
const BOX_PREFIXES: [&str; 5] = ["BX", "ARC", "TOOL", "SPARE", "KIT"];

/// Deterministic offline inventory for `--demo`.
pub fn demo_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|index| {
            let prefix = BOX_PREFIXES[index % BOX_PREFIXES.len()];
            let shelf = SHELVES[(index * 7 + 3) % SHELVES.len()];
            Record::new(
                RecordId::new(index),
                format!("{prefix}-{:04}", 100 + index * 13),
                shelf,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::demo_records;
    use std::collections::BTreeSet;

    #[test]
    fn demo_records_have_dense_ids_and_spread_over_shelves() {
        let records = demo_records(30);
        assert_eq!(records.len(), 30);
        for (index, record) in records.iter().enumerate() {
            assert_eq!(record.id.get(), index);
            assert!(!record.box_code.is_empty());
        }
        let shelves = records
            .iter()
            .map(|record| record.shelf.as_str())
            .collect::<BTreeSet<_>>();
        assert_eq!(shelves.len(), 6);
    }

    #[test]
    fn demo_box_codes_are_unique() {
        let records = demo_records(40);
        let codes = records
            .iter()
            .map(|record| record.box_code.as_str())
            .collect::<BTreeSet<_>>();
        assert_eq!(codes.len(), 40);
    }
}
