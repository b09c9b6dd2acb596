// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{HeaderToggle, Record, RecordId};

/// Flips one record. Returns the new state, or `None` for an unknown id.
pub fn toggle(records: &mut [Record], id: RecordId) -> Option<bool> {
    let record = records.get_mut(id.get())?;
    record.selected = !record.selected;
    Some(record.selected)
}

/// Clears every record in the full set, then marks `visible` when `on`.
///
/// Records outside the current view never keep a stale selection after a
/// bulk change.
pub fn bulk_select(records: &mut [Record], visible: &[RecordId], on: bool) {
    for record in records.iter_mut() {
        record.selected = false;
    }
    if !on {
        return;
    }
    for id in visible {
        if let Some(record) = records.get_mut(id.get()) {
            record.selected = true;
        }
    }
}

pub fn header_toggle(records: &[Record], visible: &[RecordId]) -> HeaderToggle {
    let mut selected = 0usize;
    for id in visible {
        if records.get(id.get()).is_some_and(|record| record.selected) {
            selected += 1;
        }
    }

    if !visible.is_empty() && selected == visible.len() {
        HeaderToggle::Checked
    } else if selected > 0 {
        HeaderToggle::Indeterminate
    } else {
        HeaderToggle::Unchecked
    }
}

pub fn selected_count(records: &[Record]) -> usize {
    records.iter().filter(|record| record.selected).count()
}

#[cfg(test)]
mod tests {
    use super::{bulk_select, header_toggle, selected_count, toggle};
    use crate::{HeaderToggle, Record, RecordId};

    fn records() -> Vec<Record> {
        ["A1", "B2", "A3", "C4"]
            .iter()
            .enumerate()
            .map(|(index, box_code)| Record::new(RecordId::new(index), *box_code, "S1"))
            .collect()
    }

    #[test]
    fn toggle_flips_exactly_one_record() {
        let mut rows = records();
        assert_eq!(toggle(&mut rows, RecordId::new(2)), Some(true));
        assert_eq!(selected_count(&rows), 1);
        assert!(rows[2].selected);

        assert_eq!(toggle(&mut rows, RecordId::new(2)), Some(false));
        assert_eq!(selected_count(&rows), 0);
    }

    #[test]
    fn toggle_unknown_id_changes_nothing() {
        let mut rows = records();
        assert_eq!(toggle(&mut rows, RecordId::new(99)), None);
        assert_eq!(selected_count(&rows), 0);
    }

    #[test]
    fn bulk_select_clears_records_outside_the_view() {
        let mut rows = records();
        rows[3].selected = true;

        bulk_select(&mut rows, &[RecordId::new(0), RecordId::new(2)], true);
        let selected = rows
            .iter()
            .filter(|record| record.selected)
            .map(|record| record.id.get())
            .collect::<Vec<_>>();
        assert_eq!(selected, vec![0, 2]);
    }

    #[test]
    fn bulk_deselect_clears_entire_full_set() {
        let mut rows = records();
        bulk_select(&mut rows, &[RecordId::new(0), RecordId::new(1)], true);
        rows[3].selected = true;

        bulk_select(&mut rows, &[RecordId::new(0)], false);
        assert_eq!(selected_count(&rows), 0);
    }

    #[test]
    fn header_toggle_reflects_visible_selection() {
        let mut rows = records();
        let visible = [RecordId::new(0), RecordId::new(1)];
        assert_eq!(header_toggle(&rows, &visible), HeaderToggle::Unchecked);

        rows[0].selected = true;
        assert_eq!(header_toggle(&rows, &visible), HeaderToggle::Indeterminate);

        rows[1].selected = true;
        assert_eq!(header_toggle(&rows, &visible), HeaderToggle::Checked);
    }

    #[test]
    fn header_toggle_ignores_hidden_selection_and_empty_view() {
        let mut rows = records();
        rows[3].selected = true;
        assert_eq!(
            header_toggle(&rows, &[RecordId::new(0)]),
            HeaderToggle::Unchecked
        );
        assert_eq!(header_toggle(&rows, &[]), HeaderToggle::Unchecked);
    }
}
