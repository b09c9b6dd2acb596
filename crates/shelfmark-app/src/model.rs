// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::RecordId;

/// One box/shelf row from the inventory sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub box_code: String,
    pub shelf: String,
    pub selected: bool,
}

impl Record {
    pub fn new(id: RecordId, box_code: impl Into<String>, shelf: impl Into<String>) -> Self {
        Self {
            id,
            box_code: box_code.into(),
            shelf: shelf.into(),
            selected: false,
        }
    }

    /// Maps a sheet row positionally: column 0 is the box, column 1 the shelf.
    /// Absent cells become empty strings.
    pub fn from_row(index: usize, mut cells: Vec<String>) -> Self {
        cells.truncate(2);
        let mut cells = cells.into_iter();
        let box_code = cells.next().unwrap_or_default();
        let shelf = cells.next().unwrap_or_default();
        Self::new(RecordId::new(index), box_code, shelf)
    }

    pub fn column(&self, column: SortColumn) -> &str {
        match column {
            SortColumn::Box => &self.box_code,
            SortColumn::Shelf => &self.shelf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Box,
    Shelf,
}

impl SortColumn {
    pub const ALL: [Self; 2] = [Self::Box, Self::Shelf];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Shelf => "shelf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortCriteria {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub const fn by(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Same column flips direction; a different column starts ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.reversed();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Header marker for a column: unsorted, ascending or descending.
    pub fn indicator(&self, column: SortColumn) -> &'static str {
        match (self.column == Some(column), self.direction) {
            (false, _) => "⇅",
            (true, SortDirection::Asc) => "↑",
            (true, SortDirection::Desc) => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShelfFilter {
    #[default]
    All,
    Exact(String),
}

impl ShelfFilter {
    /// Empty input means every shelf.
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() {
            Self::All
        } else {
            Self::Exact(value.to_owned())
        }
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Exact(shelf) => Some(shelf),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub shelf: ShelfFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderToggle {
    #[default]
    Unchecked,
    Indeterminate,
    Checked,
}

impl HeaderToggle {
    pub const fn mark(self) -> &'static str {
        match self {
            Self::Unchecked => "[ ]",
            Self::Indeterminate => "[-]",
            Self::Checked => "[x]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub total: usize,
    pub selected: usize,
    pub visible: usize,
}

#[cfg(test)]
mod tests {
    use super::{Record, ShelfFilter, SortColumn, SortCriteria, SortDirection};
    use crate::RecordId;

    #[test]
    fn from_row_defaults_missing_cells_to_empty() {
        let record = Record::from_row(3, vec!["A1".to_owned()]);
        assert_eq!(record.id, RecordId::new(3));
        assert_eq!(record.box_code, "A1");
        assert_eq!(record.shelf, "");
        assert!(!record.selected);

        let empty = Record::from_row(0, Vec::new());
        assert_eq!(empty.box_code, "");
        assert_eq!(empty.shelf, "");
    }

    #[test]
    fn from_row_ignores_extra_columns() {
        let record = Record::from_row(
            0,
            vec!["B2".to_owned(), "S2".to_owned(), "note".to_owned()],
        );
        assert_eq!(record.box_code, "B2");
        assert_eq!(record.shelf, "S2");
    }

    #[test]
    fn toggle_same_column_reverses_and_new_column_resets() {
        let mut sort = SortCriteria::default();
        sort.toggle(SortColumn::Box);
        assert_eq!(sort, SortCriteria::by(SortColumn::Box, SortDirection::Asc));

        sort.toggle(SortColumn::Box);
        assert_eq!(sort, SortCriteria::by(SortColumn::Box, SortDirection::Desc));

        sort.toggle(SortColumn::Shelf);
        assert_eq!(sort, SortCriteria::by(SortColumn::Shelf, SortDirection::Asc));
    }

    #[test]
    fn indicator_marks_only_the_active_column() {
        let sort = SortCriteria::by(SortColumn::Shelf, SortDirection::Desc);
        assert_eq!(sort.indicator(SortColumn::Box), "⇅");
        assert_eq!(sort.indicator(SortColumn::Shelf), "↓");
    }

    #[test]
    fn shelf_filter_treats_empty_value_as_all() {
        assert_eq!(ShelfFilter::from_value(""), ShelfFilter::All);
        assert_eq!(
            ShelfFilter::from_value("S1").as_value(),
            Some("S1"),
        );
    }
}
