// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, info, warn};

use crate::{
    Counters, EmptySelection, FilterCriteria, HeaderToggle, LabelDocument, LoadFailure, Record,
    RecordId, ShelfFilter, SortColumn, SortCriteria, apply_filters, bulk_select, generate_labels,
    header_toggle, selected_count, shelf_options, toggle,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Pending {
        request_id: u64,
    },
    Ready,
    Failed(LoadFailure),
}

/// Everything one inventory session owns: the full record set, the active
/// criteria and the derived view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    records: Vec<Record>,
    filter: FilterCriteria,
    sort: SortCriteria,
    view: Vec<RecordId>,
    load: LoadState,
    last_request_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetSearch(String),
    SetShelf(ShelfFilter),
    CycleShelf(isize),
    SortBy(SortColumn),
    ClearSort,
    Toggle(RecordId),
    SelectAllVisible,
    DeselectAllVisible,
    SetHeaderToggle(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ViewChanged { visible: usize },
    SortChanged(SortCriteria),
    ShelfChanged(ShelfFilter),
    SelectionChanged { selected: usize },
    LoadStarted { request_id: u64 },
    Loaded { total: usize },
    LoadFailed(LoadFailure),
    StaleLoadIgnored { request_id: u64 },
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ready session around already-loaded records.
    pub fn with_records(records: Vec<Record>) -> Self {
        let mut session = Self::default();
        session.replace_records(records);
        session.load = LoadState::Ready;
        session
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn view(&self) -> &[RecordId] {
        &self.view
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.get())
    }

    pub fn view_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.view.iter().filter_map(|id| self.record(*id))
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn sort(&self) -> SortCriteria {
        self.sort
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Pending { .. })
    }

    pub fn counters(&self) -> Counters {
        Counters {
            total: self.records.len(),
            selected: selected_count(&self.records),
            visible: self.view.len(),
        }
    }

    pub fn header_toggle(&self) -> HeaderToggle {
        header_toggle(&self.records, &self.view)
    }

    pub fn shelf_options(&self) -> Vec<String> {
        shelf_options(&self.records)
    }

    pub fn labels(&self) -> Result<Vec<LabelDocument>, EmptySelection> {
        generate_labels(&self.records)
    }

    /// Marks a load as in flight and returns its request id. A newer request
    /// supersedes any pending one; its result will be ignored.
    pub fn begin_load(&mut self) -> (u64, Vec<SessionEvent>) {
        self.last_request_id = self.last_request_id.saturating_add(1);
        let request_id = self.last_request_id;
        self.load = LoadState::Pending { request_id };
        debug!(request_id, "sheet load started");
        (request_id, vec![SessionEvent::LoadStarted { request_id }])
    }

    /// Applies a finished load. Failures leave the current full set intact.
    pub fn finish_load(
        &mut self,
        request_id: u64,
        result: Result<Vec<Record>, LoadFailure>,
    ) -> Vec<SessionEvent> {
        if self.load != (LoadState::Pending { request_id }) {
            debug!(request_id, "ignoring superseded sheet load");
            return vec![SessionEvent::StaleLoadIgnored { request_id }];
        }

        match result {
            Ok(records) => {
                self.replace_records(records);
                self.load = LoadState::Ready;
                info!(
                    request_id,
                    total = self.records.len(),
                    "sheet load finished"
                );
                vec![
                    SessionEvent::Loaded {
                        total: self.records.len(),
                    },
                    SessionEvent::ViewChanged {
                        visible: self.view.len(),
                    },
                ]
            }
            Err(failure) => {
                warn!(request_id, error = %failure, "sheet load failed");
                self.load = LoadState::Failed(failure.clone());
                vec![SessionEvent::LoadFailed(failure)]
            }
        }
    }

    pub fn dispatch(&mut self, command: SessionCommand) -> Vec<SessionEvent> {
        match command {
            SessionCommand::SetSearch(text) => {
                self.filter.search_text = text;
                self.refresh_view()
            }
            SessionCommand::SetShelf(shelf) => self.set_shelf(shelf),
            SessionCommand::CycleShelf(delta) => {
                let next = self.cycled_shelf(delta);
                self.set_shelf(next)
            }
            SessionCommand::SortBy(column) => {
                self.sort.toggle(column);
                let mut events = vec![SessionEvent::SortChanged(self.sort)];
                events.extend(self.refresh_view());
                events
            }
            SessionCommand::ClearSort => {
                self.sort.clear();
                let mut events = vec![SessionEvent::SortChanged(self.sort)];
                events.extend(self.refresh_view());
                events
            }
            SessionCommand::Toggle(id) => match toggle(&mut self.records, id) {
                Some(_) => vec![self.selection_event()],
                None => Vec::new(),
            },
            SessionCommand::SelectAllVisible | SessionCommand::SetHeaderToggle(true) => {
                bulk_select(&mut self.records, &self.view, true);
                debug!(visible = self.view.len(), "selected all visible records");
                vec![self.selection_event()]
            }
            SessionCommand::DeselectAllVisible | SessionCommand::SetHeaderToggle(false) => {
                bulk_select(&mut self.records, &self.view, false);
                debug!("cleared selection");
                vec![self.selection_event()]
            }
        }
    }

    fn set_shelf(&mut self, shelf: ShelfFilter) -> Vec<SessionEvent> {
        let shelf = match shelf {
            ShelfFilter::Exact(value) => ShelfFilter::from_value(&value),
            ShelfFilter::All => ShelfFilter::All,
        };
        self.filter.shelf = shelf.clone();
        let mut events = vec![SessionEvent::ShelfChanged(shelf)];
        events.extend(self.refresh_view());
        events
    }

    /// Steps through `All` followed by each known shelf, wrapping around.
    fn cycled_shelf(&self, delta: isize) -> ShelfFilter {
        let options = self.shelf_options();
        let current = match &self.filter.shelf {
            ShelfFilter::All => 0,
            ShelfFilter::Exact(shelf) => options
                .iter()
                .position(|option| option == shelf)
                .map_or(0, |index| index + 1),
        };
        let len = options.len() as isize + 1;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        match next {
            0 => ShelfFilter::All,
            index => ShelfFilter::Exact(options[index - 1].clone()),
        }
    }

    fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Record {
                id: RecordId::new(index),
                ..record
            })
            .collect();

        if let ShelfFilter::Exact(shelf) = &self.filter.shelf
            && !self.records.iter().any(|record| record.shelf == *shelf)
        {
            self.filter.shelf = ShelfFilter::All;
        }
        self.view = apply_filters(&self.records, &self.filter, &self.sort);
    }

    fn refresh_view(&mut self) -> Vec<SessionEvent> {
        self.view = apply_filters(&self.records, &self.filter, &self.sort);
        vec![SessionEvent::ViewChanged {
            visible: self.view.len(),
        }]
    }

    fn selection_event(&self) -> SessionEvent {
        SessionEvent::SelectionChanged {
            selected: selected_count(&self.records),
        }
    }
}
