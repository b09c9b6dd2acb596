// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use shelfmark_app::{
    FilterCriteria, LoadFailure, Messages, PlaceholderKind, RecordId, Session, SessionCommand,
    ShelfFilter, SortColumn, SortCriteria, SortDirection, apply_filters, render_view,
};
use shelfmark_testkit::{records, sample_records};

const QUERIES: [&str; 8] = ["", "a", "A", "b2", "s1", "3", "zz", " S "];

fn inventory() -> Vec<shelfmark_app::Record> {
    records(&[
        ("A1", "S1"),
        ("b2", "S2"),
        ("A3", "S1"),
        ("Cable box", "s1"),
        ("", "S2"),
        ("a1", ""),
        ("Z9", "S10"),
    ])
}

fn shelf_filters() -> Vec<ShelfFilter> {
    vec![
        ShelfFilter::All,
        ShelfFilter::Exact("S1".to_owned()),
        ShelfFilter::Exact("S2".to_owned()),
        ShelfFilter::Exact("missing".to_owned()),
    ]
}

fn sorts() -> Vec<SortCriteria> {
    vec![
        SortCriteria::default(),
        SortCriteria::by(SortColumn::Box, SortDirection::Asc),
        SortCriteria::by(SortColumn::Box, SortDirection::Desc),
        SortCriteria::by(SortColumn::Shelf, SortDirection::Asc),
        SortCriteria::by(SortColumn::Shelf, SortDirection::Desc),
    ]
}

#[test]
fn view_is_a_subset_that_satisfies_the_predicate() {
    let rows = inventory();
    for query in QUERIES {
        for shelf in shelf_filters() {
            for sort in sorts() {
                let filter = FilterCriteria {
                    search_text: query.to_owned(),
                    shelf: shelf.clone(),
                };
                let view = apply_filters(&rows, &filter, &sort);

                let mut seen = view.iter().map(|id| id.get()).collect::<Vec<_>>();
                seen.sort_unstable();
                seen.dedup();
                assert_eq!(seen.len(), view.len(), "duplicate ids for {query:?}");

                for id in &view {
                    let record = &rows[id.get()];
                    assert!(filter.matches(record), "{record:?} leaked into {filter:?}");
                }
                let expected = rows.iter().filter(|record| filter.matches(record)).count();
                assert_eq!(view.len(), expected);
            }
        }
    }
}

#[test]
fn selected_count_is_invariant_under_filter_and_sort() {
    let mut session = Session::with_records(inventory());
    session.dispatch(SessionCommand::Toggle(RecordId::new(1)));
    session.dispatch(SessionCommand::Toggle(RecordId::new(4)));

    for query in QUERIES {
        session.dispatch(SessionCommand::SetSearch(query.to_owned()));
        for shelf in shelf_filters() {
            session.dispatch(SessionCommand::SetShelf(shelf));
            for column in SortColumn::ALL {
                session.dispatch(SessionCommand::SortBy(column));
                assert_eq!(session.counters().selected, 2);
            }
        }
    }
}

#[test]
fn bulk_select_then_deselect_clears_the_full_set() {
    let mut session = Session::with_records(inventory());
    session.dispatch(SessionCommand::Toggle(RecordId::new(6)));
    session.dispatch(SessionCommand::SetShelf(ShelfFilter::Exact("S1".to_owned())));

    session.dispatch(SessionCommand::SelectAllVisible);
    session.dispatch(SessionCommand::SetShelf(ShelfFilter::Exact("S2".to_owned())));
    session.dispatch(SessionCommand::DeselectAllVisible);
    assert_eq!(session.counters().selected, 0);
}

#[test]
fn reference_scenario_filter_sort_toggle() {
    let mut session = Session::with_records(sample_records());

    session.dispatch(SessionCommand::SetShelf(ShelfFilter::Exact("S1".to_owned())));
    assert_eq!(session.view(), &[RecordId::new(0), RecordId::new(2)]);

    session.dispatch(SessionCommand::SortBy(SortColumn::Box));
    let boxes = session
        .view_records()
        .map(|record| record.box_code.as_str())
        .collect::<Vec<_>>();
    assert_eq!(boxes, vec!["A1", "A3"]);

    session.dispatch(SessionCommand::Toggle(RecordId::new(2)));
    assert_eq!(session.counters().selected, 1);
    assert_eq!(session.view(), &[RecordId::new(0), RecordId::new(2)]);
}

#[test]
fn reference_scenario_case_insensitive_search() {
    let mut session = Session::with_records(sample_records());
    session.dispatch(SessionCommand::SetSearch("b2".to_owned()));
    assert_eq!(session.view(), &[RecordId::new(1)]);
}

#[test]
fn reference_scenario_unparsable_load() {
    let mut session = Session::new();
    let (request_id, _) = session.begin_load();
    session.finish_load(
        request_id,
        Err(LoadFailure::payload("decode sheet JSON: expected value")),
    );

    let list = render_view(&session, &Messages::default());
    assert!(session.records().is_empty());
    assert_eq!(
        list.placeholder().map(|placeholder| placeholder.kind),
        Some(PlaceholderKind::LoadFailed)
    );
    assert_eq!(list.counters.total, 0);
}

#[test]
fn reference_scenario_print_with_nothing_selected() {
    let session = Session::with_records(sample_records());
    let before = session.clone();
    assert!(session.labels().is_err());
    assert_eq!(session, before);
}
