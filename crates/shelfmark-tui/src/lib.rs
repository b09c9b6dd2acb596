// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use shelfmark_app::{
    DisplayBody, DisplayList, HeaderToggle, LabelDocument, LoadFailure, Messages, PlaceholderKind,
    Record, Session, SessionCommand, SessionEvent, ShelfFilter, SortColumn, render_view,
};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

const HALF_PAGE_ROWS: isize = 10;
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Side effects the UI delegates: reading the sheet and writing label output.
pub trait AppRuntime {
    fn load_records(&mut self) -> Result<Vec<Record>, LoadFailure>;
    fn write_labels(&mut self, labels: &[LabelDocument]) -> Result<PathBuf>;
    fn spawn_load(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self.load_records();
        tx.send(InternalEvent::LoadFinished { request_id, result })
            .map_err(|_| anyhow::anyhow!("load event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    LoadFinished {
        request_id: u64,
        result: Result<Vec<Record>, LoadFailure>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Browse,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    mode: InputMode,
    cursor: usize,
    help_visible: bool,
    status_line: Option<String>,
    status_token: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiCommand {
    Quit,
    MoveRow(isize),
    JumpFirstRow,
    JumpLastRow,
    ToggleRow,
    StartSearch,
    CycleShelf(isize),
    Sort(SortColumn),
    ClearSort,
    SelectAllVisible,
    DeselectAll,
    ToggleHeader,
    PrintLabels,
    Reload,
    ToggleHelp,
}

pub fn run_app<R: AppRuntime>(
    session: &mut Session,
    runtime: &mut R,
    messages: &Messages,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if session.records().is_empty() {
        start_load(session, runtime, &mut view_data, &internal_tx);
    }

    let mut result = Ok(());
    loop {
        process_internal_events(session, &mut view_data, messages, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, session, &view_data, messages)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event
            && let Event::Key(key) = event::read().context("read event")?
            && handle_key_event(session, runtime, &mut view_data, messages, &internal_tx, key)
        {
            break;
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn start_load<R: AppRuntime>(
    session: &mut Session,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let (request_id, _) = session.begin_load();
    if let Err(error) = runtime.spawn_load(request_id, internal_tx.clone()) {
        warn!(request_id, error = %error, "could not start sheet load");
        emit_status(view_data, internal_tx, format!("reload failed: {error}"));
    }
}

fn process_internal_events(
    session: &mut Session,
    view_data: &mut ViewData,
    messages: &Messages,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::LoadFinished { request_id, result } => {
                let events = session.finish_load(request_id, result);
                clamp_cursor(session, view_data);
                for event in events {
                    match event {
                        SessionEvent::Loaded { total } => {
                            emit_status(view_data, tx, format!("loaded {total} rows"));
                        }
                        SessionEvent::LoadFailed(failure) => {
                            emit_status(
                                view_data,
                                tx,
                                format!("{} ({failure})", messages.load_failed),
                            );
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_TTL);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Returns true when the app should exit.
fn handle_key_event<R: AppRuntime>(
    session: &mut Session,
    runtime: &mut R,
    view_data: &mut ViewData,
    messages: &Messages,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.mode == InputMode::Search {
        handle_search_key(session, view_data, key);
        return false;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    let Some(command) = ui_command_for_key(key) else {
        return false;
    };
    apply_ui_command(session, runtime, view_data, messages, internal_tx, command)
}

fn handle_search_key(session: &mut Session, view_data: &mut ViewData, key: KeyEvent) {
    let mut text = session.filter().search_text.clone();
    match key.code {
        KeyCode::Enter => {
            view_data.mode = InputMode::Browse;
            return;
        }
        KeyCode::Esc => {
            view_data.mode = InputMode::Browse;
            text.clear();
        }
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            text.push(ch);
        }
        _ => return,
    }
    session.dispatch(SessionCommand::SetSearch(text));
    clamp_cursor(session, view_data);
}

fn ui_command_for_key(key: KeyEvent) -> Option<UiCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(UiCommand::Quit),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(UiCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(UiCommand::MoveRow(-1)),
        (KeyCode::Char('d'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UiCommand::MoveRow(HALF_PAGE_ROWS))
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UiCommand::MoveRow(-HALF_PAGE_ROWS))
        }
        (KeyCode::PageDown, _) => Some(UiCommand::MoveRow(HALF_PAGE_ROWS)),
        (KeyCode::PageUp, _) => Some(UiCommand::MoveRow(-HALF_PAGE_ROWS)),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(UiCommand::JumpFirstRow),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(UiCommand::JumpLastRow),
        (KeyCode::Char(' '), _) | (KeyCode::Enter, _) => Some(UiCommand::ToggleRow),
        (KeyCode::Char('/'), _) => Some(UiCommand::StartSearch),
        (KeyCode::Char('f'), _) => Some(UiCommand::CycleShelf(1)),
        (KeyCode::Char('F'), _) => Some(UiCommand::CycleShelf(-1)),
        (KeyCode::Char('1'), _) => Some(UiCommand::Sort(SortColumn::Box)),
        (KeyCode::Char('2'), _) => Some(UiCommand::Sort(SortColumn::Shelf)),
        (KeyCode::Char('0'), _) => Some(UiCommand::ClearSort),
        (KeyCode::Char('a'), _) => Some(UiCommand::SelectAllVisible),
        (KeyCode::Char('A'), _) => Some(UiCommand::DeselectAll),
        (KeyCode::Char('x'), _) => Some(UiCommand::ToggleHeader),
        (KeyCode::Char('p'), _) => Some(UiCommand::PrintLabels),
        (KeyCode::Char('r'), _) => Some(UiCommand::Reload),
        (KeyCode::Char('?'), _) => Some(UiCommand::ToggleHelp),
        _ => None,
    }
}

fn apply_ui_command<R: AppRuntime>(
    session: &mut Session,
    runtime: &mut R,
    view_data: &mut ViewData,
    messages: &Messages,
    internal_tx: &Sender<InternalEvent>,
    command: UiCommand,
) -> bool {
    match command {
        UiCommand::Quit => return true,
        UiCommand::MoveRow(delta) => move_cursor(session, view_data, delta),
        UiCommand::JumpFirstRow => view_data.cursor = 0,
        UiCommand::JumpLastRow => view_data.cursor = session.view().len().saturating_sub(1),
        UiCommand::ToggleRow => {
            if let Some(id) = session.view().get(view_data.cursor).copied() {
                session.dispatch(SessionCommand::Toggle(id));
            }
        }
        UiCommand::StartSearch => view_data.mode = InputMode::Search,
        UiCommand::CycleShelf(delta) => {
            session.dispatch(SessionCommand::CycleShelf(delta));
            let label = shelf_label(&session.filter().shelf, messages);
            emit_status(view_data, internal_tx, format!("shelf: {label}"));
        }
        UiCommand::Sort(column) => {
            session.dispatch(SessionCommand::SortBy(column));
            let sort = session.sort();
            emit_status(
                view_data,
                internal_tx,
                format!("sort {} {}", column.label(), sort.direction.as_str()),
            );
        }
        UiCommand::ClearSort => {
            session.dispatch(SessionCommand::ClearSort);
            emit_status(view_data, internal_tx, "sort cleared");
        }
        UiCommand::SelectAllVisible => {
            session.dispatch(SessionCommand::SelectAllVisible);
        }
        UiCommand::DeselectAll => {
            session.dispatch(SessionCommand::DeselectAllVisible);
        }
        UiCommand::ToggleHeader => {
            let on = session.header_toggle() != HeaderToggle::Checked;
            session.dispatch(SessionCommand::SetHeaderToggle(on));
        }
        UiCommand::PrintLabels => print_labels(session, runtime, view_data, messages, internal_tx),
        UiCommand::Reload => {
            start_load(session, runtime, view_data, internal_tx);
        }
        UiCommand::ToggleHelp => view_data.help_visible = !view_data.help_visible,
    }
    clamp_cursor(session, view_data);
    false
}

fn print_labels<R: AppRuntime>(
    session: &Session,
    runtime: &mut R,
    view_data: &mut ViewData,
    messages: &Messages,
    internal_tx: &Sender<InternalEvent>,
) {
    let labels = match session.labels() {
        Ok(labels) => labels,
        Err(_) => {
            emit_status(view_data, internal_tx, messages.empty_selection.clone());
            return;
        }
    };

    match runtime.write_labels(&labels) {
        Ok(path) => {
            info!(labels = labels.len(), path = %path.display(), "label sheet written");
            emit_status(
                view_data,
                internal_tx,
                format!("{} labels -> {}", labels.len(), path.display()),
            );
        }
        Err(error) => {
            warn!(error = %error, "label sheet not written");
            emit_status(view_data, internal_tx, format!("print failed: {error:#}"));
        }
    }
}

fn move_cursor(session: &Session, view_data: &mut ViewData, delta: isize) {
    let len = session.view().len();
    if len == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = (view_data.cursor as isize + delta).clamp(0, len as isize - 1);
    view_data.cursor = next as usize;
}

fn clamp_cursor(session: &Session, view_data: &mut ViewData) {
    view_data.cursor = view_data
        .cursor
        .min(session.view().len().saturating_sub(1));
}

fn shelf_label<'a>(shelf: &'a ShelfFilter, messages: &'a Messages) -> &'a str {
    shelf.as_value().unwrap_or(&messages.all_shelves)
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    session: &Session,
    view_data: &ViewData,
    messages: &Messages,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let list = render_view(session, messages);

    let summary = Paragraph::new(summary_text(session, view_data, &list, messages))
        .block(Block::default().title("shelfmark").borders(Borders::ALL));
    frame.render_widget(summary, layout[0]);

    render_table(frame, layout[1], &list, view_data);

    let status = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    list: &DisplayList,
    view_data: &ViewData,
) {
    let header_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        header_labels(list)
            .into_iter()
            .map(|label| Cell::from(label).style(header_style)),
    );
    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ];

    let rows = match &list.body {
        DisplayBody::Rows(rows) => rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut style = Style::default();
                if row.selected {
                    style = style.fg(Color::Green);
                }
                if index == view_data.cursor {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                Row::new(vec![
                    Cell::from(checkbox(row.selected)),
                    Cell::from(row.box_code.clone()),
                    Cell::from(row.shelf.clone()),
                ])
                .style(style)
            })
            .collect::<Vec<_>>(),
        DisplayBody::Placeholder(placeholder) => {
            let (text, color) = match placeholder.kind {
                PlaceholderKind::LoadFailed => (format!("⚠️ {}", placeholder.message), Color::Red),
                PlaceholderKind::NoResults | PlaceholderKind::Loading => {
                    (placeholder.message.clone(), Color::DarkGray)
                }
            };
            vec![
                Row::new(vec![Cell::from(""), Cell::from(text), Cell::from("")])
                    .style(Style::default().fg(color)),
            ]
        }
    };

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("boxes").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn header_labels(list: &DisplayList) -> Vec<String> {
    let mut labels = vec![list.header.mark().to_owned()];
    labels.extend(
        list.columns
            .iter()
            .map(|column| format!("{} {}", column.column.label(), column.indicator)),
    );
    labels
}

fn checkbox(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

fn summary_text(
    session: &Session,
    view_data: &ViewData,
    list: &DisplayList,
    messages: &Messages,
) -> String {
    let search = &session.filter().search_text;
    let search = if view_data.mode == InputMode::Search {
        format!("/{search}_")
    } else if search.is_empty() {
        "-".to_owned()
    } else {
        format!("/{search}")
    };
    format!(
        "total {} | selected {} | shown {} | search {} | shelf {}",
        list.counters.total,
        list.counters.selected,
        list.counters.visible,
        search,
        shelf_label(&session.filter().shelf, messages),
    )
}

fn status_text(view_data: &ViewData) -> String {
    let mode = match view_data.mode {
        InputMode::Browse => "NAV",
        InputMode::Search => "SEARCH",
    };
    let hints = match view_data.mode {
        InputMode::Browse => {
            "j/k g/G | space toggle | / search | f/F shelf | 1/2/0 sort | a/A/x select | p print | r reload | ? help | q quit"
        }
        InputMode::Search => "type to filter | enter keep | esc clear",
    };
    match &view_data.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "move: j/k up/down | ctrl+d/u pgup/pgdn half page | g/G first/last\n\
select: space/enter toggle row | a select all shown | A clear all | x header toggle\n\
filter: / search box and shelf | f/F next/prev shelf\n\
sort: 1 box | 2 shelf | again to reverse | 0 clear\n\
output: p write label sheet for the selection\n\
global: r reload sheet | ? help | q or ctrl+q quit\n\
search: type to filter | backspace | enter keep | esc clear"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
