// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use shelfmark_app::{LabelDocument, LabelLayout, LoadFailure, Record, render_print_document};
use shelfmark_sheets::{Client, SheetSource, demo_records};
use shelfmark_tui::InternalEvent;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, info, warn};

/// Where reloads read rows from.
#[derive(Debug, Clone)]
pub enum RowSource {
    Sheet { client: Client, source: SheetSource },
    Demo { count: usize },
}

impl RowSource {
    pub fn load(&self) -> Result<Vec<Record>, LoadFailure> {
        match self {
            Self::Sheet { client, source } => client.load(source),
            Self::Demo { count } => Ok(demo_records(*count)),
        }
    }
}

/// Hands a finished document to the desktop so its print dialog can run.
pub trait DocumentLauncher {
    fn open(&mut self, path: &Path) -> Result<()>;
}

/// Opens documents with the platform's default application.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl DocumentLauncher for SystemLauncher {
    fn open(&mut self, path: &Path) -> Result<()> {
        open::that(path).with_context(|| format!("open {}", path.display()))
    }
}

pub struct SheetRuntime<L = SystemLauncher> {
    rows: RowSource,
    output_dir: PathBuf,
    layout: LabelLayout,
    launcher: L,
}

impl SheetRuntime {
    pub fn new(rows: RowSource, output_dir: PathBuf, layout: LabelLayout) -> Self {
        Self::with_launcher(rows, output_dir, layout, SystemLauncher)
    }
}

impl<L: DocumentLauncher> SheetRuntime<L> {
    pub fn with_launcher(
        rows: RowSource,
        output_dir: PathBuf,
        layout: LabelLayout,
        launcher: L,
    ) -> Self {
        Self {
            rows,
            output_dir,
            layout,
            launcher,
        }
    }
}

impl<L: DocumentLauncher> shelfmark_tui::AppRuntime for SheetRuntime<L> {
    fn load_records(&mut self) -> Result<Vec<Record>, LoadFailure> {
        self.rows.load()
    }

    fn spawn_load(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let rows = self.rows.clone();
        thread::Builder::new()
            .name(format!("sheet-load-{request_id}"))
            .spawn(move || {
                let result = rows.load();
                if tx
                    .send(InternalEvent::LoadFinished { request_id, result })
                    .is_err()
                {
                    debug!(request_id, "load finished after the UI closed");
                }
            })
            .context("spawn sheet load thread")?;
        Ok(())
    }

    /// A launch failure is logged only; the written path is still returned.
    fn write_labels(&mut self, labels: &[LabelDocument]) -> Result<PathBuf> {
        let path = write_label_file(
            &self.output_dir,
            labels,
            self.layout,
            OffsetDateTime::now_utc(),
        )?;
        info!(labels = labels.len(), path = %path.display(), "label document written");

        if let Err(error) = self.launcher.open(&path) {
            warn!(
                path = %path.display(),
                error = %format!("{error:#}"),
                "could not open label document"
            );
        }
        Ok(path)
    }
}

/// Writes the print document under `dir`, never replacing an earlier file.
pub fn write_label_file(
    dir: &Path,
    labels: &[LabelDocument],
    layout: LabelLayout,
    now: OffsetDateTime,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create label directory {}", dir.display()))?;

    let stem = label_file_stem(now)?;
    let mut path = dir.join(format!("{stem}.html"));
    let mut suffix = 1;
    while path.exists() {
        path = dir.join(format!("{stem}-{suffix}.html"));
        suffix += 1;
    }

    fs::write(&path, render_print_document(labels, layout))
        .with_context(|| format!("write label document {}", path.display()))?;
    Ok(path)
}

fn label_file_stem(now: OffsetDateTime) -> Result<String> {
    let stamp = now
        .format(format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .map_err(|error| anyhow!("format label timestamp: {error}"))?;
    Ok(format!("labels-{stamp}"))
}
