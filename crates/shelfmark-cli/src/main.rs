// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use logging::LogTarget;
use runtime::{RowSource, SheetRuntime};
use shelfmark_app::Session;
use shelfmark_sheets::{Client, demo_records};
use std::env;
use std::path::PathBuf;
use tracing::{error, info};

const DEMO_ROWS: usize = 40;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `shelfmark --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let rows = if options.demo {
        RowSource::Demo { count: DEMO_ROWS }
    } else {
        RowSource::Sheet {
            client: Client::new(config.timeout()?).with_context(|| {
                format!(
                    "invalid [source] config in {}; fix the timeout value",
                    options.config_path.display()
                )
            })?,
            source: config.sheet_source().with_context(|| {
                format!(
                    "invalid [source] config in {}; fix base_url/sheet_id/sheet_name values",
                    options.config_path.display()
                )
            })?,
        }
    };

    if options.check_only {
        logging::init_logging(config.log_level(), LogTarget::Stderr)?;
        return check_source(&rows);
    }

    let log_path = config::data_dir()?.join("shelfmark.log");
    logging::init_logging(config.log_level(), LogTarget::File(log_path))?;

    let mut session = if options.demo {
        Session::with_records(demo_records(DEMO_ROWS))
    } else {
        Session::new()
    };
    let mut runtime = SheetRuntime::new(rows, config.output_dir()?, config.label_layout());
    info!(demo = options.demo, "starting terminal UI");
    shelfmark_tui::run_app(&mut session, &mut runtime, &config.messages())
}

/// One load against the configured source, reported on stderr.
fn check_source(rows: &RowSource) -> Result<()> {
    if let RowSource::Sheet { client, source } = rows {
        info!(
            url = %source.query_url(),
            sheet_id = source.sheet_id(),
            sheet = source.sheet_name(),
            timeout = ?client.timeout(),
            "checking sheet source"
        );
    }
    match rows.load() {
        Ok(records) => {
            info!(rows = records.len(), "sheet source is readable");
            Ok(())
        }
        Err(failure) => {
            error!(error = %failure, "sheet source check failed");
            Err(failure).context("check sheet source")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("shelfmark: box and shelf label printing");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with built-in sample rows (no network)");
    println!("  --check                  Validate config and load the sheet once");
    println!("  --help                   Show this help");
}
