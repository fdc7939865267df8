// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use spendlog::commands::{expenses, exporter, reports, settings, shell::Shell};
use spendlog::config::Config;
use spendlog::db::SqliteStore;
use spendlog::service::ExpenseService;
use spendlog::cli;

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    // RUST_LOG > --verbose > SPENDLOG_LOG
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&config.log_filter)
            .with_context(|| format!("Invalid log filter '{}'", config.log_filter))?
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    let mut config = Config::from_env()?;
    if let Some(db) = matches.get_one::<String>("db") {
        config.db_path = Some(PathBuf::from(db));
    }
    if let Some(dir) = matches.get_one::<String>("export-dir") {
        config.export_dir = PathBuf::from(dir);
    }
    init_logging(&config, matches.get_flag("verbose"))?;

    let db_path = config.db_path()?;
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Open DB at {}", db_path.display()))?;
    let service = ExpenseService::new(store);

    match matches.subcommand() {
        Some(("add", sub)) => expenses::add(&service, sub)?,
        Some(("list", sub)) => expenses::list(&service, sub)?,
        Some(("update", sub)) => expenses::update(&service, sub)?,
        Some(("rm", sub)) => expenses::remove(&service, sub)?,
        Some(("summary", sub)) => reports::handle(&service, sub, config.trend_window_days)?,
        Some(("export", sub)) => exporter::handle(&service, sub, &config.export_dir)?,
        Some(("settings", sub)) => settings::handle(&service, sub, &config)?,
        _ => {
            let stdin = io::stdin();
            Shell::new(&service, &config, stdin.lock(), io::stdout()).run()?;
        }
    }

    service.into_store().close()?;
    Ok(())
}
