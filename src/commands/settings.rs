// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::config::Config;
use crate::db::ExpenseStore;
use crate::service::ExpenseService;
use crate::utils::pretty_table;

pub fn handle<S: ExpenseStore>(
    service: &ExpenseService<S>,
    sub: &clap::ArgMatches,
    config: &Config,
) -> Result<()> {
    match sub.subcommand() {
        Some(("set-currency", m)) => {
            let symbol = m.get_one::<String>("symbol").unwrap();
            service.set_currency_symbol(symbol)?;
            println!("Currency symbol set to '{}'", symbol.trim());
        }
        _ => print!("{}", render_settings(config, &service.currency_symbol()?)),
    }
    Ok(())
}

pub fn render_settings(config: &Config, symbol: &str) -> String {
    let db = match config.db_location() {
        Ok(p) => p.display().to_string(),
        Err(e) => format!("unavailable ({})", e),
    };
    let rows = vec![
        vec!["Version".to_string(), env!("CARGO_PKG_VERSION").to_string()],
        vec!["Database".to_string(), db],
        vec![
            "Export directory".to_string(),
            config.export_dir.display().to_string(),
        ],
        vec!["Log filter".to_string(), config.log_filter.clone()],
        vec![
            "Trend window (days)".to_string(),
            config.trend_window_days.to_string(),
        ],
        vec!["Currency symbol".to_string(), symbol.to_string()],
    ];
    format!("{}\n", pretty_table(&["Setting", "Value"], rows))
}
