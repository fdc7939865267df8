// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

use crate::config::{ENV_DB, ENV_EXPORT_DIR, ENV_TREND_DAYS};

fn filter_args() -> Vec<Arg> {
    vec![
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("Start date (only applied together with --to)"),
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("End date (only applied together with --from)"),
        Arg::new("category")
            .long("category")
            .help("Category, case-insensitive"),
        Arg::new("min").long("min").help("Minimum amount"),
        Arg::new("max").long("max").help("Maximum amount"),
    ]
}

pub fn build_cli() -> Command {
    command!()
        .name("spendlog")
        .about("Record, filter, and summarize personal expenses")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env(ENV_DB)
                .value_name("PATH")
                .help("SQLite database file"),
        )
        .arg(
            Arg::new("export-dir")
                .long("export-dir")
                .global(true)
                .env(ENV_EXPORT_DIR)
                .value_name("DIR")
                .help("Directory for exported files"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("shell").about("Interactive menu (default)"))
        .subcommand(
            Command::new("add")
                .about("Add an expense")
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("list")
                .about("List expenses, optionally filtered")
                .args(filter_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Update an expense; omitted fields keep their value")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete an expense")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Totals, averages, breakdowns, and recent trend")
                .args(filter_args())
                .arg(
                    Arg::new("window")
                        .long("window")
                        .env(ENV_TREND_DAYS)
                        .value_parser(value_parser!(u64).range(1..))
                        .help("Trend window in days"),
                )
                .arg(
                    Arg::new("as-of")
                        .long("as-of")
                        .value_name("YYYY-MM-DD")
                        .help("Reference date for the trend (default: today)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export expenses to a file")
                .args(filter_args())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("FILE")
                        .help("Output path (default: timestamped file in the export dir)"),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("symbol").required(true)),
                ),
        )
}
