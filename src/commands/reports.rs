// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use std::fmt::Write as _;

use crate::db::ExpenseStore;
use crate::service::{ExpenseService, Summary, summarize};
use crate::utils::{
    criteria_from_args, fmt_money, maybe_print_json, parse_date, pretty_table, round_half_up,
};

pub fn handle<S: ExpenseStore>(
    service: &ExpenseService<S>,
    sub: &clap::ArgMatches,
    default_window: u64,
) -> Result<()> {
    let window = sub.get_one::<u64>("window").copied().unwrap_or(default_window);
    let as_of = match sub.get_one::<String>("as-of") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let criteria = criteria_from_args(sub)?;
    let expenses = service.filter_expenses(&criteria)?;
    let Some(summary) = summarize(&expenses, as_of, window)? else {
        println!("No expenses found for reporting.");
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), &summary)? {
        print!("{}", render_summary(&summary, window, &service.currency_symbol()?));
    }
    Ok(())
}

pub fn render_summary(summary: &Summary, window: u64, symbol: &str) -> String {
    let mut out = String::new();

    let overview = vec![
        vec!["Expenses".to_string(), summary.count.to_string()],
        vec!["Total".to_string(), fmt_money(&summary.total, symbol)],
        vec!["Average".to_string(), fmt_money(&summary.average, symbol)],
    ];
    let _ = writeln!(out, "{}", pretty_table(&["Summary", ""], overview));

    let categories = summary
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_money(&c.total, symbol),
                format!("{:.1}%", round_half_up(c.percent, 1)),
            ]
        })
        .collect();
    let _ = writeln!(
        out,
        "{}",
        pretty_table(&["Category", "Amount", "Share"], categories)
    );

    let months = summary
        .months
        .iter()
        .map(|(m, amt)| vec![m.clone(), fmt_money(amt, symbol)])
        .collect();
    let _ = writeln!(out, "{}", pretty_table(&["Month", "Amount"], months));

    let trend = &summary.trend;
    let mut rows = vec![
        vec![
            format!("Last {} days", window),
            fmt_money(&trend.recent_total, symbol),
        ],
        vec![
            format!("Previous {} days", window),
            fmt_money(&trend.prior_total, symbol),
        ],
    ];
    if let Some(pct) = trend.percent_change {
        let direction = if trend.delta.is_sign_negative() { "down" } else { "up" };
        rows.push(vec![
            "Change".to_string(),
            format!(
                "{} {} ({}{:.1}%)",
                direction,
                fmt_money(&trend.delta.abs(), symbol),
                if pct.is_sign_negative() { "-" } else { "+" },
                round_half_up(pct.abs(), 1)
            ),
        ]);
    }
    let _ = writeln!(out, "{}", pretty_table(&["Trend", "Amount"], rows));
    out
}

/// Reference date used when none is given.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
