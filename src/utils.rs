// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::analytics::FilterCriteria;
use crate::models::Expense;

pub const EXPENSE_HEADERS: [&str; 5] = ["ID", "Date", "Category", "Description", "Amount"];
const DESCRIPTION_WIDTH: usize = 28;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Rounds half away from zero, the way amounts and percentages are displayed.
pub fn round_half_up(d: Decimal, dp: u32) -> Decimal {
    d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    format!("{}{:.2}", symbol, round_half_up(*d, 2))
}

/// Cuts `text` to `max` chars, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Display row: 2-decimal amount, shortened description.
pub fn expense_row(e: &Expense) -> Vec<String> {
    vec![
        e.id.to_string(),
        e.date.format("%Y-%m-%d").to_string(),
        e.category.clone().unwrap_or_default(),
        truncate(e.description.as_deref().unwrap_or(""), DESCRIPTION_WIDTH),
        format!("{:.2}", round_half_up(e.amount, 2)),
    ]
}

pub fn expense_table(expenses: &[Expense]) -> Table {
    pretty_table(&EXPENSE_HEADERS, expenses.iter().map(expense_row).collect())
}

fn opt_arg<'a>(sub: &'a clap::ArgMatches, name: &str) -> Option<&'a String> {
    sub.try_get_one::<String>(name).ok().flatten()
}

/// Builds filter criteria from the optional `--from/--to/--category/--min/--max` flags.
pub fn criteria_from_args(sub: &clap::ArgMatches) -> Result<FilterCriteria> {
    Ok(FilterCriteria {
        start_date: opt_arg(sub, "from").map(|s| parse_date(s)).transpose()?,
        end_date: opt_arg(sub, "to").map(|s| parse_date(s)).transpose()?,
        category: opt_arg(sub, "category").cloned(),
        min_amount: opt_arg(sub, "min").map(|s| parse_decimal(s)).transpose()?,
        max_amount: opt_arg(sub, "max").map(|s| parse_decimal(s)).transpose()?,
    })
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}
