// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtering and aggregation over an in-memory list of expenses.
//!
//! Everything here is pure: no I/O, no state between calls. Amounts are summed
//! with `rust_decimal` so totals stay exact.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

use crate::error::{ExpenseError, Result};
use crate::models::Expense;

pub const DEFAULT_TREND_WINDOW_DAYS: u64 = 7;

/// Filter criteria. Every field is optional; `None` leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Only honored together with `end_date`.
    pub start_date: Option<NaiveDate>,
    /// Only honored together with `start_date`.
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive exact match; blank means no filter.
    pub category: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn min_amount(mut self, min: Decimal) -> Self {
        self.min_amount = Some(min);
        self
    }

    pub fn max_amount(mut self, max: Decimal) -> Self {
        self.max_amount = Some(max);
        self
    }

    /// The date range, present only when both bounds are set.
    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Returns the records matching `criteria`, preserving input order.
///
/// Fails with `InvalidRecord` only when a category filter is active and a
/// record without a category is compared against it.
pub fn filter(records: &[Expense], criteria: &FilterCriteria) -> Result<Vec<Expense>> {
    let mut out: Vec<Expense> = records.to_vec();

    if let Some((start, end)) = criteria.date_range() {
        out.retain(|e| e.date >= start && e.date <= end);
        debug!(%start, %end, count = out.len(), "filtered by date range");
    }

    if let Some(category) = criteria.category_filter() {
        let wanted = category.to_lowercase();
        let mut kept = Vec::with_capacity(out.len());
        for e in out {
            if e.category_label()?.to_lowercase() == wanted {
                kept.push(e);
            }
        }
        out = kept;
        debug!(category, count = out.len(), "filtered by category");
    }

    match (criteria.min_amount, criteria.max_amount) {
        (Some(min), Some(max)) => {
            out.retain(|e| e.amount >= min && e.amount <= max);
            debug!(%min, %max, count = out.len(), "filtered by amount range");
        }
        (Some(min), None) => {
            out.retain(|e| e.amount >= min);
            debug!(%min, count = out.len(), "filtered by minimum amount");
        }
        (None, Some(max)) => {
            out.retain(|e| e.amount <= max);
            debug!(%max, count = out.len(), "filtered by maximum amount");
        }
        (None, None) => {}
    }

    Ok(out)
}

/// Exact sum of every amount. Fails with `Overflow` past `Decimal::MAX`.
pub fn total(records: &[Expense]) -> Result<Decimal> {
    checked_sum(records.iter().map(|e| e.amount))
}

/// Sum per category label. Keys are case-sensitive: "Food" and "food" are separate groups.
pub fn category_totals(records: &[Expense]) -> Result<HashMap<String, Decimal>> {
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for e in records {
        let sum = agg.entry(e.category_label()?.to_string()).or_insert(Decimal::ZERO);
        *sum = add(*sum, e.amount)?;
    }
    Ok(agg)
}

/// Largest total first; ties broken by name so output is stable.
pub fn sorted_by_total(totals: HashMap<String, Decimal>) -> Vec<(String, Decimal)> {
    let mut items: Vec<_> = totals.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

/// Sum per `YYYY-MM`, iterated in ascending month order.
pub fn monthly_totals(records: &[Expense]) -> Result<BTreeMap<String, Decimal>> {
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in records {
        let sum = map.entry(e.month_key()).or_insert(Decimal::ZERO);
        *sum = add(*sum, e.amount)?;
    }
    Ok(map)
}

/// Mean amount rounded half-up to 2 places. `None` for an empty slice.
pub fn average(records: &[Expense]) -> Result<Option<Decimal>> {
    if records.is_empty() {
        return Ok(None);
    }
    let mean = total(records)?
        .checked_div(Decimal::from(records.len()))
        .ok_or_else(|| overflow("average"))?;
    Ok(Some(mean.round_dp_with_strategy(
        2,
        RoundingStrategy::MidpointAwayFromZero,
    )))
}

/// Totals of two adjacent trailing windows ending at a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub recent_total: Decimal,
    pub prior_total: Decimal,
    pub delta: Decimal,
    /// Present only when `prior_total > 0`.
    pub percent_change: Option<Decimal>,
}

/// Compares `[ref - w, ref]` against `[ref - 2w, ref - w]`.
///
/// Both windows are inclusive, so a record dated exactly `ref - w` counts
/// toward both totals.
pub fn trend_comparison(
    records: &[Expense],
    reference_date: NaiveDate,
    window_days: u64,
) -> Result<Trend> {
    let window_start = days_before(reference_date, window_days);
    let prior_start = days_before(window_start, window_days);

    let in_window = |start: NaiveDate, end: NaiveDate| -> Result<Decimal> {
        checked_sum(
            records
                .iter()
                .filter(|e| e.date >= start && e.date <= end)
                .map(|e| e.amount),
        )
    };

    let recent_total = in_window(window_start, reference_date)?;
    let prior_total = in_window(prior_start, window_start)?;
    let delta = recent_total
        .checked_sub(prior_total)
        .ok_or_else(|| overflow("trend delta"))?;
    let percent_change = if prior_total > Decimal::ZERO {
        let pct = delta
            .checked_div(prior_total)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| overflow("trend percent change"))?;
        Some(pct)
    } else {
        None
    };

    debug!(%reference_date, window_days, %recent_total, %prior_total, "trend computed");
    Ok(Trend {
        recent_total,
        prior_total,
        delta,
        percent_change,
    })
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow("sum"))
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal> {
    amounts.try_fold(Decimal::ZERO, add)
}

fn overflow(what: &str) -> ExpenseError {
    ExpenseError::Overflow(format!("{} exceeds the representable amount range", what))
}
