// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Expense service: validation in front of the store, aggregation behind it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::analytics::{self, FilterCriteria, Trend};
use crate::db::ExpenseStore;
use crate::error::{ExpenseError, Result};
use crate::models::{Expense, NewExpense};

pub const CURRENCY_SYMBOL_KEY: &str = "currency_symbol";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";
/// Largest amount a single expense may carry.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

pub struct ExpenseService<S: ExpenseStore> {
    store: S,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    /// Share of the overall total, in percent.
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total: Decimal,
    pub average: Decimal,
    /// Largest category first.
    pub categories: Vec<CategoryShare>,
    /// Oldest month first.
    pub months: Vec<(String, Decimal)>,
    pub trend: Trend,
}

impl<S: ExpenseStore> ExpenseService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn add_expense(&self, expense: NewExpense) -> Result<Expense> {
        let expense = normalize(expense);
        if let Err(e) = validate(&expense.category, expense.amount) {
            warn!(amount = %expense.amount, "rejected new expense: {}", e);
            return Err(e);
        }
        let id = self.store.insert(&expense)?;
        let saved = expense.with_id(id);
        info!(id, "expense added: {}", saved);
        Ok(saved)
    }

    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        self.store.get(id)
    }

    pub fn all_expenses(&self) -> Result<Vec<Expense>> {
        self.store.all()
    }

    /// Returns `Ok(false)` when no expense has `expense.id`.
    pub fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let expense = normalize_stored(expense);
        let category = expense.category.as_deref().unwrap_or_default();
        if let Err(e) = validate(category, expense.amount) {
            warn!(id = expense.id, amount = %expense.amount, "rejected update: {}", e);
            return Err(e);
        }
        let updated = self.store.update(&expense)?;
        if updated {
            info!(id = expense.id, "expense updated: {}", expense);
        }
        Ok(updated)
    }

    /// Returns `Ok(false)` when no expense has `id`.
    pub fn delete_expense(&self, id: i64) -> Result<bool> {
        let deleted = self.store.delete(id)?;
        if deleted {
            info!(id, "expense deleted");
        }
        Ok(deleted)
    }

    pub fn filter_expenses(&self, criteria: &FilterCriteria) -> Result<Vec<Expense>> {
        let all = self.store.all()?;
        analytics::filter(&all, criteria)
    }

    pub fn currency_symbol(&self) -> Result<String> {
        Ok(self
            .store
            .get_setting(CURRENCY_SYMBOL_KEY)?
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()))
    }

    pub fn set_currency_symbol(&self, symbol: &str) -> Result<()> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ExpenseError::Validation(
                "Currency symbol cannot be blank".into(),
            ));
        }
        self.store.set_setting(CURRENCY_SYMBOL_KEY, symbol)?;
        info!(symbol, "currency symbol changed");
        Ok(())
    }
}

/// Builds the summary report for `expenses`. `None` when there is nothing to summarize.
pub fn summarize(
    expenses: &[Expense],
    reference_date: NaiveDate,
    window_days: u64,
) -> Result<Option<Summary>> {
    let Some(average) = analytics::average(expenses)? else {
        return Ok(None);
    };
    let total = analytics::total(expenses)?;
    let categories = analytics::sorted_by_total(analytics::category_totals(expenses)?)
        .into_iter()
        .map(|(category, amount)| {
            Ok(CategoryShare {
                percent: percent_of(amount, total)?,
                category,
                total: amount,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let months = analytics::monthly_totals(expenses)?.into_iter().collect();
    let trend = analytics::trend_comparison(expenses, reference_date, window_days)?;
    Ok(Some(Summary {
        count: expenses.len(),
        total,
        average,
        categories,
        months,
        trend,
    }))
}

fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| ExpenseError::Overflow(format!("share of {} in {}", part, whole)))
}

fn normalize(mut expense: NewExpense) -> NewExpense {
    expense.category = expense.category.trim().to_string();
    expense.description = trimmed_description(expense.description);
    expense
}

fn normalize_stored(expense: &Expense) -> Expense {
    let mut expense = expense.clone();
    expense.category = expense.category.map(|c| c.trim().to_string());
    expense.description = trimmed_description(expense.description);
    expense
}

fn trimmed_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn validate(category: &str, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::Validation(format!(
            "Expense amount must be positive, got {}",
            amount
        )));
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(ExpenseError::Validation(format!(
            "Expense amount must not exceed {}, got {}",
            MAX_AMOUNT, amount
        )));
    }
    if category.trim().is_empty() {
        return Err(ExpenseError::Validation("Category cannot be blank".into()));
    }
    Ok(())
}
