// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::error::{ExpenseError, Result};

/// A stored expense. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    // NULL only for rows written outside this application
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
}

impl Expense {
    pub fn new(
        id: i64,
        date: NaiveDate,
        category: impl Into<String>,
        description: Option<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id,
            date,
            category: Some(category.into()),
            description,
            amount,
        }
    }

    /// Category label, or `InvalidRecord` when the record has none.
    pub fn category_label(&self) -> Result<&str> {
        self.category.as_deref().ok_or_else(|| {
            ExpenseError::InvalidRecord(format!("expense {} has no category", self.id))
        })
    }

    /// `YYYY-MM` bucket used for monthly grouping.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} [{}] {} {}",
            self.id,
            self.date,
            self.category.as_deref().unwrap_or("?"),
            self.description.as_deref().unwrap_or(""),
            self.amount
        )
    }
}

/// An expense that has not been handed to the store yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
}

impl NewExpense {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        description: Option<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            description,
            amount,
        }
    }

    pub fn with_id(self, id: i64) -> Expense {
        Expense {
            id,
            date: self.date,
            category: Some(self.category),
            description: self.description,
            amount: self.amount,
        }
    }
}
