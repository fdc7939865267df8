// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use crate::analytics;
use crate::db::ExpenseStore;
use crate::models::NewExpense;
use crate::service::ExpenseService;
use crate::utils::{
    criteria_from_args, expense_table, fmt_money, maybe_print_json, parse_date, parse_decimal,
};

pub fn add<S: ExpenseStore>(service: &ExpenseService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").cloned();

    let saved = service.add_expense(NewExpense::new(date, category.as_str(), description, amount))?;
    println!(
        "Recorded #{} {} on {} [{}]",
        saved.id,
        saved.amount,
        saved.date,
        category.trim()
    );
    Ok(())
}

pub fn list<S: ExpenseStore>(service: &ExpenseService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let criteria = criteria_from_args(sub)?;
    let data = service.filter_expenses(&criteria)?;
    if maybe_print_json(sub.get_flag("json"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }
    let symbol = service.currency_symbol()?;
    println!("{}", expense_table(&data));
    println!("Total: {}", fmt_money(&analytics::total(&data)?, &symbol));
    Ok(())
}

pub fn update<S: ExpenseStore>(service: &ExpenseService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let Some(mut expense) = service.get_expense(id)? else {
        bail!("Expense with ID {} not found", id);
    };
    if let Some(d) = sub.get_one::<String>("date") {
        expense.date = parse_date(d)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        expense.category = Some(c.trim().to_string());
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        expense.amount = parse_decimal(a)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        expense.description = Some(d.trim().to_string()).filter(|d| !d.is_empty());
    }
    if !service.update_expense(&expense)? {
        bail!("Expense with ID {} not found", id);
    }
    println!("Updated {}", expense);
    Ok(())
}

pub fn remove<S: ExpenseStore>(service: &ExpenseService<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if !service.delete_expense(id)? {
        bail!("Expense with ID {} not found", id);
    }
    println!("Deleted expense #{}", id);
    Ok(())
}
