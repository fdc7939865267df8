// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Interactive numbered menu.
//!
//! Input is line-oriented. On optional prompts a blank line means "no filter"
//! or "keep the current value". End of input exits the menu cleanly.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use tracing::{error, info};

use crate::analytics::{self, FilterCriteria};
use crate::commands::exporter::{self, ExportFormat};
use crate::commands::reports::{self, render_summary};
use crate::commands::settings::render_settings;
use crate::config::Config;
use crate::db::ExpenseStore;
use crate::error::ExpenseError;
use crate::models::{Expense, NewExpense};
use crate::service::{ExpenseService, summarize};
use crate::utils::{expense_table, fmt_money, parse_date, parse_decimal, pretty_table};

#[derive(Debug, thiserror::Error)]
#[error("input closed")]
struct InputClosed;

const MENU: &str = "\
Main Menu:
1. Add New Expense
2. View All Expenses
3. Search/Filter Expenses
4. Update Expense
5. Delete Expense
6. View Summary Reports
7. Export to CSV
8. Settings
9. Help
0. Exit";

const HELP: &str = "\
Getting started:
  1  Add an expense (date, category, optional description, amount)
  2  View every expense with totals per category
  3  Search by date range, category, and amount bounds
  4  Update an expense; blank answers keep the current value
  5  Delete an expense after confirming with 'yes'

Reports and data:
  6  Totals, average, category and monthly breakdowns, recent trend
  7  Export all or filtered expenses to CSV in the export directory
  8  Show configuration and change the currency symbol

Notes:
  - Dates use YYYY-MM-DD. A date filter needs both start and end dates.
  - Category search ignores case; summaries group categories exactly as typed.
  - Configuration comes from SPENDLOG_* environment variables or a .env file.
  - Set SPENDLOG_LOG=debug (or pass --verbose) for diagnostic logs on stderr.";

pub struct Shell<'a, S: ExpenseStore, R: BufRead, W: Write> {
    service: &'a ExpenseService<S>,
    config: &'a Config,
    input: R,
    out: W,
    today: NaiveDate,
}

impl<'a, S: ExpenseStore, R: BufRead, W: Write> Shell<'a, S, R, W> {
    pub fn new(service: &'a ExpenseService<S>, config: &'a Config, input: R, out: W) -> Self {
        Self {
            service,
            config,
            input,
            out,
            today: reports::today(),
        }
    }

    /// Fixes the reference date used by the trend section of the summary.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self) -> Result<()> {
        info!("interactive shell started");
        writeln!(self.out, "Spendlog v{} - personal expense tracker", env!("CARGO_PKG_VERSION"))?;
        loop {
            writeln!(self.out, "\n{}", MENU)?;
            let Some(choice) = self.read_line("\nEnter your choice (0-9): ")? else {
                break;
            };
            let outcome = match choice.trim() {
                "1" => self.add_expense(),
                "2" => self.view_all(),
                "3" => self.search(),
                "4" => self.update_expense(),
                "5" => self.delete_expense(),
                "6" => self.summary(),
                "7" => self.export(),
                "8" => self.settings(),
                "9" => self.help(),
                "0" => {
                    writeln!(self.out, "Exiting application. Goodbye!")?;
                    info!("interactive shell stopped");
                    return Ok(());
                }
                _ => writeln!(self.out, "Invalid choice. Please try again.").map_err(Into::into),
            };
            if let Err(e) = outcome {
                if e.is::<InputClosed>() {
                    break;
                }
                error!("menu action failed: {:#}", e);
                writeln!(self.out, "Error: {:#}", e)?;
            }
            if self.read_line("\nPress Enter to continue...")?.is_none() {
                break;
            }
        }
        info!("interactive shell stopped at end of input");
        Ok(())
    }

    fn add_expense(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Add New Expense ---")?;
        let date = self.prompt_date("Enter date (YYYY-MM-DD): ")?;
        let category = self.prompt("Enter category: ")?;
        let description = self.prompt("Enter description (optional): ")?;
        let amount = self.prompt_positive_amount("Enter amount: ")?;

        let Some(date) = date.filter(|_| !category.trim().is_empty()) else {
            writeln!(self.out, "Invalid input. Expense not added.")?;
            return Ok(());
        };
        let description = Some(description).filter(|d| !d.trim().is_empty());
        match self
            .service
            .add_expense(NewExpense::new(date, category, description, amount))
        {
            Ok(saved) => writeln!(self.out, "Expense added successfully! (ID {})", saved.id)?,
            Err(e @ ExpenseError::Validation(_)) => writeln!(self.out, "Error: {}", e)?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn view_all(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- View All Expenses ---")?;
        let expenses = self.service.all_expenses()?;
        if expenses.is_empty() {
            writeln!(self.out, "No expenses found.")?;
            return Ok(());
        }
        self.display_expenses(&expenses)
    }

    fn search(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Search/Filter Expenses ---")?;
        let criteria = self.prompt_criteria()?;
        let expenses = self.service.filter_expenses(&criteria)?;
        if expenses.is_empty() {
            writeln!(self.out, "No expenses found matching your criteria.")?;
            return Ok(());
        }
        writeln!(self.out, "\n--- Filtered Expenses ---")?;
        self.display_expenses(&expenses)
    }

    fn update_expense(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Update Expense ---")?;
        let id = self.prompt_id("Enter ID of expense to update: ")?;
        let Some(current) = self.service.get_expense(id)? else {
            writeln!(self.out, "Expense with ID {} not found.", id)?;
            return Ok(());
        };
        writeln!(self.out, "Current expense: {}", current)?;

        let date = self
            .prompt_date(&format!(
                "Enter new date (YYYY-MM-DD, leave blank to keep current: {}): ",
                current.date
            ))?
            .unwrap_or(current.date);
        let category = self.prompt(&format!(
            "Enter new category (leave blank to keep current: {}): ",
            current.category.as_deref().unwrap_or("")
        ))?;
        let description = self.prompt(&format!(
            "Enter new description (leave blank to keep current: {}): ",
            current.description.as_deref().unwrap_or("")
        ))?;
        let amount = self
            .prompt_optional_amount(&format!(
                "Enter new amount (leave blank to keep current: {}): ",
                current.amount
            ))?
            .unwrap_or(current.amount);

        let updated = Expense {
            id,
            date,
            category: if category.trim().is_empty() {
                current.category.clone()
            } else {
                Some(category.trim().to_string())
            },
            description: if description.trim().is_empty() {
                current.description.clone()
            } else {
                Some(description.trim().to_string())
            },
            amount,
        };
        match self.service.update_expense(&updated) {
            Ok(true) => writeln!(self.out, "Expense updated successfully!")?,
            Ok(false) => writeln!(self.out, "Expense with ID {} not found.", id)?,
            Err(e @ ExpenseError::Validation(_)) => writeln!(self.out, "Error: {}", e)?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn delete_expense(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Delete Expense ---")?;
        let id = self.prompt_id("Enter ID of expense to delete: ")?;
        let Some(current) = self.service.get_expense(id)? else {
            writeln!(self.out, "Expense with ID {} not found.", id)?;
            return Ok(());
        };
        writeln!(self.out, "{}", current)?;
        let answer = self.prompt("Are you sure you want to delete this expense? (yes/no): ")?;
        if answer.trim().eq_ignore_ascii_case("yes") {
            self.service.delete_expense(id)?;
            writeln!(self.out, "Expense deleted successfully!")?;
        } else {
            writeln!(self.out, "Expense deletion cancelled.")?;
        }
        Ok(())
    }

    fn summary(&mut self) -> Result<()> {
        writeln!(self.out, "\n=== EXPENSE SUMMARY REPORTS ===")?;
        let expenses = self.service.all_expenses()?;
        let window = self.config.trend_window_days;
        let Some(summary) = summarize(&expenses, self.today, window)? else {
            writeln!(self.out, "No expenses found for reporting.")?;
            return Ok(());
        };
        let symbol = self.service.currency_symbol()?;
        write!(self.out, "{}", render_summary(&summary, window, &symbol))?;
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Export Expenses to CSV ---")?;
        let choice = self.prompt("Export all or filtered expenses? (all/filtered): ")?;
        let expenses = if choice.trim().eq_ignore_ascii_case("filtered") {
            let criteria = self.prompt_criteria()?;
            self.service.filter_expenses(&criteria)?
        } else {
            self.service.all_expenses()?
        };
        if expenses.is_empty() {
            writeln!(self.out, "No expenses to export.")?;
            return Ok(());
        }
        let name =
            exporter::default_file_name(chrono::Local::now().naive_local(), ExportFormat::Csv);
        let path = self.config.export_dir.join(name);
        let written = exporter::export_to_path(&expenses, ExportFormat::Csv, &path)?;
        writeln!(
            self.out,
            "Expenses exported successfully to: {}",
            written.display()
        )?;
        Ok(())
    }

    fn settings(&mut self) -> Result<()> {
        writeln!(self.out, "\n=== APPLICATION SETTINGS ===")?;
        let symbol = self.service.currency_symbol()?;
        write!(self.out, "{}", render_settings(self.config, &symbol))?;
        let new_symbol = self.prompt(&format!(
            "Enter new currency symbol (leave blank to keep current: {}): ",
            symbol
        ))?;
        if !new_symbol.trim().is_empty() {
            self.service.set_currency_symbol(&new_symbol)?;
            writeln!(self.out, "Currency symbol set to '{}'.", new_symbol.trim())?;
        }
        Ok(())
    }

    fn help(&mut self) -> Result<()> {
        writeln!(self.out, "\n=== HELP ===\n{}", HELP)?;
        Ok(())
    }

    fn display_expenses(&mut self, expenses: &[Expense]) -> Result<()> {
        let symbol = self.service.currency_symbol()?;
        writeln!(self.out, "{}", expense_table(expenses))?;
        writeln!(
            self.out,
            "Total expenses displayed: {}",
            fmt_money(&analytics::total(expenses)?, &symbol)
        )?;
        let totals = analytics::sorted_by_total(analytics::category_totals(expenses)?);
        if !totals.is_empty() {
            let rows = totals
                .iter()
                .map(|(cat, sum)| vec![cat.clone(), fmt_money(sum, &symbol)])
                .collect();
            writeln!(self.out, "{}", pretty_table(&["Category", "Total"], rows))?;
        }
        Ok(())
    }

    fn prompt_criteria(&mut self) -> Result<FilterCriteria> {
        let start_date = self.prompt_date(
            "Enter start date for filter (YYYY-MM-DD, leave blank for no filter): ",
        )?;
        let end_date =
            self.prompt_date("Enter end date for filter (YYYY-MM-DD, leave blank for no filter): ")?;
        let category = self.prompt("Enter category for filter (leave blank for no filter): ")?;
        let min_amount = self
            .prompt_optional_amount("Enter minimum amount for filter (leave blank for no filter): ")?;
        let max_amount = self
            .prompt_optional_amount("Enter maximum amount for filter (leave blank for no filter): ")?;
        Ok(FilterCriteria {
            start_date,
            end_date,
            category: Some(category).filter(|c| !c.trim().is_empty()),
            min_amount,
            max_amount,
        })
    }

    /// Reads one line without its terminator. `None` at end of input.
    fn read_line(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        self.read_line(message)?.ok_or_else(|| InputClosed.into())
    }

    /// Blank input yields `None`; malformed dates re-prompt.
    fn prompt_date(&mut self, message: &str) -> Result<Option<NaiveDate>> {
        loop {
            let line = self.prompt(message)?;
            if line.trim().is_empty() {
                return Ok(None);
            }
            match parse_date(&line) {
                Ok(d) => return Ok(Some(d)),
                Err(_) => writeln!(self.out, "Invalid date format. Please use YYYY-MM-DD.")?,
            }
        }
    }

    fn prompt_positive_amount(&mut self, message: &str) -> Result<Decimal> {
        loop {
            let line = self.prompt(message)?;
            match parse_decimal(&line) {
                Ok(a) if a > Decimal::ZERO => return Ok(a),
                Ok(_) => writeln!(self.out, "Amount must be a positive number.")?,
                Err(_) => writeln!(self.out, "Invalid amount. Please enter a numeric value.")?,
            }
        }
    }

    fn prompt_optional_amount(&mut self, message: &str) -> Result<Option<Decimal>> {
        loop {
            let line = self.prompt(message)?;
            if line.trim().is_empty() {
                return Ok(None);
            }
            match parse_decimal(&line) {
                Ok(a) if a.is_sign_negative() && !a.is_zero() => {
                    writeln!(self.out, "Amount cannot be negative.")?
                }
                Ok(a) => return Ok(Some(a)),
                Err(_) => writeln!(self.out, "Invalid amount. Please enter a numeric value.")?,
            }
        }
    }

    fn prompt_id(&mut self, message: &str) -> Result<i64> {
        loop {
            let line = self.prompt(message)?;
            match line.trim().parse::<i64>() {
                Ok(id) => return Ok(id),
                Err(_) => writeln!(self.out, "Invalid input. Please enter a whole number.")?,
            }
        }
    }
}
