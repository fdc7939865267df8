// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::db::ExpenseStore;
use crate::error::ExpenseError;
use crate::models::Expense;
use crate::service::ExpenseService;
use crate::utils::{EXPENSE_HEADERS, criteria_from_args};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => bail!("Unknown format: {} (use csv|json)", other),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// `expenses_YYYYMMDD_HHMMSS.<ext>`
pub fn default_file_name(now: NaiveDateTime, format: ExportFormat) -> String {
    format!(
        "expenses_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Writes the CSV header and one row per expense. Amounts keep full precision.
pub fn write_csv<W: Write>(writer: W, expenses: &[Expense]) -> Result<(), ExpenseError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPENSE_HEADERS)?;
    for e in expenses {
        wtr.write_record([
            e.id.to_string(),
            e.date.format("%Y-%m-%d").to_string(),
            e.category.clone().unwrap_or_default(),
            e.description.clone().unwrap_or_default(),
            e.amount.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, expenses: &[Expense]) -> Result<(), ExpenseError> {
    let items: Vec<_> = expenses
        .iter()
        .map(|e| {
            json!({
                "id": e.id,
                "date": e.date.format("%Y-%m-%d").to_string(),
                "category": e.category,
                "description": e.description,
                "amount": e.amount.to_string(),
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut writer, &items)?;
    writer.flush()?;
    Ok(())
}

/// Writes `expenses` to `path`, creating the parent directory when missing.
pub fn export_to_path(expenses: &[Expense], format: ExportFormat, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create export directory {}", parent.display()))?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    let out = std::io::BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(out, expenses)?,
        ExportFormat::Json => write_json(out, expenses)?,
    }
    info!(path = %path.display(), count = expenses.len(), "expenses exported");
    Ok(path.to_path_buf())
}

pub fn handle<S: ExpenseStore>(
    service: &ExpenseService<S>,
    sub: &clap::ArgMatches,
    export_dir: &Path,
) -> Result<()> {
    let format = ExportFormat::parse(
        sub.get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("csv"),
    )?;
    let criteria = criteria_from_args(sub)?;
    let expenses = service.filter_expenses(&criteria)?;
    if expenses.is_empty() {
        println!("No expenses to export.");
        return Ok(());
    }
    let path = match sub.get_one::<String>("out") {
        Some(out) => PathBuf::from(out),
        None => export_dir.join(default_file_name(
            chrono::Local::now().naive_local(),
            format,
        )),
    };
    let written = export_to_path(&expenses, format, &path)?;
    println!(
        "Exported {} expenses to {}",
        expenses.len(),
        written.display()
    );
    Ok(())
}
