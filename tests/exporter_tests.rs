// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use spendlog::cli;
use spendlog::commands::exporter::{self, ExportFormat};
use spendlog::db::SqliteStore;
use spendlog::models::{Expense, NewExpense};
use spendlog::service::ExpenseService;
use std::str::FromStr;
use tempfile::tempdir;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn sample() -> Vec<Expense> {
    vec![
        Expense::new(1, d("2025-01-02"), "Groceries", Some("Weekly, big run".into()), dec("12.345")),
        Expense::new(2, d("2025-01-05"), "Transport", None, dec("2.5")),
    ]
}

#[test]
fn csv_has_header_and_full_precision() {
    let mut buf = Vec::new();
    exporter::write_csv(&mut buf, &sample()).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "ID,Date,Category,Description,Amount");
    assert_eq!(lines[1], "1,2025-01-02,Groceries,\"Weekly, big run\",12.345");
    assert_eq!(lines[2], "2,2025-01-05,Transport,,2.5");
    assert_eq!(lines.len(), 3);
}

#[test]
fn json_export_lists_every_column() {
    let mut buf = Vec::new();
    exporter::write_json(&mut buf, &sample()[1..]).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 2,
                "date": "2025-01-05",
                "category": "Transport",
                "description": null,
                "amount": "2.5"
            }
        ])
    );
}

#[test]
fn default_file_name_is_timestamped() {
    let now = d("2025-03-04").and_hms_opt(5, 6, 7).unwrap();
    assert_eq!(
        exporter::default_file_name(now, ExportFormat::Csv),
        "expenses_20250304_050607.csv"
    );
    assert_eq!(
        exporter::default_file_name(now, ExportFormat::Json),
        "expenses_20250304_050607.json"
    );
}

#[test]
fn export_to_path_creates_missing_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export").join("out.csv");
    exporter::export_to_path(&sample(), ExportFormat::Csv, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("ID,Date,Category,Description,Amount"));
}

#[test]
fn handle_exports_filtered_rows() {
    let svc = ExpenseService::new(SqliteStore::open_in_memory().unwrap());
    svc.add_expense(NewExpense::new(d("2025-01-02"), "Groceries", None, dec("12.34")))
        .unwrap();
    svc.add_expense(NewExpense::new(d("2025-01-03"), "Transport", None, dec("3")))
        .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("groceries.csv");
    let out_str = out_path.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "spendlog",
        "export",
        "--category",
        "groceries",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&svc, export_m, dir.path()).unwrap();
    } else {
        panic!("no export subcommand");
    }
    let text = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Groceries,,12.34"));
}

#[test]
fn handle_rejects_unknown_format() {
    let svc = ExpenseService::new(SqliteStore::open_in_memory().unwrap());
    svc.add_expense(NewExpense::new(d("2025-01-02"), "Groceries", None, dec("1")))
        .unwrap();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let matches =
        cli::build_cli().get_matches_from(["spendlog", "export", "--format", "xml", "--out", &out_str]);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&svc, export_m, dir.path()).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}
