// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use spendlog::analytics::{self, FilterCriteria};
use spendlog::models::Expense;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn exp(id: i64, date: &str, cat: &str, amt: &str) -> Expense {
    Expense::new(id, d(date), cat, None, dec(amt))
}

fn scenario() -> Vec<Expense> {
    vec![
        exp(1, "2024-01-10", "Food", "10.00"),
        exp(2, "2024-01-20", "Food", "5.50"),
        exp(3, "2024-02-01", "Transport", "20.00"),
    ]
}

fn ids(v: &[Expense]) -> Vec<i64> {
    v.iter().map(|e| e.id).collect()
}

#[test]
fn total_of_empty_is_zero() {
    assert_eq!(analytics::total(&[]).unwrap(), Decimal::ZERO);
}

#[test]
fn total_is_exact_for_decimal_inputs() {
    let records: Vec<_> = (0..10)
        .map(|i| exp(i, "2024-01-01", "Misc", "0.10"))
        .collect();
    assert_eq!(analytics::total(&records).unwrap(), dec("1.00"));
}

#[test]
fn scenario_totals() {
    let records = scenario();
    assert_eq!(analytics::total(&records).unwrap(), dec("35.50"));

    let cats = analytics::category_totals(&records).unwrap();
    assert_eq!(cats.len(), 2);
    assert_eq!(cats["Food"], dec("15.50"));
    assert_eq!(cats["Transport"], dec("20.00"));

    let months = analytics::monthly_totals(&records).unwrap();
    let keys: Vec<_> = months.keys().cloned().collect();
    assert_eq!(keys, vec!["2024-01", "2024-02"]);
    assert_eq!(months["2024-01"], dec("15.50"));
    assert_eq!(months["2024-02"], dec("20.00"));
}

#[test]
fn category_totals_partition_the_total() {
    let mut records = scenario();
    records.push(exp(4, "2024-03-03", "Rent", "1200.01"));
    records.push(exp(5, "2024-03-04", "food", "0.99"));
    let sum: Decimal = analytics::category_totals(&records)
        .unwrap()
        .values()
        .copied()
        .sum();
    assert_eq!(sum, analytics::total(&records).unwrap());
}

#[test]
fn category_grouping_is_case_sensitive() {
    let records = vec![
        exp(1, "2024-01-01", "Food", "1"),
        exp(2, "2024-01-02", "food", "2"),
    ];
    let cats = analytics::category_totals(&records).unwrap();
    assert_eq!(cats.len(), 2);
    assert_eq!(cats["Food"], dec("1"));
    assert_eq!(cats["food"], dec("2"));
}

#[test]
fn sorted_by_total_is_descending() {
    let cats = analytics::category_totals(&scenario()).unwrap();
    let sorted = analytics::sorted_by_total(cats);
    assert_eq!(sorted[0], ("Transport".to_string(), dec("20.00")));
    assert_eq!(sorted[1], ("Food".to_string(), dec("15.50")));
}

#[test]
fn category_totals_reject_missing_category() {
    let mut bad = exp(9, "2024-01-01", "x", "1");
    bad.category = None;
    let err = analytics::category_totals(&[bad]).unwrap_err();
    assert!(err.is_invalid_record());
}

#[test]
fn empty_filter_is_identity() {
    let records = vec![
        exp(3, "2024-02-01", "Transport", "20.00"),
        exp(1, "2024-01-10", "Food", "10.00"),
        exp(2, "2024-01-20", "Food", "5.50"),
    ];
    let out = analytics::filter(&records, &FilterCriteria::default()).unwrap();
    assert_eq!(out, records);
}

#[test]
fn date_range_is_inclusive_on_both_ends() {
    let records = vec![
        exp(1, "2024-01-09", "A", "1"),
        exp(2, "2024-01-10", "A", "1"),
        exp(3, "2024-01-15", "A", "1"),
        exp(4, "2024-01-20", "A", "1"),
        exp(5, "2024-01-21", "A", "1"),
    ];
    let criteria = FilterCriteria::new().between(d("2024-01-10"), d("2024-01-20"));
    let out = analytics::filter(&records, &criteria).unwrap();
    assert_eq!(ids(&out), vec![2, 3, 4]);
}

#[test]
fn one_sided_date_bound_is_ignored() {
    // Only a start date: no date constraint is applied.
    let records = scenario();
    let criteria = FilterCriteria {
        start_date: Some(d("2024-02-01")),
        ..FilterCriteria::default()
    };
    assert_eq!(analytics::filter(&records, &criteria).unwrap().len(), 3);

    let criteria = FilterCriteria {
        end_date: Some(d("2024-01-01")),
        ..FilterCriteria::default()
    };
    assert_eq!(analytics::filter(&records, &criteria).unwrap().len(), 3);
}

#[test]
fn category_filter_ignores_case() {
    let out = analytics::filter(&scenario(), &FilterCriteria::new().category("food")).unwrap();
    assert_eq!(ids(&out), vec![1, 2]);
}

#[test]
fn blank_category_filter_is_no_filter() {
    let out = analytics::filter(&scenario(), &FilterCriteria::new().category("   ")).unwrap();
    assert_eq!(out.len(), 3);
}

#[test]
fn category_filter_on_missing_category_is_invalid_record() {
    let mut records = scenario();
    records[1].category = None;
    let err = analytics::filter(&records, &FilterCriteria::new().category("food")).unwrap_err();
    assert!(err.is_invalid_record());

    // Without a category filter the same records pass through.
    assert_eq!(
        analytics::filter(&records, &FilterCriteria::default())
            .unwrap()
            .len(),
        3
    );
}

#[test]
fn amount_bounds() {
    let records = scenario();
    let both = FilterCriteria::new()
        .min_amount(dec("5.50"))
        .max_amount(dec("10.00"));
    assert_eq!(ids(&analytics::filter(&records, &both).unwrap()), vec![1, 2]);

    let min_only = FilterCriteria::new().min_amount(dec("10.00"));
    assert_eq!(ids(&analytics::filter(&records, &min_only).unwrap()), vec![1, 3]);

    let max_only = FilterCriteria::new().max_amount(dec("10"));
    assert_eq!(ids(&analytics::filter(&records, &max_only).unwrap()), vec![1, 2]);
}

#[test]
fn combined_filters_preserve_order() {
    let records = vec![
        exp(5, "2024-01-25", "Food", "12"),
        exp(4, "2024-01-05", "FOOD", "30"),
        exp(3, "2024-01-15", "Food", "3"),
        exp(2, "2024-01-12", "Fuel", "40"),
    ];
    let criteria = FilterCriteria::new()
        .between(d("2024-01-01"), d("2024-01-31"))
        .category("food")
        .min_amount(dec("10"));
    assert_eq!(ids(&analytics::filter(&records, &criteria).unwrap()), vec![5, 4]);
}

#[test]
fn average_rounds_half_up() {
    let records = vec![
        exp(1, "2024-01-01", "A", "1"),
        exp(2, "2024-01-01", "A", "1"),
        exp(3, "2024-01-01", "A", "2"),
    ];
    assert_eq!(analytics::average(&records).unwrap(), Some(dec("1.33")));

    let halves = vec![exp(1, "2024-01-01", "A", "0.01"), exp(2, "2024-01-01", "A", "0.02")];
    assert_eq!(analytics::average(&halves).unwrap(), Some(dec("0.02")));
}

#[test]
fn average_of_empty_is_none() {
    assert_eq!(analytics::average(&[]).unwrap(), None);
}

#[test]
fn trend_with_only_prior_records() {
    let records = vec![
        exp(1, "2024-01-28", "A", "10"),
        exp(2, "2024-02-01", "A", "5"),
    ];
    let trend = analytics::trend_comparison(&records, d("2024-02-10"), 7).unwrap();
    assert_eq!(trend.recent_total, Decimal::ZERO);
    assert_eq!(trend.prior_total, dec("15"));
    assert_eq!(trend.delta, dec("-15"));
    assert_eq!(trend.percent_change, Some(dec("-100")));
}

#[test]
fn trend_without_prior_spend_omits_percent() {
    let records = vec![exp(1, "2024-02-09", "A", "10")];
    let trend = analytics::trend_comparison(&records, d("2024-02-10"), 7).unwrap();
    assert_eq!(trend.recent_total, dec("10"));
    assert_eq!(trend.prior_total, Decimal::ZERO);
    assert_eq!(trend.delta, dec("10"));
    assert_eq!(trend.percent_change, None);

    let empty = analytics::trend_comparison(&[], d("2024-02-10"), 7).unwrap();
    assert_eq!(empty.recent_total, Decimal::ZERO);
    assert_eq!(empty.percent_change, None);
}

#[test]
fn trend_boundary_day_counts_in_both_windows() {
    let records = vec![
        exp(1, "2024-02-03", "A", "4"),
        exp(2, "2024-02-10", "A", "2"),
        exp(3, "2024-01-27", "A", "4"),
        exp(4, "2024-01-26", "A", "100"),
    ];
    let trend = analytics::trend_comparison(&records, d("2024-02-10"), 7).unwrap();
    assert_eq!(trend.recent_total, dec("6"));
    assert_eq!(trend.prior_total, dec("8"));
    assert_eq!(trend.delta, dec("-2"));
    assert_eq!(trend.percent_change, Some(dec("-25")));
}

#[test]
fn trend_respects_window_size() {
    let records = vec![
        exp(1, "2024-03-01", "A", "10"),
        exp(2, "2024-02-20", "A", "20"),
    ];
    let trend = analytics::trend_comparison(&records, d("2024-03-01"), 14).unwrap();
    assert_eq!(trend.recent_total, dec("30"));
    assert_eq!(trend.prior_total, Decimal::ZERO);
}

#[test]
fn sums_past_the_decimal_range_are_overflow_errors() {
    let huge = vec![
        exp(1, "2024-02-09", "A", "50000000000000000000000000000"),
        exp(2, "2024-02-08", "A", "50000000000000000000000000000"),
    ];
    assert!(analytics::total(&huge).unwrap_err().is_overflow());
    assert!(analytics::average(&huge).unwrap_err().is_overflow());
    assert!(analytics::category_totals(&huge).unwrap_err().is_overflow());
    assert!(analytics::monthly_totals(&huge).unwrap_err().is_overflow());
    assert!(
        analytics::trend_comparison(&huge, d("2024-02-10"), 7)
            .unwrap_err()
            .is_overflow()
    );
}

#[test]
fn trend_percent_past_the_decimal_range_is_an_overflow_error() {
    let records = vec![
        exp(1, "2024-02-09", "A", "10000000000000000000000000"),
        exp(2, "2024-01-30", "A", "0.01"),
    ];
    let err = analytics::trend_comparison(&records, d("2024-02-10"), 7).unwrap_err();
    assert!(err.is_overflow());
}
