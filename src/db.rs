// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ExpenseError, Result};
use crate::models::{Expense, NewExpense};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendlog", "spendlog"));

const SELECT_COLUMNS: &str = "SELECT id, date, category, description, amount FROM expenses";

/// Default database location in the platform data dir.
pub fn default_db_path() -> Result<PathBuf> {
    let path = default_db_location()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    Ok(path)
}

/// Where [`default_db_path`] points, without touching the filesystem.
pub fn default_db_location() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        ExpenseError::Config("Could not determine platform-specific data dir".into())
    })?;
    Ok(proj.data_dir().join("spendlog.sqlite"))
}

/// Persistence for expense records.
pub trait ExpenseStore {
    /// Persists a new record and returns the id assigned to it.
    fn insert(&self, expense: &NewExpense) -> Result<i64>;
    fn get(&self, id: i64) -> Result<Option<Expense>>;
    /// All records, newest first.
    fn all(&self) -> Result<Vec<Expense>>;
    /// Returns `false` when no record has `expense.id`.
    fn update(&self, expense: &Expense) -> Result<bool>;
    /// Returns `false` when no record has `id`.
    fn delete(&self, id: i64) -> Result<bool>;
    fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>>;
    fn by_category(&self, category: &str) -> Result<Vec<Expense>>;
    /// Inclusive on both ends, largest amount first.
    fn by_amount_range(&self, min: Decimal, max: Decimal) -> Result<Vec<Expense>>;

    fn get_setting(&self, key: &str) -> Result<Option<String>>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed store. Owns its connection; call [`SqliteStore::close`] to release it.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened expense database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        init_schema(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| ExpenseError::Storage(e))?;
        info!("closed expense database");
        Ok(())
    }

    fn query_expenses(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut data = Vec::new();
        while let Some(r) = rows.next()? {
            data.push(expense_from_row(r)?);
        }
        Ok(data)
    }
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        category TEXT,
        description TEXT,
        amount TEXT NOT NULL, -- exact decimal string
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
    CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category);
    "#,
    )?;
    Ok(())
}

fn expense_from_row(r: &Row<'_>) -> Result<Expense> {
    let id: i64 = r.get(0)?;
    let date_s: String = r.get(1)?;
    let category: Option<String> = r.get(2)?;
    let description: Option<String> = r.get(3)?;
    let amount_s: String = r.get(4)?;
    let date = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d").map_err(|_| {
        ExpenseError::Parse(format!("Invalid date '{}' for expense {}", date_s, id))
    })?;
    let amount = amount_s.parse::<Decimal>().map_err(|_| {
        ExpenseError::Parse(format!("Invalid amount '{}' for expense {}", amount_s, id))
    })?;
    Ok(Expense {
        id,
        date,
        category,
        description,
        amount,
    })
}

impl ExpenseStore for SqliteStore {
    fn insert(&self, expense: &NewExpense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses(date, category, description, amount) VALUES (?1, ?2, ?3, ?4)",
            params![
                expense.date.to_string(),
                expense.category,
                expense.description,
                expense.amount.to_string()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, "expense inserted");
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<Option<Expense>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id=?1");
        let found = self
            .conn
            .query_row(&sql, params![id], |r| Ok(expense_from_row(r)))
            .optional()?
            .transpose()?;
        if found.is_none() {
            debug!(id, "no expense with this id");
        }
        Ok(found)
    }

    fn all(&self) -> Result<Vec<Expense>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY date DESC, id DESC");
        let data = self.query_expenses(&sql, [])?;
        debug!(count = data.len(), "loaded all expenses");
        Ok(data)
    }

    fn update(&self, expense: &Expense) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE expenses SET date=?1, category=?2, description=?3, amount=?4 WHERE id=?5",
            params![
                expense.date.to_string(),
                expense.category,
                expense.description,
                expense.amount.to_string(),
                expense.id
            ],
        )?;
        if changed == 0 {
            warn!(id = expense.id, "update matched no expense");
        }
        Ok(changed > 0)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id=?1", params![id])?;
        if changed == 0 {
            warn!(id, "delete matched no expense");
        }
        Ok(changed > 0)
    }

    fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        let sql =
            format!("{SELECT_COLUMNS} WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC, id DESC");
        let data = self.query_expenses(&sql, params![start.to_string(), end.to_string()])?;
        debug!(%start, %end, count = data.len(), "loaded expenses by date range");
        Ok(data)
    }

    fn by_category(&self, category: &str) -> Result<Vec<Expense>> {
        let sql = format!("{SELECT_COLUMNS} WHERE category=?1 ORDER BY date DESC, id DESC");
        let data = self.query_expenses(&sql, params![category])?;
        debug!(category, count = data.len(), "loaded expenses by category");
        Ok(data)
    }

    fn by_amount_range(&self, min: Decimal, max: Decimal) -> Result<Vec<Expense>> {
        // amounts are TEXT, so compare as Decimal rather than in SQL
        let sql = format!("{SELECT_COLUMNS} ORDER BY id");
        let mut data = self.query_expenses(&sql, [])?;
        data.retain(|e| e.amount >= min && e.amount <= max);
        data.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| b.id.cmp(&a.id)));
        debug!(%min, %max, count = data.len(), "loaded expenses by amount range");
        Ok(data)
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
