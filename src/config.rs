// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory:
//!
//! | Variable              | Default                               |
//! |-----------------------|---------------------------------------|
//! | `SPENDLOG_DB`         | `<data dir>/spendlog.sqlite`          |
//! | `SPENDLOG_EXPORT_DIR` | `export`                              |
//! | `SPENDLOG_LOG`        | `warn`                                |
//! | `SPENDLOG_TREND_DAYS` | `7`                                   |
//!
//! Command-line flags override the environment.

use std::path::PathBuf;

use tracing::debug;

use crate::analytics::DEFAULT_TREND_WINDOW_DAYS;
use crate::db;
use crate::error::{ExpenseError, Result};

pub const ENV_DB: &str = "SPENDLOG_DB";
pub const ENV_EXPORT_DIR: &str = "SPENDLOG_EXPORT_DIR";
pub const ENV_LOG: &str = "SPENDLOG_LOG";
pub const ENV_TREND_DAYS: &str = "SPENDLOG_TREND_DAYS";

pub const DEFAULT_EXPORT_DIR: &str = "export";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` means the platform default, resolved by [`Config::db_path`].
    pub db_path: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub log_filter: String,
    pub trend_window_days: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ExpenseError::Config(format!("Failed to load .env: {}", e))),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Config::default();

        if let Some(p) = get(ENV_DB) {
            cfg.db_path = Some(PathBuf::from(p));
        }
        if let Some(p) = get(ENV_EXPORT_DIR) {
            cfg.export_dir = PathBuf::from(p);
        }
        if let Some(f) = get(ENV_LOG) {
            cfg.log_filter = f.trim().to_string();
        }
        if let Some(days) = get(ENV_TREND_DAYS) {
            cfg.trend_window_days = parse_window_days(&days)?;
        }
        Ok(cfg)
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(p) => Ok(p.clone()),
            None => db::default_db_path(),
        }
    }

    /// Same as [`Config::db_path`] but never creates the data directory.
    pub fn db_location(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(p) => Ok(p.clone()),
            None => db::default_db_location(),
        }
    }
}

pub fn parse_window_days(s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ExpenseError::Config(format!(
            "Invalid trend window '{}', expected a positive number of days",
            s
        ))),
    }
}
