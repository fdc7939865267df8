// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error taxonomy shared by the store, the service, and the engine.
//!
//! Library code returns these typed errors; the binary and command handlers
//! wrap them with `anyhow` context at the edge.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExpenseError>;

#[derive(Debug, Error)]
pub enum ExpenseError {
    /// Rejected input on create/update (non-positive amount, blank category).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A malformed record reached a grouping or matching step.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// An aggregate left the range `Decimal` can represent.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A stored or user-supplied value could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExpenseError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ExpenseError::Validation(_))
    }

    pub fn is_invalid_record(&self) -> bool {
        matches!(self, ExpenseError::InvalidRecord(_))
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, ExpenseError::Overflow(_))
    }
}
