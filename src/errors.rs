//! Unified error type for the cash drawer service.
//!
//! Every fallible operation returns [`Result`]. The variants follow the
//! failure taxonomy the API surfaces to the cashier: user input problems,
//! backend-detected conflicts, missing records, and infrastructure failures.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// All errors produced by the service.
#[derive(Debug, Error)]
pub enum Error {
    /// User input failed validation or the drawer is in the wrong state.
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable reason shown to the cashier
        message: String,
    },

    /// A monetary amount was parsed but is not acceptable (NaN, infinite, out of range).
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// The backend detected an invariant violation, e.g. two racing opens.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting state
        message: String,
    },

    /// No cash drawer with this id.
    #[error("Cash drawer {id} not found")]
    DrawerNotFound {
        /// Requested drawer id
        id: i64,
    },

    /// No active employee with this id.
    #[error("Employee {id} not found")]
    EmployeeNotFound {
        /// Requested employee id
        id: i64,
    },

    /// No display event with this id is pending.
    #[error("Display event {id} not found")]
    DisplayEventNotFound {
        /// Requested event id
        id: u64,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// JSON (de)serialization failure, e.g. a stored denomination breakdown.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (config file, socket binding).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by user input or drawer state.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidAmount { .. })
    }

    /// Returns true when the database could not be reached at all.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database(DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
        )
    }

    /// Maps a unique-constraint violation to [`Error::Conflict`], leaving
    /// every other database error untouched.
    pub(crate) fn conflict_on_unique(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict {
                message: message.to_string(),
            },
            _ => Self::Database(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
