//! Unified error types and result handling.

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// A read or write against the store failed.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Flushing the staged instances of a generation pass failed.
    /// Nothing from the pass was persisted.
    #[error("Failed to commit {staged} generated transactions: {source}")]
    Commit {
        /// Number of staged records that were discarded
        staged: usize,
        /// Underlying database error
        source: DbErr,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Amount is negative, NaN or infinite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No transaction exists with the given id.
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// The missing id
        id: Uuid,
    },

    /// Generated instances cannot be turned into templates.
    #[error("Transaction {id} was generated from a recurring series")]
    GeneratedInstance {
        /// The generated instance's id
        id: Uuid,
    },

    /// A month key could not be parsed or is out of range.
    #[error("Invalid month '{input}', expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input
        input: String,
    },

    /// I/O failure (config file, data directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
