//! Error types for Arth

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Not enough transaction history to produce a recommendation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The financial profile cannot support budget generation
    /// (e.g. non-positive monthly income).
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// No stored recommendation exists for the requested month.
    #[error("No active budget: {0}")]
    NoActiveBudget(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
