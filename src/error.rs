use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to create store directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    #[error("valid gender is required (Male, Female, Other), got '{0}'")]
    InvalidGender(String),

    #[error("score type must be CGPA or Percentage, got '{0}'")]
    InvalidScoreType(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("weights must be finite and non-negative: {name}={value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("max_cgpa must be positive, got {0}")]
    MaxCgpa(f64),
}
