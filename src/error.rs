//! Error types raised at the loading boundary
//!
//! The engine itself never fails; only reading rule data, tenant files and
//! household snapshots from disk can.

use std::path::PathBuf;

/// Problems with tax bracket or eligibility threshold rule data
#[derive(Debug, thiserror::Error)]
pub enum RuleDataError {
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed rule data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown filing status '{0}' in bracket table")]
    UnknownFilingStatus(String),

    #[error("Invalid number '{value}' in column {column}")]
    InvalidNumber { column: &'static str, value: String },

    #[error("Rate {rate} for {jurisdiction}/{filing_status} is outside [0, 1]")]
    RateOutOfRange {
        jurisdiction: String,
        filing_status: String,
        rate: f64,
    },

    #[error("Bracket bounds for {jurisdiction}/{filing_status} are not strictly increasing")]
    NonMonotonicBounds {
        jurisdiction: String,
        filing_status: String,
    },

    #[error("No bracket tables found for tax year {0}")]
    NoTablesForYear(u16),
}

/// Problems reading a tenant registry file
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Failed to read tenant file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid tenant file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for session setup and household loading
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Rules(#[from] RuleDataError),

    #[error(transparent)]
    Tenant(#[from] TenantError),

    #[error("Failed to read household file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid household data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Helper type for planner results
pub type PlannerResult<T> = Result<T, PlannerError>;
