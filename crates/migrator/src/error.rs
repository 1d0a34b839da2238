use sea_orm::DbErr;
use std::num::ParseIntError;
use thiserror::Error;

/// Failure of a single sub-migration.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Invalid value {value:?} for property {name}: {source}")]
    InvalidProperty {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("Negative value {value} for property {name}")]
    NegativeProperty { name: &'static str, value: i64 },
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Expiry override lookup failed for {consumer_key} (tenant {tenant_id}): {reason}")]
    Override {
        consumer_key: String,
        tenant_id: i32,
        reason: String,
    },
}

impl MigrationError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MigrationError::InvalidProperty { .. } | MigrationError::NegativeProperty { .. }
        )
    }
}

/// Failure surfaced by the runner when continue-on-error is off.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{message}")]
    StepFailed {
        step: &'static str,
        message: String,
        #[source]
        source: MigrationError,
    },
}

impl RunError {
    /// Name of the sub-migration that aborted the run.
    pub fn step(&self) -> &'static str {
        match self {
            RunError::StepFailed { step, .. } => step,
        }
    }
}
