use thiserror::Error;
use uuid::Uuid;

/// Error type covering the fallible edges of the reception core.
///
/// Grouping and aggregation are total functions and never fail; every error
/// here originates at input validation or the persistence boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Record not found: {0}")]
    NotFound(Uuid),
    #[error("Commit already in flight for item {0}")]
    CommitInFlight(Uuid),
}

pub type CoreResult<T> = Result<T, CoreError>;
