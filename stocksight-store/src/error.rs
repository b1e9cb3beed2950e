use stocksight_types::SightError;
use thiserror::Error;

/// Failures raised inside a store operation before it is converted to a safe default.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite rejected a statement or the database file is unusable.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A stored row could not be mapped back to a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// The store configuration cannot be applied.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl From<StoreError> for SightError {
    fn from(e: StoreError) -> Self {
        Self::Persistence(e.to_string())
    }
}
