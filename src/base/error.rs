use thiserror::Error;

/// Store-access failure raised by a [`Database`](crate::base::Database) gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("column `{0}` missing from result row")]
    MissingColumn(String),

    #[error("column `{column}` holds {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("column `{column}` holds invalid date `{value}`")]
    InvalidDate { column: String, value: String },

    #[error("store connection lock poisoned")]
    ConnectionPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;
