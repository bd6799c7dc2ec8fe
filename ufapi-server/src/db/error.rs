//! Data access errors

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A unique constraint rejected the statement.
    #[error("constraint violation on {constraint}: {message}")]
    ConstraintViolation { constraint: String, message: String },

    /// No connection could be obtained or the connection dropped.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// Any other statement failure.
    #[error("database error: {0}")]
    Query(#[source] sqlx::Error),
}

impl DbError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::ConstraintViolation {
                constraint: db.constraint().unwrap_or("unknown").to_owned(),
                message: db.message().to_owned(),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(e),
            _ => Self::Query(e),
        }
    }
}
