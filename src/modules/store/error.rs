use thiserror::Error;

/// Failures surfaced by the record store and the tagging services built on it
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing store failure (connectivity, unexpected SQL error, ...)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unique constraint violation, e.g. a concurrent writer took a category name
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced question or category does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            // PostgreSQL unique_violation
            if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
                return StoreError::Conflict(
                    db_err
                        .constraint()
                        .map(|c| format!("Unique constraint '{}' violated", c))
                        .unwrap_or_else(|| "Unique constraint violated".to_string()),
                );
            }

            // PostgreSQL foreign_key_violation
            if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
                return StoreError::NotFound("Referenced record does not exist".to_string());
            }
        }

        if matches!(e, sqlx::Error::RowNotFound) {
            return StoreError::NotFound("Record not found".to_string());
        }

        tracing::error!("Record store error: {:?}", e);
        StoreError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_storage() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
