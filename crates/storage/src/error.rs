use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => e.code().as_deref() == Some("23505"),
            StorageError::ConstraintViolation(_) => true,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::NotFound | StorageError::Database(sqlx::Error::RowNotFound)
        )
    }

    /// Maps a Postgres unique violation onto `ConstraintViolation` with a readable message.
    pub(crate) fn on_unique_violation(error: sqlx::Error, message: impl Into<String>) -> Self {
        if let sqlx::Error::Database(ref db_err) = error
            && db_err.code().as_deref() == Some("23505")
        {
            return StorageError::ConstraintViolation(message.into());
        }
        StorageError::from(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_counts_as_unique_violation() {
        let err = StorageError::ConstraintViolation("Handle already tracked".to_string());
        assert!(err.is_unique_violation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_row_not_found_is_not_found() {
        assert!(StorageError::Database(sqlx::Error::RowNotFound).is_not_found());
        assert!(StorageError::NotFound.is_not_found());
    }
}
