//! Common error types for TRUST

use thiserror::Error;

/// Common result type for TRUST operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the TRUST service
#[derive(Error, Debug)]
pub enum Error {
    /// Store query failure (select paths)
    #[error("Store read error: {0}")]
    StoreRead(String),

    /// Store mutation failure (insert/update paths)
    #[error("Store write error: {0}")]
    StoreWrite(String),

    /// Uniqueness-constraint violation on insert
    ///
    /// Separated from [`Error::StoreWrite`] because a duplicate demo
    /// purchase is a soft success, not a failure.
    #[error("Duplicate row: {0}")]
    Duplicate(String),

    /// Signed media access failure (missing file, expired grant)
    #[error("Storage access error: {0}")]
    StorageAccess(String),

    /// Failure during identity/user/artist bootstrap
    #[error("Boot error: {0}")]
    Boot(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input, rejected before any store write
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Wrap a sqlx error from a read path.
    pub fn read(err: sqlx::Error) -> Self {
        Error::StoreRead(err.to_string())
    }

    /// Wrap a sqlx error from a write path, detecting uniqueness violations.
    ///
    /// The store surfaces constraint violations only through the error
    /// message: the original managed store says "duplicate key", SQLite says
    /// "UNIQUE constraint failed". Matched case-insensitively on either.
    pub fn write(err: sqlx::Error) -> Self {
        let msg = err.to_string();
        if is_duplicate_message(&msg) {
            Error::Duplicate(msg)
        } else {
            Error::StoreWrite(msg)
        }
    }

    /// True for the uniqueness-constraint variant.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::Duplicate(_))
    }
}

fn is_duplicate_message(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    lower.contains("duplicate") || lower.contains("unique constraint")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_detection() {
        assert!(is_duplicate_message(
            "error returned from database: UNIQUE constraint failed: demo_purchases.user_id"
        ));
        assert!(is_duplicate_message(
            "duplicate key value violates unique constraint \"demo_purchases_user_artist_key\""
        ));
        assert!(is_duplicate_message("Duplicate entry '1-2'"));
        assert!(!is_duplicate_message("no such table: demo_purchases"));
        assert!(!is_duplicate_message("database is locked"));
    }

    #[test]
    fn test_duplicate_variant() {
        let err = Error::Duplicate("UNIQUE constraint failed".to_string());
        assert!(err.is_duplicate());

        let err = Error::StoreWrite("database is locked".to_string());
        assert!(!err.is_duplicate());
    }
}
