//! Error types for Article Saver.

use thiserror::Error;

/// Common error type for Article Saver.
#[derive(Error, Debug)]
pub enum SaverError {
    /// Database error.
    ///
    /// Wraps errors from whichever sqlx backend is compiled in.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Integrity conflict that could not be resolved by reading the existing row.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No content could be fetched from the submitted URL.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// No readable article could be extracted from the fetched page.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// RSS feed rendering error.
    #[error("feed error: {0}")]
    Feed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for SaverError {
    fn from(e: sqlx::Error) -> Self {
        SaverError::Database(e.to_string())
    }
}

/// Result type alias for Article Saver operations.
pub type Result<T> = std::result::Result<T, SaverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = SaverError::Auth("invalid api key".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid api key");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = SaverError::NotFound("article".to_string());
        assert_eq!(err.to_string(), "article not found");
    }

    #[test]
    fn test_extraction_error_display() {
        let err = SaverError::Extraction("no article body".to_string());
        assert_eq!(err.to_string(), "extraction error: no article body");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SaverError = io_err.into();
        assert!(matches!(err, SaverError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: SaverError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, SaverError::Database(_)));
    }
}
