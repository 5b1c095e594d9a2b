// Bookrig Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookrigError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fixture not found: {0}")]
    FixtureNotFound(String),

    #[error("Copy verification failed: {0}")]
    CopyVerify(String),

    #[error("Unsupported UI version: {0}")]
    UnsupportedUiVersion(u32),

    #[error("No string resource for key: {0}")]
    MissingString(String),

    #[error("Element not found on screen: {0}")]
    ElementNotFound(String),

    #[error("Timed out waiting for: {0}")]
    Timeout(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for BookrigError {
    fn from(err: anyhow::Error) -> Self {
        BookrigError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BookrigError>;
