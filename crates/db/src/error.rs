use thiserror::Error;

/// Failures surfaced by a [`crate::BookStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mongodb operation failed: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("document cannot be stored: {0}")]
    Encode(String),

    #[error("database unavailable: {0}")]
    Unavailable(String),
}
