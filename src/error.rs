use thiserror::Error;

/// Failures surfaced by the studio core.
///
/// Repository and session operations return these to the caller; the UI layer
/// decides how to present them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Project not found: {0}")]
    NotFound(String),

    /// The local store refused a read or write (quota exceeded, store
    /// disabled, database failure).
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Stored record could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn persistence(e: impl std::fmt::Display) -> Self {
        Self::PersistenceUnavailable(e.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Self::persistence(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
