use thiserror::Error;

/// Failures reported by host storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
    #[error("host storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn unavailable(reason: impl Into<String>) -> Self { Self::Unavailable(reason.into()) }
}
