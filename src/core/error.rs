use thiserror::Error;

/// Errors raised at the crate's boundaries (storage, configuration, export).
///
/// Cart operations themselves never fail: invalid input degrades to a no-op
/// and storage failures are logged by the session and swallowed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PedidoError {
    /// The storage backend could not read or write an entry.
    #[error("storage error: {0}")]
    Storage(String),

    /// A persisted entry could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Order document export failed.
    #[error("export error: {0}")]
    Export(String),

    /// Underlying filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PedidoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
