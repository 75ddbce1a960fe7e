//! Error types for the low-level store layer.
//!
//! Errors at this level are transport- and store-focused. No semantic errors
//! like "unsupported field" or "type mismatch" - those belong in higher
//! layers.

/// Errors at the low-level store layer.
#[derive(Debug)]
pub enum KvError {
    /// Generic I/O or transport failure.
    ///
    /// Use this for network errors, file I/O errors, IPC failures, etc.
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// The key holds an entry of a different store type.
    ///
    /// For example, a list operation against a key holding a hash.
    WrongType { key: String },

    /// No connection could be acquired from the pool.
    PoolExhausted,
}

impl std::fmt::Display for KvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KvError::Transport(e) => write!(f, "transport error: {}", e),
            KvError::WrongType { key } => {
                write!(f, "operation against wrong entry type at key '{}'", key)
            }
            KvError::PoolExhausted => write!(f, "connection pool exhausted"),
        }
    }
}

impl std::error::Error for KvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KvError::Transport(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KvError {
    fn from(e: std::io::Error) -> Self {
        KvError::Transport(Box::new(e))
    }
}
