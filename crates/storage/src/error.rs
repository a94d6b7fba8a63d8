use thiserror::Error;

/// Errors surfaced by the storage contract (docs/ARCHITECTURE.md §4.2, §7).
///
/// `NotFound` is a recoverable "bucket/key absent" signal, distinct from
/// `Io`/`Encode`/`Decode` which indicate the transaction could not be
/// trusted and must be rolled back.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: bucket={bucket} key={key}")]
    NotFound { bucket: String, key: String },

    #[error("storage io error: {0}")]
    Io(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl StorageError {
    pub fn not_found(bucket: impl Into<String>, key: impl AsRef<[u8]>) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
            key: String::from_utf8_lossy(key.as_ref()).into_owned(),
        }
    }

    pub fn io<E: std::fmt::Display>(err: E) -> Self {
        Self::Io(err.to_string())
    }
}
