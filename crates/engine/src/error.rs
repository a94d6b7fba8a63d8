use thiserror::Error;

/// Errors surfaced by `Processor` and `Manager` operations (docs/ARCHITECTURE.md §7).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("collection does not exist: {0}")]
    NotFoundCollection(String),

    #[error(transparent)]
    Storage(#[from] storage::StorageError),

    #[error(transparent)]
    Config(#[from] tokenizer::TokenizerError),

    #[error("background task failed: {0}")]
    Join(String),
}

impl EngineError {
    /// True for the storage-level "bucket/key absent" signal specifically,
    /// as distinct from any other storage failure (docs/ARCHITECTURE.md §7).
    pub fn is_not_found_key(&self) -> bool {
        matches!(self, EngineError::Storage(storage::StorageError::NotFound { .. }))
    }
}
