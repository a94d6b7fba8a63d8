use thiserror::Error;

/// Errors raised while resolving pipeline identifiers against the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenizerError {
    #[error("unknown tokenizer identifier: {0}")]
    UnknownTokenizer(String),
    #[error("unknown filter identifier: {0}")]
    UnknownFilter(String),
}
