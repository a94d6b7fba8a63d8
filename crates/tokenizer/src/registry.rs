//! Stable-identifier registry binding persisted pipeline configuration to
//! behavior.
//!
//! Collection Metadata persists a tokenizer id and an ordered list of
//! filter ids (docs/ARCHITECTURE.md §3, §4.5). This module is the single
//! place those strings are bound to actual code, so adding a stage means
//! adding one match arm here.

use std::sync::Arc;

use crate::error::TokenizerError;
use crate::filters::{FilterStage, StemmAndToLower, StopWords};
use crate::token::{filter_text, Token};

/// The stable identifier for the built-in (and currently only) tokenizer.
pub const TEXT_TOKENIZER: &str = "text";

/// Resolve a tokenizer identifier to the tokenizing function.
pub fn resolve_tokenizer(id: &str) -> Result<fn(&str) -> Vec<Token>, TokenizerError> {
    match id {
        TEXT_TOKENIZER => Ok(filter_text),
        other => Err(TokenizerError::UnknownTokenizer(other.to_string())),
    }
}

/// Resolve a filter identifier to a boxed filter stage.
pub fn resolve_filter(id: &str) -> Result<Arc<dyn FilterStage>, TokenizerError> {
    match id {
        "stopwords" => Ok(Arc::new(StopWords)),
        "stemm_lower" => Ok(Arc::new(StemmAndToLower)),
        other => Err(TokenizerError::UnknownFilter(other.to_string())),
    }
}

/// A bound, ready-to-run pipeline: one tokenizer followed by an ordered
/// list of filter stages.
#[derive(Clone)]
pub struct Pipeline {
    tokenizer_id: String,
    tokenizer: fn(&str) -> Vec<Token>,
    filters: Vec<Arc<dyn FilterStage>>,
}

impl Pipeline {
    /// Build a pipeline from persisted identifiers, failing loudly on any
    /// identifier this binary does not recognize (docs/ARCHITECTURE.md §4.1:
    /// unknown identifiers at reload time are a startup error).
    pub fn resolve(tokenizer_id: &str, filter_ids: &[String]) -> Result<Self, TokenizerError> {
        let tokenizer = resolve_tokenizer(tokenizer_id)?;
        let filters = filter_ids
            .iter()
            .map(|id| resolve_filter(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tokenizer_id: tokenizer_id.to_string(),
            tokenizer,
            filters,
        })
    }

    pub fn tokenizer_id(&self) -> &str {
        &self.tokenizer_id
    }

    pub fn filter_ids(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.id().to_string()).collect()
    }

    /// Run text through the tokenizer then each filter stage in order.
    /// Deterministic: identical input always yields identical output.
    pub fn run(&self, text: &str) -> Vec<Token> {
        let mut tokens = (self.tokenizer)(text);
        for filter in &self.filters {
            tokens = filter.apply(tokens);
        }
        tokens
    }
}
