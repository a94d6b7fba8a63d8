//! Built-in filter stages.
//!
//! A filter stage maps an ordered token sequence to another ordered token
//! sequence. Stages are applied in the order a collection's pipeline lists
//! them; each stage sees the previous stage's output.

use std::collections::HashSet;
use std::sync::OnceLock;

use rust_stemmers::{Algorithm, Stemmer};

use crate::token::Token;

/// A single filter stage in a collection's pipeline.
pub trait FilterStage: Send + Sync {
    /// The stable identifier persisted in collection Metadata.
    fn id(&self) -> &'static str;
    /// Transform the token sequence. May shrink it (e.g. dropping stop
    /// words) but never reorders surviving tokens.
    fn apply(&self, tokens: Vec<Token>) -> Vec<Token>;
}

fn english_stop_words() -> &'static HashSet<String> {
    static WORDS: OnceLock<HashSet<String>> = OnceLock::new();
    WORDS.get_or_init(|| {
        stop_words::get(stop_words::LANGUAGE::English)
            .into_iter()
            .collect()
    })
}

/// Drops a token if its lowercase form is an English stop word.
#[derive(Debug, Default, Clone, Copy)]
pub struct StopWords;

impl FilterStage for StopWords {
    fn id(&self) -> &'static str {
        "stopwords"
    }

    fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        let stop = english_stop_words();
        tokens
            .into_iter()
            .filter(|t| !stop.contains(&t.to_lowercase()))
            .collect()
    }
}

/// Lowercases each token, then replaces it with its English Snowball stem.
///
/// Sequence length is preserved: unlike `StopWords`, this stage never drops
/// a token, only rewrites it.
#[derive(Default, Clone, Copy)]
pub struct StemmAndToLower;

impl FilterStage for StemmAndToLower {
    fn id(&self) -> &'static str {
        "stemm_lower"
    }

    fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        let stemmer = Stemmer::create(Algorithm::English);
        tokens
            .into_iter()
            .map(|t| stemmer.stem(&t.to_lowercase()).into_owned())
            .collect()
    }
}
