//! Token pipeline for the lexdb search engine: a tokenizer followed by an
//! ordered list of filter stages, bound to stable string identifiers so a
//! collection's pipeline can be persisted and reloaded at startup.
//!
//! ```
//! use tokenizer::Pipeline;
//!
//! let pipeline = Pipeline::resolve("text", &["stemm_lower".to_string()]).unwrap();
//! assert_eq!(pipeline.run("Running dogs"), vec!["run", "dog"]);
//! ```

mod error;
mod filters;
mod registry;
mod token;

pub use error::TokenizerError;
pub use filters::{FilterStage, StemmAndToLower, StopWords};
pub use registry::{resolve_filter, resolve_tokenizer, Pipeline, TEXT_TOKENIZER};
pub use token::{filter_text, Token};
