//! Collection-management layer for the lexdb search engine: the
//! per-collection `Processor` (docs/ARCHITECTURE.md §4.3) and the
//! cross-collection `Manager` registry (docs/ARCHITECTURE.md §4.4).

mod codec;
mod error;
mod manager;
mod model;
mod processor;

pub use error::EngineError;
pub use manager::Manager;
pub use model::{Metadata, Posting, RawData, ResponseData, Source, Url};
pub use processor::Processor;
