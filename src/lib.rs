//! `lexdb`: embedded, multi-collection full-text search engine.
//!
//! This crate is a thin umbrella over three focused crates (the token
//! pipeline `tokenizer`, the transactional bucketed storage contract
//! `storage`, and the collection-management layer `engine`, holding
//! `Processor` and `Manager`), plus the process bootstrap glue (`Config`,
//! [`open`]) that the HTTP adapter in `lexdb-server` is built on. See
//! README.md and docs/ARCHITECTURE.md for the full picture.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! let cfg = lexdb::Config::default();
//! let manager = lexdb::open(&cfg)?;
//! let processor = manager.get_processor("articles")?;
//! processor.query("hello", 10, 0).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;

pub use config::Config;
pub use engine::{EngineError, Manager, Metadata, Posting, Processor, RawData, ResponseData, Source, Url};
pub use storage::{RedbBackend, Storage, StorageError};
pub use tokenizer::{TokenizerError, TEXT_TOKENIZER};

use std::sync::Arc;

/// Open (creating if necessary) the on-disk store named by `cfg.db_file`,
/// restore every previously-registered collection (`Manager::load`, see
/// docs/ARCHITECTURE.md §4.4), and, if `cfg.base_collection` is set and not
/// already present, create it with the default pipeline (`text` tokenizer,
/// `stemm_lower` filter).
pub fn open(cfg: &Config) -> Result<Arc<Manager>, EngineError> {
    let backend = RedbBackend::open(&cfg.db_file)?;
    let storage: Arc<dyn Storage> = Arc::new(backend);
    let manager = Manager::load(storage)?;

    if let Some(name) = &cfg.base_collection {
        if manager.get_processor(name).is_err() {
            let processor =
                manager.init_new_proc(name.clone(), TEXT_TOKENIZER, vec!["stemm_lower".to_string()])?;
            manager.add_processor(processor);
        }
    }

    Ok(Arc::new(manager))
}

/// Initialize the `tracing` subscriber the binary and (by default) the
/// HTTP adapter log through, per `cfg.log_level`/`cfg.log_fmt`.
pub fn init_tracing(cfg: &Config) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match cfg.log_fmt {
        config::LogFormat::Json => {
            let _ = subscriber.json().try_init();
        }
        config::LogFormat::Pretty => {
            let _ = subscriber.pretty().try_init();
        }
    }
}
