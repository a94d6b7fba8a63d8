//! Process-wide registry of collections (docs/ARCHITECTURE.md §4.4).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use storage::Storage;
use tracing::{info, instrument};

use crate::codec::decode_metadata;
use crate::error::EngineError;
use crate::model::Metadata;
use crate::processor::{Processor, COLLECTIONS_BUCKET};

/// Owns every `Processor` in the process, keyed by collection name, guarded
/// by a readers/writer lock. The Processor itself serializes its own
/// persistence via the storage adapter's transactions; the Manager adds no
/// locking beyond protecting the name-to-handle map.
pub struct Manager {
    storage: Arc<dyn Storage>,
    processors: RwLock<HashMap<String, Arc<Processor>>>,
}

impl Manager {
    /// Scan the `collections` bucket and rebuild the in-memory registry
    /// exactly from it. An identifier this binary cannot resolve is fatal
    /// to load (docs/ARCHITECTURE.md §4.1, §4.4).
    #[instrument(skip(storage))]
    pub fn load(storage: Arc<dyn Storage>) -> Result<Self, EngineError> {
        let mut entries = Vec::new();
        storage.view(&mut |txn| {
            entries = txn.scan(COLLECTIONS_BUCKET)?;
            Ok(())
        })?;

        let mut processors = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let name = String::from_utf8_lossy(&key).into_owned();
            let metadata = decode_metadata(&value)?;
            let processor = Processor::attach(
                name.clone(),
                metadata.tokenizer,
                metadata.col_filters,
                Arc::clone(&storage),
            )?;
            info!(collection = %name, "restored collection from storage");
            processors.insert(name, Arc::new(processor));
        }

        Ok(Self {
            storage,
            processors: RwLock::new(processors),
        })
    }

    /// A `Manager` with no persisted collections yet (used by tests and by
    /// first-time startup before `base_collection` is provisioned).
    pub fn empty(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            processors: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a processor under the write lock.
    pub fn add_processor(&self, processor: Processor) {
        let name = processor.name().to_string();
        self.processors
            .write()
            .expect("collection registry lock poisoned")
            .insert(name, Arc::new(processor));
    }

    /// Look up a collection's processor under the read lock.
    pub fn get_processor(&self, name: &str) -> Result<Arc<Processor>, EngineError> {
        self.processors
            .read()
            .expect("collection registry lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::NotFoundCollection(name.to_string()))
    }

    /// Resolve pipeline stages, construct and persist a new collection's
    /// Metadata, but do not register it (the caller must `add_processor`
    /// the result, docs/ARCHITECTURE.md §4.4).
    pub fn init_new_proc(
        &self,
        name: impl Into<String>,
        tokenizer_id: impl Into<String>,
        filter_ids: Vec<String>,
    ) -> Result<Processor, EngineError> {
        Processor::create(name, tokenizer_id, filter_ids, Arc::clone(&self.storage))
    }

    /// Every registered collection's persisted Metadata, scanned fresh from
    /// storage (not the in-memory map) so it reflects concurrent writers.
    pub fn list_collections(&self) -> Result<HashMap<String, Metadata>, EngineError> {
        let mut entries = Vec::new();
        self.storage.view(&mut |txn| {
            entries = txn.scan(COLLECTIONS_BUCKET)?;
            Ok(())
        })?;

        let mut out = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let name = String::from_utf8_lossy(&key).into_owned();
            out.insert(name, decode_metadata(&value)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryStorage;

    #[test]
    fn load_is_empty_on_a_fresh_store() {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let manager = Manager::load(storage).unwrap();
        assert!(manager.list_collections().unwrap().is_empty());
    }

    #[test]
    fn init_new_proc_persists_but_does_not_register() {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let manager = Manager::load(storage).unwrap();
        let processor = manager
            .init_new_proc("articles", tokenizer::TEXT_TOKENIZER, vec![])
            .unwrap();
        assert!(manager.get_processor("articles").is_err());

        manager.add_processor(processor);
        assert!(manager.get_processor("articles").is_ok());
        assert_eq!(manager.list_collections().unwrap().len(), 1);
    }

    #[test]
    fn get_processor_on_unknown_name_is_not_found() {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        let manager = Manager::load(storage).unwrap();
        assert!(matches!(
            manager.get_processor("nope"),
            Err(EngineError::NotFoundCollection(_))
        ));
    }

    #[test]
    fn load_restores_collections_written_in_a_previous_session() {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        {
            let manager = Manager::load(Arc::clone(&storage)).unwrap();
            let processor = manager
                .init_new_proc("articles", tokenizer::TEXT_TOKENIZER, vec!["stemm_lower".to_string()])
                .unwrap();
            manager.add_processor(processor);
        }

        let reloaded = Manager::load(storage).unwrap();
        let processor = reloaded.get_processor("articles").unwrap();
        assert_eq!(processor.filter_ids(), &["stemm_lower".to_string()]);
    }
}
