//! The transactional bucketed key-value contract the engine crate depends
//! on (docs/ARCHITECTURE.md §4.2), plus an in-memory implementation used
//! in tests.
//!
//! `scan` takes a visitor-style `&mut dyn FnMut` callback rather than
//! returning an iterator, and the contract is bucketed and multi-value (a
//! set of values per key) rather than single-value-per-key, since postings
//! need to accumulate per token.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StorageError;

/// A single transaction's view over the store. Implementors decide whether
/// a "not found" set/key is an error or an empty result (callers treat the
/// absence of a set as a recoverable `StorageError::NotFound`).
pub trait Txn {
    /// Single-value overwrite.
    fn put(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Add one or more members to the set at (bucket, key). Creates the
    /// set on first add.
    fn set_add(&mut self, bucket: &str, key: &[u8], values: &[Vec<u8>]) -> Result<(), StorageError>;

    /// All members of the set at (bucket, key), or `NotFound` if the set
    /// has never been written.
    fn set_members(&self, bucket: &str, key: &[u8]) -> Result<Vec<Vec<u8>>, StorageError>;

    /// Single-value read, or `NotFound` if absent.
    fn get(&self, bucket: &str, key: &[u8]) -> Result<Vec<u8>, StorageError>;

    /// Every (key, value) entry in a bucket.
    fn scan(&self, bucket: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError>;
}

/// A transactional bucketed store. `update` commits on a successful return
/// from `f`, or rolls back if `f` returns an error. `view` is read-only.
pub trait Storage: Send + Sync {
    fn update(
        &self,
        f: &mut dyn FnMut(&mut dyn Txn) -> Result<(), StorageError>,
    ) -> Result<(), StorageError>;

    fn view(
        &self,
        f: &mut dyn FnMut(&dyn Txn) -> Result<(), StorageError>,
    ) -> Result<(), StorageError>;
}

/// In-memory `Storage` used by unit and integration tests. Not persisted,
/// not crash-safe: an ephemeral, fast test double for `RedbBackend`.
#[derive(Default)]
pub struct InMemoryStorage {
    buckets: RwLock<HashMap<String, HashMap<Vec<u8>, StoredValue>>>,
}

#[derive(Clone)]
enum StoredValue {
    Single(Vec<u8>),
    Set(Vec<Vec<u8>>),
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

struct InMemoryTxn<'a> {
    buckets: &'a mut HashMap<String, HashMap<Vec<u8>, StoredValue>>,
}

impl Txn for InMemoryTxn<'_> {
    fn put(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_vec(), StoredValue::Single(value.to_vec()));
        Ok(())
    }

    fn set_add(&mut self, bucket: &str, key: &[u8], values: &[Vec<u8>]) -> Result<(), StorageError> {
        let entry = self
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .entry(key.to_vec())
            .or_insert_with(|| StoredValue::Set(Vec::new()));
        match entry {
            StoredValue::Set(members) => members.extend(values.iter().cloned()),
            StoredValue::Single(_) => {
                return Err(StorageError::Io(format!(
                    "key {key:?} in bucket {bucket} already holds a single value"
                )))
            }
        }
        Ok(())
    }

    fn set_members(&self, bucket: &str, key: &[u8]) -> Result<Vec<Vec<u8>>, StorageError> {
        match self.buckets.get(bucket).and_then(|b| b.get(key)) {
            Some(StoredValue::Set(members)) => Ok(members.clone()),
            Some(StoredValue::Single(_)) => Err(StorageError::Io(format!(
                "key {key:?} in bucket {bucket} is a single value, not a set"
            ))),
            None => Err(StorageError::not_found(bucket, key)),
        }
    }

    fn get(&self, bucket: &str, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        match self.buckets.get(bucket).and_then(|b| b.get(key)) {
            Some(StoredValue::Single(v)) => Ok(v.clone()),
            Some(StoredValue::Set(_)) => Err(StorageError::Io(format!(
                "key {key:?} in bucket {bucket} is a set, not a single value"
            ))),
            None => Err(StorageError::not_found(bucket, key)),
        }
    }

    fn scan(&self, bucket: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let Some(entries) = self.buckets.get(bucket) else {
            return Ok(Vec::new());
        };
        Ok(entries
            .iter()
            .filter_map(|(k, v)| match v {
                StoredValue::Single(bytes) => Some((k.clone(), bytes.clone())),
                StoredValue::Set(_) => None,
            })
            .collect())
    }
}

/// Read-only view over the in-memory store, used by `view`. Mutating calls
/// are programmer errors (the `Storage::view` contract never exposes a way
/// to reach them) and return an `Io` error rather than panicking.
struct InMemoryReadTxn<'a> {
    buckets: &'a HashMap<String, HashMap<Vec<u8>, StoredValue>>,
}

impl Txn for InMemoryReadTxn<'_> {
    fn put(&mut self, _bucket: &str, _key: &[u8], _value: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Io("put called inside a read-only view".into()))
    }

    fn set_add(&mut self, _bucket: &str, _key: &[u8], _values: &[Vec<u8>]) -> Result<(), StorageError> {
        Err(StorageError::Io("set_add called inside a read-only view".into()))
    }

    fn set_members(&self, bucket: &str, key: &[u8]) -> Result<Vec<Vec<u8>>, StorageError> {
        match self.buckets.get(bucket).and_then(|b| b.get(key)) {
            Some(StoredValue::Set(members)) => Ok(members.clone()),
            Some(StoredValue::Single(_)) => Err(StorageError::Io(format!(
                "key {key:?} in bucket {bucket} is a single value, not a set"
            ))),
            None => Err(StorageError::not_found(bucket, key)),
        }
    }

    fn get(&self, bucket: &str, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        match self.buckets.get(bucket).and_then(|b| b.get(key)) {
            Some(StoredValue::Single(v)) => Ok(v.clone()),
            Some(StoredValue::Set(_)) => Err(StorageError::Io(format!(
                "key {key:?} in bucket {bucket} is a set, not a single value"
            ))),
            None => Err(StorageError::not_found(bucket, key)),
        }
    }

    fn scan(&self, bucket: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let Some(entries) = self.buckets.get(bucket) else {
            return Ok(Vec::new());
        };
        Ok(entries
            .iter()
            .filter_map(|(k, v)| match v {
                StoredValue::Single(bytes) => Some((k.clone(), bytes.clone())),
                StoredValue::Set(_) => None,
            })
            .collect())
    }
}

impl Storage for InMemoryStorage {
    fn update(
        &self,
        f: &mut dyn FnMut(&mut dyn Txn) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let mut guard = self.buckets.write().map_err(|_| StorageError::Io("poisoned lock".into()))?;
        let snapshot = guard.clone();
        let mut txn = InMemoryTxn { buckets: &mut guard };
        match f(&mut txn) {
            Ok(()) => Ok(()),
            Err(e) => {
                *guard = snapshot;
                Err(e)
            }
        }
    }

    fn view(
        &self,
        f: &mut dyn FnMut(&dyn Txn) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let guard = self.buckets.read().map_err(|_| StorageError::Io("poisoned lock".into()))?;
        let txn = InMemoryReadTxn { buckets: &guard };
        f(&txn)
    }
}
