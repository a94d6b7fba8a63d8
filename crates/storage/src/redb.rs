//! Redb (pure Rust embedded database) backend for the bucketed storage
//! contract.
//!
//! Redb's `TableDefinition` requires a `'static str` table name, but
//! buckets here are named dynamically per collection (`d-<collection>`).
//! We keep a single table and fold the bucket name into the key instead:
//! a stored key is `bucket_bytes + 0x00 + key_bytes`, so a scan over one
//! bucket is a prefix scan over the composite key space.
//!
//! Sets (`set_add`/`set_members`) have no native multi-map in redb either;
//! a set is stored as one bincode-encoded `Vec<Vec<u8>>` value, read back
//! and appended to within the same transaction on every `set_add`.

use std::path::Path;
use std::sync::Arc;

use bincode::config::standard;
use redb::{Database, ReadableTable, TableDefinition};

use crate::backend::{Storage, Txn};
use crate::error::StorageError;

const DATA_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("lexdb_data");

fn composite_key(bucket: &str, key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bucket.len() + 1 + key.len());
    out.extend_from_slice(bucket.as_bytes());
    out.push(0);
    out.extend_from_slice(key);
    out
}

fn decode_set(bytes: &[u8]) -> Result<Vec<Vec<u8>>, StorageError> {
    let (members, _) = bincode::serde::decode_from_slice::<Vec<Vec<u8>>, _>(bytes, standard())
        .map_err(|e| StorageError::Decode(e.to_string()))?;
    Ok(members)
}

fn encode_set(members: &[Vec<u8>]) -> Result<Vec<u8>, StorageError> {
    bincode::serde::encode_to_vec(members, standard()).map_err(|e| StorageError::Encode(e.to_string()))
}

/// Persistent `Storage` backed by a single redb table and composite keys.
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create a redb database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = Database::create(path).map_err(StorageError::io)?;
        let write_txn = db.begin_write().map_err(StorageError::io)?;
        {
            let _table = write_txn.open_table(DATA_TABLE).map_err(StorageError::io)?;
        }
        write_txn.commit().map_err(StorageError::io)?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl Storage for RedbBackend {
    fn update(
        &self,
        f: &mut dyn FnMut(&mut dyn Txn) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(StorageError::io)?;
        let result = {
            let mut table = write_txn.open_table(DATA_TABLE).map_err(StorageError::io)?;
            let mut txn = RedbTxn { table: &mut table };
            f(&mut txn)
        };
        match result {
            Ok(()) => {
                write_txn.commit().map_err(StorageError::io)?;
                Ok(())
            }
            Err(e) => {
                // Dropping without commit discards the write transaction.
                drop(write_txn);
                Err(e)
            }
        }
    }

    fn view(
        &self,
        f: &mut dyn FnMut(&dyn Txn) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let read_txn = self.db.begin_read().map_err(StorageError::io)?;
        let table = read_txn.open_table(DATA_TABLE).map_err(StorageError::io)?;
        let txn = RedbReadTxn { table: &table };
        f(&txn)
    }
}

struct RedbTxn<'a, 'db> {
    table: &'a mut redb::Table<'db, &'static [u8], &'static [u8]>,
}

impl Txn for RedbTxn<'_, '_> {
    fn put(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let composite = composite_key(bucket, key);
        self.table
            .insert(composite.as_slice(), value)
            .map_err(StorageError::io)?;
        Ok(())
    }

    fn set_add(&mut self, bucket: &str, key: &[u8], values: &[Vec<u8>]) -> Result<(), StorageError> {
        let composite = composite_key(bucket, key);
        let mut members = match self
            .table
            .get(composite.as_slice())
            .map_err(StorageError::io)?
        {
            Some(existing) => decode_set(existing.value())?,
            None => Vec::new(),
        };
        members.extend(values.iter().cloned());
        let encoded = encode_set(&members)?;
        self.table
            .insert(composite.as_slice(), encoded.as_slice())
            .map_err(StorageError::io)?;
        Ok(())
    }

    fn set_members(&self, bucket: &str, key: &[u8]) -> Result<Vec<Vec<u8>>, StorageError> {
        let composite = composite_key(bucket, key);
        match self
            .table
            .get(composite.as_slice())
            .map_err(StorageError::io)?
        {
            Some(v) => decode_set(v.value()),
            None => Err(StorageError::not_found(bucket, key)),
        }
    }

    fn get(&self, bucket: &str, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        let composite = composite_key(bucket, key);
        match self
            .table
            .get(composite.as_slice())
            .map_err(StorageError::io)?
        {
            Some(v) => Ok(v.value().to_vec()),
            None => Err(StorageError::not_found(bucket, key)),
        }
    }

    fn scan(&self, bucket: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        scan_table(self.table, bucket)
    }
}

struct RedbReadTxn<'a> {
    table: &'a redb::ReadOnlyTable<&'static [u8], &'static [u8]>,
}

impl Txn for RedbReadTxn<'_> {
    fn put(&mut self, _bucket: &str, _key: &[u8], _value: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::io("put called inside a read-only view"))
    }

    fn set_add(&mut self, _bucket: &str, _key: &[u8], _values: &[Vec<u8>]) -> Result<(), StorageError> {
        Err(StorageError::io("set_add called inside a read-only view"))
    }

    fn set_members(&self, bucket: &str, key: &[u8]) -> Result<Vec<Vec<u8>>, StorageError> {
        let composite = composite_key(bucket, key);
        match self
            .table
            .get(composite.as_slice())
            .map_err(StorageError::io)?
        {
            Some(v) => decode_set(v.value()),
            None => Err(StorageError::not_found(bucket, key)),
        }
    }

    fn get(&self, bucket: &str, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        let composite = composite_key(bucket, key);
        match self
            .table
            .get(composite.as_slice())
            .map_err(StorageError::io)?
        {
            Some(v) => Ok(v.value().to_vec()),
            None => Err(StorageError::not_found(bucket, key)),
        }
    }

    fn scan(&self, bucket: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        scan_table(self.table, bucket)
    }
}

fn scan_table(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    bucket: &str,
) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
    let mut prefix = bucket.as_bytes().to_vec();
    prefix.push(0);
    let mut out = Vec::new();
    for item in table.iter().map_err(StorageError::io)? {
        let (k, v) = item.map_err(StorageError::io)?;
        let raw_key = k.value();
        if let Some(rest) = raw_key.strip_prefix(prefix.as_slice()) {
            out.push((rest.to_vec(), v.value().to_vec()));
        }
    }
    Ok(out)
}
