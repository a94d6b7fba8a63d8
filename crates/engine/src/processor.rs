//! Per-collection `Processor`: turns a batch of documents into a positional
//! posting set and persists it, and answers ranked keyword queries
//! (docs/ARCHITECTURE.md §4.3).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use storage::Storage;
use tokenizer::{Pipeline, Token};
use tracing::{debug, instrument};

use crate::codec::{decode_posting, decode_source, encode_metadata, encode_posting, encode_source};
use crate::error::EngineError;
use crate::model::{Metadata, Posting, RawData, ResponseData, Url};

pub(crate) const COLLECTIONS_BUCKET: &str = "collections";
const SOURCES_BUCKET: &str = "sources";

fn data_bucket_for(name: &str) -> String {
    format!("d-{name}")
}

/// The per-collection handle: its name, bound pipeline, and a reference to
/// the shared storage. Constructed either by `create` (first-time, persists
/// Metadata) or `attach` (reload from an existing Metadata entry).
pub struct Processor {
    name: String,
    tokenizer_id: String,
    filter_ids: Vec<String>,
    pipeline: Pipeline,
    storage: Arc<dyn Storage>,
    data_bucket: String,
}

impl Processor {
    /// Build a handle over an already-registered collection without
    /// rewriting its Metadata entry. Used by `Manager::load` on startup.
    pub fn attach(
        name: impl Into<String>,
        tokenizer_id: impl Into<String>,
        filter_ids: Vec<String>,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, EngineError> {
        let tokenizer_id = tokenizer_id.into();
        let pipeline = Pipeline::resolve(&tokenizer_id, &filter_ids)?;
        let name = name.into();
        let data_bucket = data_bucket_for(&name);
        Ok(Self {
            name,
            tokenizer_id,
            filter_ids,
            pipeline,
            storage,
            data_bucket,
        })
    }

    /// Build a new collection: persists its Metadata in its own transaction
    /// (docs/ARCHITECTURE.md §4.3.4), then returns the in-memory handle. The data bucket
    /// itself is created lazily on first `set_add`.
    #[instrument(skip_all)]
    pub fn create(
        name: impl Into<String>,
        tokenizer_id: impl Into<String>,
        filter_ids: Vec<String>,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, EngineError> {
        let processor = Self::attach(name, tokenizer_id, filter_ids, storage)?;
        let metadata = Metadata {
            tokenizer: processor.tokenizer_id.clone(),
            col_filters: processor.filter_ids.clone(),
        };
        let encoded = encode_metadata(&metadata)?;
        let key = processor.name.clone();
        processor
            .storage
            .update(&mut |txn| txn.put(COLLECTIONS_BUCKET, key.as_bytes(), &encoded))?;
        debug!(collection = %processor.name, "registered new collection");
        Ok(processor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokenizer_id(&self) -> &str {
        &self.tokenizer_id
    }

    pub fn filter_ids(&self) -> &[String] {
        &self.filter_ids
    }

    /// Ingest a batch of documents (docs/ARCHITECTURE.md §4.3.1).
    ///
    /// One task per document runs the pure-CPU tokenization step
    /// concurrently; the calling task drains the results and performs a
    /// single storage transaction covering every document's Source and
    /// Postings. An empty batch is a no-op success.
    #[instrument(skip(self, docs), fields(collection = %self.name, docs = docs.len()))]
    pub async fn insert(&self, docs: Vec<RawData>) -> Result<(), EngineError> {
        if docs.is_empty() {
            return Ok(());
        }

        let mut tasks = tokio::task::JoinSet::new();
        for doc in docs {
            let pipeline = self.pipeline.clone();
            tasks.spawn(async move {
                let tokens = pipeline.run(&doc.data);
                let mut positions: HashMap<Token, Vec<u32>> = HashMap::new();
                for (i, token) in tokens.into_iter().enumerate() {
                    positions.entry(token).or_default().push(i as u32);
                }
                (doc.url, doc.source, positions)
            });
        }

        let mut pending_sources = Vec::new();
        let mut merged: HashMap<Token, Vec<Posting>> = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (url, source, positions) =
                joined.map_err(|e| EngineError::Join(e.to_string()))?;
            for (token, pos) in positions {
                merged.entry(token).or_default().push(Posting {
                    url: url.clone(),
                    pos,
                });
            }
            pending_sources.push((url, source));
        }

        let mut encoded_sources = Vec::with_capacity(pending_sources.len());
        for (url, source) in &pending_sources {
            encoded_sources.push((url.clone(), encode_source(source)?));
        }
        let mut encoded_postings: HashMap<Token, Vec<Vec<u8>>> = HashMap::with_capacity(merged.len());
        for (token, postings) in &merged {
            let mut values = Vec::with_capacity(postings.len());
            for posting in postings {
                values.push(encode_posting(posting)?);
            }
            encoded_postings.insert(token.clone(), values);
        }

        let storage = Arc::clone(&self.storage);
        let data_bucket = self.data_bucket.clone();
        tokio::task::spawn_blocking(move || {
            storage.update(&mut |txn| {
                for (url, encoded) in &encoded_sources {
                    txn.put(SOURCES_BUCKET, url.0.as_bytes(), encoded)?;
                }
                for (token, values) in &encoded_postings {
                    txn.set_add(&data_bucket, token.as_bytes(), values)?;
                }
                Ok(())
            })
        })
        .await
        .map_err(|e| EngineError::Join(e.to_string()))??;

        Ok(())
    }

    /// Answer a ranked keyword query (docs/ARCHITECTURE.md §4.3.2).
    ///
    /// `limit < 1` defaults to 10, `offset < 0` defaults to 0. An empty
    /// token sequence (e.g. punctuation-only `q`) returns an empty result
    /// rather than propagating a not-found error (a lookup failure on
    /// nothing-to-look-up reads worse to callers than an empty page).
    #[instrument(skip(self), fields(collection = %self.name))]
    pub async fn query(&self, q: &str, limit: i64, offset: i64) -> Result<Vec<ResponseData>, EngineError> {
        let limit = if limit < 1 { 10 } else { limit } as usize;
        let offset = if offset < 0 { 0 } else { offset } as usize;

        let mut seen = HashSet::new();
        let tokens: Vec<Token> = self
            .pipeline
            .run(q)
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();

        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let storage = Arc::clone(&self.storage);
        let data_bucket = self.data_bucket.clone();
        let mut rows = tokio::task::spawn_blocking(move || -> Result<Vec<ResponseData>, storage::StorageError> {
            let mut rows = Vec::new();
            storage.view(&mut |txn| {
                let mut hits: HashMap<Url, HashSet<usize>> = HashMap::new();
                for (idx, token) in tokens.iter().enumerate() {
                    let members = txn.set_members(&data_bucket, token.as_bytes())?;
                    for raw in members {
                        let posting = decode_posting(&raw)?;
                        hits.entry(posting.url).or_default().insert(idx);
                    }
                }

                let max_hits = hits.values().map(HashSet::len).max().unwrap_or(0);
                for (url, matched) in hits.iter().filter(|(_, matched)| matched.len() == max_hits) {
                    let raw = txn.get(SOURCES_BUCKET, url.0.as_bytes())?;
                    let source = decode_source(&raw)?;
                    rows.push(ResponseData {
                        source,
                        url: url.clone(),
                    });
                }
                Ok(())
            })?;
            Ok(rows)
        })
        .await
        .map_err(|e| EngineError::Join(e.to_string()))??;

        // Newest first; ties keep whatever order the hash map produced
        // (arbitrary but stable for a fixed process run, docs/ARCHITECTURE.md §4.3.2).
        rows.sort_by(|a, b| b.source.date.cmp(&a.source.date));

        let total = rows.len();
        let offset = if offset >= total { 0 } else { offset };
        let limit = limit.min(total - offset);
        Ok(rows[offset..offset + limit].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use storage::InMemoryStorage;

    fn date(offset_minutes: i64) -> DateTime<chrono::FixedOffset> {
        let base = DateTime::parse_from_rfc3339("2026-07-28T12:00:00+00:00").unwrap();
        base + Duration::minutes(offset_minutes)
    }

    fn raw(url: &str, data: &str, minutes: i64) -> RawData {
        RawData {
            source: crate::model::Source {
                date: date(minutes),
                title: format!("title-{url}"),
            },
            url: Url::from(url),
            data: data.to_string(),
        }
    }

    fn processor() -> Processor {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
        Processor::create(
            "testCollection",
            tokenizer::TEXT_TOKENIZER,
            vec!["stemm_lower".to_string()],
            storage,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn s1_single_document_positions() {
        let p = processor();
        p.insert(vec![raw("test", "data1 data2", 0)]).await.unwrap();

        let storage = Arc::clone(&p.storage);
        let mut members = Vec::new();
        storage
            .view(&mut |txn| {
                members = txn.set_members("d-testCollection", b"data1")?;
                Ok(())
            })
            .unwrap();
        assert_eq!(members.len(), 1);
        let posting = decode_posting(&members[0]).unwrap();
        assert_eq!(posting.url, Url::from("test"));
        assert_eq!(posting.pos, vec![0]);
    }

    #[tokio::test]
    async fn s2_multiple_documents_share_a_token() {
        let p = processor();
        p.insert(vec![
            raw("source1", "data1 data2 data2", 0),
            raw("source2", "data3 data2", 0),
        ])
        .await
        .unwrap();

        let mut members = Vec::new();
        p.storage
            .view(&mut |txn| {
                members = txn.set_members("d-testCollection", b"data2")?;
                Ok(())
            })
            .unwrap();
        assert_eq!(members.len(), 2);
        let postings: Vec<Posting> = members.iter().map(|m| decode_posting(m).unwrap()).collect();
        assert!(postings.contains(&Posting { url: Url::from("source1"), pos: vec![1, 2] }));
        assert!(postings.contains(&Posting { url: Url::from("source2"), pos: vec![1] }));
    }

    #[tokio::test]
    async fn s4_query_returns_all_matches_sorted_by_date_desc() {
        let p = processor();
        p.insert(vec![
            raw("source1", "data1 data2 data2", 0),
            raw("source2", "data3 data2", 5),
        ])
        .await
        .unwrap();

        let results = p.query("data2", 100, 0).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, Url::from("source2"));
        assert_eq!(results[1].url, Url::from("source1"));
    }

    #[tokio::test]
    async fn s5_scoring_keeps_only_max_hit_count() {
        let p = processor();
        p.insert(vec![
            raw("source1", "data1 data2 data2", 0),
            raw("source2", "data3 data2", 0),
        ])
        .await
        .unwrap();

        let results = p.query("data3 data2", 100, 0).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, Url::from("source2"));
    }

    #[tokio::test]
    async fn s6_pagination_with_offset() {
        let p = processor();
        p.insert(vec![
            raw("source1", "data2", -60),
            raw("source2", "data2", 0),
            raw("source3", "data2", -10),
        ])
        .await
        .unwrap();

        let results = p.query("data2", 1, 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, Url::from("source3"));
    }

    #[tokio::test]
    async fn empty_query_returns_empty_list() {
        let p = processor();
        p.insert(vec![raw("source1", "data1", 0)]).await.unwrap();
        let results = p.query("   ---   ", 10, 0).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let p = processor();
        p.insert(vec![]).await.unwrap();
    }

    #[tokio::test]
    async fn empty_data_still_writes_source() {
        let p = processor();
        p.insert(vec![raw("u1", "", 0)]).await.unwrap();
        let mut got = Vec::new();
        p.storage
            .view(&mut |txn| {
                got = txn.get("sources", b"u1")?;
                Ok(())
            })
            .unwrap();
        assert!(!got.is_empty());
    }

    #[tokio::test]
    async fn reingest_overwrites_source_and_appends_postings() {
        let p = processor();
        p.insert(vec![raw("source1", "data1", 0)]).await.unwrap();
        p.insert(vec![RawData {
            source: crate::model::Source {
                date: date(0),
                title: "T New".to_string(),
            },
            url: Url::from("source1"),
            data: "data1".to_string(),
        }])
        .await
        .unwrap();

        let mut got = Vec::new();
        p.storage
            .view(&mut |txn| {
                got = txn.get("sources", b"source1")?;
                Ok(())
            })
            .unwrap();
        let source = decode_source(&got).unwrap();
        assert_eq!(source.title, "T New");

        let mut members = Vec::new();
        p.storage
            .view(&mut |txn| {
                members = txn.set_members("d-testCollection", b"data1")?;
                Ok(())
            })
            .unwrap();
        assert_eq!(members.len(), 2);
    }
}
