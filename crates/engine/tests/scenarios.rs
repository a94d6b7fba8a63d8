//! End-to-end scenarios against a `Manager`-owned collection, covering
//! cross-module behavior (docs/ARCHITECTURE.md §8) that unit tests inside
//! the processor module don't already exercise.

use std::sync::Arc;

use chrono::DateTime;
use engine::{Manager, RawData, Source, Url};
use storage::{InMemoryStorage, Storage};

fn doc(url: &str, title: &str, data: &str) -> RawData {
    RawData {
        source: Source {
            date: DateTime::parse_from_rfc3339("2026-07-28T09:00:00+00:00").unwrap(),
            title: title.to_string(),
        },
        url: Url::from(url),
        data: data.to_string(),
    }
}

#[tokio::test]
async fn s3_reingest_with_a_changed_pipeline_overwrites_source_and_adds_postings() {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let manager = Manager::load(Arc::clone(&storage)).unwrap();
    let processor = manager
        .init_new_proc("testCollection", tokenizer::TEXT_TOKENIZER, vec!["stemm_lower".to_string()])
        .unwrap();
    manager.add_processor(processor);

    manager
        .get_processor("testCollection")
        .unwrap()
        .insert(vec![doc("source1", "t", "data1 data2 data2")])
        .await
        .unwrap();

    // Re-create the collection (as if it were configured fresh) with
    // StopWords added ahead of the stemmer so "a" is dropped.
    let with_stopwords = Arc::new(
        engine::Processor::attach(
            "testCollection",
            tokenizer::TEXT_TOKENIZER,
            vec!["stopwords".to_string(), "stemm_lower".to_string()],
            storage,
        )
        .unwrap(),
    );
    with_stopwords
        .insert(vec![doc("source1", "T New", "a Data5")])
        .await
        .unwrap();

    let processor = manager.get_processor("testCollection").unwrap();
    let results = processor.query("data5", 10, 0).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source.title, "T New");
}

#[tokio::test]
async fn manager_routes_insert_and_query_by_collection_name() {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let manager = Manager::load(storage).unwrap();

    let articles = manager
        .init_new_proc("articles", tokenizer::TEXT_TOKENIZER, vec!["stemm_lower".to_string()])
        .unwrap();
    manager.add_processor(articles);

    manager
        .get_processor("articles")
        .unwrap()
        .insert(vec![doc("a1", "First", "running dogs")])
        .await
        .unwrap();

    let results = manager
        .get_processor("articles")
        .unwrap()
        .query("dog", 10, 0)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, Url::from("a1"));

    assert!(manager.get_processor("not-a-collection").is_err());
}

#[tokio::test]
async fn query_is_idempotent() {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let manager = Manager::load(storage).unwrap();
    let processor = manager
        .init_new_proc("articles", tokenizer::TEXT_TOKENIZER, vec![])
        .unwrap();
    manager.add_processor(processor);
    let processor = manager.get_processor("articles").unwrap();
    processor
        .insert(vec![doc("a1", "First", "alpha beta")])
        .await
        .unwrap();

    let first = processor.query("alpha", 10, 0).await.unwrap();
    let second = processor.query("alpha", 10, 0).await.unwrap();
    assert_eq!(first, second);
}
