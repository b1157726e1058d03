//! Indexing, persistence and retrieval against the hashing embedder.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{FlakyEmbedder, HashEmbedder, campus_corpus, document};
use kiosk_rag::{
    EmbeddingProvider, FixedSizeChunker, Indexer, RagError, Retriever, StorePaths, TaskType,
    VectorStore,
};
use proptest::prelude::*;

fn indexer(chunk_size: usize) -> Indexer {
    Indexer::new(Arc::new(FixedSizeChunker::new(chunk_size)), Arc::new(HashEmbedder))
}

fn retriever(store: VectorStore) -> Retriever {
    Retriever::new(Arc::new(store), Arc::new(HashEmbedder))
}

#[tokio::test]
async fn rector_query_ranks_matching_document_first() {
    let store = indexer(1000).build(campus_corpus()).await.unwrap();
    let results = retriever(store).search_documents("who is the rector", 2).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "doc_a");
    assert!(results[0].score < results[1].score);
}

#[tokio::test]
async fn store_aligns_vectors_with_chunk_records() {
    let documents = vec![
        document("long.txt", &"abcdefghij".repeat(25)),
        document("short.txt", "tiny"),
    ];
    let store = indexer(100).build(documents).await.unwrap();

    assert_eq!(store.len(), 4);
    assert_eq!(store.index().len(), store.chunks().len());
    assert_eq!(store.documents()[0].chunk_count, 3);
    assert_eq!(store.documents()[1].chunk_count, 1);

    let positions: Vec<(usize, usize)> =
        store.chunks().iter().map(|c| (c.doc_idx, c.chunk_idx)).collect();
    assert_eq!(positions, vec![(0, 0), (0, 1), (0, 2), (1, 0)]);
}

#[tokio::test]
async fn results_are_ordered_and_bounded() {
    let documents = vec![
        document("a", "library opening hours are eight to five"),
        document("b", "the library closes on public holidays"),
        document("c", "parking permits are issued at the front desk"),
    ];
    let retriever = retriever(indexer(1000).build(documents).await.unwrap());

    let results = retriever.search_documents("library hours", 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.windows(2).all(|w| w[0].score <= w[1].score));

    let all = retriever.search_documents("library hours", 10).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].score <= w[1].score));

    let unbounded = retriever.search_documents("library hours", usize::MAX).await.unwrap();
    assert_eq!(unbounded, all);
}

#[tokio::test]
async fn save_then_load_returns_identical_results() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("stores/vector_store");

    let store = indexer(20).build(campus_corpus()).await.unwrap();
    let paths = store.save(&prefix).unwrap();
    assert_eq!(paths, StorePaths::from_prefix(&prefix));
    assert!(paths.index.is_file());
    assert!(paths.metadata.is_file());

    let before = retriever(store.clone()).search_documents("who is the rector", 3).await.unwrap();
    let loaded = VectorStore::load(&prefix).unwrap();
    assert_eq!(loaded, store);

    let after = retriever(loaded).search_documents("who is the rector", 3).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn load_without_index_artifact_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("vector_store");

    let store = indexer(1000).build(campus_corpus()).await.unwrap();
    let paths = store.save(&prefix).unwrap();
    std::fs::remove_file(&paths.index).unwrap();

    match VectorStore::load(&prefix) {
        Err(RagError::StoreNotFound { path }) => assert_eq!(path, paths.index),
        other => panic!("expected StoreNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_chunks_are_skipped_but_still_counted() {
    let text = format!("{}{}{}", "a".repeat(10), "FAIL".repeat(2) + "bb", "c".repeat(10));
    let indexer = Indexer::new(
        Arc::new(FixedSizeChunker::new(10)),
        Arc::new(FlakyEmbedder { marker: "FAIL" }),
    );

    let store = indexer.build(vec![document("flaky.txt", &text)]).await.unwrap();

    assert_eq!(store.documents()[0].chunk_count, 3);
    assert_eq!(store.len(), 2);
    let indices: Vec<usize> = store.chunks().iter().map(|c| c.chunk_idx).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[tokio::test]
async fn nothing_embedded_is_a_pipeline_error() {
    let empty = indexer(1000).build(Vec::new()).await;
    assert!(matches!(empty, Err(RagError::PipelineError(_))));

    let flaky = Indexer::new(
        Arc::new(FixedSizeChunker::new(1000)),
        Arc::new(FlakyEmbedder { marker: "FAIL" }),
    );
    let all_failed = flaky.build(vec![document("x.txt", "FAIL")]).await;
    assert!(matches!(all_failed, Err(RagError::PipelineError(_))));
}

/// Declares fewer dimensions than [`HashEmbedder`] actually produces.
struct MisreportingEmbedder;

#[async_trait]
impl EmbeddingProvider for MisreportingEmbedder {
    async fn embed(&self, text: &str, task_type: TaskType) -> kiosk_rag::Result<Vec<f32>> {
        HashEmbedder.embed(text, task_type).await
    }

    fn dimensions(&self) -> usize {
        8
    }
}

#[tokio::test]
async fn embeddings_of_the_wrong_dimension_are_skipped() {
    let misreporting =
        Indexer::new(Arc::new(FixedSizeChunker::default()), Arc::new(MisreportingEmbedder));
    let result = misreporting.build(campus_corpus()).await;
    assert!(matches!(result, Err(RagError::PipelineError(_))));

    let store = indexer(1000).build(campus_corpus()).await.unwrap();
    assert_eq!(store.index().dimension(), common::DIM);
}

#[tokio::test]
async fn builds_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.md"), "# Rector\nThe rector is Professor Rahman.").unwrap();
    std::fs::write(dir.path().join("menu.txt"), "Lunch is served at noon.").unwrap();
    std::fs::write(dir.path().join("ignored.csv"), "a,b").unwrap();

    let store = indexer(1000).build_from_dir(dir.path()).await.unwrap();
    let ids: Vec<&str> = store.documents().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["menu.txt", "notes.md"]);

    let results = retriever(store).search_documents("rector", 1).await.unwrap();
    assert_eq!(results[0].id, "notes.md");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn search_is_sorted_and_at_most_top_k(
        texts in proptest::collection::vec("[a-z]{2,6}( [a-z]{2,6}){0,8}", 1..12),
        query in "[a-z]{2,6}( [a-z]{2,6}){0,3}",
        top_k in 1usize..16,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let results = rt.block_on(async {
            let documents = texts
                .iter()
                .enumerate()
                .map(|(i, text)| document(&format!("doc_{i}"), text))
                .collect();
            let store = indexer(1000).build(documents).await.unwrap();
            retriever(store).search_documents(&query, top_k).await.unwrap()
        });

        prop_assert_eq!(results.len(), top_k.min(texts.len()));
        prop_assert!(results.windows(2).all(|w| w[0].score <= w[1].score));
    }
}
