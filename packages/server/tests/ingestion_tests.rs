//! Ingestion workflow tests against in-memory dependencies.

use std::sync::Arc;

use hn_client::{HnComment, HnStory};
use server_core::domains::stories::ingest;
use server_core::error::AppError;
use server_core::kernel::JobStore;
use server_core::testing::{test_deps, MemoryJobStore, MockAi, MockHnClient};

fn hiring_story(id: i64, kids: Vec<i64>) -> HnStory {
    HnStory {
        id,
        item_type: "story".to_string(),
        title: Some("Ask HN: Who is hiring? (September 2025)".to_string()),
        kids,
        descendants: 3,
        score: 120,
        time: Some(1_725_000_000),
        by: Some("whoishiring".to_string()),
        deleted: false,
    }
}

fn posting_comment(id: i64, deleted: bool) -> HnComment {
    HnComment {
        id,
        item_type: "comment".to_string(),
        text: Some(format!("Acme | Rust Engineer | Remote | posting {id}")),
        parent: Some(40_000_001),
        time: Some(1_725_000_100),
        by: Some("acme".to_string()),
        deleted,
        kids: Vec::new(),
    }
}

#[tokio::test]
async fn ingest_skips_deleted_comments() {
    let store = Arc::new(MemoryJobStore::new());
    let hn = Arc::new(
        MockHnClient::new()
            .with_story(hiring_story(40_000_001, vec![1, 2, 3]))
            .with_comment(posting_comment(1, false))
            .with_comment(posting_comment(2, true))
            .with_comment(posting_comment(3, false)),
    );
    let deps = test_deps(store.clone(), hn, Arc::new(MockAi::new()));

    let summary = ingest::process_hiring_thread(&deps, 40_000_001)
        .await
        .unwrap();

    assert!(summary.story_saved);
    assert_eq!(summary.comments_fetched, 2);
    assert_eq!(summary.comments_saved, 2);

    let comments = store.comments();
    assert_eq!(comments.len(), 2);
    assert!(comments.iter().all(|c| c.hn_id != 2), "deleted item persisted");
    assert!(comments.iter().all(|c| c.processed_status == "pending"));
}

#[tokio::test]
async fn ingest_is_idempotent() {
    let store = Arc::new(MemoryJobStore::new());
    let hn = Arc::new(
        MockHnClient::new()
            .with_story(hiring_story(40_000_001, vec![1, 3]))
            .with_comment(posting_comment(1, false))
            .with_comment(posting_comment(3, false)),
    );
    let deps = test_deps(store.clone(), hn, Arc::new(MockAi::new()));

    let first = ingest::process_hiring_thread(&deps, 40_000_001).await.unwrap();
    let second = ingest::process_hiring_thread(&deps, 40_000_001).await.unwrap();

    // Same underlying story row both times, no duplicates anywhere.
    assert_eq!(first.story_db_id, second.story_db_id);
    assert_eq!(second.comments_fetched, 2);
    assert_eq!(second.comments_saved, 0);
    assert_eq!(store.stories().len(), 1);
    assert_eq!(store.comments().len(), 2);
}

#[tokio::test]
async fn duplicate_comment_in_batch_is_skipped_without_error() {
    let store = Arc::new(MemoryJobStore::new());
    let hn = Arc::new(
        MockHnClient::new()
            .with_story(hiring_story(40_000_001, vec![1]))
            .with_comment(posting_comment(1, false)),
    );
    let deps = test_deps(store.clone(), hn.clone(), Arc::new(MockAi::new()));
    ingest::process_hiring_thread(&deps, 40_000_001).await.unwrap();

    // A second thread listing an already-persisted comment plus a new one.
    let hn = Arc::new(
        MockHnClient::new()
            .with_story(hiring_story(40_000_002, vec![1, 4]))
            .with_comment(posting_comment(1, false))
            .with_comment(posting_comment(4, false)),
    );
    let deps = test_deps(store.clone(), hn, Arc::new(MockAi::new()));

    let summary = ingest::process_hiring_thread(&deps, 40_000_002).await.unwrap();
    assert_eq!(summary.comments_fetched, 2);
    assert_eq!(summary.comments_saved, 1);
    assert_eq!(store.comments().len(), 3);
}

#[tokio::test]
async fn missing_story_aborts_with_api_error() {
    let store = Arc::new(MemoryJobStore::new());
    let deps = test_deps(
        store.clone(),
        Arc::new(MockHnClient::new()),
        Arc::new(MockAi::new()),
    );

    let err = ingest::process_hiring_thread(&deps, 40_000_001)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Api(_)));
    assert!(store.stories().is_empty());
    assert!(store.comments().is_empty());
}

#[tokio::test]
async fn non_story_item_fails_validation() {
    let mut story = hiring_story(99, vec![]);
    story.item_type = "job".to_string();

    let store = Arc::new(MemoryJobStore::new());
    let deps = test_deps(
        store.clone(),
        Arc::new(MockHnClient::new().with_story(story)),
        Arc::new(MockAi::new()),
    );

    let err = ingest::process_hiring_thread(&deps, 99).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(store.stories().is_empty());
}

#[tokio::test]
async fn month_bucket_comes_from_configuration() {
    let store = Arc::new(MemoryJobStore::new());
    let hn = Arc::new(MockHnClient::new().with_story(hiring_story(40_000_001, vec![])));
    // test_deps fixes the configured month at 2025-09; the story's own
    // timestamp (September 2024 epoch or otherwise) must not matter.
    let deps = test_deps(store.clone(), hn, Arc::new(MockAi::new()));

    ingest::process_hiring_thread(&deps, 40_000_001).await.unwrap();
    assert_eq!(store.stories()[0].month, "2025-09");

    let story = store.get_story(40_000_001).await.unwrap().unwrap();
    assert_eq!(story.month, "2025-09");
}
