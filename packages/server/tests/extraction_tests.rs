//! Extraction workflow tests against in-memory dependencies.

use std::sync::Arc;

use serde_json::json;
use server_core::domains::comments::{extract, NewComment};
use server_core::domains::stories::NewStory;
use server_core::error::AppError;
use server_core::kernel::JobStore;
use server_core::testing::{test_deps, MemoryJobStore, MockAi, MockHnClient};

fn valid_posting_json() -> String {
    json!({
        "company": "Acme",
        "description": "Road-runner catching equipment",
        "positions": ["Rust Engineer", "SRE"],
        "location": "Remote",
        "stack": ["Rust", "Postgres"],
        "email": "jane@acme.com",
        "remote_friendly": true
    })
    .to_string()
}

async fn seed_comment(store: &MemoryJobStore, hn_id: i64, text: &str) {
    let story = store
        .upsert_story(NewStory {
            hn_id: 40_000_001,
            title: Some("Ask HN: Who is hiring?".to_string()),
            kids_count: 1,
            descendants_count: 1,
            score: 100,
            month: "2025-09".to_string(),
            created_time: None,
        })
        .await
        .unwrap();

    store
        .insert_comments(vec![NewComment {
            hn_id,
            story_id: story.id,
            story_text: Some(text.to_string()),
            created_time: None,
            fetched_time: None,
        }])
        .await
        .unwrap();
}

#[tokio::test]
async fn successful_extraction_completes_comment_with_payload_and_email() {
    let store = Arc::new(MemoryJobStore::new());
    seed_comment(&store, 101, "Acme | Rust Engineer | Remote").await;
    let ai = Arc::new(MockAi::new().with_response(valid_posting_json()));
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), ai);

    let result = extract::process_single(&deps, 101).await.unwrap();
    assert!(result.success);
    assert!(result.database_updated);
    assert_eq!(result.extracted_data.unwrap().company, "Acme");

    let comment = &store.comments()[0];
    assert_eq!(comment.processed_status, "completed");
    assert!(comment.structured_data.is_some());
    assert_eq!(comment.email.as_deref(), Some("jane@acme.com"));
}

#[tokio::test]
async fn invalid_json_marks_comment_error_with_null_payload() {
    let store = Arc::new(MemoryJobStore::new());
    seed_comment(&store, 101, "Acme | Rust Engineer").await;
    let ai = Arc::new(MockAi::new().with_response("sorry, I can't find a posting"));
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), ai);

    let result = extract::process_single(&deps, 101).await.unwrap();
    assert!(result.extracted_data.is_none());

    let comment = &store.comments()[0];
    assert_eq!(comment.processed_status, "error");
    assert!(comment.structured_data.is_none());
    assert!(comment.email.is_none());
}

#[tokio::test]
async fn llm_failure_marks_comment_error() {
    let store = Arc::new(MemoryJobStore::new());
    seed_comment(&store, 101, "Acme | Rust Engineer").await;
    // No responses configured: every call fails.
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), Arc::new(MockAi::new()));

    extract::process_single(&deps, 101).await.unwrap();

    let comment = &store.comments()[0];
    assert_eq!(comment.processed_status, "error");
    assert!(comment.structured_data.is_none());
}

#[tokio::test]
async fn unknown_hn_id_is_not_found_and_writes_nothing() {
    let store = Arc::new(MemoryJobStore::new());
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), Arc::new(MockAi::new()));

    let err = extract::process_single(&deps, 999).await.unwrap_err();
    match err {
        AppError::NotFound(message) => {
            assert_eq!(message, "No comment found with HN ID 999");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(store.update_calls(), 0);
}

#[tokio::test]
async fn entities_are_normalized_before_the_model_call() {
    let store = Arc::new(MemoryJobStore::new());
    seed_comment(&store, 101, "Apply at example.com&#x2F;test&amp;path").await;
    let ai = Arc::new(MockAi::new().with_response(valid_posting_json()));
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), ai.clone());

    extract::process_single(&deps, 101).await.unwrap();

    let prompts = ai.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("example.com/test&path"));
    assert!(!prompts[0].contains("&#x2F;"));
}

#[tokio::test]
async fn bulk_run_counts_attempts_successes_and_failures() {
    let store = Arc::new(MemoryJobStore::new());
    seed_comment(&store, 101, "Acme | Rust Engineer").await;
    store
        .insert_comments(vec![NewComment {
            hn_id: 102,
            story_id: 1,
            story_text: Some("BetaCorp | Go Engineer".to_string()),
            created_time: None,
            fetched_time: None,
        }])
        .await
        .unwrap();

    let ai = Arc::new(MockAi::new());
    ai.push_response(valid_posting_json());
    ai.push_response("not json at all");
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), ai);

    let summary = extract::process_pending(&deps).await.unwrap();
    assert_eq!(summary.processed_count, 2);
    assert_eq!(summary.successful_count, 1);
    assert_eq!(summary.failed_count, 1);
    assert!(summary.errors.is_empty());

    // Status and payload always move together: completed comments carry a
    // payload, errored comments carry none.
    for comment in store.comments() {
        match comment.processed_status.as_str() {
            "completed" => assert!(comment.structured_data.is_some()),
            "error" => {
                assert!(comment.structured_data.is_none());
                assert!(comment.email.is_none());
            }
            other => panic!("unexpected status after bulk run: {other}"),
        }
    }
}

#[tokio::test]
async fn bulk_run_only_touches_pending_comments() {
    let store = Arc::new(MemoryJobStore::new());
    seed_comment(&store, 101, "Acme | Rust Engineer").await;
    let ai = Arc::new(MockAi::new().with_response(valid_posting_json()));
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), ai);

    let first = extract::process_pending(&deps).await.unwrap();
    assert_eq!(first.processed_count, 1);

    // Comment is now completed; a second bulk run finds nothing to do.
    let second = extract::process_pending(&deps).await.unwrap();
    assert_eq!(second.processed_count, 0);
}

#[tokio::test]
async fn persistence_failure_falls_back_to_error_write() {
    let store = Arc::new(MemoryJobStore::new());
    seed_comment(&store, 101, "Acme | Rust Engineer").await;
    let ai = Arc::new(MockAi::new().with_response(valid_posting_json()));
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), ai);

    // First write (completed + payload) fails; the fallback error write
    // must still land.
    store.fail_next_updates(1);

    let summary = extract::process_pending(&deps).await.unwrap();
    assert_eq!(summary.processed_count, 1);
    assert_eq!(summary.failed_count, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(store.update_calls(), 2);

    let comment = &store.comments()[0];
    assert_eq!(comment.processed_status, "error");
    assert!(comment.structured_data.is_none());
}

#[tokio::test]
async fn completed_jobs_are_queryable_by_month() {
    use server_core::domains::jobs;

    let store = Arc::new(MemoryJobStore::new());
    seed_comment(&store, 101, "Acme | Rust Engineer").await;
    let ai = Arc::new(MockAi::new().with_response(valid_posting_json()));
    let deps = test_deps(store.clone(), Arc::new(MockHnClient::new()), ai);

    extract::process_pending(&deps).await.unwrap();

    let jobs = jobs::completed_jobs(&deps, "2025-09").await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].hn_id, 101);

    let other = jobs::completed_jobs(&deps, "2025-10").await.unwrap();
    assert!(other.is_empty());
}
