//! Ingestion and extraction endpoints.
//!
//! Workflow failures are converted to a uniform `{success: false, error}`
//! body rather than a protocol-level error status; callers inspect the
//! body to detect failure.

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::comments::extract;
use crate::domains::jobs;
use crate::domains::stories::ingest;
use crate::server::app::AppState;

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "HN Newsletter API is running!" }))
}

/// Run the complete ingestion workflow for one hiring thread.
pub async fn process_hiring_thread_handler(
    Extension(state): Extension<AppState>,
    Path(story_id): Path<i64>,
) -> Json<Value> {
    match ingest::process_hiring_thread(&state.deps, story_id).await {
        Ok(summary) => Json(json!({
            "success": true,
            "message": format!("Processed hiring thread {story_id}"),
            "data": summary,
        })),
        Err(e) => Json(json!({
            "success": false,
            "error": e.to_string(),
            "story_id": story_id,
        })),
    }
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub month: Option<String>,
}

/// Completed extractions for a month bucket.
pub async fn jobs_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<JobsQuery>,
) -> Json<Value> {
    let month = match jobs::resolve_month(query.month.as_deref()) {
        Ok(month) => month,
        Err(e) => return Json(json!({ "success": false, "error": e.to_string() })),
    };

    match jobs::completed_jobs(&state.deps, &month).await {
        Ok(jobs) => Json(json!({
            "success": true,
            "data": jobs,
            "count": jobs.len(),
            "month": month,
        })),
        Err(e) => Json(json!({ "success": false, "error": e.to_string() })),
    }
}

/// Bulk LLM extraction of all pending comments.
pub async fn process_comments_handler(Extension(state): Extension<AppState>) -> Json<Value> {
    match extract::process_pending(&state.deps).await {
        Ok(summary) => Json(json!({
            "success": true,
            "message": "Processed all pending comments",
            "data": summary,
        })),
        Err(e) => Json(json!({ "success": false, "error": e.to_string() })),
    }
}

/// Extract a specific comment by HN ID.
pub async fn process_comment_handler(
    Extension(state): Extension<AppState>,
    Path(hn_id): Path<i64>,
) -> Json<Value> {
    match extract::process_single(&state.deps, hn_id).await {
        Ok(result) => Json(json!({
            "success": true,
            "message": format!("Processed comment {hn_id}"),
            "data": result,
        })),
        Err(e) => Json(json!({
            "success": false,
            "error": e.to_string(),
            "hn_id": hn_id,
        })),
    }
}
