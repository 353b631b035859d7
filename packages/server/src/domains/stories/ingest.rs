//! Ingestion workflow: fetch a hiring thread and persist its comments.

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::domains::comments::NewComment;
use crate::domains::stories::NewStory;
use crate::error::AppError;
use crate::kernel::ServerDeps;

/// Summary returned by a hiring-thread ingestion run.
#[derive(Debug, Serialize)]
pub struct IngestSummary {
    pub story_id: i64,
    pub story_db_id: i64,
    pub story_saved: bool,
    pub comments_fetched: usize,
    pub comments_saved: u64,
    pub errors: Vec<String>,
}

/// Full pipeline from an HN story ID to stored pending job postings.
///
/// A story fetch failure aborts the run. Later failures keep their own
/// error kind so callers can tell API, validation, and storage problems
/// apart. The steps are not transactional: a persisted story survives a
/// later comment-persistence failure.
pub async fn process_hiring_thread(
    deps: &ServerDeps,
    story_id: i64,
) -> Result<IngestSummary, AppError> {
    info!(story_id, "starting hiring thread ingestion");

    let story = deps.hn.fetch_story(story_id).await?;
    if story.item_type != "story" {
        return Err(AppError::Validation(format!(
            "item {} is a {}, not a story",
            story_id, story.item_type
        )));
    }

    let saved = deps
        .store
        .upsert_story(NewStory::from_hn(&story, &deps.newsletter_month))
        .await?;
    info!(story_db_id = saved.id, hn_id = saved.hn_id, "story persisted");

    let raw_comments = deps.hn.fetch_comments_batch(&story.kids).await;
    let fetched_time = Utc::now();
    let rows: Vec<NewComment> = raw_comments
        .iter()
        .map(|c| NewComment::from_hn(c, saved.id, fetched_time))
        .collect();
    let comments_fetched = rows.len();

    let comments_saved = deps.store.insert_comments(rows).await?;
    info!(comments_fetched, comments_saved, "hiring thread ingestion finished");

    Ok(IngestSummary {
        story_id,
        story_db_id: saved.id,
        story_saved: true,
        comments_fetched,
        comments_saved,
        errors: Vec::new(),
    })
}
