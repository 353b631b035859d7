//! Keyed record store for stories and comments.
//!
//! The trait is the storage seam the workflows depend on; `PgJobStore`
//! is the production implementation over Postgres. An in-memory
//! implementation for tests lives in `crate::testing`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domains::comments::{Comment, JobPosting, NewComment, ProcessedStatus};
use crate::domains::stories::{NewStory, Story};
use crate::error::AppError;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Idempotent create: a story whose HN ID exists is returned unchanged.
    async fn upsert_story(&self, story: NewStory) -> Result<Story, AppError>;

    async fn get_story(&self, hn_id: i64) -> Result<Option<Story>, AppError>;

    /// Conflict-tolerant single insert: a duplicate HN ID is a no-op that
    /// returns the existing record.
    async fn upsert_comment(&self, comment: NewComment) -> Result<Comment, AppError>;

    /// Bulk insert; comments whose HN ID already exists are silently
    /// skipped. Returns the number of rows actually inserted.
    async fn insert_comments(&self, comments: Vec<NewComment>) -> Result<u64, AppError>;

    async fn comments_by_status(
        &self,
        status: ProcessedStatus,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError>;

    async fn comments_for_story(&self, story_id: i64) -> Result<Vec<Comment>, AppError>;

    async fn comments_by_hn_id(&self, hn_id: i64) -> Result<Vec<Comment>, AppError>;

    /// Completed comments for the story in the given month bucket.
    async fn completed_for_month(&self, month: &str) -> Result<Vec<Comment>, AppError>;

    /// Set status and payload by HN ID. `None` clears both the payload
    /// and the denormalized email. Returns whether a row matched.
    async fn update_comment(
        &self,
        hn_id: i64,
        status: ProcessedStatus,
        data: Option<JobPosting>,
    ) -> Result<bool, AppError>;
}

/// PostgreSQL-backed store.
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn upsert_story(&self, story: NewStory) -> Result<Story, AppError> {
        Ok(Story::upsert(&self.pool, &story).await?)
    }

    async fn get_story(&self, hn_id: i64) -> Result<Option<Story>, AppError> {
        Ok(Story::find_by_hn_id(&self.pool, hn_id).await?)
    }

    async fn upsert_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        Ok(Comment::upsert(&self.pool, &comment).await?)
    }

    async fn insert_comments(&self, comments: Vec<NewComment>) -> Result<u64, AppError> {
        Ok(Comment::insert_batch(&self.pool, &comments).await?)
    }

    async fn comments_by_status(
        &self,
        status: ProcessedStatus,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError> {
        Ok(Comment::find_by_status(&self.pool, status, limit).await?)
    }

    async fn comments_for_story(&self, story_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(Comment::find_by_story(&self.pool, story_id).await?)
    }

    async fn comments_by_hn_id(&self, hn_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(Comment::find_by_hn_id(&self.pool, hn_id).await?)
    }

    async fn completed_for_month(&self, month: &str) -> Result<Vec<Comment>, AppError> {
        let Some(story) = Story::find_by_month(&self.pool, month).await? else {
            return Ok(Vec::new());
        };
        Ok(Comment::find_completed_for_story(&self.pool, story.id).await?)
    }

    async fn update_comment(
        &self,
        hn_id: i64,
        status: ProcessedStatus,
        data: Option<JobPosting>,
    ) -> Result<bool, AppError> {
        Ok(Comment::update_status(&self.pool, hn_id, status, data.as_ref()).await?)
    }
}
