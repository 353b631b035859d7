use chrono::{DateTime, Utc};
use hn_client::HnComment;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

/// Processing lifecycle of a comment. Stored as text; transitions from
/// `pending` exactly once per extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessedStatus {
    Pending,
    Completed,
    Error,
}

impl ProcessedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessedStatus::Pending => "pending",
            ProcessedStatus::Completed => "completed",
            ProcessedStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ProcessedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured job posting extracted from a comment by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub company: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub application_url: Option<String>,
    #[serde(default)]
    pub remote_friendly: Option<bool>,
    #[serde(default)]
    pub employment_type: Option<String>,
}

impl JobPosting {
    /// A posting without a company and at least one position is not useful.
    pub fn is_useful(&self) -> bool {
        !self.company.trim().is_empty() && !self.positions.is_empty()
    }
}

/// A job posting comment under a hiring thread.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub hn_id: i64,
    /// Internal ID of the parent story.
    pub story_id: i64,
    /// Raw comment body, HTML-entity-escaped as HN serves it.
    pub story_text: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub fetched_time: Option<DateTime<Utc>>,
    /// 'pending', 'completed', 'error'
    pub processed_status: String,
    pub structured_data: Option<serde_json::Value>,
    /// Contact email denormalized from the structured payload.
    pub email: Option<String>,
}

/// Insertable comment row, converted from the HN API payload.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub hn_id: i64,
    pub story_id: i64,
    pub story_text: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub fetched_time: Option<DateTime<Utc>>,
}

impl NewComment {
    pub fn from_hn(comment: &HnComment, story_id: i64, fetched_time: DateTime<Utc>) -> Self {
        Self {
            hn_id: comment.id,
            story_id,
            story_text: comment.text.clone(),
            created_time: comment.time.and_then(|t| DateTime::from_timestamp(t, 0)),
            fetched_time: Some(fetched_time),
        }
    }
}

impl Comment {
    /// Bulk insert; rows whose hn_id already exists are silently skipped.
    /// Returns the number of rows actually inserted.
    pub async fn insert_batch(pool: &PgPool, comments: &[NewComment]) -> sqlx::Result<u64> {
        if comments.is_empty() {
            tracing::info!("no comments to insert");
            return Ok(0);
        }

        let mut inserted = 0;
        for comment in comments {
            let result = sqlx::query(
                "INSERT INTO comments (hn_id, story_id, story_text, created_time, fetched_time, processed_status)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (hn_id) DO NOTHING",
            )
            .bind(comment.hn_id)
            .bind(comment.story_id)
            .bind(&comment.story_text)
            .bind(comment.created_time)
            .bind(comment.fetched_time)
            .bind(ProcessedStatus::Pending.as_str())
            .execute(pool)
            .await?;

            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// Conflict-tolerant single insert: inserting an existing hn_id is a
    /// no-op that returns the row already there.
    pub async fn upsert(pool: &PgPool, comment: &NewComment) -> sqlx::Result<Comment> {
        let inserted = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (hn_id, story_id, story_text, created_time, fetched_time, processed_status)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (hn_id) DO NOTHING
             RETURNING *",
        )
        .bind(comment.hn_id)
        .bind(comment.story_id)
        .bind(&comment.story_text)
        .bind(comment.created_time)
        .bind(comment.fetched_time)
        .bind(ProcessedStatus::Pending.as_str())
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(row) => Ok(row),
            None => sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE hn_id = $1")
                .bind(comment.hn_id)
                .fetch_one(pool)
                .await,
        }
    }

    pub async fn find_by_status(
        pool: &PgPool,
        status: ProcessedStatus,
        limit: i64,
    ) -> sqlx::Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE processed_status = $1 ORDER BY id LIMIT $2",
        )
        .bind(status.as_str())
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_story(pool: &PgPool, story_id: i64) -> sqlx::Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE story_id = $1")
            .bind(story_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_hn_id(pool: &PgPool, hn_id: i64) -> sqlx::Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE hn_id = $1")
            .bind(hn_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_completed_for_story(pool: &PgPool, story_id: i64) -> sqlx::Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE story_id = $1 AND processed_status = 'completed'",
        )
        .bind(story_id)
        .fetch_all(pool)
        .await
    }

    /// Set status and payload by hn_id. A null payload explicitly clears
    /// both `structured_data` and the denormalized `email`.
    pub async fn update_status(
        pool: &PgPool,
        hn_id: i64,
        status: ProcessedStatus,
        data: Option<&JobPosting>,
    ) -> sqlx::Result<bool> {
        let email = data.and_then(|d| d.email.clone());

        let result = sqlx::query(
            "UPDATE comments SET processed_status = $1, structured_data = $2, email = $3 WHERE hn_id = $4",
        )
        .bind(status.as_str())
        .bind(data.map(Json))
        .bind(email)
        .bind(hn_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
