use chrono::{DateTime, Utc};
use hn_client::HnStory;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A "Who is hiring" thread tracked for one newsletter month.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Story {
    pub id: i64,
    pub hn_id: i64,
    pub title: Option<String>,
    pub kids_count: i32,
    pub descendants_count: i32,
    pub score: i32,
    /// Month bucket, e.g. "2025-09", used for newsletter grouping.
    pub month: String,
    pub created_time: Option<DateTime<Utc>>,
}

/// Insertable story row, converted from the HN API payload.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub hn_id: i64,
    pub title: Option<String>,
    pub kids_count: i32,
    pub descendants_count: i32,
    pub score: i32,
    pub month: String,
    pub created_time: Option<DateTime<Utc>>,
}

impl NewStory {
    /// Build a storage row from an HN story. The month bucket comes from
    /// the configured newsletter month, not the story's own timestamp.
    pub fn from_hn(story: &HnStory, month: &str) -> Self {
        Self {
            hn_id: story.id,
            title: story.title.clone(),
            kids_count: story.kids.len() as i32,
            descendants_count: story.descendants as i32,
            score: story.score as i32,
            month: month.to_string(),
            created_time: story.time.and_then(|t| DateTime::from_timestamp(t, 0)),
        }
    }
}

impl Story {
    pub async fn find_by_hn_id(pool: &PgPool, hn_id: i64) -> sqlx::Result<Option<Story>> {
        sqlx::query_as::<_, Story>("SELECT * FROM stories WHERE hn_id = $1")
            .bind(hn_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_month(pool: &PgPool, month: &str) -> sqlx::Result<Option<Story>> {
        sqlx::query_as::<_, Story>("SELECT * FROM stories WHERE month = $1")
            .bind(month)
            .fetch_optional(pool)
            .await
    }

    /// Idempotent create: a story whose hn_id already exists is returned
    /// unchanged, with no new row.
    pub async fn upsert(pool: &PgPool, story: &NewStory) -> sqlx::Result<Story> {
        if let Some(existing) = Self::find_by_hn_id(pool, story.hn_id).await? {
            tracing::info!(hn_id = story.hn_id, "story already exists, returning existing record");
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, Story>(
            "INSERT INTO stories (hn_id, title, kids_count, descendants_count, score, month, created_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (hn_id) DO NOTHING
             RETURNING *",
        )
        .bind(story.hn_id)
        .bind(&story.title)
        .bind(story.kids_count)
        .bind(story.descendants_count)
        .bind(story.score)
        .bind(&story.month)
        .bind(story.created_time)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(row) => Ok(row),
            // Lost an insert race; the existing row must be there now.
            None => Self::find_by_hn_id(pool, story.hn_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }
}
