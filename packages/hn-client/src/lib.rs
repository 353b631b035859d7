//! Pure Hacker News Firebase API client.
//!
//! A minimal client for the read-only HN item API. Supports fetching a
//! single story or comment by ID and batch-fetching comment lists with
//! skip-on-failure semantics.
//!
//! # Example
//!
//! ```rust,ignore
//! use hn_client::HnClient;
//!
//! let client = HnClient::new();
//!
//! let story = client.fetch_story(40_000_001).await?;
//! let comments = client.fetch_comments_batch(&story.kids).await;
//! for comment in &comments {
//!     println!("{}", comment.text.as_deref().unwrap_or("(no text)"));
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{HnApiError, Result};
pub use types::{HnComment, HnStory};

use std::time::Duration;

use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Courtesy delay before each outbound request.
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

pub struct HnClient {
    client: reqwest::Client,
    base_url: String,
    rate_limit_delay: Duration,
}

impl Default for HnClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HnClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: BASE_URL.to_string(),
            rate_limit_delay: DEFAULT_RATE_LIMIT,
        }
    }

    /// Override the inter-request delay (fixed, not adaptive).
    pub fn with_rate_limit(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// Point the client at a different base URL (tests, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch one raw item. `None` means the item does not exist: the API
    /// answers missing IDs with a 200 and a JSON `null` body, or a 404.
    async fn fetch_item(&self, id: i64) -> Result<Option<serde_json::Value>> {
        tokio::time::sleep(self.rate_limit_delay).await;

        let url = format!("{}/item/{}.json", self.base_url, id);
        let resp = self.client.get(&url).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let value: serde_json::Value = resp.error_for_status()?.json().await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(value))
    }

    /// Fetch a story by ID. A missing story is an error here, unlike
    /// comments, because ingestion cannot proceed without it.
    pub async fn fetch_story(&self, id: i64) -> Result<HnStory> {
        match self.fetch_item(id).await? {
            Some(value) => decode_item(id, value),
            None => Err(HnApiError::NotFound { id }),
        }
    }

    /// Fetch a comment by ID. Missing items surface as
    /// [`HnApiError::NotFound`]; callers that batch should treat that
    /// variant as "absent", not as a fatal failure.
    pub async fn fetch_comment(&self, id: i64) -> Result<HnComment> {
        match self.fetch_item(id).await? {
            Some(value) => decode_item(id, value),
            None => Err(HnApiError::NotFound { id }),
        }
    }

    /// Fetch many comments, dropping missing, deleted, and malformed items.
    ///
    /// One bad comment never aborts the batch; the result may be shorter
    /// than the input and callers must not assume a 1:1 mapping.
    pub async fn fetch_comments_batch(&self, ids: &[i64]) -> Vec<HnComment> {
        let mut valid = Vec::new();

        for (i, &id) in ids.iter().enumerate() {
            match self.fetch_comment(id).await {
                Ok(comment) if comment.deleted => {
                    tracing::debug!(id, "skipping deleted comment");
                }
                Ok(comment) => valid.push(comment),
                Err(HnApiError::NotFound { .. }) => {
                    tracing::debug!(id, "comment missing, skipping");
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "failed to fetch comment, skipping");
                }
            }

            if (i + 1) % 10 == 0 {
                tracing::info!("processed {}/{} comments", i + 1, ids.len());
            }
        }

        tracing::info!("fetched {}/{} comments", valid.len(), ids.len());
        valid
    }
}

fn decode_item<T: DeserializeOwned>(id: i64, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| HnApiError::InvalidItem {
        id,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_story_with_kids() {
        let value = json!({
            "id": 40000001,
            "type": "story",
            "title": "Ask HN: Who is hiring? (September 2025)",
            "kids": [1, 2, 3],
            "descendants": 3,
            "score": 120,
            "time": 1725000000,
            "by": "whoishiring"
        });

        let story: HnStory = decode_item(40_000_001, value).unwrap();
        assert_eq!(story.item_type, "story");
        assert_eq!(story.kids, vec![1, 2, 3]);
        assert!(!story.deleted);
    }

    #[test]
    fn missing_type_is_invalid() {
        let value = json!({ "id": 7, "title": "no type field" });
        let result: Result<HnStory> = decode_item(7, value);
        assert!(matches!(result, Err(HnApiError::InvalidItem { id: 7, .. })));
    }

    #[test]
    fn deleted_comment_keeps_flag() {
        let value = json!({
            "id": 2,
            "type": "comment",
            "deleted": true,
            "time": 1725000100
        });

        let comment: HnComment = decode_item(2, value).unwrap();
        assert!(comment.deleted);
        assert!(comment.text.is_none());
    }

    #[test]
    fn comment_fields_default_when_absent() {
        let value = json!({
            "id": 3,
            "type": "comment",
            "text": "Acme | Rust Engineer",
            "parent": 40000001
        });

        let comment: HnComment = decode_item(3, value).unwrap();
        assert!(comment.kids.is_empty());
        assert!(!comment.deleted);
        assert_eq!(comment.parent, Some(40_000_001));
    }
}
