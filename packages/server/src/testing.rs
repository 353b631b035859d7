//! Testing utilities including mock implementations.
//!
//! These exercise the workflows without a database or network access:
//! a mock HN API, a scriptable AI, and an in-memory store mirroring the
//! Postgres semantics.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use hn_client::{HnApiError, HnComment, HnStory};

use crate::domains::comments::{Comment, JobPosting, NewComment, ProcessedStatus};
use crate::domains::stories::{NewStory, Story};
use crate::error::AppError;
use crate::kernel::{AiError, BaseAI, BaseHnClient, JobStore, ServerDeps};

/// Mock HN API backed by in-memory item maps.
#[derive(Default)]
pub struct MockHnClient {
    stories: RwLock<HashMap<i64, HnStory>>,
    comments: RwLock<HashMap<i64, HnComment>>,
}

impl MockHnClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_story(self, story: HnStory) -> Self {
        self.stories.write().unwrap().insert(story.id, story);
        self
    }

    pub fn with_comment(self, comment: HnComment) -> Self {
        self.comments.write().unwrap().insert(comment.id, comment);
        self
    }
}

#[async_trait]
impl BaseHnClient for MockHnClient {
    async fn fetch_story(&self, id: i64) -> Result<HnStory, HnApiError> {
        self.stories
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(HnApiError::NotFound { id })
    }

    async fn fetch_comments_batch(&self, ids: &[i64]) -> Vec<HnComment> {
        // Same skip policy as the real batch fetcher: drop missing and
        // deleted items, never fail the batch.
        let comments = self.comments.read().unwrap();
        ids.iter()
            .filter_map(|id| comments.get(id))
            .filter(|c| !c.deleted)
            .cloned()
            .collect()
    }
}

/// Scriptable AI: per-call queued responses with an optional default,
/// recording every prompt for assertions. With nothing configured, every
/// call fails.
#[derive(Default)]
pub struct MockAi {
    default_response: RwLock<Option<String>>,
    queue: RwLock<VecDeque<Result<String, String>>>,
    prompts: RwLock<Vec<String>>,
}

impl MockAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned when the queue is empty.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = Some(response.into());
        self
    }

    /// Queue one successful response.
    pub fn push_response(&self, response: impl Into<String>) {
        self.queue.write().unwrap().push_back(Ok(response.into()));
    }

    /// Queue one failed call.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.queue.write().unwrap().push_back(Err(message.into()));
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait]
impl BaseAI for MockAi {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts.write().unwrap().push(prompt.to_string());

        if let Some(scripted) = self.queue.write().unwrap().pop_front() {
            return scripted.map_err(|message| AiError::Api {
                status: 500,
                message,
            });
        }

        self.default_response
            .read()
            .unwrap()
            .clone()
            .ok_or(AiError::Api {
                status: 500,
                message: "no mock response configured".to_string(),
            })
    }
}

/// In-memory JobStore mirroring the Postgres semantics: idempotent story
/// creation, conflict-ignoring comment inserts, and email denormalization
/// on update. Supports injecting update failures to exercise the fallback
/// write path.
#[derive(Default)]
pub struct MemoryJobStore {
    stories: RwLock<Vec<Story>>,
    comments: RwLock<Vec<Comment>>,
    next_story_id: AtomicI64,
    next_comment_id: AtomicI64,
    fail_updates: AtomicUsize,
    update_calls: AtomicUsize,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self {
            next_story_id: AtomicI64::new(1),
            next_comment_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Make the next `n` update_comment calls fail with a storage error.
    pub fn fail_next_updates(&self, n: usize) {
        self.fail_updates.store(n, Ordering::SeqCst);
    }

    /// Total update_comment calls, including failed ones.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn stories(&self) -> Vec<Story> {
        self.stories.read().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.comments.read().unwrap().clone()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn upsert_story(&self, story: NewStory) -> Result<Story, AppError> {
        let mut stories = self.stories.write().unwrap();
        if let Some(existing) = stories.iter().find(|s| s.hn_id == story.hn_id) {
            return Ok(existing.clone());
        }

        let row = Story {
            id: self.next_story_id.fetch_add(1, Ordering::SeqCst),
            hn_id: story.hn_id,
            title: story.title,
            kids_count: story.kids_count,
            descendants_count: story.descendants_count,
            score: story.score,
            month: story.month,
            created_time: story.created_time,
        };
        stories.push(row.clone());
        Ok(row)
    }

    async fn get_story(&self, hn_id: i64) -> Result<Option<Story>, AppError> {
        Ok(self
            .stories
            .read()
            .unwrap()
            .iter()
            .find(|s| s.hn_id == hn_id)
            .cloned())
    }

    async fn upsert_comment(&self, row: NewComment) -> Result<Comment, AppError> {
        let mut comments = self.comments.write().unwrap();
        if let Some(existing) = comments.iter().find(|c| c.hn_id == row.hn_id) {
            return Ok(existing.clone());
        }

        let comment = Comment {
            id: self.next_comment_id.fetch_add(1, Ordering::SeqCst),
            hn_id: row.hn_id,
            story_id: row.story_id,
            story_text: row.story_text,
            created_time: row.created_time,
            fetched_time: row.fetched_time,
            processed_status: ProcessedStatus::Pending.as_str().to_string(),
            structured_data: None,
            email: None,
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn insert_comments(&self, rows: Vec<NewComment>) -> Result<u64, AppError> {
        let mut comments = self.comments.write().unwrap();
        let mut inserted = 0;
        for row in rows {
            if comments.iter().any(|c| c.hn_id == row.hn_id) {
                continue;
            }
            comments.push(Comment {
                id: self.next_comment_id.fetch_add(1, Ordering::SeqCst),
                hn_id: row.hn_id,
                story_id: row.story_id,
                story_text: row.story_text,
                created_time: row.created_time,
                fetched_time: row.fetched_time,
                processed_status: ProcessedStatus::Pending.as_str().to_string(),
                structured_data: None,
                email: None,
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn comments_by_status(
        &self,
        status: ProcessedStatus,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError> {
        Ok(self
            .comments
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.processed_status == status.as_str())
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn comments_for_story(&self, story_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(self
            .comments
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.story_id == story_id)
            .cloned()
            .collect())
    }

    async fn comments_by_hn_id(&self, hn_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(self
            .comments
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.hn_id == hn_id)
            .cloned()
            .collect())
    }

    async fn completed_for_month(&self, month: &str) -> Result<Vec<Comment>, AppError> {
        let story_id = match self
            .stories
            .read()
            .unwrap()
            .iter()
            .find(|s| s.month == month)
        {
            Some(story) => story.id,
            None => return Ok(Vec::new()),
        };

        Ok(self
            .comments
            .read()
            .unwrap()
            .iter()
            .filter(|c| {
                c.story_id == story_id
                    && c.processed_status == ProcessedStatus::Completed.as_str()
            })
            .cloned()
            .collect())
    }

    async fn update_comment(
        &self,
        hn_id: i64,
        status: ProcessedStatus,
        data: Option<JobPosting>,
    ) -> Result<bool, AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_updates.load(Ordering::SeqCst) > 0 {
            self.fail_updates.fetch_sub(1, Ordering::SeqCst);
            return Err(AppError::Storage("injected update failure".to_string()));
        }

        let mut comments = self.comments.write().unwrap();
        let Some(comment) = comments.iter_mut().find(|c| c.hn_id == hn_id) else {
            return Ok(false);
        };

        comment.processed_status = status.as_str().to_string();
        match data {
            Some(posting) => {
                comment.email = posting.email.clone();
                comment.structured_data =
                    Some(serde_json::to_value(&posting).expect("posting serializes"));
            }
            None => {
                comment.structured_data = None;
                comment.email = None;
            }
        }
        Ok(true)
    }
}

/// Build ServerDeps wired to the given mocks, with a fixed month bucket.
pub fn test_deps(
    store: Arc<MemoryJobStore>,
    hn: Arc<MockHnClient>,
    ai: Arc<MockAi>,
) -> ServerDeps {
    ServerDeps {
        store,
        hn,
        ai,
        newsletter_month: "2025-09".to_string(),
        pending_limit: 1000,
    }
}
