//! Server dependencies for workflows (using traits for testability)
//!
//! This module provides the central dependency container used by both
//! workflows. All external services sit behind trait abstractions so the
//! workflows can run against mocks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use hn_client::{HnApiError, HnClient, HnComment, HnStory};
use sqlx::PgPool;

use crate::config::Config;
use crate::kernel::ai::{AnthropicClient, BaseAI};
use crate::kernel::store::{JobStore, PgJobStore};

// =============================================================================
// HnClient Adapter (implements BaseHnClient trait)
// =============================================================================

/// The slice of the HN API the workflows consume.
#[async_trait]
pub trait BaseHnClient: Send + Sync {
    async fn fetch_story(&self, id: i64) -> Result<HnStory, HnApiError>;

    /// Missing, deleted, and malformed comments are dropped, not reported.
    async fn fetch_comments_batch(&self, ids: &[i64]) -> Vec<HnComment>;
}

/// Wrapper around HnClient that implements the BaseHnClient trait
pub struct HnAdapter(pub Arc<HnClient>);

impl HnAdapter {
    pub fn new(client: Arc<HnClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseHnClient for HnAdapter {
    async fn fetch_story(&self, id: i64) -> Result<HnStory, HnApiError> {
        self.0.fetch_story(id).await
    }

    async fn fetch_comments_batch(&self, ids: &[i64]) -> Vec<HnComment> {
        self.0.fetch_comments_batch(ids).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to workflows.
///
/// Constructed once at process start and shared across requests; replaces
/// per-request construction of API clients and store handles. The
/// outbound connection pools live as long as the process and are released
/// at shutdown.
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn JobStore>,
    pub hn: Arc<dyn BaseHnClient>,
    pub ai: Arc<dyn BaseAI>,
    /// Month bucket assigned to newly ingested stories, e.g. "2025-09".
    pub newsletter_month: String,
    /// Cap on comments pulled per bulk extraction run.
    pub pending_limit: i64,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn JobStore>,
        hn: Arc<dyn BaseHnClient>,
        ai: Arc<dyn BaseAI>,
        newsletter_month: String,
        pending_limit: i64,
    ) -> Self {
        Self {
            store,
            hn,
            ai,
            newsletter_month,
            pending_limit,
        }
    }

    /// Wire up production dependencies from configuration.
    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        let hn = HnClient::new()
            .with_rate_limit(Duration::from_millis(config.hn_rate_limit_ms));

        Self {
            store: Arc::new(PgJobStore::new(pool)),
            hn: Arc::new(HnAdapter::new(Arc::new(hn))),
            ai: Arc::new(AnthropicClient::new(config.anthropic_api_key.clone())),
            newsletter_month: config
                .newsletter_month
                .clone()
                .unwrap_or_else(current_month),
            pending_limit: config.pending_limit,
        }
    }
}

/// Current month bucket in "YYYY-MM" form.
pub fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}
