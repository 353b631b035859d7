use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub anthropic_api_key: String,
    /// Fixed delay before each HN API request, in milliseconds.
    pub hn_rate_limit_ms: u64,
    /// Cap on comments pulled per bulk extraction run.
    pub pending_limit: i64,
    /// Month bucket assigned to newly ingested stories ("2025-09").
    /// Defaults to the current month when unset.
    pub newsletter_month: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            anthropic_api_key: env::var("ANTHROPIC_API_KEY")
                .context("ANTHROPIC_API_KEY must be set")?,
            hn_rate_limit_ms: env::var("HN_RATE_LIMIT_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("HN_RATE_LIMIT_MS must be a valid number")?,
            pending_limit: env::var("PENDING_COMMENT_LIMIT")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("PENDING_COMMENT_LIMIT must be a valid number")?,
            newsletter_month: env::var("NEWSLETTER_MONTH").ok(),
        })
    }
}
