// HN Newsletter - API Core
//
// This crate provides the backend for the "Who is hiring" newsletter:
// ingesting hiring threads from the Hacker News API, extracting structured
// job postings from comments with an LLM, and serving results over HTTP.

pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;
pub mod server;
pub mod testing;

pub use config::*;
pub use error::AppError;
