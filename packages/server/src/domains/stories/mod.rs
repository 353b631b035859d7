pub mod ingest;
pub mod models;

pub use ingest::{process_hiring_thread, IngestSummary};
pub use models::{NewStory, Story};
