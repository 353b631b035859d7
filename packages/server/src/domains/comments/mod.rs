pub mod extract;
pub mod models;
pub mod prompt;

pub use models::{Comment, JobPosting, NewComment, ProcessedStatus};
