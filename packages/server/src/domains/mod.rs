pub mod comments;
pub mod jobs;
pub mod stories;
