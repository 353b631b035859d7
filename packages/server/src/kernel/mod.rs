pub mod ai;
pub mod deps;
pub mod store;

pub use ai::{AiError, AnthropicClient, BaseAI};
pub use deps::{current_month, BaseHnClient, HnAdapter, ServerDeps};
pub use store::{JobStore, PgJobStore};
