//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    health_handler, jobs_handler, process_comment_handler, process_comments_handler,
    process_hiring_thread_handler, root_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, deps: Arc<ServerDeps>) -> Router {
    let state = AppState { db_pool: pool, deps };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/api/stories/process-hiring-thread/:story_id",
            post(process_hiring_thread_handler),
        )
        .route("/api/stories/jobs", get(jobs_handler))
        .route("/api/stories/process-comments", post(process_comments_handler))
        .route(
            "/api/stories/process-comment/:hn_id",
            post(process_comment_handler),
        )
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
