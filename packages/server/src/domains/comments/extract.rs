//! LLM extraction workflows for persisted comments.
//!
//! Bulk mode walks every pending comment and continues past individual
//! failures; single mode targets one comment by HN ID and doubles as the
//! manual reprocessing hook (it accepts comments in any status).

use serde::Serialize;
use tracing::{error, info};

use crate::domains::comments::models::{Comment, JobPosting, ProcessedStatus};
use crate::domains::comments::prompt::{build_prompt, parse_job_posting};
use crate::error::AppError;
use crate::kernel::ServerDeps;

/// Outcome counters for a bulk extraction run.
#[derive(Debug, Default, Serialize)]
pub struct ExtractionSummary {
    /// Comments attempted this run (every pending comment pulled).
    pub processed_count: usize,
    /// Extraction yielded data and the write landed.
    pub successful_count: usize,
    /// Extraction yielded nothing, or the write failed.
    pub failed_count: usize,
    pub errors: Vec<String>,
}

/// Result of extracting a single comment by HN ID.
#[derive(Debug, Serialize)]
pub struct SingleExtraction {
    pub success: bool,
    pub hn_id: i64,
    pub extracted_data: Option<JobPosting>,
    pub database_updated: bool,
}

/// Minimal HTML-entity normalization; the model handles the rest of the
/// markup.
pub fn clean_text(raw: &str) -> String {
    raw.replace("&#x2F;", "/").replace("&amp;", "&")
}

/// Process every pending comment (up to the configured limit), one at a
/// time. A single comment failing never aborts the run.
pub async fn process_pending(deps: &ServerDeps) -> Result<ExtractionSummary, AppError> {
    let pending = deps
        .store
        .comments_by_status(ProcessedStatus::Pending, deps.pending_limit)
        .await?;
    info!(count = pending.len(), "processing pending comments");

    let mut summary = ExtractionSummary::default();
    for comment in pending {
        summary.processed_count += 1;

        let extracted = extract_comment(deps, &comment).await;
        let extraction_succeeded = extracted.is_some();

        match persist_extraction(deps, comment.hn_id, extracted).await {
            Ok(updated) if extraction_succeeded && updated => summary.successful_count += 1,
            Ok(_) => summary.failed_count += 1,
            Err(message) => {
                summary.failed_count += 1;
                summary.errors.push(message);
            }
        }
    }

    info!(
        processed = summary.processed_count,
        successful = summary.successful_count,
        failed = summary.failed_count,
        "bulk extraction finished"
    );
    Ok(summary)
}

/// Extract one comment by HN ID.
///
/// The comment must exist in the store; nothing is written otherwise.
pub async fn process_single(deps: &ServerDeps, hn_id: i64) -> Result<SingleExtraction, AppError> {
    info!(hn_id, "processing single comment");

    let comments = deps.store.comments_by_hn_id(hn_id).await?;
    let Some(comment) = comments.into_iter().next() else {
        return Err(AppError::NotFound(format!(
            "No comment found with HN ID {hn_id}"
        )));
    };

    let extracted = extract_comment(deps, &comment).await;
    let database_updated = persist_extraction(deps, hn_id, extracted.clone())
        .await
        .unwrap_or(false);

    Ok(SingleExtraction {
        success: true,
        hn_id,
        extracted_data: extracted,
        database_updated,
    })
}

/// Clean, prompt, parse. Any LLM or parse failure yields `None`.
async fn extract_comment(deps: &ServerDeps, comment: &Comment) -> Option<JobPosting> {
    let cleaned = clean_text(comment.story_text.as_deref().unwrap_or(""));
    let prompt = build_prompt(&cleaned);

    match deps.ai.complete(&prompt).await {
        Ok(response) => parse_job_posting(&response),
        Err(e) => {
            error!(hn_id = comment.hn_id, error = %e, "LLM extraction call failed");
            None
        }
    }
}

/// Write the extraction outcome. On a write failure, attempt one fallback
/// write forcing status `error` with a null payload; if that also fails,
/// log only. Storage errors never propagate out of this step.
async fn persist_extraction(
    deps: &ServerDeps,
    hn_id: i64,
    data: Option<JobPosting>,
) -> Result<bool, String> {
    let status = if data.is_some() {
        ProcessedStatus::Completed
    } else {
        ProcessedStatus::Error
    };

    match deps.store.update_comment(hn_id, status, data).await {
        Ok(updated) => Ok(updated),
        Err(e) => {
            error!(hn_id, error = %e, "failed to persist extraction result");
            if let Err(e2) = deps
                .store
                .update_comment(hn_id, ProcessedStatus::Error, None)
                .await
            {
                error!(hn_id, error = %e2, "failed to mark comment as error");
            }
            Err(format!("failed to update comment {hn_id}: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_replaces_known_entities() {
        assert_eq!(clean_text("&#x2F;test&amp;path"), "/test&path");
    }

    #[test]
    fn clean_text_leaves_other_markup_alone() {
        let raw = "<p>Acme&#x2F;Labs &amp; Co &lt;hi&gt;</p>";
        assert_eq!(clean_text(raw), "<p>Acme/Labs & Co &lt;hi&gt;</p>");
    }
}
