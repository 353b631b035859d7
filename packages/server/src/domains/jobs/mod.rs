//! Month-bucket queries over completed extractions.

use chrono::{Datelike, Month, Utc};

use crate::domains::comments::Comment;
use crate::error::AppError;
use crate::kernel::ServerDeps;

/// Normalize the month query parameter to a "YYYY-MM" bucket label.
///
/// Accepts an explicit bucket ("2025-09"), a bare month name
/// ("september"), or nothing (current month, current year).
pub fn resolve_month(month: Option<&str>) -> Result<String, AppError> {
    let now = Utc::now();
    match month {
        None => Ok(format!("{}-{:02}", now.year(), now.month())),
        Some(m) if m.contains('-') => Ok(m.to_string()),
        Some(name) => name
            .parse::<Month>()
            .map(|m| format!("{}-{:02}", now.year(), m.number_from_month()))
            .map_err(|_| AppError::Validation(format!("Invalid month name: {name}"))),
    }
}

/// Completed job postings for a month bucket.
pub async fn completed_jobs(deps: &ServerDeps, month: &str) -> Result<Vec<Comment>, AppError> {
    deps.store.completed_for_month(month).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bucket_passes_through() {
        assert_eq!(resolve_month(Some("2025-09")).unwrap(), "2025-09");
    }

    #[test]
    fn month_name_resolves_to_current_year() {
        let year = Utc::now().year();
        assert_eq!(
            resolve_month(Some("september")).unwrap(),
            format!("{year}-09")
        );
    }

    #[test]
    fn missing_month_defaults_to_now() {
        let now = Utc::now();
        assert_eq!(
            resolve_month(None).unwrap(),
            format!("{}-{:02}", now.year(), now.month())
        );
    }

    #[test]
    fn unknown_month_name_is_a_validation_error() {
        let err = resolve_month(Some("smarch")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
