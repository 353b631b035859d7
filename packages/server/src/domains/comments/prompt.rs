//! Fixed extraction prompt and model-output parsing.

use crate::domains::comments::models::JobPosting;

pub const EXTRACTION_PROMPT: &str = r#"You are an expert at extracting job posting information from Hacker News "Who is hiring" posts.

EXTRACTION RULES:
- company: Company or organization name (required)
- description: Description of what they do (required)
- positions: All job titles mentioned (required - at least one)
- location: City, state, country, or "Remote" if mentioned
- salary: Any compensation/salary information
- stack: All technologies, programming languages, frameworks mentioned
- email: Contact email (convert "john at company dot com" to "john@company.com")
- application_url: Any URLs for applying or company careers pages
- remote_friendly: true if remote work is explicitly supported
- employment_type: Full-time, Part-time, Contract, Internship if mentioned

IMPORTANT:
- If you cannot identify a company name AND at least one job position, the posting is not useful
- Be thorough with technology stack extraction
- Convert common email obfuscations: "at" to "@", "dot" to ".", "[at]" to "@"
- Look for both direct emails and application URLs

Return your response as a valid JSON object with these fields."#;

pub fn build_prompt(cleaned_text: &str) -> String {
    format!("{EXTRACTION_PROMPT}\n\nJob posting text:\n{cleaned_text}")
}

/// Parse a model response into a validated job posting.
///
/// Tolerates Markdown code fences around the JSON object. Anything that
/// fails to parse or validate yields `None`, never an error.
pub fn parse_job_posting(raw: &str) -> Option<JobPosting> {
    let trimmed = strip_code_fences(raw.trim());

    let posting: JobPosting = match serde_json::from_str(trimmed) {
        Ok(posting) => posting,
        Err(e) => {
            tracing::error!(error = %e, "model response was not valid JSON");
            return None;
        }
    };

    if !posting.is_useful() {
        tracing::warn!("extracted posting has no company or positions, discarding");
        return None;
    }

    Some(posting)
}

fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_response() -> String {
        json!({
            "company": "Acme",
            "description": "Road-runner catching equipment",
            "positions": ["Rust Engineer"],
            "location": "Remote",
            "stack": ["Rust", "Postgres"],
            "email": "jobs@acme.com",
            "remote_friendly": true
        })
        .to_string()
    }

    #[test]
    fn prompt_names_every_extracted_field() {
        for field in [
            "company",
            "description",
            "positions",
            "location",
            "salary",
            "stack",
            "email",
            "application_url",
            "remote_friendly",
            "employment_type",
        ] {
            assert!(EXTRACTION_PROMPT.contains(field), "prompt missing {field}");
        }
    }

    #[test]
    fn parses_plain_json() {
        let posting = parse_job_posting(&valid_response()).unwrap();
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.email.as_deref(), Some("jobs@acme.com"));
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("```json\n{}\n```", valid_response());
        let posting = parse_job_posting(&fenced).unwrap();
        assert_eq!(posting.positions, vec!["Rust Engineer"]);
    }

    #[test]
    fn invalid_json_yields_none() {
        assert!(parse_job_posting("I could not find a job posting here.").is_none());
    }

    #[test]
    fn missing_company_yields_none() {
        let response = json!({"company": "  ", "positions": ["Engineer"]}).to_string();
        assert!(parse_job_posting(&response).is_none());
    }

    #[test]
    fn empty_positions_yields_none() {
        let response = json!({"company": "Acme", "positions": []}).to_string();
        assert!(parse_job_posting(&response).is_none());
    }
}
