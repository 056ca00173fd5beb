//! Backfill from an exported issue list.
//!
//! The input is a JSON array of objects with `summary` (required) and
//! optional `jira_key` / `description`. Rows with a blank summary are skipped,
//! blank optional fields become `None`.

use crate::domain::entities::vector_record::IssueInput;
use crate::domain::error::DomainError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(default)]
    jira_key: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub fn parse_issues(json: &str) -> Result<Vec<IssueInput>, DomainError> {
    let rows: Vec<ImportRow> =
        serde_json::from_str(json).map_err(|e| DomainError::Parse(format!("Invalid import file: {e}")))?;

    let total = rows.len();
    let issues: Vec<IssueInput> = rows
        .into_iter()
        .filter_map(|row| {
            let summary = non_blank(row.summary)?;
            Some(IssueInput {
                jira_key: non_blank(row.jira_key),
                summary,
                description: non_blank(row.description),
            })
        })
        .collect();

    if issues.len() < total {
        tracing::warn!(skipped = total - issues.len(), "skipped rows without a summary");
    }
    Ok(issues)
}

pub fn load_issues(path: &Path) -> Result<Vec<IssueInput>, DomainError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| DomainError::InvalidInput(format!("Cannot read {}: {e}", path.display())))?;
    parse_issues(&raw)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
