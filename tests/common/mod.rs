//! Shared test helpers.
#![allow(dead_code)]

use issuesim::domain::entities::vector_record::{IssueInput, NewRecord};
use issuesim::infrastructure::encoders::hash::HashEncoder;
use issuesim::infrastructure::fs::file_store::FileVectorStore;
use issuesim::infrastructure::sqlite::vector_store::SqliteVectorStore;
use issuesim::IssueSim;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

pub const DIM: usize = 128;

pub fn setup_file(dir: &Path) -> IssueSim {
    IssueSim::with_providers(
        Arc::new(HashEncoder::new(DIM).unwrap()),
        Arc::new(FileVectorStore::open(dir.join("embeddings"), DIM).unwrap()),
    )
    .unwrap()
}

pub fn setup_sqlite() -> IssueSim {
    IssueSim::with_providers(
        Arc::new(HashEncoder::new(DIM).unwrap()),
        Arc::new(SqliteVectorStore::new(Connection::open_in_memory().unwrap(), DIM).unwrap()),
    )
    .unwrap()
}

pub fn issue(jira_key: &str, summary: &str, description: &str) -> IssueInput {
    IssueInput::new(Some(jira_key), summary, Some(description))
}

/// A record whose vector points along axis `axis`.
pub fn axis_record(jira_key: &str, dim: usize, axis: usize) -> NewRecord {
    let mut vector = vec![0.0; dim];
    vector[axis] = 1.0;
    NewRecord {
        jira_key: Some(jira_key.to_string()),
        summary: format!("Summary for {jira_key}"),
        description: None,
        vector,
    }
}
