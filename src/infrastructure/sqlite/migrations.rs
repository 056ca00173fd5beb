use crate::domain::error::DomainError;
use rusqlite::{params, Connection, OptionalExtension};

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS issue_vectors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            jira_key TEXT,
            summary TEXT NOT NULL,
            description TEXT,
            vector BLOB NOT NULL,
            indexed_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS store_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_issue_vectors_jira_key ON issue_vectors(jira_key);
        "
    ).map_err(|e| DomainError::Persistence(format!("Migration failed: {e}")))
}

/// Record `dim` as the store dimension, or verify it against the one already recorded.
pub fn pin_dimension(conn: &Connection, dim: usize) -> Result<(), DomainError> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM store_meta WHERE key = 'dimension'",
            [],
            |r| r.get(0),
        )
        .optional()?;

    match stored {
        Some(value) => {
            let stored: usize = value.parse().map_err(|_| {
                DomainError::Persistence(format!("Invalid stored dimension '{value}'"))
            })?;
            if stored != dim {
                return Err(DomainError::DimensionMismatch {
                    expected: stored,
                    actual: dim,
                });
            }
        }
        None => {
            conn.execute(
                "INSERT INTO store_meta (key, value) VALUES ('dimension', ?1)",
                params![dim.to_string()],
            )?;
        }
    }
    Ok(())
}
