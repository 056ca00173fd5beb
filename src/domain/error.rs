use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Corrupt record at {location}: {reason}")]
    CorruptRecord { location: String, reason: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(
        "Batch failed at item {failed_index} after committing {} record(s): {source}",
        .committed_ids.len()
    )]
    BatchPartialFailure {
        failed_index: usize,
        committed_ids: Vec<u64>,
        source: Box<DomainError>,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Persistence(format!("SQLite error: {e}"))
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}
