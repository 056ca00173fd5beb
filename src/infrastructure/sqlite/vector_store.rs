use crate::domain::entities::vector_record::{NewRecord, VectorRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use crate::infrastructure::sqlite::migrations::{pin_dimension, run_migrations};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    dim: usize,
}

/// Raw row before validation.
struct StoredRow {
    id: u64,
    jira_key: Option<String>,
    summary: String,
    description: Option<String>,
    blob: Vec<u8>,
    indexed_at: String,
}

impl SqliteVectorStore {
    pub fn open(db_path: &str, dim: usize) -> Result<Self, DomainError> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    DomainError::Persistence(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Persistence(format!("WAL error: {e}")))?;
        Self::new(conn, dim)
    }

    pub fn new(conn: Connection, dim: usize) -> Result<Self, DomainError> {
        if dim == 0 {
            return Err(DomainError::InvalidInput(
                "Store dimension must be greater than 0".into(),
            ));
        }
        run_migrations(&conn)?;
        pin_dimension(&conn, dim)?;
        Ok(Self {
            conn: Mutex::new(conn),
            dim,
        })
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn decode_row(&self, row: StoredRow) -> Result<VectorRecord, DomainError> {
        let corrupt = |reason: String| DomainError::CorruptRecord {
            location: format!("issue_vectors row {}", row.id),
            reason,
        };
        if row.blob.len() != self.dim * 4 {
            return Err(corrupt(format!(
                "vector blob has {} bytes, expected {}",
                row.blob.len(),
                self.dim * 4
            )));
        }
        let indexed_at = DateTime::parse_from_rfc3339(&row.indexed_at)
            .map_err(|e| corrupt(format!("invalid timestamp '{}': {e}", row.indexed_at)))?
            .with_timezone(&Utc);
        Ok(VectorRecord {
            id: row.id,
            jira_key: row.jira_key,
            summary: row.summary,
            description: row.description,
            vector: Self::deserialize_vector(&row.blob),
            indexed_at,
        })
    }
}

impl VectorStore for SqliteVectorStore {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn append(&self, record: NewRecord) -> Result<VectorRecord, DomainError> {
        if record.vector.len() != self.dim {
            return Err(DomainError::DimensionMismatch {
                expected: self.dim,
                actual: record.vector.len(),
            });
        }
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Persistence(format!("Store lock poisoned: {e}")))?;
        let indexed_at = Utc::now();
        conn.execute(
            "INSERT INTO issue_vectors (jira_key, summary, description, vector, indexed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.jira_key,
                record.summary,
                record.description,
                Self::serialize_vector(&record.vector),
                indexed_at.to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::Persistence(format!("Failed to store record: {e}")))?;
        let id = conn.last_insert_rowid() as u64;

        tracing::info!(id, jira_key = ?record.jira_key, "record appended");
        Ok(record.into_record(id, indexed_at))
    }

    fn load_all(&self) -> Result<Vec<VectorRecord>, DomainError> {
        let rows: Vec<StoredRow> = {
            let conn = self
                .conn
                .lock()
                .map_err(|e| DomainError::Persistence(format!("Store lock poisoned: {e}")))?;
            let mut stmt = conn.prepare(
                "SELECT id, jira_key, summary, description, vector, indexed_at
                 FROM issue_vectors ORDER BY id",
            )?;
            let mapped = stmt.query_map([], |row| {
                Ok(StoredRow {
                    id: row.get::<_, i64>(0)? as u64,
                    jira_key: row.get(1)?,
                    summary: row.get(2)?,
                    description: row.get(3)?,
                    blob: row.get(4)?,
                    indexed_at: row.get(5)?,
                })
            })?;

            let mut rows = Vec::new();
            for row in mapped {
                match row {
                    Ok(row) => rows.push(row),
                    Err(e) => tracing::warn!(error = %e, "skipping unreadable row"),
                }
            }
            rows
        };

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match self.decode_row(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "skipping corrupt record"),
            }
        }
        Ok(records)
    }
}
