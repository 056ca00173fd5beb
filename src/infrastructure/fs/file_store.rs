use crate::domain::entities::vector_record::{NewRecord, VectorRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Pins the store dimension for the lifetime of the directory.
const MANIFEST_FILE: &str = "manifest.json";
const RECORD_EXT: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    dimension: usize,
}

/// One JSON file per record, named by zero-padded id.
///
/// Writes go to a temp file in the same directory and are linked into place
/// only once complete, so `load_all` never sees a partial record.
pub struct FileVectorStore {
    root: PathBuf,
    dim: usize,
    write_lock: Mutex<()>,
}

impl FileVectorStore {
    /// Open (but do not create) a store rooted at `root`. The directory is
    /// created on first append.
    pub fn open(root: impl Into<PathBuf>, dim: usize) -> Result<Self, DomainError> {
        if dim == 0 {
            return Err(DomainError::InvalidInput(
                "Store dimension must be greater than 0".into(),
            ));
        }
        let root = root.into();
        if let Some(stored) = read_manifest(&root)? {
            if stored != dim {
                return Err(DomainError::DimensionMismatch {
                    expected: stored,
                    actual: dim,
                });
            }
        }
        Ok(Self {
            root,
            dim,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, id: u64) -> PathBuf {
        self.root.join(format!("{id:010}.{RECORD_EXT}"))
    }

    fn ensure_initialized(&self) -> Result<(), DomainError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            DomainError::Persistence(format!(
                "Failed to create store directory {}: {e}",
                self.root.display()
            ))
        })?;
        // A missing or unreadable manifest is rewritten from the configured dimension.
        if read_manifest(&self.root)?.is_none() {
            self.write_atomic(
                &self.root.join(MANIFEST_FILE),
                &Manifest {
                    dimension: self.dim,
                },
                true,
            )?;
        }
        Ok(())
    }

    /// Highest id present on disk, counting files whose contents are corrupt
    /// so their ids are never handed out again.
    fn max_id(&self) -> Result<u64, DomainError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(dir_error(&self.root, e)),
        };
        let mut max = 0;
        for entry in entries {
            let entry = entry.map_err(|e| dir_error(&self.root, e))?;
            if let Some(id) = record_id_from_path(&entry.path()) {
                max = max.max(id);
            }
        }
        Ok(max)
    }

    fn write_atomic<T: Serialize>(
        &self,
        path: &Path,
        value: &T,
        overwrite: bool,
    ) -> Result<(), DomainError> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".pending-")
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(|e| {
                DomainError::Persistence(format!(
                    "Failed to create temp file in {}: {e}",
                    self.root.display()
                ))
            })?;
        serde_json::to_writer(&mut tmp, value)
            .map_err(|e| DomainError::Persistence(format!("Failed to serialize record: {e}")))?;
        tmp.flush()
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| DomainError::Persistence(format!("Failed to flush temp file: {e}")))?;
        let persisted = if overwrite {
            tmp.persist(path)
        } else {
            tmp.persist_noclobber(path)
        };
        persisted.map_err(|e| {
            DomainError::Persistence(format!("Failed to persist {}: {}", path.display(), e.error))
        })?;
        Ok(())
    }

    fn read_record(&self, path: &Path) -> Result<VectorRecord, DomainError> {
        let corrupt = |reason: String| DomainError::CorruptRecord {
            location: path.display().to_string(),
            reason,
        };
        let file_id = record_id_from_path(path)
            .ok_or_else(|| corrupt("file name is not a record id".into()))?;
        let raw = fs::read_to_string(path).map_err(|e| corrupt(format!("unreadable: {e}")))?;
        let record: VectorRecord =
            serde_json::from_str(&raw).map_err(|e| corrupt(format!("invalid JSON: {e}")))?;
        if record.id != file_id {
            return Err(corrupt(format!(
                "stored id {} does not match file name",
                record.id
            )));
        }
        if record.vector.len() != self.dim {
            return Err(corrupt(format!(
                "vector has {} components, store dimension is {}",
                record.vector.len(),
                self.dim
            )));
        }
        Ok(record)
    }
}

impl VectorStore for FileVectorStore {
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

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| DomainError::Persistence(format!("Store lock poisoned: {e}")))?;
        self.ensure_initialized()?;

        let id = self.max_id()?.checked_add(1).ok_or_else(|| {
            DomainError::Persistence(format!(
                "No ids left in {}: highest id on disk is {}",
                self.root.display(),
                u64::MAX
            ))
        })?;
        let stored = record.into_record(id, Utc::now());
        self.write_atomic(&self.record_path(id), &stored, false)?;

        tracing::info!(id, jira_key = ?stored.jira_key, "record appended");
        Ok(stored)
    }

    fn load_all(&self) -> Result<Vec<VectorRecord>, DomainError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(dir_error(&self.root, e)),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| dir_error(&self.root, e))?.path();
            let is_record_file = path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXT)
                && path.file_name().and_then(|n| n.to_str()) != Some(MANIFEST_FILE);
            if !is_record_file {
                continue;
            }
            match self.read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "skipping corrupt record"),
            }
        }

        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

fn record_id_from_path(path: &Path) -> Option<u64> {
    if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

fn read_manifest(root: &Path) -> Result<Option<usize>, DomainError> {
    let path = root.join(MANIFEST_FILE);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(DomainError::Persistence(format!(
                "Failed to read {}: {e}",
                path.display()
            )))
        }
    };
    match serde_json::from_str::<Manifest>(&raw) {
        Ok(manifest) => Ok(Some(manifest.dimension)),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "ignoring invalid store manifest"
            );
            Ok(None)
        }
    }
}

fn dir_error(root: &Path, e: std::io::Error) -> DomainError {
    DomainError::Persistence(format!("Failed to scan {}: {e}", root.display()))
}
