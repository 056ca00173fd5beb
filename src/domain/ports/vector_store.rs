use crate::domain::entities::vector_record::{NewRecord, VectorRecord};
use crate::domain::error::DomainError;

pub trait VectorStore: Send + Sync {
    /// Vector length shared by every record in this store.
    fn dimension(&self) -> usize;

    /// Persist one record and return it with its assigned id.
    fn append(&self, record: NewRecord) -> Result<VectorRecord, DomainError>;

    /// Full rescan of the persisted records, ordered by id. Corrupt entries are
    /// skipped with a warning.
    fn load_all(&self) -> Result<Vec<VectorRecord>, DomainError>;

    /// Append in input order. Records written before a failure stay persisted.
    fn append_many(&self, records: Vec<NewRecord>) -> Result<Vec<VectorRecord>, DomainError> {
        let mut written = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match self.append(record) {
                Ok(stored) => written.push(stored),
                Err(e) => {
                    return Err(DomainError::BatchPartialFailure {
                        failed_index: index,
                        committed_ids: written.iter().map(|r| r.id).collect(),
                        source: Box::new(e),
                    });
                }
            }
        }
        Ok(written)
    }
}
