use crate::domain::entities::vector_record::VectorRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    pub total_records: usize,
    pub dimension: usize,
    pub first_id: Option<u64>,
    pub last_id: Option<u64>,
    pub distinct_jira_keys: usize,
}

pub struct StatsUseCase {
    store: Arc<dyn VectorStore>,
}

impl StatsUseCase {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, limit: Option<usize>) -> Result<Vec<VectorRecord>, DomainError> {
        let mut records = self.store.load_all()?;
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    pub fn stats(&self) -> Result<StoreStats, DomainError> {
        let records = self.store.load_all()?;
        let keys: HashSet<&str> = records
            .iter()
            .filter_map(|r| r.jira_key.as_deref())
            .collect();
        Ok(StoreStats {
            total_records: records.len(),
            dimension: self.store.dimension(),
            first_id: records.first().map(|r| r.id),
            last_id: records.last().map(|r| r.id),
            distinct_jira_keys: keys.len(),
        })
    }
}
