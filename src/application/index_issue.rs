use crate::domain::entities::vector_record::{IssueInput, NewRecord, VectorRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::encoder::Encoder;
use crate::domain::ports::vector_store::VectorStore;
use std::sync::Arc;

pub struct IndexIssueUseCase {
    encoder: Arc<dyn Encoder>,
    store: Arc<dyn VectorStore>,
}

impl IndexIssueUseCase {
    pub fn new(encoder: Arc<dyn Encoder>, store: Arc<dyn VectorStore>) -> Self {
        Self { encoder, store }
    }

    pub fn index_one(&self, issue: IssueInput) -> Result<VectorRecord, DomainError> {
        let record = encode_issue(self.encoder.as_ref(), issue)?;
        self.store.append(record)
    }

    /// Encodes every item before writing anything, so an encoding failure
    /// leaves the store untouched.
    pub fn index_many(&self, issues: Vec<IssueInput>) -> Result<Vec<VectorRecord>, DomainError> {
        let mut records = Vec::with_capacity(issues.len());
        for (index, issue) in issues.into_iter().enumerate() {
            let record = encode_issue(self.encoder.as_ref(), issue).map_err(|e| match e {
                DomainError::Encoding(msg) => DomainError::Encoding(format!("item {index}: {msg}")),
                other => other,
            })?;
            records.push(record);
        }

        let total = records.len();
        let written = self.store.append_many(records)?;
        tracing::info!(total, "batch indexed");
        Ok(written)
    }
}

pub(crate) fn encode_issue(encoder: &dyn Encoder, issue: IssueInput) -> Result<NewRecord, DomainError> {
    if issue.summary.trim().is_empty() {
        return Err(DomainError::Encoding("summary must not be empty".into()));
    }
    let vector = encoder.encode(&issue.embedding_text())?;
    Ok(issue.into_new_record(vector))
}
