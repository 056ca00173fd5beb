use crate::application::index_issue::encode_issue;
use crate::domain::entities::vector_record::{IssueInput, ScoredRecord, VectorRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::encoder::Encoder;
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::ranking::{rank_with_stats, RankParams, RankStats};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SimilarityQuery {
    pub issue: IssueInput,
    pub params: RankParams,
    /// Persist the query issue after ranking.
    pub store_issue: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityResult {
    pub similar: Vec<ScoredRecord>,
    /// The query issue as written to the store, when `store_issue` was set.
    pub stored: Option<VectorRecord>,
    pub stats: RankStats,
}

pub struct SimilarUseCase {
    encoder: Arc<dyn Encoder>,
    store: Arc<dyn VectorStore>,
}

impl SimilarUseCase {
    pub fn new(encoder: Arc<dyn Encoder>, store: Arc<dyn VectorStore>) -> Self {
        Self { encoder, store }
    }

    pub fn execute(&self, query: SimilarityQuery) -> Result<SimilarityResult, DomainError> {
        let record = encode_issue(self.encoder.as_ref(), query.issue)?;

        // Rank before storing so the query never matches itself.
        let candidates = self.store.load_all()?;
        let ranking = rank_with_stats(&record.vector, candidates, query.params)?;

        let stored = if query.store_issue {
            Some(self.store.append(record)?)
        } else {
            None
        };

        Ok(SimilarityResult {
            similar: ranking.matches,
            stored,
            stats: ranking.stats,
        })
    }
}
