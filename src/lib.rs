pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::import::load_issues;
use crate::application::index_issue::IndexIssueUseCase;
use crate::application::similar::{SimilarUseCase, SimilarityQuery, SimilarityResult};
use crate::application::stats::{StatsUseCase, StoreStats};
use crate::config::{validate_query_params, Backend, Config};
use crate::domain::entities::vector_record::{IssueInput, VectorRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::encoder::Encoder;
use crate::domain::ports::vector_store::VectorStore;
use crate::domain::ranking::RankParams;
use crate::infrastructure::encoders::hash::HashEncoder;
use crate::infrastructure::fs::file_store::FileVectorStore;
use crate::infrastructure::sqlite::vector_store::SqliteVectorStore;
use std::path::Path;
use std::sync::Arc;

pub struct IssueSim {
    index_uc: IndexIssueUseCase,
    similar_uc: SimilarUseCase,
    stats_uc: StatsUseCase,
}

impl IssueSim {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        config.validate()?;
        let encoder: Arc<dyn Encoder> = Arc::new(HashEncoder::new(config.dimension)?);
        let store: Arc<dyn VectorStore> = match config.backend {
            Backend::File => Arc::new(FileVectorStore::open(&config.data_dir, config.dimension)?),
            Backend::Sqlite => Arc::new(SqliteVectorStore::open(&config.db_path, config.dimension)?),
        };
        Self::with_providers(encoder, store)
    }

    pub fn with_providers(
        encoder: Arc<dyn Encoder>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self, DomainError> {
        if encoder.dimension() != store.dimension() {
            tracing::warn!(
                encoder = encoder.dimension(),
                store = store.dimension(),
                "encoder and store dimensions differ"
            );
            return Err(DomainError::DimensionMismatch {
                expected: store.dimension(),
                actual: encoder.dimension(),
            });
        }

        Ok(Self {
            index_uc: IndexIssueUseCase::new(encoder.clone(), store.clone()),
            similar_uc: SimilarUseCase::new(encoder, store.clone()),
            stats_uc: StatsUseCase::new(store),
        })
    }

    pub fn index_one(&self, issue: IssueInput) -> Result<VectorRecord, DomainError> {
        self.index_uc.index_one(issue)
    }

    pub fn index_many(&self, issues: Vec<IssueInput>) -> Result<Vec<VectorRecord>, DomainError> {
        self.index_uc.index_many(issues)
    }

    pub fn import_file(&self, path: &Path) -> Result<Vec<VectorRecord>, DomainError> {
        let issues = load_issues(path)?;
        self.index_many(issues)
    }

    pub fn query_similar(
        &self,
        issue: IssueInput,
        top_k: usize,
        min_score: f64,
        store_issue: bool,
    ) -> Result<SimilarityResult, DomainError> {
        validate_query_params(top_k, min_score)?;
        self.similar_uc.execute(SimilarityQuery {
            issue,
            params: RankParams { top_k, min_score },
            store_issue,
        })
    }

    pub fn list_indexed(&self, limit: Option<usize>) -> Result<Vec<VectorRecord>, DomainError> {
        self.stats_uc.list(limit)
    }

    pub fn stats(&self) -> Result<StoreStats, DomainError> {
        self.stats_uc.stats()
    }
}
