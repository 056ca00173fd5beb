use crate::domain::error::DomainError;
use crate::infrastructure::encoders::hash::DEFAULT_DIMENSION;
use std::path::PathBuf;
use std::str::FromStr;

/// Upper bound on results per query.
pub const MAX_TOP_K: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    File,
    Sqlite,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            _ => Err(format!("Unknown backend: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub db_path: String,
    pub dimension: usize,
    pub top_k: usize,
    pub min_score: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::File,
            data_dir: PathBuf::from("data/embeddings"),
            db_path: "data/issuesim.db".into(),
            dimension: DEFAULT_DIMENSION,
            top_k: 5,
            min_score: 0.3,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let defaults = Config::default();
        let config = Config {
            backend: parse_var(&lookup, "ISSUESIM_BACKEND")?.unwrap_or(defaults.backend),
            data_dir: lookup("ISSUESIM_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            db_path: lookup("ISSUESIM_DB").unwrap_or(defaults.db_path),
            dimension: parse_var(&lookup, "ISSUESIM_DIMENSION")?.unwrap_or(defaults.dimension),
            top_k: parse_var(&lookup, "ISSUESIM_TOP_K")?.unwrap_or(defaults.top_k),
            min_score: parse_var(&lookup, "ISSUESIM_MIN_SCORE")?.unwrap_or(defaults.min_score),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.dimension == 0 {
            return Err("dimension must be greater than 0".into());
        }
        validate_query_params(self.top_k, self.min_score)
    }
}

pub fn validate_query_params(top_k: usize, min_score: f64) -> Result<(), DomainError> {
    if top_k > MAX_TOP_K {
        return Err(DomainError::InvalidInput(format!(
            "top_k must be at most {MAX_TOP_K}, got {top_k}"
        )));
    }
    if !(0.0..=1.0).contains(&min_score) {
        return Err(DomainError::InvalidInput(format!(
            "min_score must be between 0.0 and 1.0, got {min_score}"
        )));
    }
    Ok(())
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| DomainError::InvalidInput(format!("{key}='{raw}': {e}")))
        })
        .transpose()
}
