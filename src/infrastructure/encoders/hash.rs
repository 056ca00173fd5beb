//! Deterministic bag-of-words pseudo-embedding.
//!
//! Each lowercased token is hashed with SHA-256 into one of `dim` buckets and
//! the bucket counts are L2-normalized. Texts sharing vocabulary land close
//! together under cosine similarity; there is no semantic model behind it.

use sha2::{Digest, Sha256};

use crate::domain::error::DomainError;
use crate::domain::ports::encoder::Encoder;

pub const DEFAULT_DIMENSION: usize = 128;

pub struct HashEncoder {
    dim: usize,
}

impl HashEncoder {
    pub fn new(dim: usize) -> Result<Self, DomainError> {
        if dim == 0 {
            return Err(DomainError::InvalidInput(
                "Encoder dimension must be greater than 0".into(),
            ));
        }
        Ok(Self { dim })
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(head) % self.dim as u64) as usize
    }
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIMENSION,
        }
    }
}

/// Lowercased alphanumeric runs of `text`.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

impl Encoder for HashEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Encoding("text is empty".into()));
        }

        let mut counts = vec![0.0_f64; self.dim];
        let mut tokens = 0usize;
        for token in tokenize(text) {
            counts[self.bucket(&token)] += 1.0;
            tokens += 1;
        }
        if tokens == 0 {
            return Err(DomainError::Encoding(
                "text contains no alphanumeric tokens".into(),
            ));
        }

        let norm = counts.iter().map(|c| c * c).sum::<f64>().sqrt();
        Ok(counts.into_iter().map(|c| (c / norm) as f32).collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
