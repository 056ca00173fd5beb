use crate::domain::error::DomainError;

/// Maps text to a fixed-length vector.
///
/// Implementations must be deterministic: the same text always yields the same
/// vector, and every vector has exactly [`Encoder::dimension`] components.
pub trait Encoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>, DomainError>;
    fn dimension(&self) -> usize;
}
