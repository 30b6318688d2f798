use thiserror::Error;

use crate::errors::domain::DomainError;
use crate::store::StoreError;

/// Top-level engine error surfaced to the embedding application.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    /// Lock/commit failure; the whole mutation was discarded and the
    /// caller may retry.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, EngineError::Domain(DomainError::Rejected { .. }))
    }
}
