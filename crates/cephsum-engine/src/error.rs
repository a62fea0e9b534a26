use cephsum_store::StoreError;
use cephsum_types::ObjectRef;
use thiserror::Error;

/// Errors that abort a reconciliation.
///
/// Undecodable records, unreadable content, write races and reference
/// mismatches are not errors; they surface as empty results or outcome
/// values instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("object not found: {0}")]
    NotFound(ObjectRef),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(object) => EngineError::NotFound(object),
            other => EngineError::Store(other),
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
