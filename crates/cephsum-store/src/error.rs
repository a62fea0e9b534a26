use cephsum_types::ObjectRef;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object does not exist.
    #[error("object not found: {0}")]
    NotFound(ObjectRef),

    /// An exclusive attribute create found the attribute already present.
    #[error("attribute {key} already exists on {object}")]
    AlreadyExists { object: ObjectRef, key: String },

    /// The object reference cannot be mapped onto this backend.
    #[error("invalid object {object}: {reason}")]
    InvalidObject { object: ObjectRef, reason: String },

    /// The attribute key cannot be used on this backend.
    #[error("invalid attribute key {0:?}")]
    InvalidKey(String),

    /// Chunked reads need a positive chunk size.
    #[error("chunk size must be positive")]
    InvalidChunkSize,

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether this is the conflict raised by an exclusive create.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
