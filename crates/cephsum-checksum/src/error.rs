use thiserror::Error;

/// Errors from checksum value conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChecksumError {
    #[error("invalid hex checksum: {0}")]
    InvalidHex(String),

    #[error("invalid checksum length for {algorithm}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown checksum algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Result alias for checksum operations.
pub type ChecksumResult<T> = Result<T, ChecksumError>;
