use cephsum_types::ByteOrder;
use thiserror::Error;

/// Errors from building, encoding or decoding checksum records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The buffer is not a record in either supported layout.
    #[error("malformed checksum record: {0}")]
    Format(String),

    /// A single layout was tried and rejected.
    #[error("not a {order}-endian record: {reason}")]
    Layout { order: ByteOrder, reason: String },

    #[error("algorithm name {0:?} does not fit the 15-byte name field")]
    NameTooLong(String),

    #[error("modification time {0} is outside the range a record can carry")]
    FmTimeOutOfRange(i64),

    #[error("checksum value of {0} bytes does not fit the 64-byte value field")]
    ValueTooLong(usize),

    #[error("checksum length {actual} does not match {algorithm} width {expected}")]
    WidthMismatch {
        algorithm: String,
        expected: usize,
        actual: usize,
    },
}

/// Result alias for record operations.
pub type RecordResult<T> = Result<T, RecordError>;
