use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object reference {input:?}: {reason}")]
    InvalidObjectRef { input: String, reason: String },

    #[error("unknown byte order: {0}")]
    UnknownByteOrder(String),
}
