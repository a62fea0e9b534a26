use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChecksumError, ChecksumResult};
use crate::kind::ChecksumKind;

/// A finished checksum: the algorithm plus its raw output bytes.
///
/// The bytes are in the algorithm's canonical (big-endian) output order, so
/// the external form is simply their lowercase hex encoding.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChecksumValue {
    kind: ChecksumKind,
    bytes: Vec<u8>,
}

impl ChecksumValue {
    /// Build a value from raw bytes, checking the width.
    pub fn from_bytes(kind: ChecksumKind, bytes: &[u8]) -> ChecksumResult<Self> {
        if bytes.len() != kind.width() {
            return Err(ChecksumError::InvalidLength {
                algorithm: kind.name(),
                expected: kind.width(),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            kind,
            bytes: bytes.to_vec(),
        })
    }

    /// Parse the external hex form.
    pub fn from_hex(kind: ChecksumKind, s: &str) -> ChecksumResult<Self> {
        let bytes = hex::decode(s).map_err(|e| ChecksumError::InvalidHex(e.to_string()))?;
        Self::from_bytes(kind, &bytes)
    }

    pub(crate) fn from_u32(kind: ChecksumKind, v: u32) -> Self {
        Self {
            kind,
            bytes: v.to_be_bytes().to_vec(),
        }
    }

    pub fn kind(&self) -> ChecksumKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex, two characters per output byte.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// The numeric accumulator state, for algorithms no wider than 64 bits.
    pub fn internal(&self) -> Option<u64> {
        if self.bytes.len() > 8 {
            return None;
        }
        Some(self.bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }
}

impl fmt::Debug for ChecksumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChecksumValue({}:{})", self.kind, self.to_hex())
    }
}

impl fmt::Display for ChecksumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
