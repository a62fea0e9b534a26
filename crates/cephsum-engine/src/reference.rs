use std::fmt;
use std::str::FromStr;

use cephsum_checksum::{ChecksumError, ChecksumKind};
use serde::Serialize;

use crate::engine::Reconciled;

/// A requested algorithm with an optional reference value, as written on
/// the command line: `adler32`, `adler32:0a1b2c3d`, `adler32:print`.
///
/// `print` and `source` ask for the value to be reported, not compared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecksumRequest {
    pub kind: ChecksumKind,
    pub reference: Option<String>,
}

impl FromStr for ChecksumRequest {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (alg, value) = match s.split_once(':') {
            Some((alg, value)) => (alg, Some(value)),
            None => (s, None),
        };
        let kind = alg.parse()?;
        let reference = value
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty() && v != "print" && v != "source");
        Ok(Self { kind, reference })
    }
}

/// Result of comparing a reconciled checksum with a reference value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReferenceCheck {
    Match,
    Mismatch { expected: String, actual: String },
    NoChecksum,
}

impl ReferenceCheck {
    /// Compare hex values case-insensitively.
    pub fn evaluate(result: Option<&Reconciled>, reference: &str) -> Self {
        let Some(result) = result else {
            return ReferenceCheck::NoChecksum;
        };
        let actual = result.hex();
        if actual.eq_ignore_ascii_case(reference.trim()) {
            ReferenceCheck::Match
        } else {
            ReferenceCheck::Mismatch {
                expected: reference.trim().to_ascii_lowercase(),
                actual,
            }
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, ReferenceCheck::Match)
    }
}

impl fmt::Display for ReferenceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceCheck::Match => f.write_str("match"),
            ReferenceCheck::Mismatch { expected, actual } => {
                write!(f, "mismatch: expected {expected}, got {actual}")
            }
            ReferenceCheck::NoChecksum => f.write_str("no checksum"),
        }
    }
}
