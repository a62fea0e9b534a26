use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::accumulator::ChecksumAlgorithm;
use crate::adler32::Adler32;
use crate::error::ChecksumError;
use crate::zcrc32::Zcrc32;

/// Registry of the checksum algorithms cephsum knows how to compute.
///
/// The name is the token stored in the record's name field and the suffix
/// of the default attribute key (`XrdCks.<name>`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumKind {
    #[default]
    Adler32,
    Zcrc32,
}

impl ChecksumKind {
    pub const ALL: [ChecksumKind; 2] = [ChecksumKind::Adler32, ChecksumKind::Zcrc32];

    /// Token used in stored records and on the command line.
    pub const fn name(&self) -> &'static str {
        match self {
            ChecksumKind::Adler32 => "adler32",
            ChecksumKind::Zcrc32 => "zcrc32",
        }
    }

    /// Native output width in bytes.
    pub const fn width(&self) -> usize {
        match self {
            ChecksumKind::Adler32 => 4,
            ChecksumKind::Zcrc32 => 4,
        }
    }

    /// Look up an algorithm by its exact stored name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// A fresh algorithm instance at its identity element.
    pub fn algorithm(&self) -> Box<dyn ChecksumAlgorithm> {
        match self {
            ChecksumKind::Adler32 => Box::new(Adler32::new()),
            ChecksumKind::Zcrc32 => Box::new(Zcrc32::new()),
        }
    }
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChecksumKind {
    type Err = ChecksumError;

    /// Case-insensitive; `auto` selects the default algorithm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        if lowered == "auto" {
            return Ok(Self::default());
        }
        Self::from_name(&lowered).ok_or(ChecksumError::UnknownAlgorithm(lowered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for kind in ChecksumKind::ALL {
            assert_eq!(ChecksumKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("ADLER32".parse::<ChecksumKind>().unwrap(), ChecksumKind::Adler32);
        assert_eq!("auto".parse::<ChecksumKind>().unwrap(), ChecksumKind::Adler32);
        assert_eq!("zcrc32".parse::<ChecksumKind>().unwrap(), ChecksumKind::Zcrc32);
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let err = "md5".parse::<ChecksumKind>().unwrap_err();
        assert_eq!(err, ChecksumError::UnknownAlgorithm("md5".into()));
    }

    #[test]
    fn fresh_algorithm_reports_its_kind() {
        for kind in ChecksumKind::ALL {
            assert_eq!(kind.algorithm().kind(), kind);
        }
    }
}
