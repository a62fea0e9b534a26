use cephsum_checksum::ChecksumKind;
use serde::{Deserialize, Serialize};

/// Default chunk size for content reads (64 MiB).
pub const DEFAULT_READ_SIZE: usize = 64 * 1024 * 1024;

/// Settings for one reconciliation, passed explicitly to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extended attribute holding the checksum record.
    pub attr_name: String,
    /// Chunk size for content reads, in bytes.
    pub read_size: usize,
    /// Algorithm used when recomputing from content.
    pub algorithm: ChecksumKind,
    /// Rewrite big-endian records as little-endian during `inget`.
    pub rewrite_to_little_endian: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_algorithm(ChecksumKind::default())
    }
}

impl EngineConfig {
    /// Defaults for `kind`, storing under `XrdCks.<name>`.
    pub fn for_algorithm(kind: ChecksumKind) -> Self {
        Self {
            attr_name: format!("XrdCks.{}", kind.name()),
            read_size: DEFAULT_READ_SIZE,
            algorithm: kind,
            rewrite_to_little_endian: true,
        }
    }

    pub fn with_read_size(mut self, read_size: usize) -> Self {
        self.read_size = read_size;
        self
    }

    pub fn with_attr_name(mut self, attr_name: impl Into<String>) -> Self {
        self.attr_name = attr_name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = EngineConfig::default();
        assert_eq!(c.attr_name, "XrdCks.adler32");
        assert_eq!(c.read_size, 64 * 1024 * 1024);
        assert_eq!(c.algorithm, ChecksumKind::Adler32);
        assert!(c.rewrite_to_little_endian);
    }

    #[test]
    fn attr_name_follows_algorithm() {
        let c = EngineConfig::for_algorithm(ChecksumKind::Zcrc32);
        assert_eq!(c.attr_name, "XrdCks.zcrc32");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: EngineConfig = toml::from_str("read_size = 4096\n").unwrap();
        assert_eq!(c.read_size, 4096);
        assert_eq!(c.attr_name, "XrdCks.adler32");
    }
}
