//! zlib CRC-32 (IEEE polynomial), as used by xrootd's `zcrc32`.

use crate::accumulator::ChecksumAlgorithm;
use crate::kind::ChecksumKind;
use crate::value::ChecksumValue;

/// Rolling CRC-32 state. Starts at 0.
#[derive(Clone, Default)]
pub struct Zcrc32 {
    hasher: crc32fast::Hasher,
}

impl Zcrc32 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously computed value.
    pub fn from_state(state: u32) -> Self {
        Self {
            hasher: crc32fast::Hasher::new_with_initial(state),
        }
    }

    pub fn state(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl std::fmt::Debug for Zcrc32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zcrc32({:08x})", self.state())
    }
}

impl ChecksumAlgorithm for Zcrc32 {
    fn kind(&self) -> ChecksumKind {
        ChecksumKind::Zcrc32
    }

    fn update(&mut self, buf: &[u8]) {
        self.hasher.update(buf);
    }

    fn value(&self) -> ChecksumValue {
        ChecksumValue::from_u32(ChecksumKind::Zcrc32, self.state())
    }
}
