//! Adler-32 as defined by RFC 1950 (the zlib variant).

use crate::accumulator::ChecksumAlgorithm;
use crate::error::{ChecksumError, ChecksumResult};
use crate::kind::ChecksumKind;
use crate::value::ChecksumValue;

const MOD_ADLER: u32 = 65_521;

/// Largest run of bytes that can be summed before `b` may overflow a `u32`.
const NMAX: usize = 5_552;

/// Rolling Adler-32 state. Starts at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Adler32 {
    state: u32,
}

impl Adler32 {
    pub const IDENTITY: u32 = 1;

    pub fn new() -> Self {
        Self {
            state: Self::IDENTITY,
        }
    }

    /// Resume from a previously computed value.
    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Current numeric value.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Fold `buf` into `state` and return the new value.
    pub fn fold(state: u32, buf: &[u8]) -> u32 {
        let mut a = state & 0xffff;
        let mut b = state >> 16;
        for block in buf.chunks(NMAX) {
            for &byte in block {
                a += u32::from(byte);
                b += a;
            }
            a %= MOD_ADLER;
            b %= MOD_ADLER;
        }
        (b << 16) | a
    }

    /// Numeric value to its 8-character lowercase hex form.
    pub fn to_hex(value: u32) -> String {
        hex::encode(value.to_be_bytes())
    }

    /// Parse the 8-character hex form back into the numeric value.
    pub fn from_hex(s: &str) -> ChecksumResult<u32> {
        let bytes = hex::decode(s).map_err(|e| ChecksumError::InvalidHex(e.to_string()))?;
        let arr: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ChecksumError::InvalidLength {
                algorithm: ChecksumKind::Adler32.name(),
                expected: 4,
                actual: bytes.len(),
            })?;
        Ok(u32::from_be_bytes(arr))
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecksumAlgorithm for Adler32 {
    fn kind(&self) -> ChecksumKind {
        ChecksumKind::Adler32
    }

    fn update(&mut self, buf: &[u8]) {
        self.state = Self::fold(self.state, buf);
    }

    fn value(&self) -> ChecksumValue {
        ChecksumValue::from_u32(ChecksumKind::Adler32, self.state)
    }
}
