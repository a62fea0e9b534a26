use tracing::trace;

use crate::kind::ChecksumKind;
use crate::value::ChecksumValue;

/// The capability set every checksum algorithm provides.
///
/// Implementations start at their identity element and fold buffers in
/// order. Feeding the same bytes in any chunking must yield the same value.
pub trait ChecksumAlgorithm: Send {
    /// Which registered algorithm this is.
    fn kind(&self) -> ChecksumKind;

    /// Fold the next buffer into the running state.
    fn update(&mut self, buf: &[u8]);

    /// The value for everything fed so far.
    fn value(&self) -> ChecksumValue;
}

/// Algorithm-agnostic driver that feeds buffers to an algorithm and keeps
/// diagnostic counters.
pub struct Accumulator {
    algorithm: Box<dyn ChecksumAlgorithm>,
    bytes_read: u64,
    buffers: u64,
}

impl Accumulator {
    /// A fresh accumulator at the algorithm's identity element.
    pub fn new(kind: ChecksumKind) -> Self {
        Self::with_algorithm(kind.algorithm())
    }

    /// Drive a caller-supplied algorithm instance.
    pub fn with_algorithm(algorithm: Box<dyn ChecksumAlgorithm>) -> Self {
        Self {
            algorithm,
            bytes_read: 0,
            buffers: 0,
        }
    }

    pub fn kind(&self) -> ChecksumKind {
        self.algorithm.kind()
    }

    /// Feed one buffer.
    pub fn update(&mut self, buf: &[u8]) {
        self.algorithm.update(buf);
        self.bytes_read += buf.len() as u64;
        self.buffers += 1;
        trace!(
            algorithm = %self.kind(),
            value = %self.algorithm.value(),
            len = buf.len(),
            total = self.bytes_read,
            "checksum step"
        );
    }

    /// Feed every buffer in `chunks` and return the resulting value.
    pub fn calc<I, B>(&mut self, chunks: I) -> ChecksumValue
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        for chunk in chunks {
            self.update(chunk.as_ref());
        }
        self.value()
    }

    /// The value for everything fed so far.
    pub fn value(&self) -> ChecksumValue {
        self.algorithm.value()
    }

    /// Total bytes consumed.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Number of buffers consumed.
    pub fn buffers(&self) -> u64 {
        self.buffers
    }
}

impl std::fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accumulator")
            .field("kind", &self.kind())
            .field("bytes_read", &self.bytes_read)
            .field("buffers", &self.buffers)
            .finish()
    }
}

/// One-shot helper: checksum `chunks` with a fresh accumulator.
pub fn calc<I, B>(kind: ChecksumKind, chunks: I) -> ChecksumValue
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    Accumulator::new(kind).calc(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_is_identity() {
        let v = calc(ChecksumKind::Adler32, Vec::<&[u8]>::new());
        assert_eq!(v.to_hex(), "00000001");
        let v = calc(ChecksumKind::Zcrc32, Vec::<&[u8]>::new());
        assert_eq!(v.to_hex(), "00000000");
    }

    #[test]
    fn single_empty_buffer_is_identity() {
        let v = calc(ChecksumKind::Adler32, [b"".as_slice()]);
        assert_eq!(v.to_hex(), "00000001");
    }

    #[test]
    fn known_adler32_value() {
        let v = calc(ChecksumKind::Adler32, [b"1234"]);
        assert_eq!(v.to_hex(), "01f800cb");
        assert_eq!(v.internal(), Some(0x01f8_00cb));
    }

    #[test]
    fn counters_track_input() {
        let parts: [&[u8]; 3] = [b"12", b"", b"34"];
        let mut acc = Accumulator::new(ChecksumKind::Adler32);
        acc.calc(parts);
        assert_eq!(acc.bytes_read(), 4);
        assert_eq!(acc.buffers(), 3);
        assert_eq!(acc.value().to_hex(), "01f800cb");
    }

    fn chunked(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
        let mut points: Vec<usize> = cuts.iter().map(|c| c % (data.len() + 1)).collect();
        points.sort_unstable();
        let mut out = Vec::new();
        let mut start = 0;
        for p in points {
            out.push(data[start..p].to_vec());
            start = p;
        }
        out.push(data[start..].to_vec());
        out
    }

    proptest! {
        #[test]
        fn chunking_does_not_change_adler32(
            data in proptest::collection::vec(any::<u8>(), 0..20_000),
            cuts in proptest::collection::vec(any::<usize>(), 0..8),
        ) {
            let whole = calc(ChecksumKind::Adler32, [&data]);
            let parts = calc(ChecksumKind::Adler32, chunked(&data, &cuts));
            prop_assert_eq!(whole, parts);
        }

        #[test]
        fn chunking_does_not_change_zcrc32(
            data in proptest::collection::vec(any::<u8>(), 0..4_096),
            cuts in proptest::collection::vec(any::<usize>(), 0..8),
        ) {
            let whole = calc(ChecksumKind::Zcrc32, [&data]);
            let parts = calc(ChecksumKind::Zcrc32, chunked(&data, &cuts));
            prop_assert_eq!(whole, parts);
        }
    }
}
