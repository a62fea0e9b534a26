//! Streaming checksum accumulators for cephsum.
//!
//! Content is read in bounded chunks, so every algorithm here is fed one
//! buffer at a time. For any partition of a byte sequence the final value is
//! the same as a single pass over the concatenation.
//!
//! - [`ChecksumKind`]: registry of known algorithms
//! - [`ChecksumAlgorithm`]: capability set every algorithm implements
//! - [`Accumulator`]: algorithm-agnostic driver with diagnostic counters
//! - [`ChecksumValue`]: finished value, exposed as hex or raw bytes

pub mod accumulator;
pub mod adler32;
pub mod error;
pub mod kind;
pub mod value;
pub mod zcrc32;

pub use accumulator::{calc, Accumulator, ChecksumAlgorithm};
pub use adler32::Adler32;
pub use error::{ChecksumError, ChecksumResult};
pub use kind::ChecksumKind;
pub use value::ChecksumValue;
pub use zcrc32::Zcrc32;
