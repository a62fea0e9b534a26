//! The checksum record cached as an extended attribute on stored objects.
//!
//! The on-disk form is a fixed 96-byte structure laid out like xrootd's
//! `XrdCksData`. Historic writers disagree on byte order, so decoding accepts
//! both layouts and remembers which one matched.
//!
//! # Layout
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 16 | algorithm name, NUL-padded |
//! | 16 | 8 | `fm_time`, object modification time (signed) |
//! | 24 | 4 | `cs_time`, seconds from `fm_time` to computation (signed) |
//! | 28 | 3 | reserved, zero |
//! | 31 | 1 | value length |
//! | 32 | 64 | value bytes, zero-padded |

pub mod codec;
pub mod error;
pub mod record;

pub use codec::{RecordCodec, NAME_SIZE, RECORD_SIZE, VALUE_SIZE};
pub use error::{RecordError, RecordResult};
pub use record::{ChecksumRecord, MAX_FM_TIME};
