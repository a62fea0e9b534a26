use std::fmt;

use cephsum_checksum::{ChecksumKind, ChecksumValue};
use cephsum_types::ByteOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{RecordCodec, NAME_SIZE, VALUE_SIZE};
use crate::error::{RecordError, RecordResult};

/// Latest modification time a record can carry (year 3000).
pub const MAX_FM_TIME: i64 = 32_503_680_000;

/// A named checksum value plus the timestamps it was computed against.
///
/// `byte_order` records the layout the record was decoded from. Freshly
/// computed records are little-endian.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumRecord {
    name: String,
    fm_time: i64,
    cs_time: i32,
    value: Vec<u8>,
    byte_order: ByteOrder,
}

impl ChecksumRecord {
    /// Build a record, validating the name and value against the field sizes.
    ///
    /// Registered algorithms must carry exactly their native width; unknown
    /// names are accepted with any non-empty value that fits. `fm_time` must
    /// lie in `0..=MAX_FM_TIME`.
    pub fn new(
        name: impl Into<String>,
        fm_time: i64,
        cs_time: i32,
        value: Vec<u8>,
    ) -> RecordResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        validate_fm_time(fm_time)?;
        validate_value(&name, value.len())?;
        Ok(Self {
            name,
            fm_time,
            cs_time,
            value,
            byte_order: ByteOrder::default(),
        })
    }

    /// Wrap a freshly computed value.
    ///
    /// `fm_time` is clamped into `0..=MAX_FM_TIME`. `computed_at` is stored
    /// as a delta from the clamped `fm_time`, saturated to the 32-bit field.
    pub fn from_value(value: &ChecksumValue, fm_time: i64, computed_at: i64) -> Self {
        let fm_time = fm_time.clamp(0, MAX_FM_TIME);
        let delta = computed_at.saturating_sub(fm_time);
        let cs_time = delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Self {
            name: value.kind().name().to_string(),
            fm_time,
            cs_time,
            value: value.as_bytes().to_vec(),
            byte_order: ByteOrder::default(),
        }
    }

    /// The same record tagged with another byte order.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered algorithm named by this record, if any.
    pub fn kind(&self) -> Option<ChecksumKind> {
        ChecksumKind::from_name(&self.name)
    }

    /// Object modification time, seconds since the epoch.
    pub fn fm_time(&self) -> i64 {
        self.fm_time
    }

    /// Seconds between `fm_time` and the checksum computation.
    pub fn cs_time(&self) -> i32 {
        self.cs_time
    }

    /// Absolute computation time, seconds since the epoch.
    pub fn computed_at(&self) -> i64 {
        self.fm_time.saturating_add(i64::from(self.cs_time))
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.fm_time, 0)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn checksum_len(&self) -> usize {
        self.value.len()
    }

    /// Lowercase hex of the value, two characters per byte.
    pub fn cksum_as_hex(&self) -> String {
        hex::encode(&self.value)
    }

    pub fn cksum_as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// The value as a typed checksum, when the algorithm is registered.
    pub fn to_value(&self) -> Option<ChecksumValue> {
        let kind = self.kind()?;
        ChecksumValue::from_bytes(kind, &self.value).ok()
    }

    /// Encode in the given byte order.
    pub fn encode(&self, byte_order: ByteOrder) -> Vec<u8> {
        RecordCodec::encode(self, byte_order)
    }

    /// Encode in the canonical write order (little-endian).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode(ByteOrder::Little)
    }
}

impl fmt::Debug for ChecksumRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumRecord")
            .field("name", &self.name)
            .field("value", &self.cksum_as_hex())
            .field("fm_time", &self.fm_time)
            .field("cs_time", &self.cs_time)
            .field("byte_order", &self.byte_order)
            .finish()
    }
}

impl fmt::Display for ChecksumRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} fm_time={} cs_time={} ({}-endian)",
            self.name,
            self.cksum_as_hex(),
            self.fm_time,
            self.cs_time,
            self.byte_order
        )
    }
}

pub(crate) fn validate_name(name: &str) -> RecordResult<()> {
    if name.is_empty() {
        return Err(RecordError::Format("empty algorithm name".into()));
    }
    if name.len() >= NAME_SIZE {
        return Err(RecordError::NameTooLong(name.to_string()));
    }
    if !name.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(RecordError::Format(format!(
            "algorithm name {name:?} is not printable ASCII"
        )));
    }
    Ok(())
}

pub(crate) fn validate_fm_time(fm_time: i64) -> RecordResult<()> {
    if !(0..=MAX_FM_TIME).contains(&fm_time) {
        return Err(RecordError::FmTimeOutOfRange(fm_time));
    }
    Ok(())
}

pub(crate) fn validate_value(name: &str, len: usize) -> RecordResult<()> {
    if len > VALUE_SIZE {
        return Err(RecordError::ValueTooLong(len));
    }
    if len == 0 {
        return Err(RecordError::Format("empty checksum value".into()));
    }
    if let Some(kind) = ChecksumKind::from_name(name) {
        if kind.width() != len {
            return Err(RecordError::WidthMismatch {
                algorithm: name.to_string(),
                expected: kind.width(),
                actual: len,
            });
        }
    }
    Ok(())
}
