use cephsum_types::ByteOrder;

use crate::error::{RecordError, RecordResult};
use crate::record::{validate_fm_time, validate_name, validate_value, ChecksumRecord};

/// Total encoded size of a record.
pub const RECORD_SIZE: usize = 96;
/// Size of the NUL-padded name field.
pub const NAME_SIZE: usize = 16;
/// Size of the zero-padded value field.
pub const VALUE_SIZE: usize = 64;

const FM_TIME: usize = 16;
const CS_TIME: usize = 24;
const RESERVED: usize = 28;
const LENGTH: usize = 31;
const VALUE: usize = 32;

/// Encoder/decoder for the fixed 96-byte record.
///
/// Decoding tries big-endian first, then little-endian, and accepts the first
/// layout whose fields look plausible. Only the two timestamp fields depend on
/// byte order, so a record whose timestamps happen to be plausible both ways
/// decodes as big-endian. [`RecordCodec::matching_orders`] reports such cases.
pub struct RecordCodec;

impl RecordCodec {
    /// Encode a record: fixed size, zero-padded, deterministic.
    pub fn encode(record: &ChecksumRecord, order: ByteOrder) -> Vec<u8> {
        let mut buf = vec![0u8; RECORD_SIZE];
        let name = record.name().as_bytes();
        buf[..name.len()].copy_from_slice(name);

        let (fm, cs) = match order {
            ByteOrder::Big => (
                record.fm_time().to_be_bytes(),
                record.cs_time().to_be_bytes(),
            ),
            ByteOrder::Little => (
                record.fm_time().to_le_bytes(),
                record.cs_time().to_le_bytes(),
            ),
        };
        buf[FM_TIME..CS_TIME].copy_from_slice(&fm);
        buf[CS_TIME..RESERVED].copy_from_slice(&cs);

        let value = record.cksum_as_bytes();
        buf[LENGTH] = value.len() as u8;
        buf[VALUE..VALUE + value.len()].copy_from_slice(value);
        buf
    }

    /// Decode a record, detecting its byte order.
    pub fn decode(data: &[u8]) -> RecordResult<ChecksumRecord> {
        check_size(data)?;
        let mut reasons = Vec::with_capacity(ByteOrder::DETECTION_ORDER.len());
        for order in ByteOrder::DETECTION_ORDER {
            match Self::decode_as(data, order) {
                Ok(record) => return Ok(record),
                Err(e) => reasons.push(e.to_string()),
            }
        }
        Err(RecordError::Format(reasons.join("; ")))
    }

    /// Decode assuming one specific byte order.
    pub fn decode_as(data: &[u8], order: ByteOrder) -> RecordResult<ChecksumRecord> {
        check_size(data)?;
        let layout = |reason: String| RecordError::Layout { order, reason };

        let name_field = &data[..NAME_SIZE];
        let name_len = name_field
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| layout("name field is not NUL-terminated".into()))?;
        if name_field[name_len..].iter().any(|b| *b != 0) {
            return Err(layout("name field has bytes after the terminator".into()));
        }
        let name = std::str::from_utf8(&name_field[..name_len])
            .map_err(|_| layout("name is not ASCII".into()))?;
        validate_name(name).map_err(|e| layout(e.to_string()))?;

        let fm_bytes: [u8; 8] = data[FM_TIME..CS_TIME]
            .try_into()
            .map_err(|_| layout("short fm_time".into()))?;
        let cs_bytes: [u8; 4] = data[CS_TIME..RESERVED]
            .try_into()
            .map_err(|_| layout("short cs_time".into()))?;
        let (fm_time, cs_time) = match order {
            ByteOrder::Big => (i64::from_be_bytes(fm_bytes), i32::from_be_bytes(cs_bytes)),
            ByteOrder::Little => (i64::from_le_bytes(fm_bytes), i32::from_le_bytes(cs_bytes)),
        };
        validate_fm_time(fm_time).map_err(|e| layout(e.to_string()))?;

        if data[RESERVED..LENGTH].iter().any(|b| *b != 0) {
            return Err(layout("reserved bytes are not zero".into()));
        }

        let len = usize::from(data[LENGTH]);
        validate_value(name, len).map_err(|e| layout(e.to_string()))?;
        let value = data[VALUE..VALUE + len].to_vec();

        Ok(ChecksumRecord::new(name, fm_time, cs_time, value)?.with_byte_order(order))
    }

    /// Every byte order under which `data` decodes.
    ///
    /// More than one entry means the order detection in [`RecordCodec::decode`]
    /// was a guess.
    pub fn matching_orders(data: &[u8]) -> Vec<ByteOrder> {
        ByteOrder::DETECTION_ORDER
            .into_iter()
            .filter(|order| Self::decode_as(data, *order).is_ok())
            .collect()
    }
}

fn check_size(data: &[u8]) -> RecordResult<()> {
    if data.len() != RECORD_SIZE {
        return Err(RecordError::Format(format!(
            "expected {RECORD_SIZE} bytes, got {}",
            data.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MAX_FM_TIME;
    use cephsum_checksum::{ChecksumKind, ChecksumValue};
    use proptest::prelude::*;

    /// A record as written by xrootd on a production storage node.
    const XRD_RECORD: [u8; RECORD_SIZE] = {
        let mut buf = [0u8; RECORD_SIZE];
        let head: [u8; 36] = [
            b'a', b'd', b'l', b'e', b'r', b'3', b'2', 0, 0, 0, 0, 0, 0, 0, 0, 0, // name
            0x49, 0xfe, 0xbd, 0x60, 0, 0, 0, 0, // fm_time
            0xf5, 0xf1, 0xff, 0xff, // cs_time
            0, 0, 0, 4, // reserved + length
            0x88, 0xb8, 0xf4, 0xa2, // value
        ];
        let mut i = 0;
        while i < head.len() {
            buf[i] = head[i];
            i += 1;
        }
        buf
    };

    #[test]
    fn decodes_xrootd_record() {
        let rec = RecordCodec::decode(&XRD_RECORD).unwrap();
        assert_eq!(rec.name(), "adler32");
        assert_eq!(rec.cksum_as_hex(), "88b8f4a2");
        assert_eq!(rec.cksum_as_bytes(), &[0x88, 0xb8, 0xf4, 0xa2]);
        assert_eq!(rec.fm_time(), 1_623_064_137);
        assert_eq!(rec.cs_time(), -3595);
        assert_eq!(rec.byte_order(), ByteOrder::Little);
    }

    #[test]
    fn decodes_big_endian_form_of_same_record() {
        let little = RecordCodec::decode(&XRD_RECORD).unwrap();
        let big_bytes = little.encode(ByteOrder::Big);
        let big = RecordCodec::decode(&big_bytes).unwrap();
        assert_eq!(big.byte_order(), ByteOrder::Big);
        assert_eq!(big.cksum_as_hex(), "88b8f4a2");
        assert_eq!(big.fm_time(), little.fm_time());
        assert_eq!(big.cs_time(), little.cs_time());
    }

    #[test]
    fn xrootd_record_matches_only_little_endian() {
        assert_eq!(RecordCodec::matching_orders(&XRD_RECORD), vec![ByteOrder::Little]);
    }

    #[test]
    fn zero_timestamps_are_ambiguous_and_decode_big() {
        let rec = ChecksumRecord::new("adler32", 0, 0, vec![0, 0, 0, 1]).unwrap();
        let bytes = rec.encode(ByteOrder::Little);
        assert_eq!(
            RecordCodec::matching_orders(&bytes),
            vec![ByteOrder::Big, ByteOrder::Little]
        );
        assert_eq!(RecordCodec::decode(&bytes).unwrap().byte_order(), ByteOrder::Big);
    }

    #[test]
    fn encode_is_fixed_size_and_zero_padded() {
        let rec = RecordCodec::decode(&XRD_RECORD).unwrap();
        let bytes = rec.encode(ByteOrder::Little);
        assert_eq!(bytes.len(), RECORD_SIZE);
        assert_eq!(bytes, XRD_RECORD.to_vec());
        assert!(bytes[VALUE + 4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn wrong_size_is_format_error() {
        let err = RecordCodec::decode(&XRD_RECORD[..95]).unwrap_err();
        assert!(matches!(err, RecordError::Format(_)));
        let mut long = XRD_RECORD.to_vec();
        long.push(0);
        assert!(RecordCodec::decode(&long).is_err());
    }

    #[test]
    fn garbage_is_format_error() {
        let err = RecordCodec::decode(&[0xffu8; RECORD_SIZE]).unwrap_err();
        assert!(matches!(err, RecordError::Format(_)));
    }

    #[test]
    fn wrong_width_for_known_algorithm_is_rejected() {
        let mut bytes = XRD_RECORD;
        bytes[LENGTH] = 8;
        assert!(RecordCodec::decode(&bytes).is_err());
    }

    #[test]
    fn nonzero_reserved_is_rejected() {
        let mut bytes = XRD_RECORD;
        bytes[RESERVED] = 1;
        assert!(RecordCodec::decode(&bytes).is_err());
    }

    #[test]
    fn pre_epoch_mtime_still_decodes() {
        let value = ChecksumValue::from_hex(ChecksumKind::Adler32, "01f800cb").unwrap();
        let rec = ChecksumRecord::from_value(&value, -5, 1_700_000_000);
        for order in ByteOrder::DETECTION_ORDER {
            let decoded = RecordCodec::decode(&rec.encode(order)).unwrap();
            assert_eq!(decoded.cksum_as_hex(), "01f800cb");
            assert_eq!(decoded.fm_time(), 0);
        }
    }

    #[test]
    fn unknown_algorithm_decodes() {
        let rec = ChecksumRecord::new("md5", 1_600_000_000, 5, vec![0x11; 16]).unwrap();
        let decoded = RecordCodec::decode(&rec.to_bytes()).unwrap();
        assert_eq!(decoded.name(), "md5");
        assert_eq!(decoded.checksum_len(), 16);
    }

    fn arb_record() -> impl Strategy<Value = ChecksumRecord> {
        (
            "[a-z0-9]{1,15}",
            0i64..=MAX_FM_TIME,
            any::<i32>(),
            proptest::collection::vec(any::<u8>(), 1..=VALUE_SIZE),
        )
            .prop_filter_map("width must match registered algorithms", |(name, fm, cs, value)| {
                ChecksumRecord::new(name, fm, cs, value).ok()
            })
    }

    proptest! {
        #[test]
        fn roundtrip_each_byte_order(rec in arb_record()) {
            for order in ByteOrder::DETECTION_ORDER {
                let bytes = rec.encode(order);
                let decoded = RecordCodec::decode_as(&bytes, order).unwrap();
                prop_assert_eq!(decoded, rec.clone().with_byte_order(order));
            }
        }

        #[test]
        fn detected_decode_preserves_value(rec in arb_record()) {
            for order in ByteOrder::DETECTION_ORDER {
                let decoded = RecordCodec::decode(&rec.encode(order)).unwrap();
                prop_assert_eq!(decoded.cksum_as_bytes(), rec.cksum_as_bytes());
                prop_assert_eq!(decoded.name(), rec.name());
            }
        }
    }
}
