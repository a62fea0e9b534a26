use cephsum_checksum::Accumulator;
use cephsum_record::{ChecksumRecord, RecordCodec, MAX_FM_TIME};
use cephsum_store::{ObjectStore, StoreError};
use cephsum_types::{ByteOrder, ObjectRef};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineResult;

/// Where a reconciled record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumSource {
    Metadata,
    File,
}

/// A checksum record together with how it was obtained.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reconciled {
    pub record: ChecksumRecord,
    pub source: ChecksumSource,
    /// Bytes read, when the record was computed from content.
    pub object_size: Option<u64>,
}

impl Reconciled {
    fn from_metadata(record: ChecksumRecord) -> Self {
        Self {
            record,
            source: ChecksumSource::Metadata,
            object_size: None,
        }
    }

    /// Checksum value as lowercase hex.
    pub fn hex(&self) -> String {
        self.record.cksum_as_hex()
    }
}

/// Outcome of [`ReconciliationEngine::verify`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Verification {
    pub stored: Option<Reconciled>,
    pub computed: Option<Reconciled>,
    pub matched: bool,
}

impl Verification {
    /// The stored record, if it matched the content.
    pub fn into_record(self) -> Option<Reconciled> {
        if self.matched {
            self.stored
        } else {
            None
        }
    }
}

/// Reconciles the cached checksum attribute of objects in one store.
pub struct ReconciliationEngine<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    config: EngineConfig,
}

impl<'a, S: ObjectStore + ?Sized> ReconciliationEngine<'a, S> {
    pub fn new(store: &'a S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decode the stored record, if present and decodable.
    ///
    /// Never reads content. A missing object is an error; a missing or
    /// undecodable attribute is `None`.
    pub fn get_from_metadata(&self, object: &ObjectRef) -> EngineResult<Option<Reconciled>> {
        let attr = self.config.attr_name.as_str();
        let Some(raw) = self.store.get_attr(object, attr)? else {
            debug!(%object, attr, "no checksum attribute");
            return Ok(None);
        };
        match RecordCodec::decode(&raw) {
            Ok(record) => {
                if RecordCodec::matching_orders(&raw).len() > 1 {
                    debug!(
                        %object,
                        attr,
                        "record plausible in both byte orders; read as big endian"
                    );
                }
                info!(
                    %object,
                    attr,
                    checksum = %record.cksum_as_hex(),
                    byte_order = %record.byte_order(),
                    "checksum from metadata"
                );
                Ok(Some(Reconciled::from_metadata(record)))
            }
            Err(e) => {
                warn!(
                    %object,
                    attr,
                    len = raw.len(),
                    error = %e,
                    "stored checksum attribute is undecodable"
                );
                Ok(None)
            }
        }
    }

    /// Compute a fresh record by streaming the whole object.
    ///
    /// A missing object is an error. Content that cannot be read yields
    /// `None`.
    pub fn get_from_file(&self, object: &ObjectRef) -> EngineResult<Option<Reconciled>> {
        let stat = self.store.stat(object)?;
        let chunks = match self.store.read_chunks(object, self.config.read_size) {
            Ok(chunks) => chunks,
            Err(StoreError::Io(e)) => {
                warn!(%object, error = %e, "cannot open object content");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut acc = Accumulator::new(self.config.algorithm);
        for chunk in chunks {
            match chunk {
                Ok(buf) => acc.update(&buf),
                Err(e) => {
                warn!(%object, offset = acc.bytes_read(), error = %e, "content read failed");
                    return Ok(None);
                }
            }
        }
        if acc.bytes_read() != stat.size {
            warn!(
                %object,
                expected = stat.size,
                read = acc.bytes_read(),
                "object size changed while reading"
            );
        }

        if !(0..=MAX_FM_TIME).contains(&stat.mtime) {
            warn!(%object, mtime = stat.mtime, "modification time out of record range; clamping");
        }

        let value = acc.value();
        let computed_at = chrono::Utc::now().timestamp();
        let record = ChecksumRecord::from_value(&value, stat.mtime, computed_at);
        info!(
            %object,
            algorithm = %value.kind(),
            checksum = %value,
            bytes = acc.bytes_read(),
            buffers = acc.buffers(),
            "computed checksum from content"
        );
        Ok(Some(Reconciled {
            record,
            source: ChecksumSource::File,
            object_size: Some(acc.bytes_read()),
        }))
    }

    /// Stored record if usable, else a freshly computed one. Never writes.
    pub fn get_checksum(&self, object: &ObjectRef) -> EngineResult<Option<Reconciled>> {
        if let Some(found) = self.get_from_metadata(object)? {
            return Ok(Some(found));
        }
        self.get_from_file(object)
    }

    /// Return the stored record, computing and caching it when absent.
    ///
    /// A stored big-endian record is rewritten in little-endian form. A
    /// freshly computed record is written with an exclusive create; if
    /// another writer got there first, their record is returned instead.
    pub fn inget(&self, object: &ObjectRef) -> EngineResult<Option<Reconciled>> {
        let attr = self.config.attr_name.as_str();

        if let Some(mut found) = self.get_from_metadata(object)? {
            if self.config.rewrite_to_little_endian && is_unambiguously_big(&found.record) {
                info!(%object, attr, "rewriting big endian record as little endian");
                self.store.set_attr(object, attr, &found.record.to_bytes(), false)?;
                found.record = found.record.with_byte_order(ByteOrder::Little);
            }
            return Ok(Some(found));
        }

        let Some(computed) = self.get_from_file(object)? else {
            warn!(%object, "no checksum possible");
            return Ok(None);
        };

        match self.store.set_attr(object, attr, &computed.record.to_bytes(), true) {
            Ok(()) => {
                info!(%object, attr, checksum = %computed.hex(), "stored computed checksum");
                Ok(Some(computed))
            }
            Err(e) if e.is_already_exists() => {
                debug!(%object, attr, "attribute created concurrently; re-reading");
                match self.get_from_metadata(object)? {
                    Some(theirs) => Ok(Some(theirs)),
                    None => Ok(Some(computed)),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Compare the stored record against the content. Never writes.
    ///
    /// Content is only read when a record is stored or `force_file_read`
    /// is set. No stored record never counts as a match.
    pub fn verify(&self, object: &ObjectRef, force_file_read: bool) -> EngineResult<Verification> {
        let stored = self.get_from_metadata(object)?;
        let computed = if stored.is_some() || force_file_read {
            self.get_from_file(object)?
        } else {
            None
        };
        let matched = match (&stored, &computed) {
            (Some(s), Some(c)) => s.record.cksum_as_bytes() == c.record.cksum_as_bytes(),
            _ => false,
        };
        info!(
            %object,
            stored = ?stored.as_ref().map(Reconciled::hex),
            computed = ?computed.as_ref().map(Reconciled::hex),
            matched,
            "verified"
        );
        Ok(Verification {
            stored,
            computed,
            matched,
        })
    }
}

/// Decoded as big-endian and not also plausible as little-endian.
fn is_unambiguously_big(record: &ChecksumRecord) -> bool {
    record.byte_order() == ByteOrder::Big
        && RecordCodec::matching_orders(&record.encode(ByteOrder::Big)) == [ByteOrder::Big]
}
