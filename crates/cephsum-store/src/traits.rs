use bytes::Bytes;
use cephsum_types::ObjectRef;

use crate::error::StoreResult;

/// Size and modification time of a stored object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectStat {
    pub size: u64,
    /// Seconds since the epoch.
    pub mtime: i64,
}

/// A finite, forward-only sequence of content chunks.
///
/// Each item is at most the requested chunk size. The stream cannot be
/// restarted; an `Err` item ends the useful part of the stream.
pub type ChunkStream<'a> = Box<dyn Iterator<Item = StoreResult<Bytes>> + Send + 'a>;

/// Extended-attribute access for stored objects.
///
/// All implementations must satisfy these invariants:
/// - Operations on a missing object fail with `StoreError::NotFound`.
/// - A missing attribute is `Ok(None)`, not an error.
/// - `set_attr` with `exclusive = true` is an atomic conditional create:
///   it fails with `StoreError::AlreadyExists` if the attribute is present
///   and never overwrites.
pub trait MetadataStore: Send + Sync {
    /// Size and modification time of an object.
    fn stat(&self, object: &ObjectRef) -> StoreResult<ObjectStat>;

    /// Read an attribute. Returns `Ok(None)` if it is not set.
    fn get_attr(&self, object: &ObjectRef, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write an attribute, either unconditionally or as an exclusive create.
    fn set_attr(
        &self,
        object: &ObjectRef,
        key: &str,
        value: &[u8],
        exclusive: bool,
    ) -> StoreResult<()>;

    /// Remove an attribute. Returns `true` if it existed.
    fn remove_attr(&self, object: &ObjectRef, key: &str) -> StoreResult<bool>;
}

/// Chunked content reads.
pub trait ContentSource: Send + Sync {
    /// Open a lazy chunk stream over the object's content.
    ///
    /// Fails up front with `StoreError::NotFound` for a missing object and
    /// `StoreError::InvalidChunkSize` for a zero chunk size.
    fn read_chunks<'a>(&'a self, object: &ObjectRef, chunk_size: usize)
        -> StoreResult<ChunkStream<'a>>;
}

/// A backend that provides both attributes and content.
pub trait ObjectStore: MetadataStore + ContentSource {}

impl<T: MetadataStore + ContentSource + ?Sized> ObjectStore for T {}
