use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use bytes::Bytes;
use cephsum_types::ObjectRef;

use crate::error::{StoreError, StoreResult};
use crate::traits::{ChunkStream, ContentSource, MetadataStore, ObjectStat};

#[derive(Clone, Debug)]
struct MemObject {
    data: Bytes,
    mtime: i64,
    attrs: BTreeMap<String, Vec<u8>>,
}

/// Objects and their attributes kept in process memory.
///
/// The exclusive attribute create runs under the write lock, so it is atomic
/// with respect to every other caller of the same store.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectRef, MemObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Create or replace an object. Replacing drops its attributes.
    pub fn put_object(&self, object: ObjectRef, data: impl Into<Bytes>, mtime: i64) {
        let obj = MemObject {
            data: data.into(),
            mtime,
            attrs: BTreeMap::new(),
        };
        self.objects.write().expect("lock poisoned").insert(object, obj);
    }

    /// Delete an object. Returns `true` if it existed.
    pub fn remove_object(&self, object: &ObjectRef) -> bool {
        self.objects
            .write()
            .expect("lock poisoned")
            .remove(object)
            .is_some()
    }

    /// Object count.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Sorted attribute keys set on an object.
    pub fn attr_keys(&self, object: &ObjectRef) -> StoreResult<Vec<String>> {
        let map = self.objects.read().expect("lock poisoned");
        let obj = map
            .get(object)
            .ok_or_else(|| StoreError::NotFound(object.clone()))?;
        Ok(obj.attrs.keys().cloned().collect())
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataStore for InMemoryObjectStore {
    fn stat(&self, object: &ObjectRef) -> StoreResult<ObjectStat> {
        let map = self.objects.read().expect("lock poisoned");
        let obj = map
            .get(object)
            .ok_or_else(|| StoreError::NotFound(object.clone()))?;
        Ok(ObjectStat {
            size: obj.data.len() as u64,
            mtime: obj.mtime,
        })
    }

    fn get_attr(&self, object: &ObjectRef, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.objects.read().expect("lock poisoned");
        let obj = map
            .get(object)
            .ok_or_else(|| StoreError::NotFound(object.clone()))?;
        Ok(obj.attrs.get(key).cloned())
    }

    fn set_attr(
        &self,
        object: &ObjectRef,
        key: &str,
        value: &[u8],
        exclusive: bool,
    ) -> StoreResult<()> {
        let mut map = self.objects.write().expect("lock poisoned");
        let obj = map
            .get_mut(object)
            .ok_or_else(|| StoreError::NotFound(object.clone()))?;
        if exclusive && obj.attrs.contains_key(key) {
            return Err(StoreError::AlreadyExists {
                object: object.clone(),
                key: key.to_string(),
            });
        }
        obj.attrs.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove_attr(&self, object: &ObjectRef, key: &str) -> StoreResult<bool> {
        let mut map = self.objects.write().expect("lock poisoned");
        let obj = map
            .get_mut(object)
            .ok_or_else(|| StoreError::NotFound(object.clone()))?;
        Ok(obj.attrs.remove(key).is_some())
    }
}

impl ContentSource for InMemoryObjectStore {
    fn read_chunks<'a>(
        &'a self,
        object: &ObjectRef,
        chunk_size: usize,
    ) -> StoreResult<ChunkStream<'a>> {
        if chunk_size == 0 {
            return Err(StoreError::InvalidChunkSize);
        }
        let data = {
            let map = self.objects.read().expect("lock poisoned");
            map.get(object)
                .ok_or_else(|| StoreError::NotFound(object.clone()))?
                .data
                .clone()
        };
        let len = data.len();
        Ok(Box::new((0..len).step_by(chunk_size).map(move |start| {
            Ok(data.slice(start..(start + chunk_size).min(len)))
        })))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("objects", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(name: &str) -> ObjectRef {
        ObjectRef::new("dteam", name)
    }

    fn store_with(name: &str, data: &'static [u8]) -> InMemoryObjectStore {
        let store = InMemoryObjectStore::new();
        store.put_object(obj(name), data, 1_600_000_000);
        store
    }

    // -----------------------------------------------------------------------
    // Stat and attributes
    // -----------------------------------------------------------------------

    #[test]
    fn stat_reports_size_and_mtime() {
        let store = store_with("a", b"hello");
        let st = store.stat(&obj("a")).unwrap();
        assert_eq!(st.size, 5);
        assert_eq!(st.mtime, 1_600_000_000);
    }

    #[test]
    fn stat_missing_is_not_found() {
        let store = InMemoryObjectStore::new();
        let err = store.stat(&obj("missing")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn missing_attr_is_none() {
        let store = store_with("a", b"x");
        assert_eq!(store.get_attr(&obj("a"), "XrdCks.adler32").unwrap(), None);
    }

    #[test]
    fn attr_on_missing_object_is_not_found() {
        let store = InMemoryObjectStore::new();
        assert!(matches!(
            store.get_attr(&obj("nope"), "k").unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.set_attr(&obj("nope"), "k", b"v", false).unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn set_then_get_attr() {
        let store = store_with("a", b"x");
        store.set_attr(&obj("a"), "k", b"v1", false).unwrap();
        assert_eq!(store.get_attr(&obj("a"), "k").unwrap(), Some(b"v1".to_vec()));
        store.set_attr(&obj("a"), "k", b"v2", false).unwrap();
        assert_eq!(store.get_attr(&obj("a"), "k").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn exclusive_create_never_overwrites() {
        let store = store_with("a", b"x");
        store.set_attr(&obj("a"), "k", b"first", true).unwrap();
        let err = store.set_attr(&obj("a"), "k", b"second", true).unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(store.get_attr(&obj("a"), "k").unwrap(), Some(b"first".to_vec()));
    }

    #[test]
    fn remove_attr_reports_presence() {
        let store = store_with("a", b"x");
        store.set_attr(&obj("a"), "k", b"v", false).unwrap();
        assert!(store.remove_attr(&obj("a"), "k").unwrap());
        assert!(!store.remove_attr(&obj("a"), "k").unwrap());
        assert!(store.attr_keys(&obj("a")).unwrap().is_empty());
    }

    #[test]
    fn replacing_object_drops_attrs() {
        let store = store_with("a", b"x");
        store.set_attr(&obj("a"), "k", b"v", false).unwrap();
        store.put_object(obj("a"), &b"y"[..], 1);
        assert_eq!(store.get_attr(&obj("a"), "k").unwrap(), None);
    }

    // -----------------------------------------------------------------------
    // Chunked reads
    // -----------------------------------------------------------------------

    #[test]
    fn chunks_are_bounded_and_complete() {
        let store = store_with("a", b"0123456789");
        let chunks: Vec<Bytes> = store
            .read_chunks(&obj("a"), 4)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 4));
        assert_eq!(chunks.concat(), b"0123456789".to_vec());
    }

    #[test]
    fn empty_object_has_no_chunks() {
        let store = store_with("empty", b"");
        assert_eq!(store.read_chunks(&obj("empty"), 8).unwrap().count(), 0);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let store = store_with("a", b"x");
        assert!(matches!(
            store.read_chunks(&obj("a"), 0).err(),
            Some(StoreError::InvalidChunkSize)
        ));
    }

    #[test]
    fn read_missing_is_not_found() {
        let store = InMemoryObjectStore::new();
        assert!(matches!(
            store.read_chunks(&obj("missing"), 8).err(),
            Some(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn len_and_remove() {
        let store = store_with("a", b"x");
        assert_eq!(store.len(), 1);
        assert!(store.remove_object(&obj("a")));
        assert!(store.is_empty());
    }
}
