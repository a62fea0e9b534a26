//! Directory-backed object store.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/<pool>/<oid...>                      object content
//! <root>/.cephsum-attrs/<pool>/<oid...>/<key> one file per attribute
//! ```
//!
//! Attribute writes go through a temporary file in the target directory.
//! Overwrites are an atomic rename; exclusive creates use a no-clobber
//! persist, which fails if the target already exists.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use bytes::Bytes;
use cephsum_types::ObjectRef;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{ChunkStream, ContentSource, MetadataStore, ObjectStat};

const ATTR_DIR: &str = ".cephsum-attrs";

/// Object store over a local directory tree, one subdirectory per pool.
#[derive(Debug, Clone)]
pub struct DirObjectStore {
    root: PathBuf,
}

impl DirObjectStore {
    /// Open a store rooted at `root`. The directory must exist.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::Io(io::Error::new(
                ErrorKind::NotFound,
                format!("store root {} is not a directory", root.display()),
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write object content, creating parent directories as needed.
    pub fn put_object(&self, object: &ObjectRef, data: &[u8]) -> StoreResult<()> {
        let path = self.object_path(object)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        Ok(())
    }

    fn object_path(&self, object: &ObjectRef) -> StoreResult<PathBuf> {
        let mut path = self.root.join(checked_pool(object)?);
        for component in oid_components(object)? {
            path.push(component);
        }
        Ok(path)
    }

    fn attr_path(&self, object: &ObjectRef, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() || key == "." || key == ".." || key.contains('/') {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let mut path = self.root.join(ATTR_DIR).join(checked_pool(object)?);
        for component in oid_components(object)? {
            path.push(component);
        }
        path.push(key);
        Ok(path)
    }

    /// Metadata for an existing regular file, mapping absence to `NotFound`.
    fn object_metadata(&self, object: &ObjectRef) -> StoreResult<(PathBuf, fs::Metadata)> {
        let path = self.object_path(object)?;
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok((path, meta)),
            Ok(_) => Err(StoreError::NotFound(object.clone())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(object.clone())),
            Err(e) => Err(e.into()),
        }
    }
}

fn checked_pool(object: &ObjectRef) -> StoreResult<&str> {
    let pool = object.pool();
    if pool.is_empty() || pool.starts_with('.') || pool.contains('/') {
        return Err(StoreError::InvalidObject {
            object: object.clone(),
            reason: "pool must be a plain directory name".into(),
        });
    }
    Ok(pool)
}

fn oid_components(object: &ObjectRef) -> StoreResult<Vec<&str>> {
    let components: Vec<&str> = object
        .oid()
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();
    if components.is_empty() {
        return Err(StoreError::InvalidObject {
            object: object.clone(),
            reason: "empty object id".into(),
        });
    }
    if components.iter().any(|c| *c == "..") {
        return Err(StoreError::InvalidObject {
            object: object.clone(),
            reason: "'..' is not allowed in object ids".into(),
        });
    }
    Ok(components)
}

impl MetadataStore for DirObjectStore {
    fn stat(&self, object: &ObjectRef) -> StoreResult<ObjectStat> {
        let (_, meta) = self.object_metadata(object)?;
        let mtime = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Ok(ObjectStat {
            size: meta.len(),
            mtime,
        })
    }

    fn get_attr(&self, object: &ObjectRef, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.object_metadata(object)?;
        match fs::read(self.attr_path(object, key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_attr(
        &self,
        object: &ObjectRef,
        key: &str,
        value: &[u8],
        exclusive: bool,
    ) -> StoreResult<()> {
        self.object_metadata(object)?;
        let path = self.attr_path(object, key)?;
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;

        if exclusive {
            tmp.persist_noclobber(&path).map_err(|e| {
                if e.error.kind() == ErrorKind::AlreadyExists {
                    StoreError::AlreadyExists {
                        object: object.clone(),
                        key: key.to_string(),
                    }
                } else {
                    StoreError::Io(e.error)
                }
            })?;
        } else {
            tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        }
        debug!(object = %object, key, exclusive, "attribute written");
        Ok(())
    }

    fn remove_attr(&self, object: &ObjectRef, key: &str) -> StoreResult<bool> {
        self.object_metadata(object)?;
        match fs::remove_file(self.attr_path(object, key)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl ContentSource for DirObjectStore {
    fn read_chunks<'a>(
        &'a self,
        object: &ObjectRef,
        chunk_size: usize,
    ) -> StoreResult<ChunkStream<'a>> {
        if chunk_size == 0 {
            return Err(StoreError::InvalidChunkSize);
        }
        let (path, _) = self.object_metadata(object)?;
        let file = File::open(path)?;
        Ok(Box::new(FileChunks {
            file,
            chunk_size,
            done: false,
        }))
    }
}

/// Reads a file front to back in `chunk_size` pieces.
struct FileChunks {
    file: File,
    chunk_size: usize,
    done: bool,
}

impl FileChunks {
    /// Fill one chunk, stopping early only at end of file.
    fn fill(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }
}

impl Iterator for FileChunks {
    type Item = StoreResult<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.fill() {
            Ok(buf) if buf.is_empty() => {
                self.done = true;
                None
            }
            Ok(buf) => {
                if buf.len() < self.chunk_size {
                    self.done = true;
                }
                Some(Ok(Bytes::from(buf)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}
