//! Object store boundary for cephsum.
//!
//! The reconciliation engine never talks to a storage cluster directly. It
//! consumes two narrow traits:
//!
//! - [`MetadataStore`]: stat plus get/set/remove of extended attributes,
//!   including an atomic exclusive create
//! - [`ContentSource`]: a finite, forward-only stream of bounded chunks
//!
//! # Backends
//!
//! - [`InMemoryObjectStore`]: `HashMap`-based store for tests and embedding
//! - [`DirObjectStore`]: a directory tree, one subdirectory per pool, with
//!   attributes kept in sidecar files
//!
//! # Rules
//!
//! 1. `set_attr(.., exclusive = true)` must fail with
//!    [`StoreError::AlreadyExists`] rather than overwrite. Callers rely on
//!    this to settle concurrent writers without a check-then-write.
//! 2. Missing objects are [`StoreError::NotFound`]; missing attributes are
//!    `Ok(None)`.
//! 3. All I/O errors are propagated, never silently ignored.

pub mod dir;
pub mod error;
pub mod memory;
pub mod traits;

pub use dir::DirObjectStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use traits::{ChunkStream, ContentSource, MetadataStore, ObjectStat, ObjectStore};
