//! Checksum reconciliation for cephsum.
//!
//! For one object, decide whether to trust the checksum record cached in its
//! extended attribute, recompute from content, and whether to write the
//! result back.
//!
//! | operation | reads metadata | reads content | writes metadata |
//! |---|---|---|---|
//! | [`ReconciliationEngine::get_from_metadata`] | yes | no | no |
//! | [`ReconciliationEngine::get_from_file`] | no | yes | no |
//! | [`ReconciliationEngine::get_checksum`] | yes | if absent | no |
//! | [`ReconciliationEngine::inget`] | yes | if absent | exclusive create, or big-to-little rewrite |
//! | [`ReconciliationEngine::verify`] | yes | if present or forced | no |
//!
//! Comparing a result with a caller-supplied reference is a separate step,
//! see [`ReferenceCheck`].

pub mod config;
pub mod engine;
pub mod error;
pub mod reference;

pub use config::EngineConfig;
pub use engine::{ChecksumSource, Reconciled, ReconciliationEngine, Verification};
pub use error::{EngineError, EngineResult};
pub use reference::{ChecksumRequest, ReferenceCheck};
