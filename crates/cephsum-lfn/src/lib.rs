//! Logical-to-physical name resolution.
//!
//! A logical file name (LFN) such as `/store/data/run1/file.root` is mapped
//! to a pool and an object id by scanning an ordered list of rules, in the
//! style of the CMS trivial file catalog. The first rule whose protocol
//! applies and whose pattern matches wins; its result template is expanded
//! and split at the first `:` into `pool:oid`.
//!
//! - [`PathRule`]: one compiled rule
//! - [`PathResolver`]: the ordered chain plus the fallback heuristic
//! - [`mapping`]: loading rules from a storage-mapping XML document

pub mod error;
pub mod mapping;
pub mod resolver;
pub mod rule;

pub use error::{ResolveError, ResolveResult};
pub use mapping::parse_storage_mapping;
pub use resolver::{PathResolver, MAX_CHAIN_DEPTH};
pub use rule::{PathRule, RuleSpec, DIRECT};
