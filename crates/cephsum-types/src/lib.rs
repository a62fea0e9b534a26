//! Foundation types for cephsum.
//!
//! Every other cephsum crate depends on `cephsum-types`.
//!
//! # Key Types
//!
//! - [`ObjectRef`]: a resolved (pool, object id) pair addressing one object
//! - [`ByteOrder`]: byte order of multi-byte integers in a stored record

pub mod byte_order;
pub mod error;
pub mod object;

pub use byte_order::ByteOrder;
pub use error::TypeError;
pub use object::ObjectRef;
