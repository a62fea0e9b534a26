use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A resolved physical location: pool name plus object id.
///
/// This is what the logical-name resolver produces and what every store
/// operation is keyed by. The textual form is `pool:oid`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pool: String,
    oid: String,
}

impl ObjectRef {
    /// Create a reference from a pool and object id.
    pub fn new(pool: impl Into<String>, oid: impl Into<String>) -> Self {
        Self {
            pool: pool.into(),
            oid: oid.into(),
        }
    }

    /// Pool the object lives in.
    pub fn pool(&self) -> &str {
        &self.pool
    }

    /// Object id within the pool.
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Parse the `pool:oid` form. The first `:` separates the two parts.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (pool, oid) = s.split_once(':').ok_or_else(|| TypeError::InvalidObjectRef {
            input: s.to_string(),
            reason: "missing ':' separator".into(),
        })?;
        if pool.is_empty() {
            return Err(TypeError::InvalidObjectRef {
                input: s.to_string(),
                reason: "empty pool".into(),
            });
        }
        if oid.is_empty() {
            return Err(TypeError::InvalidObjectRef {
                input: s.to_string(),
                reason: "empty object id".into(),
            });
        }
        Ok(Self::new(pool, oid))
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}:{})", self.pool, self.oid)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pool, self.oid)
    }
}

impl FromStr for ObjectRef {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
