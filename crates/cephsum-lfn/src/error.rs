use thiserror::Error;

/// Errors from rule loading and name resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid path-match pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("path is empty after normalization")]
    EmptyPath,

    #[error("rule chain through protocol {protocol:?} is deeper than {max}")]
    ChainTooDeep { protocol: String, max: usize },

    #[error("<{element}> is missing the {attribute:?} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("malformed storage mapping: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for ResolveError {
    fn from(e: quick_xml::Error) -> Self {
        ResolveError::Xml(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ResolveError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        ResolveError::Xml(e.to_string())
    }
}

/// Result alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
