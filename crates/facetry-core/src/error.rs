//! Error types for Facetry.

/// Errors that can occur while declaring or executing a faceted search.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A facet or accessor was bound to a field the item type does not declare.
    #[error("Unbound field '{field}' on {item_type}")]
    UnboundField {
        /// Field name that failed to resolve
        field: String,
        /// Rust type name of the item the field was looked up on
        item_type: &'static str,
    },

    /// The index provider could not resolve an index by name.
    #[error("Index not found: {index}")]
    IndexNotFound {
        /// Index name that was requested
        index: String,
    },

    /// The index collaborator failed to open a context, run the query,
    /// or compute facets.
    #[error("Index error: {message}")]
    Index {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query configuration could not be parsed or serialized.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for Facetry operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether a caller may reasonably retry the failed operation.
    ///
    /// Nothing in Facetry retries on its own; this only classifies failures
    /// for callers that layer their own retry policy around `execute`.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Index { .. } => true,
            Error::Io(_) => true,
            Error::UnboundField { .. } => false,
            Error::IndexNotFound { .. } => false,
            Error::Config { .. } => false,
            Error::Serialization(_) => false,
        }
    }

    /// Returns `true` for errors raised while declaring a query rather
    /// than while executing it.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::UnboundField { .. } | Error::Config { .. })
    }

    /// Creates a new unbound-field error for item type `T`.
    pub fn unbound_field<T: ?Sized, S: Into<String>>(field: S) -> Self {
        Error::UnboundField {
            field: field.into(),
            item_type: std::any::type_name::<T>(),
        }
    }

    /// Creates a new index error with a message.
    pub fn index<S: Into<String>>(message: S) -> Self {
        Error::Index {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new index error with a message and source error.
    pub fn index_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Index {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
