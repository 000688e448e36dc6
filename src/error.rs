use std::error::Error as StdError;
use std::fmt;

use crate::principal::PrincipalType;

/// Errors that can abort a linkage invocation.
///
/// All variants are fatal to the current invocation: the coordinator stops
/// at the first failure and returns it. Bindings already mutated by earlier
/// steps of the same invocation are **not** rolled back — callers must treat
/// a failed call as "authorization state partially updated, resource
/// mutation already committed" and reconcile externally if needed.
#[derive(Debug)]
pub enum LinkageError {
    /// A supplied principal id did not resolve in the directory. Also raised
    /// for a group with no owner, which is a data-integrity fault.
    PrincipalNotFound {
        /// Kind of the principal that failed to resolve.
        principal_type: PrincipalType,
        /// The id that did not resolve.
        id: String,
    },
    /// The owning entity has no default strategy record.
    ///
    /// Default strategies are provisioned with the principal; their absence
    /// is a data-integrity fault, never silently repaired here.
    DefaultStrategyNotFound {
        /// Kind of the principal whose strategy is missing.
        principal_type: PrincipalType,
        /// The principal id the lookup was keyed by.
        id: String,
    },
    /// The strategy store failed.
    Store(StoreError),
}

impl fmt::Display for LinkageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkageError::PrincipalNotFound { principal_type, id } => {
                write!(f, "{} '{}' not found", principal_type, id)
            }
            LinkageError::DefaultStrategyNotFound { principal_type, id } => {
                write!(f, "no default strategy for {} '{}'", principal_type, id)
            }
            LinkageError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl StdError for LinkageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            LinkageError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for LinkageError {
    fn from(err: StoreError) -> Self {
        LinkageError::Store(err)
    }
}

/// An error from the underlying strategy store.
#[derive(Debug)]
pub struct StoreError {
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl StoreError {
    /// Creates a store error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.message)
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}
