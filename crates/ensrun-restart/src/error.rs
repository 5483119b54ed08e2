//! Error types for restart-block reading and writing.

use std::error::Error;
use std::fmt;

use ensrun_core::{NodeError, StoreError};
use ensrun_registry::RegistryError;

/// Errors raised while walking a restart block's keyword stream (§4.4).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartReadError {
    /// A keyword resolved to an implementation type the reader does not
    /// know how to dispatch (§7: `UNSUPPORTED_RESTART_IMPL`).
    UnsupportedImpl {
        /// The offending keyword, in its original (unmangled) form.
        keyword: String,
    },
    /// A mangled static keyword sanitized to the empty string, or
    /// otherwise could not be used as a store/filesystem component (§7:
    /// `INVALID_RESTART_FILENAME`).
    InvalidFilename {
        /// The keyword that produced the invalid name.
        keyword: String,
    },
    /// The reader expected a node already registered for a `FIELD`
    /// keyword and found none (§7: `NODE_MISSING`).
    Registry(RegistryError),
    /// The store rejected a put or get.
    Store(StoreError),
    /// This build does not support reading a unified restart file (§9:
    /// preserved as a documented limitation, not silently worked around).
    UnsupportedUnifiedRestart,
}

impl fmt::Display for RestartReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedImpl { keyword } => {
                write!(f, "unsupported restart implementation type for keyword {keyword}")
            }
            Self::InvalidFilename { keyword } => {
                write!(f, "keyword {keyword} mangled to an invalid restart filename")
            }
            Self::Registry(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
            Self::UnsupportedUnifiedRestart => {
                write!(f, "reading a unified restart file is not supported")
            }
        }
    }
}

impl Error for RestartReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for RestartReadError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<StoreError> for RestartReadError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Errors raised while emitting an initial restart file for a re-run
/// (§4.6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartWriteError {
    /// A key's variable class / implementation combination is not one the
    /// writer knows how to emit (§7: `WRITE_UNEXPECTED_CLASS`).
    UnexpectedClass {
        /// The offending key.
        key: String,
    },
    /// The writer needed a node already registered and found none.
    Registry(RegistryError),
    /// The store rejected a get or put.
    Store(StoreError),
    /// A node's `ecl_write` call failed.
    Node(NodeError),
}

impl fmt::Display for RestartWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedClass { key } => {
                write!(f, "key {key} has an unexpected variable class for restart write")
            }
            Self::Registry(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
            Self::Node(e) => write!(f, "{e}"),
        }
    }
}

impl Error for RestartWriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnexpectedClass { .. } => None,
            Self::Registry(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Node(e) => Some(e),
        }
    }
}

impl From<RegistryError> for RestartWriteError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<StoreError> for RestartWriteError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<NodeError> for RestartWriteError {
    fn from(e: NodeError) -> Self {
        Self::Node(e)
    }
}
