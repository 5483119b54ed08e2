//! Registry error type.

use std::error::Error;
use std::fmt;

/// Errors raised by [`crate::NodeRegistry`] (§7: `NODE_MISSING`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// [`crate::NodeRegistry::get`] or `get_mut` was called for a key that
    /// is not registered.
    NodeMissing {
        /// The key that was requested.
        key: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeMissing { key } => write!(f, "node missing: {key}"),
        }
    }
}

impl Error for RegistryError {}
