//! Error types for the summary-series reader.

use std::error::Error;
use std::fmt;

use ensrun_core::{NodeError, StoreError, SummaryLoadError};

/// Errors raised while locating, opening, or draining a realization's
/// summary files (§4.5).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryReadError {
    /// The summary collaborator could not locate or open the expected
    /// files.
    Load(SummaryLoadError),
    /// The store rejected a put.
    Store(StoreError),
    /// A node's `ecl_load` call failed in a way the reader could not
    /// recover from by marking the realization's load as failed (this
    /// reader never constructs this variant itself — per-node load
    /// failures are soft and only flip `load_ok`, never propagate as an
    /// error — but it is kept so callers composing this crate with
    /// `ensrun-restart` share one error shape at the orchestrator
    /// boundary).
    Node(NodeError),
}

impl fmt::Display for SummaryReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
            Self::Node(e) => write!(f, "{e}"),
        }
    }
}

impl Error for SummaryReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Node(e) => Some(e),
        }
    }
}

impl From<SummaryLoadError> for SummaryReadError {
    fn from(e: SummaryLoadError) -> Self {
        Self::Load(e)
    }
}

impl From<StoreError> for SummaryReadError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<NodeError> for SummaryReadError {
    fn from(e: NodeError) -> Self {
        Self::Node(e)
    }
}
