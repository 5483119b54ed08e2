//! Substitution-table error type.

use std::error::Error;
use std::fmt;

/// Errors raised while expanding a substitution table over a buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubstError {
    /// Cascade expansion did not converge within `|table|` passes: some
    /// pair of entries substitutes into each other indefinitely.
    Cycle {
        /// The number of passes attempted before giving up.
        passes_attempted: usize,
    },
}

impl fmt::Display for SubstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle { passes_attempted } => {
                write!(
                    f,
                    "substitution cycle detected after {passes_attempted} passes"
                )
            }
        }
    }
}

impl Error for SubstError {}

/// Errors a [`crate::Node`] implementation can raise from its capability
/// methods. Leaf crates (`ensrun-registry`, `ensrun-restart`,
/// `ensrun-summary`) and the orchestrator translate these into their own
/// soft/hard error classification (§7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeError {
    /// The node could not load its data (missing file, parse failure,
    /// unavailable dependency). Soft: triggers a retry at the orchestrator
    /// level.
    LoadFailed {
        /// Human-readable detail, included in the per-realization log line.
        reason: String,
    },
    /// The node could not write its data.
    WriteFailed {
        /// Human-readable detail.
        reason: String,
    },
    /// The node was asked to perform an operation its implementation does
    /// not support (e.g. `ecl_load_static` on a `FIELD` node).
    Unsupported {
        /// Human-readable detail.
        reason: String,
    },
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFailed { reason } => write!(f, "node load failed: {reason}"),
            Self::WriteFailed { reason } => write!(f, "node write failed: {reason}"),
            Self::Unsupported { reason } => write!(f, "unsupported node operation: {reason}"),
        }
    }
}

impl Error for NodeError {}

/// Errors raised by a [`crate::Store`] implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No entry exists for the requested key.
    NotFound {
        /// The key that was requested, formatted for logging.
        key: String,
    },
    /// The backing store rejected the operation.
    Backend {
        /// Human-readable detail from the backend.
        reason: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { key } => write!(f, "store: no entry for {key}"),
            Self::Backend { reason } => write!(f, "store backend error: {reason}"),
        }
    }
}

impl Error for StoreError {}

/// Errors raised by a [`crate::TemplateEngine`] implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// The template file could not be read.
    ReadFailed {
        /// Human-readable detail.
        reason: String,
    },
    /// The destination file could not be written.
    WriteFailed {
        /// Human-readable detail.
        reason: String,
    },
    /// Expansion of sentinels inside the template failed.
    Subst(SubstError),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { reason } => write!(f, "template read failed: {reason}"),
            Self::WriteFailed { reason } => write!(f, "template write failed: {reason}"),
            Self::Subst(e) => write!(f, "template substitution failed: {e}"),
        }
    }
}

impl Error for TemplateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Subst(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SubstError> for TemplateError {
    fn from(e: SubstError) -> Self {
        Self::Subst(e)
    }
}

/// Errors raised by a [`crate::SummaryLoader`] implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryLoadError {
    /// Neither a unified summary file nor any per-step summary file could
    /// be found for the realization's simulator base name.
    HeaderMissing {
        /// The simulator base name (`eclbase`) that was searched for.
        eclbase: String,
    },
    /// A header file was found but no data files accompany it.
    NoDataFiles {
        /// The simulator base name (`eclbase`) that was searched for.
        eclbase: String,
    },
    /// The backing collaborator rejected the load.
    Backend {
        /// Human-readable detail.
        reason: String,
    },
}

impl fmt::Display for SummaryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderMissing { eclbase } => {
                write!(f, "no summary header found for {eclbase}")
            }
            Self::NoDataFiles { eclbase } => {
                write!(f, "summary header found for {eclbase} but no data files")
            }
            Self::Backend { reason } => write!(f, "summary backend error: {reason}"),
        }
    }
}

impl Error for SummaryLoadError {}

/// Errors raised by a [`crate::RestartOpener`] implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartOpenError {
    /// The backing collaborator could not open or allocate the block.
    Backend {
        /// Human-readable detail.
        reason: String,
    },
}

impl fmt::Display for RestartOpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { reason } => write!(f, "restart opener error: {reason}"),
        }
    }
}

impl Error for RestartOpenError {}

/// Errors raised by a [`crate::Queue`] implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// The realization is not known to the queue.
    UnknownRealization {
        /// The raw realization index, formatted for logging.
        iens: String,
    },
    /// The queue backend rejected the submission.
    SubmitFailed {
        /// Human-readable detail from the backend.
        reason: String,
    },
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRealization { iens } => write!(f, "queue: unknown realization {iens}"),
            Self::SubmitFailed { reason } => write!(f, "queue: submit failed: {reason}"),
        }
    }
}

impl Error for QueueError {}
