//! The orchestrator's top-level error taxonomy (§7, §10.1).

use std::error::Error;
use std::fmt;

use ensrun_core::{
    NodeError, QueueError, RestartOpenError, StoreError, SubstError, SummaryLoadError,
    TemplateError,
};
use ensrun_registry::RegistryError;
use ensrun_restart::{RestartReadError, RestartWriteError};
use ensrun_summary::SummaryReadError;

/// One variant per §7 error kind, with `From` conversions from every
/// leaf crate's error type so `?` composes across crate boundaries
/// without a derive macro.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// `NODE_MISSING`: the registry was asked for a key it doesn't hold.
    NodeMissing {
        /// The missing key.
        key: String,
    },
    /// `UNSUPPORTED_RESTART_IMPL`: a restart keyword resolved to an
    /// implementation type the reader cannot dispatch, or the block is a
    /// unified restart file (§9: `UNSUPPORTED_UNIFIED_RESTART` folds into
    /// this kind).
    UnsupportedRestartImpl {
        /// The offending keyword, or a fixed marker for the unified-file
        /// case.
        keyword: String,
    },
    /// `WRITE_UNEXPECTED_CLASS`: a key's variable class has no defined
    /// write behavior.
    WriteUnexpectedClass {
        /// The offending key.
        key: String,
    },
    /// `STATE_NOT_READY`: an execution operation was attempted before
    /// `set`/`reset_for_load` ran for this step (§3 invariant; a
    /// programmer error made recoverable for tests).
    StateNotReady,
    /// `LOAD_FAILED` (soft): internalizing restart or summary output
    /// failed.
    LoadFailed {
        /// Human-readable detail.
        reason: String,
    },
    /// `RUN_FAILED` (soft): the queue reported a failed simulator run, or
    /// the orchestrator could not write the simulator's inputs.
    RunFailed {
        /// Human-readable detail.
        reason: String,
    },
    /// `RETRY_BUDGET_EXHAUSTED` (terminal): `RETRY?` was entered with no
    /// attempts left.
    RetryBudgetExhausted,
    /// `SUBST_CYCLE` (fatal): the substitution table did not converge.
    SubstCycle {
        /// Passes attempted before the cycle was detected.
        passes_attempted: u32,
    },
    /// `INVALID_RESTART_FILENAME` (fatal): a mangled static keyword
    /// sanitized to an unusable name.
    InvalidRestartFilename {
        /// The offending keyword.
        keyword: String,
    },
}

impl StepError {
    /// True exactly for `LoadFailed`/`RunFailed`: the retry policy uses
    /// this to decide whether to route into `RETRY?` or abort the
    /// realization's task (§10.1).
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::LoadFailed { .. } | Self::RunFailed { .. })
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeMissing { key } => write!(f, "node missing for key {key}"),
            Self::UnsupportedRestartImpl { keyword } => {
                write!(f, "unsupported restart implementation for {keyword}")
            }
            Self::WriteUnexpectedClass { key } => {
                write!(f, "key {key} has an unexpected class for restart write")
            }
            Self::StateNotReady => write!(f, "run descriptor is not ready"),
            Self::LoadFailed { reason } => write!(f, "load failed: {reason}"),
            Self::RunFailed { reason } => write!(f, "run failed: {reason}"),
            Self::RetryBudgetExhausted => write!(f, "retry budget exhausted"),
            Self::SubstCycle { passes_attempted } => {
                write!(f, "substitution cycle after {passes_attempted} passes")
            }
            Self::InvalidRestartFilename { keyword } => {
                write!(f, "keyword {keyword} mangled to an invalid restart filename")
            }
        }
    }
}

impl Error for StepError {}

impl From<RegistryError> for StepError {
    fn from(e: RegistryError) -> Self {
        let RegistryError::NodeMissing { key } = e;
        Self::NodeMissing { key }
    }
}

impl From<RestartReadError> for StepError {
    fn from(e: RestartReadError) -> Self {
        match e {
            RestartReadError::UnsupportedImpl { keyword } => Self::UnsupportedRestartImpl { keyword },
            RestartReadError::InvalidFilename { keyword } => Self::InvalidRestartFilename { keyword },
            RestartReadError::Registry(e) => e.into(),
            RestartReadError::Store(e) => Self::LoadFailed { reason: e.to_string() },
            RestartReadError::UnsupportedUnifiedRestart => Self::UnsupportedRestartImpl {
                keyword: "<unified restart file>".to_string(),
            },
        }
    }
}

impl From<RestartWriteError> for StepError {
    fn from(e: RestartWriteError) -> Self {
        match e {
            RestartWriteError::UnexpectedClass { key } => Self::WriteUnexpectedClass { key },
            RestartWriteError::Registry(e) => e.into(),
            RestartWriteError::Store(e) => Self::RunFailed { reason: e.to_string() },
            RestartWriteError::Node(e) => Self::RunFailed { reason: e.to_string() },
        }
    }
}

impl From<SummaryReadError> for StepError {
    fn from(e: SummaryReadError) -> Self {
        Self::LoadFailed { reason: e.to_string() }
    }
}

impl From<SubstError> for StepError {
    fn from(e: SubstError) -> Self {
        let SubstError::Cycle { passes_attempted } = e;
        Self::SubstCycle { passes_attempted }
    }
}

impl From<QueueError> for StepError {
    fn from(e: QueueError) -> Self {
        Self::RunFailed { reason: e.to_string() }
    }
}

impl From<TemplateError> for StepError {
    fn from(e: TemplateError) -> Self {
        Self::RunFailed { reason: e.to_string() }
    }
}

impl From<NodeError> for StepError {
    fn from(e: NodeError) -> Self {
        Self::RunFailed { reason: e.to_string() }
    }
}

impl From<StoreError> for StepError {
    fn from(e: StoreError) -> Self {
        Self::LoadFailed { reason: e.to_string() }
    }
}

impl From<SummaryLoadError> for StepError {
    fn from(e: SummaryLoadError) -> Self {
        Self::LoadFailed { reason: e.to_string() }
    }
}

impl From<RestartOpenError> for StepError {
    fn from(e: RestartOpenError) -> Self {
        Self::LoadFailed { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_load_and_run_failed_are_soft() {
        assert!(StepError::LoadFailed { reason: String::new() }.is_soft());
        assert!(StepError::RunFailed { reason: String::new() }.is_soft());
        assert!(!StepError::RetryBudgetExhausted.is_soft());
        assert!(!StepError::NodeMissing { key: "X".to_string() }.is_soft());
    }
}
