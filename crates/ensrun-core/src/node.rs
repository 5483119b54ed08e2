//! Enums classifying nodes and runs.

use std::fmt;

/// Whether a persisted node value is pre-update or post-update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateClass {
    /// Post-update value.
    Analyzed,
    /// Pre-update value.
    Forecast,
}

impl fmt::Display for StateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Analyzed => "ANALYZED",
            Self::Forecast => "FORECAST",
        };
        write!(f, "{s}")
    }
}

/// Variable class of a node. Drives reading, writing, and persistence
/// policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarClass {
    /// A stochastic input resampled on retry.
    Parameter,
    /// Dynamic solver state, internalized from the restart block.
    DynamicState,
    /// Dynamic scalar result, internalized from the summary file.
    DynamicResult,
    /// A static keyword passed through the round trip unmodified.
    StaticState,
}

impl VarClass {
    /// Whether this class is eligible for resampling on retry (§4.8).
    pub fn resamples_on_retry(self) -> bool {
        matches!(self, Self::Parameter | Self::DynamicState)
    }
}

/// Node implementation tag. Selects specialized read/write behavior; not
/// visible at the orchestrator boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeImpl {
    /// A gridded field, loaded directly from the restart block.
    Field,
    /// A scalar curve, loaded from the summary file.
    Summary,
    /// A generalized keyword (templated scalar parameter group).
    GenKw,
    /// A static keyword passed through without semantic interpretation.
    Static,
}

/// A queryable capability of a [`crate::Node`] implementation, checked via
/// `has_cap` before the caller attempts an optional operation (e.g. whether
/// a node supports a seismic-style out-of-band load not driven by the
/// restart keyword stream).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeCap {
    /// The node can be internalized independent of the restart keyword
    /// stream (its data never appears as a literal keyword).
    OutOfBandLoad,
}

/// The run mode controlling summary-gap tolerance and terminal cleanup
/// policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// A normal assimilation cycle.
    Assimilation,
    /// A forward prediction run; summary reading stops at the first gap.
    Prediction,
    /// A one-off experiment run.
    Experiment,
}

/// The ensemble-configuration entry for one key: enough to construct and
/// classify a [`crate::Node`] without the orchestrator knowing its concrete
/// implementation (§4.4, §4.6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeConfig {
    /// The node's key in the registry and the store.
    pub key: String,
    /// Drives reading, writing, and persistence policy.
    pub var_class: VarClass,
    /// Selects specialized read/write behavior.
    pub node_impl: NodeImpl,
}

impl NodeConfig {
    /// A config for a pass-through static keyword, as registered by the
    /// restart-block reader and writer when a key was not already known to
    /// the ensemble configuration (§4.4, §4.6).
    pub fn static_passthrough(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            var_class: VarClass::StaticState,
            node_impl: NodeImpl::Static,
        }
    }
}
