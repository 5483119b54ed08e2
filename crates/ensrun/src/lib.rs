//! ensrun: a per-realization forward-model orchestrator for ensemble
//! reservoir data assimilation.
//!
//! This is the top-level facade crate that re-exports the public API
//! from every `ensrun-*` sub-crate. For most users, adding `ensrun` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ensrun::prelude::*;
//! use ensrun_test_utils::{
//!     InMemoryStore, InMemorySummary, MockJobCatalog, MockTemplateEngine, NullLogSink,
//!     ScriptedNode, ScriptedQueue, ScriptedRandomSource, ScriptedRestartOpener,
//!     ScriptedSummaryLoader,
//! };
//! use std::sync::Arc;
//!
//! let run_path_fmt = format!("{}/ensrun-doc/real<IENS>", std::env::temp_dir().display());
//! let config = Arc::new(
//!     EnsembleConfig::new(run_path_fmt, "BASE_<IENS>", RunpathKeepPolicy::Always, 1).unwrap(),
//! );
//! let mut orchestrator = Orchestrator::new(Iens::new(0), config);
//! orchestrator.configure_node(
//!     NodeConfig { key: "WOPR".to_string(), var_class: VarClass::DynamicResult, node_impl: NodeImpl::Summary },
//!     Box::new(ScriptedNode::new(VarClass::DynamicResult)),
//! );
//!
//! let store = InMemoryStore::new();
//! let queue = ScriptedQueue::new();
//! queue.set_status(Iens::new(0), JobStatus::RunOk);
//! let templates = MockTemplateEngine::new();
//! let catalog = MockJobCatalog::new();
//! let log = NullLogSink;
//! let summary_loader = ScriptedSummaryLoader::new().with_unified(InMemorySummary::new());
//! let restart_opener = ScriptedRestartOpener::new();
//! let random = ScriptedRandomSource::new();
//! let ctx = SharedContext {
//!     store: &store,
//!     queue: &queue,
//!     templates: &templates,
//!     catalog: &catalog,
//!     log: &log,
//!     summary_loader: &summary_loader,
//!     restart_opener: &restart_opener,
//!     random: &random,
//! };
//!
//! let req = StepRequest {
//!     run_mode: RunMode::Assimilation,
//!     active: true,
//!     max_submit: 1,
//!     init_step_parameters: ReportStep::new(0),
//!     init_state_parameter: StateClass::Analyzed,
//!     init_state_dynamic: StateClass::Analyzed,
//!     load_start: ReportStep::new(0),
//!     step1: ReportStep::new(0),
//!     step2: ReportStep::new(1),
//!     case_name: "CASE1".to_string(),
//!     equil_init_file: "equil.inc".to_string(),
//!     eclbase_fmt: "BASE_<IENS>".to_string(),
//!     templates: Vec::new(),
//! };
//!
//! let outcome = orchestrator.run_step(ctx, &req).unwrap();
//! assert_eq!(outcome, StepOutcome::Done);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `ensrun-core` | IDs, node/variable classes, substitution table, collaborator traits, error leaves |
//! | [`registry`] | `ensrun-registry` | Per-realization node registry |
//! | [`restart`] | `ensrun-restart` | Restart-block reader and writer |
//! | [`summary`] | `ensrun-summary` | Summary-series locator and reader |
//! | [`orchestrator`] | `ensrun-orchestrator` | Run descriptor, configuration, retry policy, step state machine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`ensrun-core`).
///
/// Contains realization/report-step identifiers, node and variable
/// classes, the substitution table, the external collaborator traits,
/// and the leaf error types every other crate's error composes from.
pub use ensrun_core as core;

/// Per-realization node registry (`ensrun-registry`).
pub use ensrun_registry as registry;

/// Restart-block reader and writer (`ensrun-restart`).
pub use ensrun_restart as restart;

/// Summary-series locator and reader (`ensrun-summary`).
pub use ensrun_summary as summary;

/// Run descriptor, ensemble configuration, retry policy, and the step
/// state machine (`ensrun-orchestrator`).
pub use ensrun_orchestrator as orchestrator;

/// Common imports for typical `ensrun` usage.
///
/// ```rust
/// use ensrun::prelude::*;
/// ```
///
/// This imports the identifiers, node/variable classes, the step state
/// machine, and its supporting configuration and request types.
pub mod prelude {
    // Identifiers and run-mode/state-class enums
    pub use ensrun_core::{Iens, JobStatus, NodeConfig, NodeImpl, ReportStep, RunMode, StateClass, VarClass};

    // Errors
    pub use ensrun_core::{NodeError, QueueError, StoreError, SubstError};

    // Orchestrator
    pub use ensrun_orchestrator::{
        ConfigError, EnsembleConfig, Orchestrator, Phase, RunpathKeepPolicy, SharedContext,
        StepError, StepOutcome, StepRequest, TemplateSpec,
    };

    // Worker-pool entry points
    pub use ensrun_orchestrator::{kill_simulation, loading_task, preparing_task};
}
