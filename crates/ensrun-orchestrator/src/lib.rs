//! Per-realization forward-model orchestrator: the run descriptor,
//! ensemble-wide configuration, retry policy, built-in substitution keys,
//! and the `PREPARING`/`RUNNING`/`LOADING`/`RETRY?` step state machine
//! (§3, §4.7).
//!
//! Everything this crate touches outside one realization's own state is
//! borrowed through [`SharedContext`]: the store, the queue, the template
//! engine, the job catalog, the log sink, the summary/restart file
//! locators, and the random source. This crate never picks a concrete
//! implementation of any of them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod builtins;
mod config;
mod context;
mod error;
mod log;
mod orchestrator;
mod request;
mod retry;
mod run_descriptor;
mod worker;

pub use config::{ConfigError, EnsembleConfig, RunpathKeepPolicy};
pub use context::SharedContext;
pub use error::StepError;
pub use log::StderrLogSink;
pub use orchestrator::{Orchestrator, Phase, StepOutcome};
pub use request::{StepRequest, TemplateSpec};
pub use run_descriptor::{RunDescriptor, RunSummary};
pub use worker::{kill_simulation, loading_task, preparing_task};
