//! Core types, traits, and errors for the per-realization forward-model
//! orchestrator.
//!
//! This crate has no notion of files, queues, or the store — it defines the
//! identifiers, enums, the substitution table, the external collaborator
//! traits, and the error taxonomy that the rest of the workspace builds on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod ids;
mod node;
mod subst;
mod traits;

pub use error::{
    NodeError, QueueError, RestartOpenError, StoreError, SubstError, SummaryLoadError,
    TemplateError,
};
pub use ids::{Iens, ReportStep};
pub use node::{NodeCap, NodeConfig, NodeImpl, RunMode, StateClass, VarClass};
pub use subst::SubstTable;
pub use traits::{
    JobCatalog, JobStatus, KeywordType, LogLevel, LogSink, Node, Queue, RandomSource,
    RestartKeywordEntry, RestartOpener, RestartSink, Store, SummaryLoader, SummarySource,
    TemplateEngine,
};
