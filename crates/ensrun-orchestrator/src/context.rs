//! The shared-context handle: borrowed, non-owning references to the
//! external collaborators every step needs (§3, §9).

use ensrun_core::{
    JobCatalog, LogSink, Queue, RandomSource, RestartOpener, Store, SummaryLoader, TemplateEngine,
};

/// A borrowed aggregate of references to collaborators the orchestrator
/// needs but does not own (§9: "pass as a borrowed aggregate of
/// references; the orchestrator must never mutate it").
///
/// Every field is `&dyn Trait`; cloning a `SharedContext` is cheap (it is
/// itself `Copy`) since it holds no owned state.
#[derive(Clone, Copy)]
pub struct SharedContext<'a> {
    /// The persistence layer.
    pub store: &'a dyn Store,
    /// The external job queue.
    pub queue: &'a dyn Queue,
    /// The simulator-input template engine.
    pub templates: &'a dyn TemplateEngine,
    /// The ensemble-configuration oracle for the restart reader/writer.
    pub catalog: &'a dyn JobCatalog,
    /// The per-realization log sink.
    pub log: &'a dyn LogSink,
    /// The summary-file locator/opener.
    pub summary_loader: &'a dyn SummaryLoader,
    /// The restart-file locator/opener (§1, §4.4, §4.6: hands over already
    /// opened or freshly allocated keyword blocks; frame/endian decoding
    /// is the external codec's job).
    pub restart_opener: &'a dyn RestartOpener,
    /// The injected deterministic random source backing `RANDINT`,
    /// `RANDFLOAT`, and node resampling (§4.8, §9).
    pub random: &'a dyn RandomSource,
}
