//! External collaborator traits (§1, §9): the store, the queue, the
//! template engine, the job catalog, the log sink, the restart resource, the
//! summary source, and the node capability interface itself.
//!
//! Nothing in this crate implements these traits. `ensrun-test-utils` ships
//! in-memory adapters for tests; a production binary wires up real
//! collaborators (an LSF/SSH/local queue, a content-addressed filesystem
//! store, a simulator-input template engine) outside this workspace's
//! documented core.

use std::fmt;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{NodeError, QueueError, RestartOpenError, StoreError, SummaryLoadError, TemplateError};
use crate::ids::{Iens, ReportStep};
use crate::node::{NodeCap, NodeConfig, StateClass, VarClass};
use crate::subst::SubstTable;

/// A queryable capability-driven node: pressure field, summary curve,
/// parameterized keyword group, or static pass-through (§9).
///
/// The orchestrator never matches on implementation; it only calls these
/// methods and checks [`has_cap`](Node::has_cap) before attempting an
/// optional operation.
pub trait Node {
    /// Drives reading, writing, and persistence policy (§3).
    fn var_class(&self) -> VarClass;

    /// Whether this node supports `cap` (e.g. out-of-band internalization
    /// not driven by the restart keyword stream, §4.4 rationale).
    fn has_cap(&self, cap: NodeCap) -> bool;

    /// Whether this node should be internalized at `report_step` even when
    /// the orchestrator is not running an unconditional `internalize_state`
    /// pass (§4.4 second pass).
    fn should_internalize(&self, report_step: ReportStep) -> bool;

    /// Load this node's data for `report_step`.
    ///
    /// Exactly one of `restart_keyword` (the raw keyword name this node was
    /// registered under, for `FIELD` nodes) or `summary` (for `SUMMARY`
    /// nodes) is expected to be meaningful for a given implementation; the
    /// other is `None`. Nodes with [`NodeCap::OutOfBandLoad`] may ignore
    /// both and pull from their own private source.
    fn ecl_load(
        &mut self,
        run_path: &Path,
        summary: Option<&dyn SummarySource>,
        restart_keyword: Option<&str>,
        report_step: ReportStep,
        iens: Iens,
    ) -> Result<(), NodeError>;

    /// Load a static keyword's raw payload, bypassing any node-specific
    /// parsing (§4.4). Implementations must not retain `payload` past the
    /// call; the caller frees it immediately after.
    fn ecl_load_static(
        &mut self,
        payload: &[u8],
        report_step: ReportStep,
        iens: Iens,
    ) -> Result<(), NodeError>;

    /// Emit this node's data into the simulator's input set for `step1`
    /// (§4.6). `summary` is always `None` for a write; kept symmetric with
    /// `ecl_load`'s signature for implementations that share a dispatch
    /// table.
    fn ecl_write(
        &self,
        run_path: &Path,
        summary: Option<&dyn SummarySource>,
        report_step: ReportStep,
    ) -> Result<(), NodeError>;

    /// Draw a fresh value for this realization (§4.8 retry resampling, and
    /// initial ensemble construction outside this crate's scope).
    fn initialize(&mut self, iens: Iens) -> Result<(), NodeError>;

    /// Drop any cached in-memory payload (§4.4: static payloads are large
    /// and single-use; freed immediately after the store `put`).
    fn invalidate_cache(&mut self);

    /// Wire this node's private substitution parent to the orchestrator's
    /// substitution table, so templates inside a `GEN_KW` node see
    /// `IENS`, `CASE`, and the rest of the built-ins (§4.3). A no-op for
    /// implementations that have no private substitution table.
    fn wire_subst_parent(&mut self, _parent: &SubstTable) {}
}

/// Observed lifecycle status of one realization's job, as reported by the
/// external job queue (§6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// No job has been submitted for this realization yet.
    NotActive,
    /// The job has been handed to the queue backend but has not started.
    Submitted,
    /// The job is executing.
    Running,
    /// The simulator process exited successfully.
    RunOk,
    /// The simulator process exited with a failure.
    RunFail,
    /// The job may be killed in its current state.
    CanKill,
    /// The job may be restarted in its current state.
    CanRestart,
    /// The orchestrator is internalizing this job's outputs.
    Loading,
    /// The job and its internalization both succeeded.
    AllOk,
    /// The job or its internalization failed terminally.
    AllFail,
}

/// The external job queue's status API (§6). Transport (LSF/SSH/local) is
/// out of scope; only this interface is consumed.
///
/// Safe for concurrent calls keyed by disjoint `iens` (§5).
pub trait Queue {
    /// Hand a new job to the queue backend.
    fn insert_job(&self, run_path: &Path, eclbase: &str, iens: Iens) -> Result<(), QueueError>;

    /// Current lifecycle status for `iens`.
    fn get_job_status(&self, iens: Iens) -> JobStatus;

    /// Announce that the orchestrator has begun internalizing this job's
    /// outputs.
    fn set_external_load(&self, iens: Iens);

    /// Announce that internalization succeeded.
    fn set_load_ok(&self, iens: Iens);

    /// Announce an external (orchestrator-observed) failure, routing the
    /// realization back through the queue's unified failure handling
    /// (§4.7 notes).
    fn set_external_fail(&self, iens: Iens);

    /// Announce that the orchestrator is resubmitting this realization
    /// after a load or run failure.
    fn set_external_restart(&self, iens: Iens);

    /// Announce terminal failure: the retry budget is exhausted.
    fn set_all_fail(&self, iens: Iens);

    /// Request cancellation. Returns `true` iff the current queue state
    /// allowed the kill to proceed.
    fn kill_job(&self, iens: Iens) -> bool;

    /// Wall-clock time the simulator process started, if known.
    fn iget_sim_start(&self, iens: Iens) -> Option<SystemTime>;

    /// Wall-clock time the job was submitted, if known.
    fn iget_submit_time(&self, iens: Iens) -> Option<SystemTime>;
}

/// Expands `<TAG>` sentinels in a simulator input template and writes the
/// result to a destination file (§4.1, §6).
pub trait TemplateEngine {
    /// Read `template_path`, expand it against `subst`, and write the
    /// result to `dest_path`.
    fn instantiate(
        &self,
        template_path: &Path,
        dest_path: &Path,
        subst: &SubstTable,
    ) -> Result<(), TemplateError>;
}

/// Ensemble-wide node-configuration oracle consulted by the restart reader
/// and writer (§4.4, §4.6): which keys are already known, and on what
/// terms a newly observed static keyword may be registered.
pub trait JobCatalog {
    /// Whether `name` is already a known ensemble configuration key.
    fn has_key(&self, name: &str) -> bool;

    /// The configuration for `name`, if known.
    fn get_config(&self, name: &str) -> Option<NodeConfig>;

    /// Whether a static keyword named `name` should be internalized at all
    /// (the restart reader's `include_static` predicate, §4.4).
    fn include_static(&self, name: &str) -> bool;

    /// Register `name` as a pass-through static keyword if it is not
    /// already known. Idempotent.
    fn register_static(&self, name: &str) -> NodeConfig;

    /// Construct a fresh node instance matching `config`. Individual node
    /// implementations are out of scope for this crate (§1); the catalog
    /// is the ensemble-configuration authority that knows how to build
    /// one, so it carries this factory capability rather than the
    /// restart reader/writer inventing node instances themselves
    /// (supplements §4.4/§4.6's "add node to registry if absent").
    fn create_node(&self, config: &NodeConfig) -> Box<dyn Node>;
}

/// Injected deterministic random source (§9 redesign note) backing the
/// `RANDINT`/`RANDFLOAT` built-in substitution values (§6). Replaces the
/// source's global PRNG so realizations can be reproducible and run in
/// parallel: draws are scoped to `(iens, attempt)` rather than mutating
/// shared state.
pub trait RandomSource {
    /// Draw the next `RANDINT` value for `iens`'s `attempt`'th internal
    /// submit.
    fn next_randint(&self, iens: Iens, attempt: u32) -> i64;

    /// Draw the next `RANDFLOAT` value for `iens`'s `attempt`'th internal
    /// submit.
    fn next_randfloat(&self, iens: Iens, attempt: u32) -> f64;
}

/// Per-realization log sink (§7). Levels follow the spec's numbering:
/// 1 = retry/fail, 2 = normal progress, 3 = per-node load detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Retry decisions and terminal failures.
    Retry = 1,
    /// Normal per-step progress.
    Progress = 2,
    /// Per-node load/write detail.
    Detail = 3,
}

/// Receives structured per-realization log lines (§7): `"[iens:step1-step2]
/// <message>"`. The formatting of that prefix is the sink's responsibility;
/// callers pass the raw components.
pub trait LogSink {
    /// Emit one log line at `level` for the realization/step range.
    fn log(&self, iens: Iens, step1: ReportStep, step2: ReportStep, level: LogLevel, message: &str);
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Retry => "retry",
            Self::Progress => "progress",
            Self::Detail => "detail",
        };
        write!(f, "{s}")
    }
}

/// The binary type tag carried by one restart keyword record (§6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeywordType {
    /// 32-bit integer values.
    Int,
    /// 32-bit floating point values.
    Float,
    /// 64-bit floating point values.
    Double,
    /// Boolean values, one byte each in the on-disk record.
    Logical,
    /// Fixed-width character values.
    Char,
    /// Message records carrying no payload.
    Message,
}

/// One keyword record as delegated by the external binary codec (§1, §6):
/// an 8-character header, a type tag, a count, and a raw payload. The
/// record-framing and endian-flipping codec itself is out of scope; this
/// crate only consumes already-decoded entries.
#[derive(Clone, Debug, PartialEq)]
pub struct RestartKeywordEntry {
    /// The keyword header, as it appears in the file (not yet mangled for
    /// repeated occurrences, §3).
    pub name: String,
    /// The record's declared element type.
    pub type_tag: KeywordType,
    /// Number of elements in `payload`.
    pub count: usize,
    /// The raw, still-encoded payload for this record.
    pub payload: Vec<u8>,
}

/// One opened restart block: the keyword stream for a single report step,
/// as delegated by the external codec (§1, §6). A unified restart file
/// contains many such blocks, delimited by `SEQNUM`; a per-step restart
/// file contains exactly one.
///
/// Used both to walk a block in file order (the reader, §4.4) and to
/// accumulate keywords for emission (the writer, §4.6).
pub trait RestartSink {
    /// The report step this block covers.
    fn report_step(&self) -> ReportStep;

    /// Keyword entries in file order.
    fn keywords(&self) -> &[RestartKeywordEntry];

    /// Append a keyword entry (writer use).
    fn push_keyword(&mut self, entry: RestartKeywordEntry);

    /// Flush the accumulated keywords to `run_path` under `eclbase`'s
    /// naming convention, consuming the block.
    fn finish_write(self: Box<Self>, run_path: &Path, eclbase: &str) -> Result<(), NodeError>;
}

/// Scalar-curve source consumed by the summary reader (§4.5, §6). The
/// binary summary format itself is out of scope; this crate only consumes
/// `(key, report_step) -> value` and `report_step -> time`.
pub trait SummarySource {
    /// The last report step present in this summary.
    fn last_report_step(&self) -> ReportStep;

    /// Whether `key` is present in this summary's header.
    fn has_key(&self, key: &str) -> bool;

    /// The value of `key` at `report_step`, if present.
    fn value(&self, key: &str, report_step: ReportStep) -> Option<f64>;

    /// Simulated wall-clock time (days since start) at `report_step`.
    fn report_time(&self, report_step: ReportStep) -> Option<f64>;
}

/// Locates and opens a realization's summary files (§4.5, §6). The binary
/// format itself is out of scope (§1); this collaborator only reports
/// existence of candidate files by naming convention and, once the reader
/// has decided which form to use, opens the resulting [`SummarySource`].
pub trait SummaryLoader {
    /// Whether a unified summary file exists in `run_path` for `eclbase`.
    fn unified_exists(&self, run_path: &Path, eclbase: &str) -> bool;

    /// Whether a per-step summary file exists in `run_path` for `eclbase`
    /// at `report_step`.
    fn per_step_exists(&self, run_path: &Path, eclbase: &str, report_step: ReportStep) -> bool;

    /// Open the unified summary file as a [`SummarySource`].
    fn load_unified(
        &self,
        run_path: &Path,
        eclbase: &str,
    ) -> Result<Box<dyn SummarySource>, SummaryLoadError>;

    /// Open the given ordered set of per-step summary files as a single
    /// [`SummarySource`] spanning all of them.
    fn load_per_step(
        &self,
        run_path: &Path,
        eclbase: &str,
        report_steps: &[ReportStep],
    ) -> Result<Box<dyn SummarySource>, SummaryLoadError>;
}

/// Locates and opens a realization's restart files (§4.4, §4.6, §9). The
/// binary format itself is out of scope (§1); this collaborator only
/// reports existence of candidate files by naming convention, opens a
/// block for reading, and allocates a fresh block to accumulate a write
/// pass into. Mirrors [`SummaryLoader`]'s shape on the restart side.
pub trait RestartOpener {
    /// Whether a unified restart file exists in `run_path` for `eclbase`
    /// (§9: reading it is unsupported until the reader is generalized to
    /// walk multiple `SEQNUM`-delimited blocks).
    fn unified_exists(&self, run_path: &Path, eclbase: &str) -> bool;

    /// Whether a per-step restart file exists in `run_path` for `eclbase`
    /// at `report_step`.
    fn per_step_exists(&self, run_path: &Path, eclbase: &str, report_step: ReportStep) -> bool;

    /// Open the per-step restart file at `report_step` for reading.
    fn load_per_step(
        &self,
        run_path: &Path,
        eclbase: &str,
        report_step: ReportStep,
    ) -> Result<Box<dyn RestartSink>, RestartOpenError>;

    /// Allocate a fresh, empty block to accumulate keywords into ahead of
    /// a write pass (§4.6).
    fn new_block(&self, report_step: ReportStep) -> Box<dyn RestartSink>;
}

/// The content-addressed persistence layer (§1, §6): `get`/`put` keyed by
/// `(node_key, report_step, iens, state)`, plus the two parallel per-member
/// entries (the restart-keyword list and the simulated-time vector).
///
/// Safe for concurrent `put` calls keyed by disjoint tuples (§5).
pub trait Store {
    /// Persist `node`'s current value under the given key.
    fn put_node(
        &self,
        key: &str,
        report_step: ReportStep,
        iens: Iens,
        state: StateClass,
        node: &dyn Node,
    ) -> Result<(), StoreError>;

    /// Load a previously persisted value into `node`.
    fn get_node(
        &self,
        key: &str,
        report_step: ReportStep,
        iens: Iens,
        state: StateClass,
        node: &mut dyn Node,
    ) -> Result<(), StoreError>;

    /// Persist the ordered restart-keyword list for `(report_step, iens)`.
    fn put_restart_keywords(
        &self,
        report_step: ReportStep,
        iens: Iens,
        keywords: &[String],
    ) -> Result<(), StoreError>;

    /// Load the restart-keyword list previously persisted for
    /// `(report_step, iens)`.
    fn get_restart_keywords(
        &self,
        report_step: ReportStep,
        iens: Iens,
    ) -> Result<Vec<String>, StoreError>;

    /// Persist the simulated-time vector for `iens`.
    fn put_sim_time(&self, iens: Iens, times: &[(ReportStep, f64)]) -> Result<(), StoreError>;

    /// Simulated time at `report_step` for `iens`, if loaded. The source
    /// returns a sentinel rather than an error for steps not yet loaded
    /// (§9 open question (b)); this crate follows that and returns `None`.
    fn get_sim_time(&self, iens: Iens, report_step: ReportStep) -> Option<f64>;
}
