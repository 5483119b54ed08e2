//! Per-step inputs handed to the orchestrator by the calling layer (§4.1,
//! §4.7): everything a step needs beyond the collaborators in
//! [`crate::SharedContext`] and the ensemble-wide [`crate::EnsembleConfig`].

use std::path::PathBuf;

use ensrun_core::{ReportStep, RunMode, StateClass};

/// One simulator-input template to instantiate during `PREPARING` (§4.1,
/// §6). `dest_name` may itself contain `<TAG>` sentinels (e.g.
/// `<ECLBASE>.DATA`), expanded against the same substitution table before
/// the file is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Source template file.
    pub template_path: PathBuf,
    /// Destination file name, relative to `run_path`, possibly templated.
    pub dest_name: String,
}

/// Everything the orchestrator needs to drive one realization through one
/// report-step range, beyond the shared collaborators and ensemble
/// configuration (§3, §4.7).
#[derive(Clone, Debug)]
pub struct StepRequest {
    /// Controls summary-gap tolerance and terminal runpath cleanup.
    pub run_mode: RunMode,
    /// Whether this realization is scheduled to run this step at all.
    pub active: bool,
    /// Retry budget for this step (not counting the first attempt).
    pub max_submit: u32,
    /// Step parameters are seeded from.
    pub init_step_parameters: ReportStep,
    /// State class to read parameters with.
    pub init_state_parameter: StateClass,
    /// State class to read dynamic state at `step1` with.
    pub init_state_dynamic: StateClass,
    /// First step of the summary-loading window.
    pub load_start: ReportStep,
    /// Integration start step.
    pub step1: ReportStep,
    /// Integration end step.
    pub step2: ReportStep,
    /// Ensemble case name, exposed as the `CASE` built-in.
    pub case_name: String,
    /// Equilibration include file, used when `step1 = 0` to build `INIT`.
    pub equil_init_file: String,
    /// `eclbase` format string, expanded against the substitution table
    /// to produce `ECLBASE`.
    pub eclbase_fmt: String,
    /// Simulator input templates to instantiate this step.
    pub templates: Vec<TemplateSpec>,
}
