//! The per-step mutable run descriptor (§3, §4.2).

use std::path::PathBuf;

use ensrun_core::{Iens, ReportStep, RunMode, StateClass, SubstError, SubstTable};

/// Per-step state describing which report-step range to run, which step
/// to seed parameters from, whether state is forecast or analyzed, the
/// resolved run directory, and completion flags (§3).
///
/// Every field here is exclusively owned by one realization's
/// orchestrator; nothing in this struct is shared across realizations.
#[derive(Debug, Clone)]
pub struct RunDescriptor {
    active: bool,
    ready: bool,
    step1: ReportStep,
    step2: ReportStep,
    init_step_parameters: ReportStep,
    init_state_parameter: StateClass,
    init_state_dynamic: StateClass,
    load_start: ReportStep,
    run_mode: RunMode,
    run_path: Option<PathBuf>,
    max_internal_submit: u32,
    num_internal_submit: u32,
    run_ok: bool,
}

impl Default for RunDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl RunDescriptor {
    /// A fresh, inactive descriptor (`IDLE`, §4.7).
    pub fn new() -> Self {
        Self {
            active: false,
            ready: false,
            step1: ReportStep::new(0),
            step2: ReportStep::new(0),
            init_step_parameters: ReportStep::new(0),
            init_state_parameter: StateClass::Analyzed,
            init_state_dynamic: StateClass::Analyzed,
            load_start: ReportStep::new(0),
            run_mode: RunMode::Assimilation,
            run_path: None,
            max_internal_submit: 0,
            num_internal_submit: 0,
            run_ok: false,
        }
    }

    /// Clear `ready` (`IDLE` entry action, §4.7).
    pub fn init_run(&mut self) {
        self.ready = false;
    }

    /// Re-seed the loading window ahead of a retry, re-resolving
    /// `run_path` (§4.2). Does not touch `run_mode`, submit counters, or
    /// the other fields `set` owns.
    pub fn reset_for_load(
        &mut self,
        load_start: ReportStep,
        step1: ReportStep,
        step2: ReportStep,
        iens: Iens,
        run_path_fmt: &str,
        subst: &mut SubstTable,
    ) -> Result<(), SubstError> {
        self.load_start = load_start;
        self.step1 = step1;
        self.step2 = step2;
        self.resolve_run_path(iens, run_path_fmt, subst)
    }

    /// Fully populate the descriptor for a new step and mark it `ready`
    /// (§4.2: `set` transitions `ready` to true).
    #[allow(clippy::too_many_arguments)]
    pub fn set(
        &mut self,
        run_mode: RunMode,
        active: bool,
        max_submit: u32,
        init_params_step: ReportStep,
        init_params_state: StateClass,
        init_state: StateClass,
        load_start: ReportStep,
        step1: ReportStep,
        step2: ReportStep,
        iens: Iens,
        run_path_fmt: &str,
        subst: &mut SubstTable,
    ) -> Result<(), SubstError> {
        self.run_mode = run_mode;
        self.active = active;
        self.max_internal_submit = max_submit;
        self.num_internal_submit = 0;
        self.init_step_parameters = init_params_step;
        self.init_state_parameter = init_params_state;
        self.init_state_dynamic = init_state;
        self.load_start = load_start;
        self.step1 = step1;
        self.step2 = step2;
        self.run_ok = false;
        self.resolve_run_path(iens, run_path_fmt, subst)?;
        self.ready = true;
        Ok(())
    }

    fn resolve_run_path(
        &mut self,
        iens: Iens,
        run_path_fmt: &str,
        subst: &mut SubstTable,
    ) -> Result<(), SubstError> {
        subst.insert("IENS", iens.get().to_string(), "realization index");
        subst.insert("IENS4", iens.padded4(), "zero-padded realization index");
        let expanded = subst.expand(run_path_fmt)?;
        subst.insert("RUNPATH", expanded.clone(), "resolved run directory");
        self.run_path = Some(PathBuf::from(expanded));
        Ok(())
    }

    /// Release `run_path` iff `run_ok` (§4.2, §4.7 `DONE_OK`).
    pub fn complete(&mut self) {
        if self.run_ok {
            self.run_path = None;
        }
    }

    /// An observability-only snapshot (§4.2).
    pub fn summarize(&self) -> RunSummary {
        RunSummary {
            active: self.active,
            ready: self.ready,
            step1: self.step1,
            step2: self.step2,
            num_internal_submit: self.num_internal_submit,
            max_internal_submit: self.max_internal_submit,
            run_ok: self.run_ok,
            run_path: self.run_path.clone(),
        }
    }

    /// Whether this realization is scheduled to run this step at all.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Whether `set`/`reset_for_load` has run for this step (§3 invariant:
    /// required before any execution operation).
    pub fn ready(&self) -> bool {
        self.ready
    }

    /// The run's integration start step.
    pub fn step1(&self) -> ReportStep {
        self.step1
    }

    /// The run's integration end step.
    pub fn step2(&self) -> ReportStep {
        self.step2
    }

    /// The step parameters are seeded from.
    pub fn init_step_parameters(&self) -> ReportStep {
        self.init_step_parameters
    }

    /// State class to read parameters at `init_step_parameters` with.
    pub fn init_state_parameter(&self) -> StateClass {
        self.init_state_parameter
    }

    /// State class to read dynamic state at `step1` with.
    pub fn init_state_dynamic(&self) -> StateClass {
        self.init_state_dynamic
    }

    /// First step of the summary-loading window.
    pub fn load_start(&self) -> ReportStep {
        self.load_start
    }

    /// The configured run mode for this step.
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    /// The resolved run directory, if one has been computed.
    pub fn run_path(&self) -> Option<&std::path::Path> {
        self.run_path.as_deref()
    }

    /// Number of internal resubmissions already attempted this step.
    pub fn num_internal_submit(&self) -> u32 {
        self.num_internal_submit
    }

    /// The configured retry budget (not counting the first attempt).
    pub fn max_internal_submit(&self) -> u32 {
        self.max_internal_submit
    }

    /// `RUN_OK ∧ LOAD_OK`, per §4.7's notes.
    pub fn run_ok(&self) -> bool {
        self.run_ok
    }

    /// Record the combined run/load outcome (§4.7: "`run_ok` is strictly
    /// `RUN_OK ∧ LOAD_OK`").
    pub fn set_run_ok(&mut self, run_ok: bool) {
        self.run_ok = run_ok;
    }

    /// Consume one retry attempt (§4.8).
    pub fn increment_submit(&mut self) {
        self.num_internal_submit += 1;
    }

    /// `num_internal_submit < max_internal_submit` (§4.8).
    pub fn can_retry(&self) -> bool {
        self.num_internal_submit < self.max_internal_submit
    }
}

/// Observability-only snapshot of a [`RunDescriptor`] (§4.2).
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Whether the realization was scheduled this step.
    pub active: bool,
    /// Whether the descriptor has been populated for this step.
    pub ready: bool,
    /// Integration start step.
    pub step1: ReportStep,
    /// Integration end step.
    pub step2: ReportStep,
    /// Internal resubmissions so far.
    pub num_internal_submit: u32,
    /// Configured retry budget.
    pub max_internal_submit: u32,
    /// Combined run/load outcome.
    pub run_ok: bool,
    /// Resolved run directory, if any.
    pub run_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_marks_ready_and_resolves_run_path() {
        let mut descriptor = RunDescriptor::new();
        let mut subst = SubstTable::new();
        descriptor
            .set(
                RunMode::Assimilation,
                true,
                2,
                ReportStep::new(0),
                StateClass::Analyzed,
                StateClass::Analyzed,
                ReportStep::new(0),
                ReportStep::new(0),
                ReportStep::new(2),
                Iens::new(3),
                "/ens/real<IENS>",
                &mut subst,
            )
            .unwrap();

        assert!(descriptor.ready());
        assert_eq!(descriptor.run_path(), Some(std::path::Path::new("/ens/real3")));
        assert_eq!(subst.get("RUNPATH"), Some("/ens/real3"));
    }

    #[test]
    fn complete_releases_run_path_only_on_success() {
        let mut descriptor = RunDescriptor::new();
        let mut subst = SubstTable::new();
        descriptor
            .set(
                RunMode::Assimilation,
                true,
                0,
                ReportStep::new(0),
                StateClass::Analyzed,
                StateClass::Analyzed,
                ReportStep::new(0),
                ReportStep::new(0),
                ReportStep::new(1),
                Iens::new(1),
                "/ens/real<IENS>",
                &mut subst,
            )
            .unwrap();

        descriptor.set_run_ok(false);
        descriptor.complete();
        assert!(descriptor.run_path().is_some());

        descriptor.set_run_ok(true);
        descriptor.complete();
        assert!(descriptor.run_path().is_none());
    }

    #[test]
    fn retry_budget_tracks_submit_count() {
        let mut descriptor = RunDescriptor::new();
        let mut subst = SubstTable::new();
        descriptor
            .set(
                RunMode::Assimilation,
                true,
                1,
                ReportStep::new(0),
                StateClass::Analyzed,
                StateClass::Analyzed,
                ReportStep::new(0),
                ReportStep::new(0),
                ReportStep::new(1),
                Iens::new(1),
                "/ens/real<IENS>",
                &mut subst,
            )
            .unwrap();

        assert!(descriptor.can_retry());
        descriptor.increment_submit();
        assert!(!descriptor.can_retry());
    }
}
