//! The per-realization step state machine (§4.7): `IDLE` → `READY` →
//! `PREPARING` → `RUNNING` → `LOADING` → `RETRY?` → `DONE_OK`/`DONE_FAIL`.
//!
//! One [`Orchestrator`] owns exactly one realization's mutable state
//! across its lifetime (the registry, the substitution table, the run
//! descriptor, and the restart-keyword list carried forward between
//! steps); it borrows everything else through [`SharedContext`] for the
//! duration of a call.

use std::fs;
use std::sync::Arc;

use ensrun_core::{Iens, JobStatus, LogLevel, Node, NodeConfig, RunMode, SubstTable, VarClass};
use ensrun_registry::NodeRegistry;
use ensrun_restart::{
    initial_step_restart_keywords, read_restart_block, resolve_restart_keywords,
    write_remaining_nodes, write_restart_block,
};
use ensrun_summary::read_summary_series;

use crate::builtins;
use crate::config::{EnsembleConfig, RunpathKeepPolicy};
use crate::context::SharedContext;
use crate::error::StepError;
use crate::request::StepRequest;
use crate::retry::resample;
use crate::run_descriptor::{RunDescriptor, RunSummary};

/// Observability-only phase tag mirroring §4.7's state names. Not
/// consulted by any transition logic — `RunDescriptor`'s own fields
/// (`ready`, `run_ok`, `num_internal_submit`) are the actual source of
/// truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No step has been started yet, or the previous one finished.
    Idle,
    /// `set` has populated this step's descriptor.
    Ready,
    /// Writing simulator inputs.
    Preparing,
    /// Waiting on the external job queue.
    Running,
    /// Internalizing restart/summary output.
    Loading,
    /// Deciding whether to resubmit.
    Retry,
    /// Terminal success.
    DoneOk,
    /// Terminal failure.
    DoneFail,
    /// Terminal: the realization was inactive this step.
    DoneSkip,
}

/// The result of one `start`/`advance` call, reported back to the
/// caller's worker-pool task (§4.10).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The realization was not scheduled this step.
    Skipped,
    /// `PREPARING` finished and the job was submitted.
    Running,
    /// A load or run failure was resubmitted.
    Retrying,
    /// Still waiting on the queue; report the observed status.
    InProgress(JobStatus),
    /// `DONE_OK`.
    Done,
    /// `DONE_FAIL`: retry budget exhausted.
    Failed,
}

/// Drives one realization's per-step state machine (§3, §4.7).
///
/// Owns the node registry, the substitution table, the run descriptor,
/// and the restart-keyword list carried forward between steps. Holds no
/// references to the shared collaborators between calls; every method
/// that needs them takes a fresh [`SharedContext`].
pub struct Orchestrator {
    iens: Iens,
    config: Arc<EnsembleConfig>,
    registry: NodeRegistry,
    subst: SubstTable,
    descriptor: RunDescriptor,
    restart_keywords: Vec<String>,
    phase: Phase,
}

impl Orchestrator {
    /// A fresh orchestrator for `iens`, idle, with an empty registry.
    pub fn new(iens: Iens, config: Arc<EnsembleConfig>) -> Self {
        Self {
            iens,
            config,
            registry: NodeRegistry::new(),
            subst: SubstTable::new(),
            descriptor: RunDescriptor::new(),
            restart_keywords: Vec::new(),
            phase: Phase::Idle,
        }
    }

    /// The realization this orchestrator drives.
    pub fn iens(&self) -> Iens {
        self.iens
    }

    /// Current observability-only phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// An observability-only snapshot of the run descriptor.
    pub fn summary(&self) -> RunSummary {
        self.descriptor.summarize()
    }

    /// Register a node ahead of the first step that needs it (e.g. an
    /// ensemble-wide `GEN_KW` parameter). Restart-keyword-driven
    /// registration during `PREPARING`/`LOADING` happens internally.
    pub fn configure_node(&mut self, config: NodeConfig, node: Box<dyn Node>) {
        self.registry.add(config, node, &self.subst);
    }

    /// `IDLE` entry action (§4.7): clear `ready` ahead of a new step.
    pub fn init_run(&mut self) {
        self.phase = Phase::Idle;
        self.descriptor.init_run();
    }

    /// Populate the run descriptor for this step and, if active, drive it
    /// through `READY` → `PREPARING` → submission, leaving the
    /// realization in `RUNNING` (§4.7). An inactive step goes straight to
    /// the terminal skip outcome.
    pub fn start(&mut self, ctx: SharedContext<'_>, req: &StepRequest) -> Result<StepOutcome, StepError> {
        self.phase = Phase::Ready;
        self.descriptor.set(
            req.run_mode,
            req.active,
            req.max_submit,
            req.init_step_parameters,
            req.init_state_parameter,
            req.init_state_dynamic,
            req.load_start,
            req.step1,
            req.step2,
            self.iens,
            self.config.run_path_fmt(),
            &mut self.subst,
        )?;

        if !req.active {
            self.phase = Phase::DoneSkip;
            return Ok(StepOutcome::Skipped);
        }

        self.enter_preparing(ctx, req)?;
        self.submit_to_queue(ctx)?;
        self.phase = Phase::Running;
        Ok(StepOutcome::Running)
    }

    /// Poll the queue for this realization's current status and react
    /// (§4.7): `RUN_OK` moves into `LOADING`, `RUN_FAIL` moves into
    /// `RETRY?`, anything else is reported back unchanged for the caller
    /// to poll again later.
    pub fn advance(&mut self, ctx: SharedContext<'_>, req: &StepRequest) -> Result<StepOutcome, StepError> {
        if !self.descriptor.ready() {
            return Err(StepError::StateNotReady);
        }
        match ctx.queue.get_job_status(self.iens) {
            JobStatus::RunOk => self.enter_loading(ctx, req),
            JobStatus::RunFail => self.enter_retry(ctx, req, false),
            other => Ok(StepOutcome::InProgress(other)),
        }
    }

    /// Drive a step from `start` to a terminal or in-progress outcome in
    /// one call, looping through `RETRY?` internally. Convenience for
    /// callers (and tests) that can't yield between `PREPARING` and
    /// `LOADING` the way the real worker pool does (§4.10).
    pub fn run_step(&mut self, ctx: SharedContext<'_>, req: &StepRequest) -> Result<StepOutcome, StepError> {
        self.init_run();
        let outcome = self.start(ctx, req)?;
        if outcome != StepOutcome::Running {
            return Ok(outcome);
        }
        loop {
            match self.advance(ctx, req)? {
                StepOutcome::Retrying => continue,
                other => return Ok(other),
            }
        }
    }

    fn enter_preparing(&mut self, ctx: SharedContext<'_>, req: &StepRequest) -> Result<(), StepError> {
        self.phase = Phase::Preparing;

        let run_path = self
            .descriptor
            .run_path()
            .ok_or(StepError::StateNotReady)?
            .to_path_buf();
        if run_path.exists() {
            fs::remove_dir_all(&run_path)
                .map_err(|e| StepError::RunFailed { reason: format!("clearing run path: {e}") })?;
        }
        fs::create_dir_all(&run_path)
            .map_err(|e| StepError::RunFailed { reason: format!("creating run path: {e}") })?;

        self.load_parameters(ctx, req)?;

        builtins::populate(
            &mut self.subst,
            &self.descriptor,
            &req.eclbase_fmt,
            self.iens,
            self.descriptor.num_internal_submit(),
            &req.case_name,
            &req.equil_init_file,
            ctx.random,
        )?;

        let step1 = self.descriptor.step1();
        if step1.get() == 0 {
            self.restart_keywords = initial_step_restart_keywords();
        } else {
            let keywords = resolve_restart_keywords(
                ctx.store,
                step1,
                self.iens,
                std::mem::take(&mut self.restart_keywords),
            )?;
            let eclbase = self.subst.get("ECLBASE").unwrap_or_default().to_string();
            let mut block = ctx.restart_opener.new_block(step1);
            write_restart_block(
                block.as_mut(),
                &mut self.registry,
                ctx.catalog,
                ctx.store,
                &keywords,
                &run_path,
                &self.subst,
                self.iens,
                step1,
                req.init_state_dynamic,
            )?;
            block.finish_write(&run_path, &eclbase)?;
            self.restart_keywords = keywords;
        }

        write_remaining_nodes(&self.registry, &self.restart_keywords, &run_path, step1)?;

        for spec in &req.templates {
            let dest_name = self.subst.expand(&spec.dest_name)?;
            ctx.templates.instantiate(&spec.template_path, &run_path.join(dest_name), &self.subst)?;
        }

        Ok(())
    }

    fn load_parameters(&mut self, ctx: SharedContext<'_>, req: &StepRequest) -> Result<(), StepError> {
        for key in self.registry.snapshot_keys() {
            let Some(config) = self.registry.get_config(&key) else {
                continue;
            };
            if config.var_class != VarClass::Parameter {
                continue;
            }
            let node = self.registry.get_mut(&key)?;
            ctx.store.get_node(&key, req.init_step_parameters, self.iens, req.init_state_parameter, node)?;
        }
        Ok(())
    }

    fn submit_to_queue(&mut self, ctx: SharedContext<'_>) -> Result<(), StepError> {
        let run_path = self.descriptor.run_path().ok_or(StepError::StateNotReady)?;
        let eclbase = self.subst.get("ECLBASE").unwrap_or_default().to_string();
        ctx.queue.insert_job(run_path, &eclbase, self.iens)?;
        Ok(())
    }

    fn enter_loading(&mut self, ctx: SharedContext<'_>, req: &StepRequest) -> Result<StepOutcome, StepError> {
        self.phase = Phase::Loading;
        ctx.queue.set_external_load(self.iens);

        let run_path = self
            .descriptor
            .run_path()
            .ok_or(StepError::StateNotReady)?
            .to_path_buf();
        let eclbase = self.subst.get("ECLBASE").unwrap_or_default().to_string();
        let step1 = self.descriptor.step1();
        let step2 = self.descriptor.step2();
        let load_start = self.descriptor.load_start();

        if ctx.restart_opener.unified_exists(&run_path, &eclbase) {
            return Err(StepError::UnsupportedRestartImpl {
                keyword: "<unified restart file>".to_string(),
            });
        }

        // A soft error here (a store outage, a missing summary file) joins
        // `load_ok = false` and is routed into the retry decision below,
        // same as a dispatched node load returning `Err`; only a hard error
        // (unsupported keyword, mangled filename, missing registry entry)
        // propagates and aborts the realization (§4.9, §10.1).
        let mut load_ok = true;

        if ctx.restart_opener.per_step_exists(&run_path, &eclbase, step2) {
            match ctx.restart_opener.load_per_step(&run_path, &eclbase, step2) {
                Ok(block) => {
                    match read_restart_block(
                        block.as_ref(),
                        &mut self.registry,
                        ctx.catalog,
                        ctx.store,
                        ctx.log,
                        &self.subst,
                        &run_path,
                        self.iens,
                        step1,
                        step2,
                        true,
                    ) {
                        Ok(report) => {
                            self.restart_keywords = report.restart_keywords;
                            load_ok &= report.load_ok;
                        }
                        Err(e) => {
                            let err = StepError::from(e);
                            if !err.is_soft() {
                                return Err(err);
                            }
                            load_ok = false;
                        }
                    }
                }
                Err(e) => {
                    let err = StepError::from(e);
                    if !err.is_soft() {
                        return Err(err);
                    }
                    load_ok = false;
                }
            }
        }

        match read_summary_series(
            &mut self.registry,
            ctx.summary_loader,
            ctx.store,
            ctx.log,
            &run_path,
            &eclbase,
            self.iens,
            load_start,
            step2,
            self.descriptor.run_mode(),
        ) {
            Ok(summary_ok) => load_ok &= summary_ok,
            Err(e) => {
                let err = StepError::from(e);
                if !err.is_soft() {
                    return Err(err);
                }
                load_ok = false;
            }
        }

        if !load_ok {
            return self.enter_retry(ctx, req, true);
        }

        ctx.queue.set_load_ok(self.iens);
        self.descriptor.set_run_ok(true);
        self.finish_success();
        Ok(StepOutcome::Done)
    }

    fn finish_success(&mut self) {
        self.phase = Phase::DoneOk;
        let remove = match self.config.keep_policy() {
            RunpathKeepPolicy::Always => false,
            RunpathKeepPolicy::ExplicitDelete => true,
            RunpathKeepPolicy::DefaultKeep => self.descriptor.run_mode() == RunMode::Assimilation,
        };
        if remove {
            if let Some(path) = self.descriptor.run_path() {
                let _ = fs::remove_dir_all(path);
            }
        }
        self.descriptor.complete();
    }

    fn enter_retry(
        &mut self,
        ctx: SharedContext<'_>,
        req: &StepRequest,
        load_failed: bool,
    ) -> Result<StepOutcome, StepError> {
        self.phase = Phase::Retry;
        if load_failed {
            ctx.queue.set_external_fail(self.iens);
        }

        if self.descriptor.can_retry() {
            ctx.queue.set_external_restart(self.iens);
            resample(&mut self.registry, self.iens)?;
            self.descriptor.increment_submit();
            self.enter_preparing(ctx, req)?;
            self.submit_to_queue(ctx)?;
            self.phase = Phase::Running;
            Ok(StepOutcome::Retrying)
        } else {
            ctx.queue.set_all_fail(self.iens);
            self.descriptor.set_run_ok(false);
            ctx.log.log(
                self.iens,
                self.descriptor.step1(),
                self.descriptor.step2(),
                LogLevel::Retry,
                "retry budget exhausted",
            );
            self.phase = Phase::DoneFail;
            Ok(StepOutcome::Failed)
        }
    }
}
