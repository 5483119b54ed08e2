//! A scripted [`Queue`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

use ensrun_core::{Iens, JobStatus, Queue, QueueError};

/// Every call the orchestrator made against a [`ScriptedQueue`], in order,
/// for assertion in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueCall {
    /// `insert_job` for this realization, with the run path used.
    InsertJob(String),
    /// `set_external_load`.
    ExternalLoad,
    /// `set_load_ok`.
    LoadOk,
    /// `set_external_fail`.
    ExternalFail,
    /// `set_external_restart`.
    ExternalRestart,
    /// `set_all_fail`.
    AllFail,
    /// `kill_job`.
    Kill,
}

struct RealizationState {
    /// What `get_job_status` reports. Only touched by `set_status`: the
    /// test scripts a terminal poll result up front and it must survive
    /// every lifecycle call the orchestrator makes across a step,
    /// including a retry's re-submission.
    scripted_status: JobStatus,
    /// Bookkeeping mirror of the lifecycle calls the orchestrator has
    /// made (`insert_job` → `Submitted`, `set_external_load` →
    /// `Loading`, ...), for introspection only; `get_job_status` never
    /// reads this field.
    lifecycle_status: JobStatus,
    calls: Vec<QueueCall>,
}

impl Default for RealizationState {
    fn default() -> Self {
        Self {
            scripted_status: JobStatus::NotActive,
            lifecycle_status: JobStatus::NotActive,
            calls: Vec::new(),
        }
    }
}

/// A [`Queue`] whose status for each `iens` is scripted ahead of time by
/// the test, and whose lifecycle calls are recorded for later assertion.
#[derive(Default)]
pub struct ScriptedQueue {
    state: Mutex<HashMap<u32, RealizationState>>,
    kill_allowed: Mutex<bool>,
}

impl ScriptedQueue {
    /// A new queue with every realization starting at `NotActive`.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HashMap::new()),
            kill_allowed: Mutex::new(true),
        }
    }

    /// Set the status `get_job_status(iens)` will report until changed
    /// again. Lifecycle calls (`insert_job`, `set_external_load`, ...)
    /// never overwrite this.
    pub fn set_status(&self, iens: Iens, status: JobStatus) {
        self.state.lock().unwrap().entry(iens.get()).or_default().scripted_status = status;
    }

    fn set_lifecycle_status(&self, iens: Iens, status: JobStatus) {
        self.state.lock().unwrap().entry(iens.get()).or_default().lifecycle_status = status;
    }

    /// Whether `kill_job` should report success.
    pub fn set_kill_allowed(&self, allowed: bool) {
        *self.kill_allowed.lock().unwrap() = allowed;
    }

    /// The calls recorded for `iens`, in order.
    pub fn calls_for(&self, iens: Iens) -> Vec<QueueCall> {
        self.state
            .lock()
            .unwrap()
            .get(&iens.get())
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, iens: Iens, call: QueueCall) {
        self.state
            .lock()
            .unwrap()
            .entry(iens.get())
            .or_default()
            .calls
            .push(call);
    }
}

impl Queue for ScriptedQueue {
    fn insert_job(
        &self,
        run_path: &std::path::Path,
        _eclbase: &str,
        iens: Iens,
    ) -> Result<(), QueueError> {
        self.record(
            iens,
            QueueCall::InsertJob(run_path.to_string_lossy().into_owned()),
        );
        self.set_lifecycle_status(iens, JobStatus::Submitted);
        Ok(())
    }

    fn get_job_status(&self, iens: Iens) -> JobStatus {
        self.state
            .lock()
            .unwrap()
            .get(&iens.get())
            .map(|s| s.scripted_status)
            .unwrap_or(JobStatus::NotActive)
    }

    fn set_external_load(&self, iens: Iens) {
        self.record(iens, QueueCall::ExternalLoad);
        self.set_lifecycle_status(iens, JobStatus::Loading);
    }

    fn set_load_ok(&self, iens: Iens) {
        self.record(iens, QueueCall::LoadOk);
        self.set_lifecycle_status(iens, JobStatus::AllOk);
    }

    fn set_external_fail(&self, iens: Iens) {
        self.record(iens, QueueCall::ExternalFail);
    }

    fn set_external_restart(&self, iens: Iens) {
        self.record(iens, QueueCall::ExternalRestart);
        self.set_lifecycle_status(iens, JobStatus::Submitted);
    }

    fn set_all_fail(&self, iens: Iens) {
        self.record(iens, QueueCall::AllFail);
        self.set_lifecycle_status(iens, JobStatus::AllFail);
    }

    fn kill_job(&self, iens: Iens) -> bool {
        self.record(iens, QueueCall::Kill);
        *self.kill_allowed.lock().unwrap()
    }

    fn iget_sim_start(&self, _iens: Iens) -> Option<SystemTime> {
        None
    }

    fn iget_submit_time(&self, _iens: Iens) -> Option<SystemTime> {
        None
    }
}
