//! Thin entry points matching the external worker pool's task shape
//! (§4.10, §9): the compute-heavy `PREPARING`/submission stage is one
//! task, the blocking-poll `LOADING`/retry stage is a second, so a thread
//! pool can run many realizations' first stage concurrently without
//! tying up a worker thread waiting on the queue.

use ensrun_core::Iens;

use crate::context::SharedContext;
use crate::error::StepError;
use crate::orchestrator::{Orchestrator, StepOutcome};
use crate::request::StepRequest;

/// First worker-pool task: populate the run descriptor, write simulator
/// inputs, and submit to the queue (§4.10). Returns once the job has been
/// handed off; does not block waiting for it to finish.
pub fn preparing_task(
    orchestrator: &mut Orchestrator,
    ctx: SharedContext<'_>,
    req: &StepRequest,
) -> Result<StepOutcome, StepError> {
    orchestrator.init_run();
    orchestrator.start(ctx, req)
}

/// Second worker-pool task: poll the queue once and react (§4.10). A
/// caller drives this repeatedly (e.g. on a timer) until it returns
/// anything other than `InProgress`.
pub fn loading_task(
    orchestrator: &mut Orchestrator,
    ctx: SharedContext<'_>,
    req: &StepRequest,
) -> Result<StepOutcome, StepError> {
    orchestrator.advance(ctx, req)
}

/// Request cancellation of a realization's current job (§4.10, §6).
pub fn kill_simulation(ctx: SharedContext<'_>, iens: Iens) -> bool {
    ctx.queue.kill_job(iens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensrun_core::{JobStatus, ReportStep, RunMode, StateClass};
    use ensrun_test_utils::{
        InMemoryStore, InMemorySummary, MockJobCatalog, MockTemplateEngine, NullLogSink,
        ScriptedQueue, ScriptedRandomSource, ScriptedRestartOpener, ScriptedSummaryLoader,
    };
    use std::sync::Arc;

    use crate::config::{EnsembleConfig, RunpathKeepPolicy};

    #[test]
    fn preparing_then_loading_task_reaches_done() {
        let config = Arc::new(
            EnsembleConfig::new(
                "/tmp/ensrun_test/real<IENS>",
                "BASE_<IENS>",
                RunpathKeepPolicy::DefaultKeep,
                1,
            )
            .unwrap(),
        );
        let mut orchestrator = Orchestrator::new(Iens::new(9), config);

        let store = InMemoryStore::new();
        let queue = ScriptedQueue::new();
        let templates = MockTemplateEngine::new();
        let catalog = MockJobCatalog::new();
        let log = NullLogSink;
        let summary_loader = ScriptedSummaryLoader::new().with_unified(InMemorySummary::new());
        let restart_opener = ScriptedRestartOpener::new();
        let random = ScriptedRandomSource::new();
        let ctx = SharedContext {
            store: &store,
            queue: &queue,
            templates: &templates,
            catalog: &catalog,
            log: &log,
            summary_loader: &summary_loader,
            restart_opener: &restart_opener,
            random: &random,
        };

        let req = StepRequest {
            run_mode: RunMode::Assimilation,
            active: true,
            max_submit: 1,
            init_step_parameters: ReportStep::new(0),
            init_state_parameter: StateClass::Analyzed,
            init_state_dynamic: StateClass::Analyzed,
            load_start: ReportStep::new(0),
            step1: ReportStep::new(0),
            step2: ReportStep::new(1),
            case_name: "CASE1".to_string(),
            equil_init_file: "equil.inc".to_string(),
            eclbase_fmt: "BASE_<IENS>".to_string(),
            templates: Vec::new(),
        };

        queue.set_status(Iens::new(9), JobStatus::RunOk);

        let outcome = preparing_task(&mut orchestrator, ctx, &req).unwrap();
        assert_eq!(outcome, StepOutcome::Running);

        let outcome = loading_task(&mut orchestrator, ctx, &req).unwrap();
        assert_eq!(outcome, StepOutcome::Done);
    }
}
