//! Locating the summary files to read for one realization (§4.5).

use std::path::Path;

use ensrun_core::{ReportStep, RunMode, SummaryLoader};

/// Which form of summary storage a realization's files are found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryForm {
    /// One file covering the whole run.
    Unified,
    /// One file per report step.
    PerStep,
}

/// Decide which summary form to read and the last report step available
/// in it, or `None` if there is nothing to load for this realization
/// (§4.5: "collect per-step summary files for increasing report steps;
/// in `PREDICTION` mode stop at the first gap, else stop at `step2`").
///
/// `start` is the caller's already-clamped lower bound (`max(load_start,
/// 1)`, report step 0 is never loaded from a summary).
pub fn locate(
    loader: &dyn SummaryLoader,
    run_path: &Path,
    eclbase: &str,
    start: ReportStep,
    step2: ReportStep,
    run_mode: RunMode,
) -> Option<(SummaryForm, ReportStep)> {
    if start.get() > step2.get() {
        return None;
    }
    if loader.unified_exists(run_path, eclbase) {
        return Some((SummaryForm::Unified, step2));
    }
    let last = last_per_step(loader, run_path, eclbase, start, step2, run_mode);
    if last.get() < start.get() {
        return None;
    }
    Some((SummaryForm::PerStep, last))
}

fn last_per_step(
    loader: &dyn SummaryLoader,
    run_path: &Path,
    eclbase: &str,
    start: ReportStep,
    step2: ReportStep,
    run_mode: RunMode,
) -> ReportStep {
    if run_mode != RunMode::Prediction {
        return step2;
    }
    let mut last = start.get().saturating_sub(1);
    for r in start.get()..=step2.get() {
        if loader.per_step_exists(run_path, eclbase, ReportStep::new(r)) {
            last = r;
        } else {
            break;
        }
    }
    ReportStep::new(last)
}
