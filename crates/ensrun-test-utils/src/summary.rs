//! An in-memory [`SummarySource`] and a scripted [`SummaryLoader`] for tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use ensrun_core::{ReportStep, SummaryLoadError, SummaryLoader, SummarySource};

/// A summary source backed by plain maps, standing in for the real
/// collaborator that parses unified/per-step summary files (§1, §6).
#[derive(Default, Clone)]
pub struct InMemorySummary {
    values: HashMap<(String, u32), f64>,
    times: HashMap<u32, f64>,
    last_step: u32,
}

impl InMemorySummary {
    /// A new, empty summary with `last_report_step() == 0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value for `key` at `report_step`, extending
    /// `last_report_step` if necessary.
    pub fn with_value(mut self, key: impl Into<String>, report_step: ReportStep, value: f64) -> Self {
        self.values.insert((key.into(), report_step.get()), value);
        self.last_step = self.last_step.max(report_step.get());
        self
    }

    /// Register the simulated time for `report_step`.
    pub fn with_time(mut self, report_step: ReportStep, time: f64) -> Self {
        self.times.insert(report_step.get(), time);
        self.last_step = self.last_step.max(report_step.get());
        self
    }
}

impl SummarySource for InMemorySummary {
    fn last_report_step(&self) -> ReportStep {
        ReportStep::new(self.last_step)
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.keys().any(|(k, _)| k == key)
    }

    fn value(&self, key: &str, report_step: ReportStep) -> Option<f64> {
        self.values.get(&(key.to_string(), report_step.get())).copied()
    }

    fn report_time(&self, report_step: ReportStep) -> Option<f64> {
        self.times.get(&report_step.get()).copied()
    }
}

/// A [`SummaryLoader`] whose file-existence answers and loaded content are
/// scripted ahead of time by the test, standing in for the real
/// collaborator that probes the filesystem and parses unified/per-step
/// summary files (§1, §4.5, §6).
#[derive(Default)]
pub struct ScriptedSummaryLoader {
    unified: Mutex<Option<InMemorySummary>>,
    per_step: Mutex<HashMap<u32, InMemorySummary>>,
}

impl ScriptedSummaryLoader {
    /// A loader reporting no files present at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a unified summary file as present, with the given content.
    pub fn with_unified(self, summary: InMemorySummary) -> Self {
        *self.unified.lock().unwrap() = Some(summary);
        self
    }

    /// Script a per-step summary file as present at `report_step`.
    pub fn with_per_step(self, report_step: ReportStep, summary: InMemorySummary) -> Self {
        self.per_step
            .lock()
            .unwrap()
            .insert(report_step.get(), summary);
        self
    }
}

fn merge(summaries: Vec<&InMemorySummary>) -> InMemorySummary {
    let mut merged = InMemorySummary::new();
    for s in summaries {
        for ((key, step), value) in &s.values {
            merged = merged.with_value(key.clone(), ReportStep::new(*step), *value);
        }
        for (step, time) in &s.times {
            merged = merged.with_time(ReportStep::new(*step), *time);
        }
    }
    merged
}

impl SummaryLoader for ScriptedSummaryLoader {
    fn unified_exists(&self, _run_path: &Path, _eclbase: &str) -> bool {
        self.unified.lock().unwrap().is_some()
    }

    fn per_step_exists(&self, _run_path: &Path, _eclbase: &str, report_step: ReportStep) -> bool {
        self.per_step.lock().unwrap().contains_key(&report_step.get())
    }

    fn load_unified(
        &self,
        _run_path: &Path,
        eclbase: &str,
    ) -> Result<Box<dyn SummarySource>, SummaryLoadError> {
        self.unified
            .lock()
            .unwrap()
            .clone()
            .map(|s| Box::new(s) as Box<dyn SummarySource>)
            .ok_or_else(|| SummaryLoadError::HeaderMissing {
                eclbase: eclbase.to_string(),
            })
    }

    fn load_per_step(
        &self,
        _run_path: &Path,
        eclbase: &str,
        report_steps: &[ReportStep],
    ) -> Result<Box<dyn SummarySource>, SummaryLoadError> {
        let guard = self.per_step.lock().unwrap();
        let found: Vec<&InMemorySummary> = report_steps
            .iter()
            .filter_map(|s| guard.get(&s.get()))
            .collect();
        if found.is_empty() {
            return Err(SummaryLoadError::NoDataFiles {
                eclbase: eclbase.to_string(),
            });
        }
        Ok(Box::new(merge(found)))
    }
}
