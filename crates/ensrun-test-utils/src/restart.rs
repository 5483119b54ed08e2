//! An in-memory [`RestartSink`] and a scripted [`RestartOpener`] for tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use ensrun_core::{
    NodeError, ReportStep, RestartKeywordEntry, RestartOpenError, RestartOpener, RestartSink,
};

/// A restart block backed by a plain `Vec`, standing in for the real
/// collaborator that frames and flips binary records (§1, §6).
pub struct InMemoryRestartBlock {
    report_step: ReportStep,
    keywords: Vec<RestartKeywordEntry>,
    finished: Mutex<Option<(String, String)>>,
}

impl InMemoryRestartBlock {
    /// An empty block for `report_step`, ready to be read from or written
    /// to.
    pub fn new(report_step: ReportStep) -> Self {
        Self {
            report_step,
            keywords: Vec::new(),
            finished: Mutex::new(None),
        }
    }

    /// Pre-populate this block with keyword entries, as if they had been
    /// decoded from a file already (reader-side fixture use).
    pub fn with_keywords(mut self, keywords: Vec<RestartKeywordEntry>) -> Self {
        self.keywords = keywords;
        self
    }

    /// The `(run_path, eclbase)` passed to the last `finish_write` call, if
    /// any.
    pub fn finished_with(&self) -> Option<(String, String)> {
        self.finished.lock().unwrap().clone()
    }
}

impl RestartSink for InMemoryRestartBlock {
    fn report_step(&self) -> ReportStep {
        self.report_step
    }

    fn keywords(&self) -> &[RestartKeywordEntry] {
        &self.keywords
    }

    fn push_keyword(&mut self, entry: RestartKeywordEntry) {
        self.keywords.push(entry);
    }

    fn finish_write(self: Box<Self>, run_path: &Path, eclbase: &str) -> Result<(), NodeError> {
        *self.finished.lock().unwrap() = Some((
            run_path.to_string_lossy().into_owned(),
            eclbase.to_string(),
        ));
        Ok(())
    }
}

/// A [`RestartOpener`] whose file-existence answers and per-step block
/// content are scripted ahead of time by the test, standing in for the
/// real collaborator that frames and flips binary records (§1, §4.4,
/// §4.6).
#[derive(Default)]
pub struct ScriptedRestartOpener {
    unified: Mutex<bool>,
    per_step: Mutex<HashMap<u32, Vec<RestartKeywordEntry>>>,
}

impl ScriptedRestartOpener {
    /// An opener reporting no files present at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a unified restart file as present (§9: reading it is
    /// unsupported, so tests use this to exercise that fatal path).
    pub fn with_unified(self) -> Self {
        *self.unified.lock().unwrap() = true;
        self
    }

    /// Script a per-step restart file as present at `report_step`, with
    /// the given keyword entries in file order.
    pub fn with_per_step(self, report_step: ReportStep, keywords: Vec<RestartKeywordEntry>) -> Self {
        self.per_step.lock().unwrap().insert(report_step.get(), keywords);
        self
    }
}

impl RestartOpener for ScriptedRestartOpener {
    fn unified_exists(&self, _run_path: &Path, _eclbase: &str) -> bool {
        *self.unified.lock().unwrap()
    }

    fn per_step_exists(&self, _run_path: &Path, _eclbase: &str, report_step: ReportStep) -> bool {
        self.per_step.lock().unwrap().contains_key(&report_step.get())
    }

    fn load_per_step(
        &self,
        _run_path: &Path,
        _eclbase: &str,
        report_step: ReportStep,
    ) -> Result<Box<dyn RestartSink>, RestartOpenError> {
        let keywords = self
            .per_step
            .lock()
            .unwrap()
            .get(&report_step.get())
            .cloned()
            .ok_or_else(|| RestartOpenError::Backend {
                reason: format!("no per-step restart file scripted for step {report_step}"),
            })?;
        Ok(Box::new(InMemoryRestartBlock::new(report_step).with_keywords(keywords)))
    }

    fn new_block(&self, report_step: ReportStep) -> Box<dyn RestartSink> {
        Box::new(InMemoryRestartBlock::new(report_step))
    }
}
