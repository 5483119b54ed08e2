//! A scripted [`Node`] for tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ensrun_core::{Iens, Node, NodeCap, NodeError, ReportStep, SubstTable, SummarySource, VarClass};

/// Every call made against a [`ScriptedNode`], in order.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeCall {
    /// `ecl_load` with the restart keyword or `None` for a summary load.
    Load {
        /// See [`NodeCall::Load`].
        restart_keyword: Option<String>,
        /// The report step loaded.
        report_step: ReportStep,
    },
    /// `ecl_load_static` with the payload length.
    LoadStatic {
        /// Number of bytes in the payload.
        len: usize,
        /// The report step loaded.
        report_step: ReportStep,
    },
    /// `ecl_write` at the given step.
    Write(ReportStep),
    /// `initialize` (resample) for the given realization.
    Initialize(Iens),
    /// `invalidate_cache`.
    InvalidateCache,
    /// `wire_subst_parent`.
    WireSubstParent,
}

/// A [`Node`] whose load/write outcomes are scripted by the test ahead of
/// time, recording every call it receives.
pub struct ScriptedNode {
    var_class: VarClass,
    caps: Vec<NodeCap>,
    load_result: Mutex<Result<(), NodeError>>,
    write_result: Mutex<Result<(), NodeError>>,
    always_internalize: bool,
    calls: Mutex<Vec<NodeCall>>,
    cache_loaded: Mutex<bool>,
}

impl ScriptedNode {
    /// A node of the given class that succeeds at everything by default.
    pub fn new(var_class: VarClass) -> Self {
        Self {
            var_class,
            caps: Vec::new(),
            load_result: Mutex::new(Ok(())),
            write_result: Mutex::new(Ok(())),
            always_internalize: true,
            calls: Mutex::new(Vec::new()),
            cache_loaded: Mutex::new(false),
        }
    }

    /// Grant `cap` to this node.
    pub fn with_cap(mut self, cap: NodeCap) -> Self {
        self.caps.push(cap);
        self
    }

    /// Script every future `ecl_load` call to fail with `err`.
    pub fn fail_load(self, err: NodeError) -> Self {
        *self.load_result.lock().unwrap() = Err(err);
        self
    }

    /// Script every future `ecl_write` call to fail with `err`.
    pub fn fail_write(self, err: NodeError) -> Self {
        *self.write_result.lock().unwrap() = Err(err);
        self
    }

    /// Control `should_internalize`'s return value.
    pub fn with_always_internalize(mut self, value: bool) -> Self {
        self.always_internalize = value;
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<NodeCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `initialize` (resample) calls received.
    pub fn initialize_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, NodeCall::Initialize(_)))
            .count()
    }
}

impl Node for ScriptedNode {
    fn var_class(&self) -> VarClass {
        self.var_class
    }

    fn has_cap(&self, cap: NodeCap) -> bool {
        self.caps.contains(&cap)
    }

    fn should_internalize(&self, _report_step: ReportStep) -> bool {
        self.always_internalize
    }

    fn ecl_load(
        &mut self,
        _run_path: &Path,
        _summary: Option<&dyn SummarySource>,
        restart_keyword: Option<&str>,
        report_step: ReportStep,
        _iens: Iens,
    ) -> Result<(), NodeError> {
        self.calls.lock().unwrap().push(NodeCall::Load {
            restart_keyword: restart_keyword.map(str::to_string),
            report_step,
        });
        if *self.cache_loaded.lock().unwrap() {
            // nothing special; kept for symmetry with invalidate_cache
        }
        *self.cache_loaded.lock().unwrap() = true;
        self.load_result.lock().unwrap().clone()
    }

    fn ecl_load_static(
        &mut self,
        payload: &[u8],
        report_step: ReportStep,
        _iens: Iens,
    ) -> Result<(), NodeError> {
        self.calls.lock().unwrap().push(NodeCall::LoadStatic {
            len: payload.len(),
            report_step,
        });
        *self.cache_loaded.lock().unwrap() = true;
        self.load_result.lock().unwrap().clone()
    }

    fn ecl_write(
        &self,
        _run_path: &Path,
        _summary: Option<&dyn SummarySource>,
        report_step: ReportStep,
    ) -> Result<(), NodeError> {
        self.calls.lock().unwrap().push(NodeCall::Write(report_step));
        self.write_result.lock().unwrap().clone()
    }

    fn initialize(&mut self, iens: Iens) -> Result<(), NodeError> {
        self.calls.lock().unwrap().push(NodeCall::Initialize(iens));
        Ok(())
    }

    fn invalidate_cache(&mut self) {
        self.calls.lock().unwrap().push(NodeCall::InvalidateCache);
        *self.cache_loaded.lock().unwrap() = false;
    }

    fn wire_subst_parent(&mut self, _parent: &SubstTable) {
        self.calls.lock().unwrap().push(NodeCall::WireSubstParent);
    }
}

/// A template path builder matching the teacher's convention of keeping
/// fixture paths next to the test module rather than on real disk.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from("/fixtures").join(name)
}
