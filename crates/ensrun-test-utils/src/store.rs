//! An in-memory [`Store`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use ensrun_core::{Iens, Node, ReportStep, StateClass, Store, StoreError};

#[derive(Clone, Debug, PartialEq)]
struct PutRecord {
    report_step: ReportStep,
    iens: Iens,
    state: StateClass,
}

/// Records every `put_node` call and lets tests read back a summary of
/// what was stored, without modelling real node serialization (nodes are
/// opaque to the store per §1).
#[derive(Default)]
pub struct InMemoryStore {
    puts: Mutex<HashMap<String, Vec<PutRecord>>>,
    restart_keywords: Mutex<HashMap<(u32, u32), Vec<String>>>,
    sim_time: Mutex<HashMap<(u32, u32), f64>>,
}

impl InMemoryStore {
    /// A new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put_node` calls recorded for `key`.
    pub fn put_count(&self, key: &str) -> usize {
        self.puts.lock().unwrap().get(key).map_or(0, Vec::len)
    }

    /// All `(report_step, iens, state)` triples recorded for `key`, in
    /// call order.
    pub fn puts_for(&self, key: &str) -> Vec<(ReportStep, Iens, StateClass)> {
        self.puts
            .lock()
            .unwrap()
            .get(key)
            .map(|v| v.iter().map(|r| (r.report_step, r.iens, r.state)).collect())
            .unwrap_or_default()
    }

    /// Total number of `put_node` calls across every key.
    pub fn total_puts(&self) -> usize {
        self.puts.lock().unwrap().values().map(Vec::len).sum()
    }

    /// Pre-seed the restart-keyword list for `(report_step, iens)`, as if
    /// an earlier step had persisted it.
    pub fn seed_restart_keywords(&self, report_step: ReportStep, iens: Iens, keywords: Vec<String>) {
        self.restart_keywords
            .lock()
            .unwrap()
            .insert((report_step.get(), iens.get()), keywords);
    }
}

impl Store for InMemoryStore {
    fn put_node(
        &self,
        key: &str,
        report_step: ReportStep,
        iens: Iens,
        state: StateClass,
        _node: &dyn Node,
    ) -> Result<(), StoreError> {
        self.puts
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push(PutRecord {
                report_step,
                iens,
                state,
            });
        Ok(())
    }

    fn get_node(
        &self,
        key: &str,
        _report_step: ReportStep,
        _iens: Iens,
        _state: StateClass,
        _node: &mut dyn Node,
    ) -> Result<(), StoreError> {
        if self.puts.lock().unwrap().contains_key(key) {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                key: key.to_string(),
            })
        }
    }

    fn put_restart_keywords(
        &self,
        report_step: ReportStep,
        iens: Iens,
        keywords: &[String],
    ) -> Result<(), StoreError> {
        self.restart_keywords
            .lock()
            .unwrap()
            .insert((report_step.get(), iens.get()), keywords.to_vec());
        Ok(())
    }

    fn get_restart_keywords(
        &self,
        report_step: ReportStep,
        iens: Iens,
    ) -> Result<Vec<String>, StoreError> {
        self.restart_keywords
            .lock()
            .unwrap()
            .get(&(report_step.get(), iens.get()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: format!("restart-keywords@{report_step}:{iens}"),
            })
    }

    fn put_sim_time(&self, iens: Iens, times: &[(ReportStep, f64)]) -> Result<(), StoreError> {
        let mut guard = self.sim_time.lock().unwrap();
        for (step, t) in times {
            guard.insert((step.get(), iens.get()), *t);
        }
        Ok(())
    }

    fn get_sim_time(&self, iens: Iens, report_step: ReportStep) -> Option<f64> {
        self.sim_time
            .lock()
            .unwrap()
            .get(&(report_step.get(), iens.get()))
            .copied()
    }
}
