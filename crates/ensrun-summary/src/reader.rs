//! Draining a realization's summary files into its dynamic-result nodes
//! and simulated-time vector (§4.5).

use std::path::Path;

use ensrun_core::{
    Iens, LogLevel, LogSink, ReportStep, RunMode, StateClass, Store, SummaryLoader, VarClass,
};
use ensrun_registry::NodeRegistry;

use crate::error::SummaryReadError;
use crate::locate::{locate, SummaryForm};

/// Load `[max(load_start, 1), last_step_in_summary]` of a realization's
/// summary series into every `DYNAMIC_RESULT` node, and persist the
/// simulated-time vector (§4.5).
///
/// Returns `Ok(true)` if every node load for every step succeeded (or
/// there was nothing to load), `Ok(false)` if at least one load failed
/// (the caller treats this as a soft failure and retries per §4.8).
#[allow(clippy::too_many_arguments)]
pub fn read_summary_series(
    registry: &mut NodeRegistry,
    loader: &dyn SummaryLoader,
    store: &dyn Store,
    log: &dyn LogSink,
    run_path: &Path,
    eclbase: &str,
    iens: Iens,
    load_start: ReportStep,
    step2: ReportStep,
    run_mode: RunMode,
) -> Result<bool, SummaryReadError> {
    let start = ReportStep::new(load_start.get().max(1));
    let Some((form, last_step)) = locate(loader, run_path, eclbase, start, step2, run_mode) else {
        store.put_sim_time(iens, &[])?;
        return Ok(true);
    };

    let summary = match form {
        SummaryForm::Unified => loader.load_unified(run_path, eclbase)?,
        SummaryForm::PerStep => {
            let steps: Vec<ReportStep> =
                (start.get()..=last_step.get()).map(ReportStep::new).collect();
            loader.load_per_step(run_path, eclbase, &steps)?
        }
    };

    let result_keys: Vec<String> = registry
        .snapshot_keys()
        .into_iter()
        .filter(|k| registry.get_config(k).map(|c| c.var_class) == Some(VarClass::DynamicResult))
        .collect();

    let mut load_ok = true;
    let mut sim_times = Vec::new();
    for r in start.get()..=last_step.get() {
        let step = ReportStep::new(r);
        for key in &result_keys {
            let node = registry.get_mut(key)?;
            match node.ecl_load(run_path, Some(summary.as_ref()), None, step, iens) {
                Ok(()) => store.put_node(key, step, iens, StateClass::Forecast, &*node)?,
                Err(e) => {
                    load_ok = false;
                    log.log(
                        iens,
                        step,
                        step,
                        LogLevel::Retry,
                        &format!("summary load failed for {key}: {e}"),
                    );
                }
            }
        }
        if let Some(t) = summary.report_time(step) {
            sim_times.push((step, t));
        }
    }
    store.put_sim_time(iens, &sim_times)?;
    Ok(load_ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensrun_core::{NodeConfig, NodeImpl, SubstTable};
    use ensrun_test_utils::{InMemoryStore, NullLogSink, ScriptedNode, ScriptedSummaryLoader};

    fn wopr_config() -> NodeConfig {
        NodeConfig {
            key: "WOPR".to_string(),
            var_class: VarClass::DynamicResult,
            node_impl: NodeImpl::Summary,
        }
    }

    #[test]
    fn loads_each_step_and_persists_sim_time() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        registry.add(wopr_config(), Box::new(ScriptedNode::new(VarClass::DynamicResult)), &subst);

        let loader = ScriptedSummaryLoader::new().with_unified(
            ensrun_test_utils::InMemorySummary::default()
                .with_value("WOPR", ReportStep::new(1), 10.0)
                .with_value("WOPR", ReportStep::new(2), 20.0)
                .with_time(ReportStep::new(1), 30.5)
                .with_time(ReportStep::new(2), 61.0),
        );
        let store = InMemoryStore::new();
        let log = NullLogSink;

        let ok = read_summary_series(
            &mut registry,
            &loader,
            &store,
            &log,
            Path::new("/run"),
            "BASE",
            Iens::new(3),
            ReportStep::new(0),
            ReportStep::new(2),
            RunMode::Assimilation,
        )
        .unwrap();

        assert!(ok);
        assert_eq!(store.put_count("WOPR"), 2);
    }

    #[test]
    fn node_load_failure_is_soft_and_keeps_going() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        registry.add(
            wopr_config(),
            Box::new(
                ScriptedNode::new(VarClass::DynamicResult)
                    .fail_load(ensrun_core::NodeError::LoadFailed {
                        reason: "missing curve".to_string(),
                    }),
            ),
            &subst,
        );

        let loader = ScriptedSummaryLoader::new().with_unified(Default::default());
        let store = InMemoryStore::new();
        let log = NullLogSink;

        let ok = read_summary_series(
            &mut registry,
            &loader,
            &store,
            &log,
            Path::new("/run"),
            "BASE",
            Iens::new(1),
            ReportStep::new(0),
            ReportStep::new(1),
            RunMode::Assimilation,
        )
        .unwrap();

        assert!(!ok);
        assert_eq!(store.put_count("WOPR"), 0);
    }

    #[test]
    fn nothing_to_load_is_not_an_error() {
        let mut registry = NodeRegistry::new();
        let loader = ScriptedSummaryLoader::new();
        let store = InMemoryStore::new();
        let log = NullLogSink;

        let ok = read_summary_series(
            &mut registry,
            &loader,
            &store,
            &log,
            Path::new("/run"),
            "BASE",
            Iens::new(1),
            ReportStep::new(0),
            ReportStep::new(0),
            RunMode::Assimilation,
        )
        .unwrap();

        assert!(ok);
    }
}
