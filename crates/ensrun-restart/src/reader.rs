//! Restart-block reader (§4.4): walks one opened restart block's keyword
//! stream in file order, dispatching each keyword either to a registered
//! dynamic node or to the static-keyword sidecar, with per-keyword
//! occurrence disambiguation for LGR-repeated headers.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use ensrun_core::{
    Iens, JobCatalog, LogLevel, LogSink, NodeImpl, ReportStep, RestartSink, StateClass, Store,
    SubstTable, VarClass,
};
use ensrun_registry::NodeRegistry;

use crate::error::RestartReadError;
use crate::mangle::sanitize_keyword;

/// Outcome of one `read_restart_block` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestartReadReport {
    /// The keyword list in the exact order it was observed/mangled,
    /// suitable for persisting via [`ensrun_core::Store::put_restart_keywords`]
    /// and for replay via the writer (§4.6).
    pub restart_keywords: Vec<String>,
    /// Whether every dispatched load succeeded. `false` triggers the
    /// orchestrator's retry decision (§4.7, §4.9).
    pub load_ok: bool,
}

/// Walk `block`'s keyword stream and internalize every keyword, per §4.4.
///
/// `subst` is the orchestrator's substitution table, forwarded to
/// [`NodeRegistry::add`] so that any newly registered node with a private
/// substitution parent (not applicable to static passthrough nodes, but
/// kept uniform with the rest of the registration path) is wired
/// correctly.
///
/// # Errors
/// Returns [`RestartReadError::UnsupportedImpl`] if a keyword resolves to
/// an implementation type this reader does not know how to dispatch,
/// [`RestartReadError::InvalidFilename`] if a mangled static key sanitizes
/// to the empty string, or a store/registry error if either collaborator
/// rejects a call. A hard error here is fatal for the realization (§4.9);
/// a `load_ok = false` report is soft and routes into the retry decision.
#[allow(clippy::too_many_arguments)]
pub fn read_restart_block(
    block: &dyn RestartSink,
    registry: &mut NodeRegistry,
    catalog: &dyn JobCatalog,
    store: &dyn Store,
    log: &dyn LogSink,
    subst: &SubstTable,
    run_path: &Path,
    iens: Iens,
    step1: ReportStep,
    step2: ReportStep,
    internalize_state: bool,
) -> Result<RestartReadReport, RestartReadError> {
    let report_step = block.report_step();
    let mut restart_keywords = Vec::new();
    let mut occurrence: HashMap<String, u32> = HashMap::new();
    let mut literally_loaded: HashSet<String> = HashSet::new();
    let mut load_ok = true;

    for entry in block.keywords() {
        let occ = occurrence.entry(entry.name.clone()).or_insert(0);
        let occ_i = *occ;
        *occ += 1;

        let impl_type = if occ_i == 0 && catalog.has_key(&entry.name) {
            catalog
                .get_config(&entry.name)
                .map(|c| c.node_impl)
                .unwrap_or(NodeImpl::Static)
        } else {
            NodeImpl::Static
        };

        match impl_type {
            NodeImpl::Field => {
                restart_keywords.push(entry.name.clone());
                literally_loaded.insert(entry.name.clone());
                let node = registry.get_mut(&entry.name)?;
                let result = node.ecl_load(run_path, None, Some(&entry.name), report_step, iens);
                match result {
                    Ok(()) => {
                        let node = registry.get(&entry.name)?;
                        store.put_node(&entry.name, report_step, iens, StateClass::Forecast, node)?;
                    }
                    Err(e) => {
                        load_ok = false;
                        log.log(
                            iens,
                            step1,
                            step2,
                            LogLevel::Retry,
                            &format!("restart load failed for {}: {e}", entry.name),
                        );
                    }
                }
            }
            NodeImpl::Static => {
                if catalog.include_static(&entry.name) && internalize_state {
                    let mangled = sanitize_keyword(&format!("{}_{occ_i}", entry.name));
                    if mangled.is_empty() {
                        return Err(RestartReadError::InvalidFilename {
                            keyword: entry.name.clone(),
                        });
                    }
                    restart_keywords.push(mangled.clone());
                    let config = catalog.register_static(&mangled);
                    if !registry.has(&mangled) {
                        let node = catalog.create_node(&config);
                        registry.add(config, node, subst);
                    }
                    let node = registry.get_mut(&mangled)?;
                    let result = node.ecl_load_static(&entry.payload, report_step, iens);
                    match result {
                        Ok(()) => {
                            let node = registry.get(&mangled)?;
                            store.put_node(&mangled, report_step, iens, StateClass::Forecast, node)?;
                            registry.get_mut(&mangled)?.invalidate_cache();
                        }
                        Err(e) => {
                            load_ok = false;
                            log.log(
                                iens,
                                step1,
                                step2,
                                LogLevel::Retry,
                                &format!("static restart load failed for {mangled}: {e}"),
                            );
                        }
                    }
                }
            }
            NodeImpl::Summary | NodeImpl::GenKw => {
                return Err(RestartReadError::UnsupportedImpl {
                    keyword: entry.name.clone(),
                });
            }
        }
    }

    store.put_restart_keywords(report_step, iens, &restart_keywords)?;

    for key in registry.snapshot_keys() {
        if literally_loaded.contains(&key) {
            continue;
        }
        let var_class = match registry.get_config(&key) {
            Some(c) => c.var_class,
            None => continue,
        };
        if var_class != VarClass::DynamicState {
            continue;
        }
        let should = {
            let node = registry.get(&key)?;
            internalize_state || node.should_internalize(report_step)
        };
        if !should {
            continue;
        }
        let node = registry.get_mut(&key)?;
        let result = node.ecl_load(run_path, None, None, report_step, iens);
        match result {
            Ok(()) => {
                let node = registry.get(&key)?;
                store.put_node(&key, report_step, iens, StateClass::Forecast, node)?;
            }
            Err(e) => {
                load_ok = false;
                log.log(
                    iens,
                    step1,
                    step2,
                    LogLevel::Retry,
                    &format!("dynamic-state load failed for {key}: {e}"),
                );
            }
        }
    }

    Ok(RestartReadReport {
        restart_keywords,
        load_ok,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensrun_core::{KeywordType, NodeConfig, RestartKeywordEntry, VarClass};
    use ensrun_test_utils::{
        InMemoryRestartBlock, InMemoryStore, MockJobCatalog, NullLogSink, ScriptedNode,
    };

    fn entry(name: &str) -> RestartKeywordEntry {
        RestartKeywordEntry {
            name: name.to_string(),
            type_tag: KeywordType::Float,
            count: 1,
            payload: vec![0u8; 4],
        }
    }

    #[test]
    fn field_keyword_loads_and_stores_forecast() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        registry.add(
            NodeConfig {
                key: "PRESSURE".to_string(),
                var_class: VarClass::DynamicState,
                node_impl: NodeImpl::Field,
            },
            Box::new(ScriptedNode::new(VarClass::DynamicState)),
            &subst,
        );
        let catalog = MockJobCatalog::new();
        catalog.seed(NodeConfig {
            key: "PRESSURE".to_string(),
            var_class: VarClass::DynamicState,
            node_impl: NodeImpl::Field,
        });
        let store = InMemoryStore::new();
        let log = NullLogSink;
        let block = InMemoryRestartBlock::new(ReportStep::new(1)).with_keywords(vec![entry("PRESSURE")]);

        let report = read_restart_block(
            &block,
            &mut registry,
            &catalog,
            &store,
            &log,
            &subst,
            Path::new("/run"),
            Iens::new(3),
            ReportStep::new(0),
            ReportStep::new(2),
            true,
        )
        .unwrap();

        assert!(report.load_ok);
        assert_eq!(report.restart_keywords, vec!["PRESSURE".to_string()]);
        assert_eq!(store.put_count("PRESSURE"), 1);
    }

    #[test]
    fn repeated_keyword_mangles_every_occurrence_including_first() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        let catalog = MockJobCatalog::new();
        let pressure_config = NodeConfig {
            key: "PRESSURE".to_string(),
            var_class: VarClass::DynamicState,
            node_impl: NodeImpl::Field,
        };
        catalog.seed(pressure_config.clone());
        registry.add(pressure_config, Box::new(ScriptedNode::new(VarClass::DynamicState)), &subst);
        let store = InMemoryStore::new();
        let log = NullLogSink;
        let block = InMemoryRestartBlock::new(ReportStep::new(1)).with_keywords(vec![
            entry("INTEHEAD"),
            entry("PRESSURE"),
            entry("PRESSURE"),
            entry("PRESSURE"),
        ]);

        let report = read_restart_block(
            &block,
            &mut registry,
            &catalog,
            &store,
            &log,
            &subst,
            Path::new("/run"),
            Iens::new(7),
            ReportStep::new(0),
            ReportStep::new(2),
            true,
        )
        .unwrap();

        assert_eq!(
            report.restart_keywords,
            vec![
                "INTEHEAD_0".to_string(),
                "PRESSURE".to_string(),
                "PRESSURE_1".to_string(),
                "PRESSURE_2".to_string(),
            ]
        );
    }

    #[test]
    fn unregistered_static_keyword_is_skipped_when_excluded() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        let catalog = MockJobCatalog::new();
        catalog.exclude_static("NOISE");
        let store = InMemoryStore::new();
        let log = NullLogSink;
        let block = InMemoryRestartBlock::new(ReportStep::new(1)).with_keywords(vec![entry("NOISE")]);

        let report = read_restart_block(
            &block,
            &mut registry,
            &catalog,
            &store,
            &log,
            &subst,
            Path::new("/run"),
            Iens::new(1),
            ReportStep::new(0),
            ReportStep::new(2),
            true,
        )
        .unwrap();

        assert!(report.restart_keywords.is_empty());
        assert!(!registry.has("NOISE_0"));
    }

    #[test]
    fn load_failure_sets_load_ok_false_but_still_stores_keyword_list() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        registry.add(
            NodeConfig {
                key: "PRESSURE".to_string(),
                var_class: VarClass::DynamicState,
                node_impl: NodeImpl::Field,
            },
            Box::new(ScriptedNode::new(VarClass::DynamicState).fail_load(
                ensrun_core::NodeError::LoadFailed {
                    reason: "missing file".to_string(),
                },
            )),
            &subst,
        );
        let catalog = MockJobCatalog::new();
        catalog.seed(NodeConfig {
            key: "PRESSURE".to_string(),
            var_class: VarClass::DynamicState,
            node_impl: NodeImpl::Field,
        });
        let store = InMemoryStore::new();
        let log = NullLogSink;
        let block = InMemoryRestartBlock::new(ReportStep::new(1)).with_keywords(vec![entry("PRESSURE")]);

        let report = read_restart_block(
            &block,
            &mut registry,
            &catalog,
            &store,
            &log,
            &subst,
            Path::new("/run"),
            Iens::new(3),
            ReportStep::new(0),
            ReportStep::new(2),
            true,
        )
        .unwrap();

        assert!(!report.load_ok);
        assert_eq!(store.put_count("PRESSURE"), 0);
        assert_eq!(store.get_restart_keywords(ReportStep::new(1), Iens::new(3)).unwrap(), vec!["PRESSURE".to_string()]);
    }

    #[test]
    fn summary_impl_keyword_in_restart_block_is_unsupported() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        let catalog = MockJobCatalog::new();
        catalog.seed(NodeConfig {
            key: "WOPR".to_string(),
            var_class: VarClass::DynamicResult,
            node_impl: NodeImpl::Summary,
        });
        let store = InMemoryStore::new();
        let log = NullLogSink;
        let block = InMemoryRestartBlock::new(ReportStep::new(1)).with_keywords(vec![entry("WOPR")]);

        let err = read_restart_block(
            &block,
            &mut registry,
            &catalog,
            &store,
            &log,
            &subst,
            Path::new("/run"),
            Iens::new(1),
            ReportStep::new(0),
            ReportStep::new(2),
            true,
        )
        .unwrap_err();

        assert_eq!(
            err,
            RestartReadError::UnsupportedImpl {
                keyword: "WOPR".to_string()
            }
        );
    }

    proptest::proptest! {
        #[test]
        fn key_mangling_is_deterministic(n in 1usize..8) {
            let mut registry = NodeRegistry::new();
            let subst = SubstTable::new();
            let catalog = MockJobCatalog::new();
            let store = InMemoryStore::new();
            let log = NullLogSink;
            let keywords: Vec<_> = (0..n).map(|_| entry("SWAT")).collect();
            let block = InMemoryRestartBlock::new(ReportStep::new(1)).with_keywords(keywords);

            let report = read_restart_block(
                &block, &mut registry, &catalog, &store, &log, &subst,
                Path::new("/run"), Iens::new(0), ReportStep::new(0), ReportStep::new(1), true,
            ).unwrap();

            let expected: Vec<String> = (0..n).map(|i| if i == 0 { "SWAT_0".to_string() } else { format!("SWAT_{i}") }).collect();
            proptest::prop_assert_eq!(report.restart_keywords, expected);
        }
    }
}
