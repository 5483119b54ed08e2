//! Restart-block writer (§4.6): emits an initial restart file for a
//! re-run from `step1 > 0`, in the original keyword order recorded by the
//! reader (§4.4) at the prior step.

use std::collections::HashSet;
use std::path::Path;

use ensrun_core::{
    Iens, JobCatalog, KeywordType, Node, NodeConfig, NodeImpl, ReportStep, RestartKeywordEntry,
    RestartSink, StateClass, Store, SubstTable, VarClass,
};
use ensrun_registry::{NodeRegistry, RegistryError};

use crate::error::RestartWriteError;

/// Fixed dynamic keys that the source always carries for a `step1 = 0`
/// run (§3, §4.6, §8), in this exact order.
pub const INITIAL_STEP_FIXED_KEYS: [&str; 5] = ["SWAT", "SGAS", "PRESSURE", "RV", "RS"];

/// For `step1 = 0` the restart-block writer is skipped entirely (§4.6),
/// but the restart-keyword list is still pre-seeded with the fixed
/// dynamic keys so the generic write pass does not re-emit them.
pub fn initial_step_restart_keywords() -> Vec<String> {
    INITIAL_STEP_FIXED_KEYS.iter().map(|s| (*s).to_string()).collect()
}

/// Resolve the restart-keyword list to write from for `step1 > 0`: use
/// `existing` (carried over in-memory from the same step's read pass) if
/// non-empty, otherwise read it back from the store at `(step1, iens)`.
pub fn resolve_restart_keywords(
    store: &dyn Store,
    step1: ReportStep,
    iens: Iens,
    existing: Vec<String>,
) -> Result<Vec<String>, RestartWriteError> {
    if !existing.is_empty() {
        return Ok(existing);
    }
    Ok(store.get_restart_keywords(step1, iens)?)
}

/// Emit the restart-block portion of an initial restart file for a
/// re-run from `step1 > 0` (§4.6).
///
/// For each key in `restart_keywords`, in listed order: register it as
/// static in the ensemble configuration if unknown, create a node for it
/// in the registry if absent, then dispatch by variable class:
/// - `STATIC_STATE`: read from the store at `(step1, iens,
///   init_state_dynamic)`, emit via the node, then drop its cached
///   payload.
/// - `DYNAMIC_STATE` with impl `FIELD`: emit via the node; its data is
///   preserved, not invalidated.
/// - Any other combination fails with
///   [`RestartWriteError::UnexpectedClass`].
///
/// Pushes a keyword entry onto `block` for each key in order; the caller
/// finishes the write (`block.finish_write(..)`) once any further
/// (generic-pass) emission has also happened.
pub fn write_restart_block(
    block: &mut dyn RestartSink,
    registry: &mut NodeRegistry,
    catalog: &dyn JobCatalog,
    store: &dyn Store,
    restart_keywords: &[String],
    run_path: &Path,
    subst: &SubstTable,
    iens: Iens,
    step1: ReportStep,
    init_state_dynamic: StateClass,
) -> Result<(), RestartWriteError> {
    for key in restart_keywords {
        if !catalog.has_key(key) {
            catalog.register_static(key);
        }
        if !registry.has(key) {
            let config = catalog
                .get_config(key)
                .unwrap_or_else(|| NodeConfig::static_passthrough(key));
            let node = catalog.create_node(&config);
            registry.add(config, node, subst);
        }
        let config = registry.get_config(key).cloned().ok_or_else(|| {
            RestartWriteError::Registry(RegistryError::NodeMissing { key: key.clone() })
        })?;

        match (config.var_class, config.node_impl) {
            (VarClass::StaticState, _) => {
                let node = registry.get_mut(key)?;
                store.get_node(key, step1, iens, init_state_dynamic, node)?;
                node.ecl_write(run_path, None, step1)?;
                node.invalidate_cache();
            }
            (VarClass::DynamicState, NodeImpl::Field) => {
                let node = registry.get(key)?;
                node.ecl_write(run_path, None, step1)?;
            }
            _ => {
                return Err(RestartWriteError::UnexpectedClass { key: key.clone() });
            }
        }

        block.push_keyword(RestartKeywordEntry {
            name: key.clone(),
            type_tag: KeywordType::Message,
            count: 0,
            payload: Vec::new(),
        });
    }
    Ok(())
}

/// The generic write pass (§4.6): snapshot the registry's key set, then
/// for every key not present in `restart_keywords` whose node is not
/// `STATIC_STATE`, call `node.ecl_write`. Snapshotting first follows
/// §4.3's iteration-during-mutation requirement, even though this pass
/// does not itself mutate the registry — it shares the idiom with the
/// free-nodes pass the writer is paired with at the orchestrator level.
pub fn write_remaining_nodes(
    registry: &NodeRegistry,
    restart_keywords: &[String],
    run_path: &Path,
    step1: ReportStep,
) -> Result<(), RestartWriteError> {
    let already_written: HashSet<&str> = restart_keywords.iter().map(String::as_str).collect();
    for key in registry.snapshot_keys() {
        if already_written.contains(key.as_str()) {
            continue;
        }
        let Some(config) = registry.get_config(&key) else {
            continue;
        };
        if config.var_class == VarClass::StaticState {
            continue;
        }
        let node = registry.get(&key)?;
        node.ecl_write(run_path, None, step1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensrun_core::Iens as _Iens;
    use ensrun_test_utils::{InMemoryRestartBlock, InMemoryStore, MockJobCatalog, ScriptedNode};

    #[test]
    fn step1_zero_seeds_fixed_keys_in_order() {
        assert_eq!(
            initial_step_restart_keywords(),
            vec!["SWAT", "SGAS", "PRESSURE", "RV", "RS"]
        );
    }

    #[test]
    fn resolve_prefers_existing_list_over_store() {
        let store = InMemoryStore::new();
        store.seed_restart_keywords(ReportStep::new(5), _Iens::new(7), vec!["X".to_string()]);
        let resolved = resolve_restart_keywords(
            &store,
            ReportStep::new(5),
            _Iens::new(7),
            vec!["Y".to_string()],
        )
        .unwrap();
        assert_eq!(resolved, vec!["Y".to_string()]);
    }

    #[test]
    fn resolve_falls_back_to_store_when_empty() {
        let store = InMemoryStore::new();
        store.seed_restart_keywords(ReportStep::new(5), _Iens::new(7), vec!["X".to_string()]);
        let resolved =
            resolve_restart_keywords(&store, ReportStep::new(5), _Iens::new(7), Vec::new()).unwrap();
        assert_eq!(resolved, vec!["X".to_string()]);
    }

    #[test]
    fn write_restart_block_emits_keys_in_recorded_order() {
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
        catalog.seed_static("INTEHEAD_0");
        let store = InMemoryStore::new();
        let mut block = InMemoryRestartBlock::new(ReportStep::new(5));
        let keys = vec!["INTEHEAD_0".to_string(), "PRESSURE".to_string()];

        write_restart_block(
            &mut block,
            &mut registry,
            &catalog,
            &store,
            &keys,
            Path::new("/run"),
            &subst,
            _Iens::new(7),
            ReportStep::new(5),
            StateClass::Analyzed,
        )
        .unwrap();

        let names: Vec<String> = block.keywords().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, keys);
    }

    #[test]
    fn unexpected_class_combination_fails() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        registry.add(
            NodeConfig {
                key: "WOPR".to_string(),
                var_class: VarClass::DynamicResult,
                node_impl: NodeImpl::Summary,
            },
            Box::new(ScriptedNode::new(VarClass::DynamicResult)),
            &subst,
        );
        let catalog = MockJobCatalog::new();
        catalog.seed(NodeConfig {
            key: "WOPR".to_string(),
            var_class: VarClass::DynamicResult,
            node_impl: NodeImpl::Summary,
        });
        let store = InMemoryStore::new();
        let mut block = InMemoryRestartBlock::new(ReportStep::new(5));

        let err = write_restart_block(
            &mut block,
            &mut registry,
            &catalog,
            &store,
            &["WOPR".to_string()],
            Path::new("/run"),
            &subst,
            _Iens::new(1),
            ReportStep::new(5),
            StateClass::Analyzed,
        )
        .unwrap_err();

        assert_eq!(
            err,
            RestartWriteError::UnexpectedClass {
                key: "WOPR".to_string()
            }
        );
    }

    #[test]
    fn generic_pass_skips_keys_already_written_and_static_nodes() {
        let mut registry = NodeRegistry::new();
        let subst = SubstTable::new();
        registry.add(
            NodeConfig {
                key: "MULTFLT".to_string(),
                var_class: VarClass::Parameter,
                node_impl: NodeImpl::GenKw,
            },
            Box::new(ScriptedNode::new(VarClass::Parameter)),
            &subst,
        );
        registry.add(
            NodeConfig::static_passthrough("LEFTOVER"),
            Box::new(ScriptedNode::new(VarClass::StaticState)),
            &subst,
        );
        let restart_keywords = vec!["ALREADY".to_string()];

        write_remaining_nodes(&registry, &restart_keywords, Path::new("/run"), ReportStep::new(5))
            .unwrap();
    }
}
