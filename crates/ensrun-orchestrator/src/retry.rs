//! Retry policy (§4.8): bounded-attempts predicate plus resampling of
//! every parameter and dynamic-state node ahead of a resubmission.

use ensrun_core::{Iens, VarClass};
use ensrun_registry::NodeRegistry;

use crate::error::StepError;

/// Draw a fresh value for every `PARAMETER`/`DYNAMIC_STATE` node (§4.8).
/// `PREPARING` is re-run from scratch afterwards by the caller, which is
/// what re-expands templated `RANDINT`/`RANDFLOAT` values.
pub fn resample(registry: &mut NodeRegistry, iens: Iens) -> Result<(), StepError> {
    for key in registry.snapshot_keys() {
        let Some(config) = registry.get_config(&key) else {
            continue;
        };
        if config.var_class.resamples_on_retry() {
            let node = registry.get_mut(&key)?;
            node.initialize(iens)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensrun_core::{NodeConfig, NodeImpl, SubstTable};
    use ensrun_test_utils::ScriptedNode;

    #[test]
    fn resample_initializes_only_parameter_and_dynamic_state_nodes() {
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
            NodeConfig {
                key: "WOPR".to_string(),
                var_class: VarClass::DynamicResult,
                node_impl: NodeImpl::Summary,
            },
            Box::new(ScriptedNode::new(VarClass::DynamicResult)),
            &subst,
        );

        resample(&mut registry, Iens::new(1)).unwrap();

        assert_eq!(registry.get("MULTFLT").unwrap().var_class(), VarClass::Parameter);
    }
}
