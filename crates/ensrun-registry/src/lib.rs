//! Per-realization key→node mapping (§4.3).
//!
//! The registry exclusively owns nodes; replacing an existing key drops
//! the old node outright (the source's `modified = true` dead branch — an
//! unconditional re-add — is preserved verbatim as "update is replace",
//! per the redesign note in §9).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;

pub use error::RegistryError;

use indexmap::IndexMap;

use ensrun_core::{Node, NodeConfig, NodeImpl, SubstTable};

/// Owns every node configured for one realization, keyed by its node key.
///
/// Iteration during mutation is forbidden by the API shape: [`iter`](Self::iter)
/// borrows `self` immutably, so a caller that must mutate while walking the
/// key space first calls [`snapshot_keys`](Self::snapshot_keys) (§4.3).
#[derive(Default)]
pub struct NodeRegistry {
    nodes: IndexMap<String, Entry>,
}

struct Entry {
    config: NodeConfig,
    node: Box<dyn Node>,
}

impl NodeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Insert `node` under `config.key`, replacing any existing entry for
    /// that key. If `config.node_impl` is [`NodeImpl::GenKw`], the node's
    /// private substitution parent is wired to `subst` before it is stored
    /// (§4.3).
    pub fn add(&mut self, config: NodeConfig, mut node: Box<dyn Node>, subst: &SubstTable) {
        if config.node_impl == NodeImpl::GenKw {
            node.wire_subst_parent(subst);
        }
        self.nodes.insert(config.key.clone(), Entry { config, node });
    }

    /// Whether `key` is currently registered.
    pub fn has(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// The node registered under `key`.
    ///
    /// # Errors
    /// Returns [`RegistryError::NodeMissing`] if `key` is not registered.
    pub fn get(&self, key: &str) -> Result<&dyn Node, RegistryError> {
        self.nodes
            .get(key)
            .map(|e| e.node.as_ref())
            .ok_or_else(|| RegistryError::NodeMissing { key: key.to_string() })
    }

    /// Mutable access to the node registered under `key`.
    ///
    /// # Errors
    /// Returns [`RegistryError::NodeMissing`] if `key` is not registered.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut dyn Node, RegistryError> {
        self.nodes
            .get_mut(key)
            .map(|e| e.node.as_mut())
            .ok_or_else(|| RegistryError::NodeMissing { key: key.to_string() })
    }

    /// The configuration registered under `key`.
    pub fn get_config(&self, key: &str) -> Option<&NodeConfig> {
        self.nodes.get(key).map(|e| &e.config)
    }

    /// Remove and return the node registered under `key`, if any.
    pub fn delete(&mut self, key: &str) -> Option<Box<dyn Node>> {
        self.nodes.shift_remove(key).map(|e| e.node)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ordered iteration over `(key, config, node)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeConfig, &dyn Node)> {
        self.nodes
            .iter()
            .map(|(k, e)| (k.as_str(), &e.config, e.node.as_ref()))
    }

    /// A snapshot of the current key set, safe to hold while mutating the
    /// registry (§4.3: the write-restart pass deletes static nodes as it
    /// walks, and the generic write pass reads keys before writing).
    pub fn snapshot_keys(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensrun_core::{Iens, NodeCap, NodeError, ReportStep, SummarySource, VarClass};
    use std::path::Path;

    struct StubNode {
        var_class: VarClass,
        wired: bool,
    }

    impl Node for StubNode {
        fn var_class(&self) -> VarClass {
            self.var_class
        }
        fn has_cap(&self, _cap: NodeCap) -> bool {
            false
        }
        fn should_internalize(&self, _report_step: ReportStep) -> bool {
            true
        }
        fn ecl_load(
            &mut self,
            _run_path: &Path,
            _summary: Option<&dyn SummarySource>,
            _restart_keyword: Option<&str>,
            _report_step: ReportStep,
            _iens: Iens,
        ) -> Result<(), NodeError> {
            Ok(())
        }
        fn ecl_load_static(
            &mut self,
            _payload: &[u8],
            _report_step: ReportStep,
            _iens: Iens,
        ) -> Result<(), NodeError> {
            Ok(())
        }
        fn ecl_write(
            &self,
            _run_path: &Path,
            _summary: Option<&dyn SummarySource>,
            _report_step: ReportStep,
        ) -> Result<(), NodeError> {
            Ok(())
        }
        fn initialize(&mut self, _iens: Iens) -> Result<(), NodeError> {
            Ok(())
        }
        fn invalidate_cache(&mut self) {}
        fn wire_subst_parent(&mut self, _parent: &SubstTable) {
            self.wired = true;
        }
    }

    fn config(key: &str, node_impl: ensrun_core::NodeImpl) -> NodeConfig {
        NodeConfig {
            key: key.to_string(),
            var_class: VarClass::Parameter,
            node_impl,
        }
    }

    #[test]
    fn add_then_get() {
        let mut reg = NodeRegistry::new();
        let subst = SubstTable::new();
        reg.add(
            config("PORO", ensrun_core::NodeImpl::GenKw),
            Box::new(StubNode {
                var_class: VarClass::Parameter,
                wired: false,
            }),
            &subst,
        );
        assert!(reg.has("PORO"));
        assert_eq!(reg.get("PORO").unwrap().var_class(), VarClass::Parameter);
    }

    #[test]
    fn missing_key_is_an_error() {
        let reg = NodeRegistry::new();
        let err = reg.get("NOPE").unwrap_err();
        assert_eq!(
            err,
            RegistryError::NodeMissing {
                key: "NOPE".to_string()
            }
        );
    }

    #[test]
    fn replace_drops_the_old_node() {
        let mut reg = NodeRegistry::new();
        let subst = SubstTable::new();
        reg.add(
            config("K", ensrun_core::NodeImpl::Field),
            Box::new(StubNode {
                var_class: VarClass::DynamicState,
                wired: false,
            }),
            &subst,
        );
        reg.add(
            config("K", ensrun_core::NodeImpl::Static),
            Box::new(StubNode {
                var_class: VarClass::StaticState,
                wired: false,
            }),
            &subst,
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("K").unwrap().var_class(), VarClass::StaticState);
    }

    #[test]
    fn gen_kw_insertion_wires_subst_parent() {
        let mut reg = NodeRegistry::new();
        let subst = SubstTable::new();
        reg.add(
            config("MULTFLT", ensrun_core::NodeImpl::GenKw),
            Box::new(StubNode {
                var_class: VarClass::Parameter,
                wired: false,
            }),
            &subst,
        );
        let node = reg.get_mut("MULTFLT").unwrap();
        node.wire_subst_parent(&subst);
    }

    #[test]
    fn delete_removes_and_returns() {
        let mut reg = NodeRegistry::new();
        let subst = SubstTable::new();
        reg.add(
            config("K", ensrun_core::NodeImpl::Static),
            Box::new(StubNode {
                var_class: VarClass::StaticState,
                wired: false,
            }),
            &subst,
        );
        assert!(reg.delete("K").is_some());
        assert!(!reg.has("K"));
        assert!(reg.delete("K").is_none());
    }

    #[test]
    fn snapshot_then_delete_during_walk() {
        let mut reg = NodeRegistry::new();
        let subst = SubstTable::new();
        for k in ["A", "B", "C"] {
            reg.add(
                config(k, ensrun_core::NodeImpl::Static),
                Box::new(StubNode {
                    var_class: VarClass::StaticState,
                    wired: false,
                }),
                &subst,
            );
        }
        let keys = reg.snapshot_keys();
        for k in &keys {
            if reg.get(k).unwrap().var_class() == VarClass::StaticState {
                reg.delete(k);
            }
        }
        assert!(reg.is_empty());
    }
}
