//! A [`JobCatalog`] backed by an in-memory map.

use std::collections::HashMap;
use std::sync::Mutex;

use ensrun_core::{JobCatalog, Node, NodeConfig};

use crate::node::ScriptedNode;

/// A job catalog pre-seeded by the test with known keys, tracking which
/// static keywords get registered along the way.
#[derive(Default)]
pub struct MockJobCatalog {
    known: Mutex<HashMap<String, NodeConfig>>,
    excluded_static: Mutex<Vec<String>>,
}

impl MockJobCatalog {
    /// A new, empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register `config` as a known ensemble configuration key.
    pub fn seed(&self, config: NodeConfig) {
        self.known.lock().unwrap().insert(config.key.clone(), config);
    }

    /// Mark `name` as excluded from static-keyword internalization (the
    /// `include_static` predicate returns `false` for it).
    pub fn exclude_static(&self, name: impl Into<String>) {
        self.excluded_static.lock().unwrap().push(name.into());
    }

    /// The set of keys currently known, including ones registered via
    /// `register_static`.
    pub fn known_keys(&self) -> Vec<String> {
        self.known.lock().unwrap().keys().cloned().collect()
    }
}

impl JobCatalog for MockJobCatalog {
    fn has_key(&self, name: &str) -> bool {
        self.known.lock().unwrap().contains_key(name)
    }

    fn get_config(&self, name: &str) -> Option<NodeConfig> {
        self.known.lock().unwrap().get(name).cloned()
    }

    fn include_static(&self, name: &str) -> bool {
        !self.excluded_static.lock().unwrap().iter().any(|n| n == name)
    }

    fn register_static(&self, name: &str) -> NodeConfig {
        let mut guard = self.known.lock().unwrap();
        guard
            .entry(name.to_string())
            .or_insert_with(|| NodeConfig::static_passthrough(name))
            .clone()
    }

    fn create_node(&self, config: &NodeConfig) -> Box<dyn Node> {
        Box::new(ScriptedNode::new(config.var_class))
    }
}

impl MockJobCatalog {
    /// Pre-register a static passthrough key the way `register_static`
    /// would, without going through the `JobCatalog` trait object.
    pub fn seed_static(&self, key: impl Into<String>) -> NodeConfig {
        let config = NodeConfig::static_passthrough(key);
        self.seed(config.clone());
        config
    }
}
