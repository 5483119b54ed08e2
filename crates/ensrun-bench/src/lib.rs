//! Benchmark fixtures for the ensemble forward-model orchestrator.
//!
//! Provides pre-built inputs for the restart-block reader's per-keyword
//! dispatch loop and the substitution table's cascade pass, so the
//! `benches/` binaries stay thin.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::PathBuf;

use ensrun_core::{
    Iens, KeywordType, NodeConfig, NodeImpl, ReportStep, RestartKeywordEntry, SubstTable, VarClass,
};
use ensrun_registry::NodeRegistry;
use ensrun_test_utils::{InMemoryRestartBlock, InMemoryStore, MockJobCatalog, NullLogSink, ScriptedNode};

/// Everything [`ensrun_restart::read_restart_block`] needs, pre-populated
/// with `num_fields` `FIELD`-typed keywords plus a handful of static
/// passthrough keywords, standing in for one report step of a mid-size
/// field model.
pub struct RestartFixture {
    /// The block to read, in file order.
    pub block: InMemoryRestartBlock,
    /// Pre-registered nodes for every `FIELD` keyword in `block`.
    pub registry: NodeRegistry,
    /// Knows the `node_impl` for every seeded key.
    pub catalog: MockJobCatalog,
    /// Records every persisted node, unused by the benchmark beyond
    /// exercising the real write path.
    pub store: InMemoryStore,
    /// Discards every log line.
    pub log: NullLogSink,
    /// Empty; the reader only consults it when wiring `GEN_KW` parents.
    pub subst: SubstTable,
    /// Scratch run path, never touched since no node here writes to disk.
    pub run_path: PathBuf,
}

/// Build a restart fixture with `num_fields` dynamic field keywords and
/// `num_static` static passthrough keywords, in that order.
pub fn restart_fixture(num_fields: usize, num_static: usize) -> RestartFixture {
    let mut registry = NodeRegistry::new();
    let catalog = MockJobCatalog::new();
    let subst = SubstTable::new();
    let mut entries = Vec::with_capacity(num_fields + num_static);

    for i in 0..num_fields {
        let key = format!("FIELD_{i}");
        let config = NodeConfig {
            key: key.clone(),
            var_class: VarClass::DynamicState,
            node_impl: NodeImpl::Field,
        };
        catalog.seed(config.clone());
        registry.add(config, Box::new(ScriptedNode::new(VarClass::DynamicState)), &subst);
        entries.push(RestartKeywordEntry {
            name: key,
            type_tag: KeywordType::Double,
            count: 1000,
            payload: vec![0u8; 8000],
        });
    }

    for i in 0..num_static {
        entries.push(RestartKeywordEntry {
            name: format!("SCON_{i}"),
            type_tag: KeywordType::Int,
            count: 10,
            payload: vec![0u8; 40],
        });
    }

    RestartFixture {
        block: InMemoryRestartBlock::new(ReportStep::new(1)).with_keywords(entries),
        registry,
        catalog,
        store: InMemoryStore::new(),
        log: NullLogSink,
        subst,
        run_path: PathBuf::from("/bench/run"),
    }
}

/// A realization index used consistently across the benchmark binaries.
pub fn bench_iens() -> Iens {
    Iens::new(0)
}

/// Build a substitution table `depth` entries deep, each one referencing
/// the next (`<KEY_0>` -> ... -> `<KEY_{depth-1}>` -> a literal), so
/// `expand` must cascade through every entry before reaching a fixed
/// point.
pub fn cascading_subst_table(depth: usize) -> SubstTable {
    let mut table = SubstTable::new();
    for i in 0..depth {
        let key = format!("KEY_{i}");
        let value = if i + 1 < depth {
            format!("<KEY_{}>", i + 1)
        } else {
            "BASE_0001".to_string()
        };
        table.insert(key, value, "benchmark chain entry");
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensrun_core::RestartSink;

    #[test]
    fn restart_fixture_builds_requested_counts() {
        let fixture = restart_fixture(4, 2);
        assert_eq!(fixture.block.keywords().len(), 6);
        assert_eq!(fixture.registry.len(), 4);
    }

    #[test]
    fn cascading_subst_table_expands_to_fixed_point() {
        let table = cascading_subst_table(5);
        assert_eq!(table.expand("<KEY_0>").unwrap(), "BASE_0001");
    }
}
