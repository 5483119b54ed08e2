//! Ordered substitution table with cascading expansion (§4.1).

use indexmap::IndexMap;

use crate::error::SubstError;

/// One substitution table entry: the live value plus a short description
/// shown by `summarize`-style observability surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    value: String,
    doc: String,
}

/// Ordered mapping of tagged placeholders (`<KEY>`) to current string
/// values, with documentation, supporting cascading expansion.
///
/// Ordering matters: entries inserted earlier are substituted first in each
/// pass, so user-defined entries should precede built-ins when both might
/// expand into the same buffer (§3).
#[derive(Clone, Debug, Default)]
pub struct SubstTable {
    entries: IndexMap<String, Entry>,
}

impl SubstTable {
    /// An empty substitution table.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Append a new key, or replace the value and doc of an existing one
    /// in place (preserving its original position).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>, doc: impl Into<String>) {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.value = value.into();
                entry.doc = doc.into();
            }
            None => {
                self.entries.insert(
                    key,
                    Entry {
                        value: value.into(),
                        doc: doc.into(),
                    },
                );
            }
        }
    }

    /// The current value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.value.as_str())
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered iteration over `(key, value, doc)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries
            .iter()
            .map(|(k, e)| (k.as_str(), e.value.as_str(), e.doc.as_str()))
    }

    /// One substitution pass: every `<KEY>` sentinel in `source` whose key
    /// is registered is replaced by its current value, in table order.
    fn pass(&self, source: &str) -> String {
        let mut out = source.to_string();
        for (key, entry) in &self.entries {
            let sentinel = format!("<{key}>");
            if out.contains(&sentinel) {
                out = out.replace(&sentinel, &entry.value);
            }
        }
        out
    }

    /// Count of remaining, still-registered sentinels in `source`.
    fn remaining_sentinels(&self, source: &str) -> usize {
        self.entries
            .keys()
            .map(|key| source.matches(&format!("<{key}>")).count())
            .sum()
    }

    /// Expand all sentinels in `source`, cascading until a fixed point.
    ///
    /// Termination is guaranteed because the table is finite and each pass
    /// is required to strictly decrease the remaining sentinel count; if a
    /// pass fails to shrink that count while sentinels remain, the table
    /// contains a cycle and [`SubstError::Cycle`] is returned.
    pub fn expand(&self, source: &str) -> Result<String, SubstError> {
        let mut buf = source.to_string();
        let mut remaining = self.remaining_sentinels(&buf);
        let mut passes = 0usize;
        while remaining > 0 {
            let next = self.pass(&buf);
            let next_remaining = self.remaining_sentinels(&next);
            passes += 1;
            if next_remaining >= remaining {
                return Err(SubstError::Cycle {
                    passes_attempted: passes,
                });
            }
            buf = next;
            remaining = next_remaining;
            if passes > self.entries.len() + 1 {
                return Err(SubstError::Cycle {
                    passes_attempted: passes,
                });
            }
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_substitution() {
        let mut table = SubstTable::new();
        table.insert("IENS", "3", "realization index");
        assert_eq!(table.expand("sim_<IENS>.data").unwrap(), "sim_3.data");
    }

    #[test]
    fn cascade_resolves_in_order() {
        let mut table = SubstTable::new();
        table.insert("INNER", "42", "inner value");
        table.insert("OUTER", "value=<INNER>", "outer value referencing inner");
        assert_eq!(table.expand("<OUTER>").unwrap(), "value=42");
    }

    #[test]
    fn replace_preserves_position() {
        let mut table = SubstTable::new();
        table.insert("A", "1", "first");
        table.insert("B", "2", "second");
        table.insert("A", "9", "first, updated");
        let keys: Vec<_> = table.iter().map(|(k, _, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(table.get("A"), Some("9"));
    }

    #[test]
    fn unregistered_sentinel_is_left_untouched() {
        let table = SubstTable::new();
        assert_eq!(table.expand("<NOPE>").unwrap(), "<NOPE>");
    }

    #[test]
    fn cycle_is_detected() {
        let mut table = SubstTable::new();
        table.insert("A", "<B>X", "a referencing b");
        table.insert("B", "<A>Y", "b referencing a");
        let err = table.expand("<A>").unwrap_err();
        assert!(matches!(err, SubstError::Cycle { .. }));
    }

    proptest::proptest! {
        #[test]
        fn acyclic_chains_always_converge(n in 1usize..12) {
            let mut table = SubstTable::new();
            for i in 0..n {
                if i + 1 == n {
                    table.insert(format!("K{i}"), "leaf", "terminal value");
                } else {
                    table.insert(format!("K{i}"), format!("<K{}>", i + 1), "chained value");
                }
            }
            let result = table.expand("<K0>");
            prop_assert_eq!(result.unwrap(), "leaf");
        }
    }
}
