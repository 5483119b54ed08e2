//! A scripted [`RandomSource`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use ensrun_core::{Iens, RandomSource};

/// A [`RandomSource`] whose draws are either fixed literal values or a
/// deterministic counter, so tests can assert exactly what the
/// substitution table saw without depending on a real PRNG stream.
pub struct ScriptedRandomSource {
    fixed_int: Mutex<HashMap<(u32, u32), i64>>,
    fixed_float: Mutex<HashMap<(u32, u32), f64>>,
    default_int: i64,
    default_float: f64,
}

impl Default for ScriptedRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRandomSource {
    /// A source that returns `0`/`0.0` for every draw unless overridden.
    pub fn new() -> Self {
        Self {
            fixed_int: Mutex::new(HashMap::new()),
            fixed_float: Mutex::new(HashMap::new()),
            default_int: 0,
            default_float: 0.0,
        }
    }

    /// Fix the `RANDINT` draw for `(iens, attempt)`.
    pub fn set_randint(&self, iens: Iens, attempt: u32, value: i64) {
        self.fixed_int
            .lock()
            .unwrap()
            .insert((iens.get(), attempt), value);
    }

    /// Fix the `RANDFLOAT` draw for `(iens, attempt)`.
    pub fn set_randfloat(&self, iens: Iens, attempt: u32, value: f64) {
        self.fixed_float
            .lock()
            .unwrap()
            .insert((iens.get(), attempt), value);
    }
}

impl RandomSource for ScriptedRandomSource {
    fn next_randint(&self, iens: Iens, attempt: u32) -> i64 {
        self.fixed_int
            .lock()
            .unwrap()
            .get(&(iens.get(), attempt))
            .copied()
            .unwrap_or(self.default_int)
    }

    fn next_randfloat(&self, iens: Iens, attempt: u32) -> f64 {
        self.fixed_float
            .lock()
            .unwrap()
            .get(&(iens.get(), attempt))
            .copied()
            .unwrap_or(self.default_float)
    }
}
