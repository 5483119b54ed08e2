//! The default log sink (§10.3): line-buffered, level-gated, writing to
//! stderr. A recording sink for tests lives in `ensrun-test-utils`.

use std::io::Write;
use std::sync::Mutex;

use ensrun_core::{Iens, LogLevel, LogSink, ReportStep};

/// Writes one line per call to stderr, at or above a configured minimum
/// level.
///
/// Buffered through a `Mutex<io::Stderr>` lock per call rather than one
/// lock for the sink's lifetime, so concurrent realizations interleave
/// whole lines rather than corrupting each other's output (§5: the log
/// sink is shared read-only across realizations).
pub struct StderrLogSink {
    min_level: LogLevel,
    lock: Mutex<()>,
}

impl StderrLogSink {
    /// A sink that only emits lines at or above `min_level`.
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            lock: Mutex::new(()),
        }
    }
}

impl Default for StderrLogSink {
    /// Emits everything, including per-node load detail.
    fn default() -> Self {
        Self::new(LogLevel::Detail)
    }
}

impl LogSink for StderrLogSink {
    fn log(&self, iens: Iens, step1: ReportStep, step2: ReportStep, level: LogLevel, message: &str) {
        if level > self.min_level {
            return;
        }
        let _guard = self.lock.lock().unwrap();
        let _ = writeln!(
            std::io::stderr(),
            "[{iens}:{step1}-{step2}] {message}",
        );
    }
}
