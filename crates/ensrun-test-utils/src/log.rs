//! [`LogSink`] implementations for tests: a recording sink and a null sink.

use std::sync::Mutex;

use ensrun_core::{Iens, LogLevel, LogSink, ReportStep};

/// One recorded log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    /// The realization this line concerns.
    pub iens: Iens,
    /// The step range, as `[step1, step2]`.
    pub step1: ReportStep,
    /// See `step1`.
    pub step2: ReportStep,
    /// Severity level (§7).
    pub level: LogLevel,
    /// The message body.
    pub message: String,
}

/// A [`LogSink`] that records every line for later assertion, and formats
/// them the way the spec's structured line does (`"[iens:step1-step2]
/// <message>"`) when rendered.
#[derive(Default)]
pub struct RecordingLogSink {
    lines: Mutex<Vec<LogLine>>,
}

impl RecordingLogSink {
    /// A new, empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, in emission order.
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines at or below `level` (i.e. at least as severe, per the spec's
    /// 1=retry/2=progress/3=detail numbering where lower is more severe).
    pub fn lines_at_or_above(&self, level: LogLevel) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.level <= level)
            .cloned()
            .collect()
    }
}

impl LogSink for RecordingLogSink {
    fn log(&self, iens: Iens, step1: ReportStep, step2: ReportStep, level: LogLevel, message: &str) {
        self.lines.lock().unwrap().push(LogLine {
            iens,
            step1,
            step2,
            level,
            message: message.to_string(),
        });
    }
}

/// A [`LogSink`] that discards everything; used by tests that don't care
/// about log output.
#[derive(Default)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn log(&self, _iens: Iens, _step1: ReportStep, _step2: ReportStep, _level: LogLevel, _message: &str) {}
}
