//! A [`TemplateEngine`] backed by an in-memory template store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ensrun_core::{SubstTable, TemplateEngine, TemplateError};

/// A template engine that reads source text from an in-memory map keyed by
/// path (rather than the real filesystem), expands it against a
/// [`SubstTable`], and records the expanded content for every destination
/// path it writes.
#[derive(Default)]
pub struct MockTemplateEngine {
    templates: Mutex<HashMap<PathBuf, String>>,
    written: Mutex<HashMap<PathBuf, String>>,
}

impl MockTemplateEngine {
    /// A new engine with no registered templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `content` as the source text for `path`.
    pub fn set_template(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.templates.lock().unwrap().insert(path.into(), content.into());
    }

    /// The expanded content last written to `path`, if any.
    pub fn written(&self, path: impl AsRef<Path>) -> Option<String> {
        self.written.lock().unwrap().get(path.as_ref()).cloned()
    }

    /// Number of destination files written so far.
    pub fn write_count(&self) -> usize {
        self.written.lock().unwrap().len()
    }
}

impl TemplateEngine for MockTemplateEngine {
    fn instantiate(
        &self,
        template_path: &Path,
        dest_path: &Path,
        subst: &SubstTable,
    ) -> Result<(), TemplateError> {
        let source = self
            .templates
            .lock()
            .unwrap()
            .get(template_path)
            .cloned()
            .ok_or_else(|| TemplateError::ReadFailed {
                reason: format!("no template registered for {}", template_path.display()),
            })?;
        let expanded = subst.expand(&source)?;
        self.written
            .lock()
            .unwrap()
            .insert(dest_path.to_path_buf(), expanded);
        Ok(())
    }
}
