//! Ensemble-wide configuration, shared read-only across realizations
//! (§3, §10.2).

use std::error::Error;
use std::fmt;
use std::sync::Mutex;

use indexmap::IndexSet;

/// How the orchestrator disposes of a realization's run directory on
/// successful completion (§4.7 `DONE_OK`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunpathKeepPolicy {
    /// Remove the run path after a successful `ASSIMILATION` step, keep
    /// it for `PREDICTION`/`EXPERIMENT`.
    DefaultKeep,
    /// Always remove the run path after success, regardless of mode.
    ExplicitDelete,
    /// Never remove the run path.
    Always,
}

/// Errors detected while validating an [`EnsembleConfig`] (§10.2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `run_path_fmt` contains neither `<IENS>` nor `<RUNPATH>`, so it can
    /// never be resolved to a distinct directory per realization.
    RunpathFormatMissingIens,
    /// `eclbase_fmt` is empty.
    EmptyEclbaseFormat,
    /// `max_internal_submit` would underflow (the field is unsigned, but
    /// a caller-supplied `i64` below zero is rejected before the
    /// conversion).
    InvalidMaxInternalSubmit {
        /// The rejected value.
        value: i64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunpathFormatMissingIens => {
                write!(f, "run path format string does not reference <IENS> or <RUNPATH>")
            }
            Self::EmptyEclbaseFormat => write!(f, "eclbase format string is empty"),
            Self::InvalidMaxInternalSubmit { value } => {
                write!(f, "max_internal_submit must be >= 0, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Ensemble-wide, read-only configuration shared (via `Arc`) across every
/// realization's orchestrator (§3, §10.2).
///
/// The registered static-key set is the one piece of ensemble-wide
/// *mutable* state: restart readers across realizations register newly
/// observed static keywords into it concurrently (§3, §5), guarded by a
/// `Mutex`.
#[derive(Debug)]
pub struct EnsembleConfig {
    run_path_fmt: String,
    eclbase_fmt: String,
    keep_policy: RunpathKeepPolicy,
    default_max_internal_submit: u32,
    static_keys: Mutex<IndexSet<String>>,
}

impl EnsembleConfig {
    /// Validate and construct a new ensemble configuration (§10.2).
    pub fn new(
        run_path_fmt: impl Into<String>,
        eclbase_fmt: impl Into<String>,
        keep_policy: RunpathKeepPolicy,
        default_max_internal_submit: i64,
    ) -> Result<Self, ConfigError> {
        let run_path_fmt = run_path_fmt.into();
        let eclbase_fmt = eclbase_fmt.into();

        if !run_path_fmt.contains("<IENS>") && !run_path_fmt.contains("<RUNPATH>") {
            return Err(ConfigError::RunpathFormatMissingIens);
        }
        if eclbase_fmt.is_empty() {
            return Err(ConfigError::EmptyEclbaseFormat);
        }
        if default_max_internal_submit < 0 {
            return Err(ConfigError::InvalidMaxInternalSubmit {
                value: default_max_internal_submit,
            });
        }

        Ok(Self {
            run_path_fmt,
            eclbase_fmt,
            keep_policy,
            default_max_internal_submit: default_max_internal_submit as u32,
            static_keys: Mutex::new(IndexSet::new()),
        })
    }

    /// Re-run the constructor's checks against the current field values.
    /// Exposed separately so a config built once can be re-validated
    /// after in-place mutation in future callers, mirroring the
    /// teacher's `WorldConfig::validate`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.run_path_fmt.contains("<IENS>") && !self.run_path_fmt.contains("<RUNPATH>") {
            return Err(ConfigError::RunpathFormatMissingIens);
        }
        if self.eclbase_fmt.is_empty() {
            return Err(ConfigError::EmptyEclbaseFormat);
        }
        Ok(())
    }

    /// The runpath format string templates are expanded against.
    pub fn run_path_fmt(&self) -> &str {
        &self.run_path_fmt
    }

    /// The eclbase format string templates are expanded against.
    pub fn eclbase_fmt(&self) -> &str {
        &self.eclbase_fmt
    }

    /// The run-path cleanup policy applied on successful completion.
    pub fn keep_policy(&self) -> RunpathKeepPolicy {
        self.keep_policy
    }

    /// The default retry budget for realizations that don't override it.
    pub fn default_max_internal_submit(&self) -> u32 {
        self.default_max_internal_submit
    }

    /// Ensure `name` is present in the ensemble-wide static-key set.
    /// Idempotent (§4.3's `ensemble_config_ensure_static_key` grounding).
    /// Returns `true` if this call inserted a new key.
    pub fn ensure_static_key(&self, name: &str) -> bool {
        self.static_keys.lock().unwrap().insert(name.to_string())
    }

    /// Whether `name` has been registered as a static key by any
    /// realization so far.
    pub fn has_static_key(&self, name: &str) -> bool {
        self.static_keys.lock().unwrap().contains(name)
    }

    /// A snapshot of every static key registered so far, in registration
    /// order.
    pub fn static_keys(&self) -> Vec<String> {
        self.static_keys.lock().unwrap().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_runpath_format_without_iens() {
        let err = EnsembleConfig::new("/ens/real", "ECLBASE", RunpathKeepPolicy::DefaultKeep, 2)
            .unwrap_err();
        assert_eq!(err, ConfigError::RunpathFormatMissingIens);
    }

    #[test]
    fn rejects_empty_eclbase_format() {
        let err = EnsembleConfig::new("/ens/real<IENS>", "", RunpathKeepPolicy::DefaultKeep, 2)
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyEclbaseFormat);
    }

    #[test]
    fn rejects_negative_max_internal_submit() {
        let err =
            EnsembleConfig::new("/ens/real<IENS>", "ECLBASE", RunpathKeepPolicy::DefaultKeep, -1)
                .unwrap_err();
        assert_eq!(err, ConfigError::InvalidMaxInternalSubmit { value: -1 });
    }

    #[test]
    fn static_key_registration_is_idempotent() {
        let config =
            EnsembleConfig::new("/ens/real<IENS>", "ECLBASE", RunpathKeepPolicy::DefaultKeep, 2)
                .unwrap();
        assert!(config.ensure_static_key("INTEHEAD_0"));
        assert!(!config.ensure_static_key("INTEHEAD_0"));
        assert_eq!(config.static_keys(), vec!["INTEHEAD_0".to_string()]);
    }
}
