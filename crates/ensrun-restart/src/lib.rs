//! Restart-block reader and writer (§4.4, §4.6): the component that
//! turns a decoded keyword stream into node loads and store writes, and
//! the mirror-image component that re-emits an initial restart file for
//! a re-run.
//!
//! The binary record format and its framing/endian codec are out of
//! scope (§1); this crate only consumes and produces already-decoded
//! [`ensrun_core::RestartKeywordEntry`] values through the
//! [`ensrun_core::RestartSink`] collaborator.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod mangle;
mod reader;
mod writer;

pub use error::{RestartReadError, RestartWriteError};
pub use mangle::sanitize_keyword;
pub use reader::{read_restart_block, RestartReadReport};
pub use writer::{
    initial_step_restart_keywords, resolve_restart_keywords, write_remaining_nodes,
    write_restart_block, INITIAL_STEP_FIXED_KEYS,
};
