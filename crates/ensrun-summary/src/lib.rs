//! Summary-series reader (§4.5): locates a realization's unified or
//! per-step summary files, drains them into the registry's dynamic-result
//! nodes one report step at a time, and persists the simulated-time
//! vector.
//!
//! The binary summary format itself is out of scope (§1); this crate
//! only consumes [`ensrun_core::SummarySource`] through the
//! [`ensrun_core::SummaryLoader`] collaborator.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod locate;
mod reader;
mod sentinel;

pub use error::SummaryReadError;
pub use locate::{locate, SummaryForm};
pub use reader::read_summary_series;
pub use sentinel::sim_time_or_sentinel;
