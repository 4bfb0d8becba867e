//! Per-conformer work units of a generation run.
//!
//! Each task reports its slots to the [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! as a counted task and logs its own summary. Phases are opened and closed by
//! the calling workflow.

pub mod embedding;
pub mod optimization;
