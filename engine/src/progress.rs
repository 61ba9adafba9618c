//! Progress reporting trait.
//!
//! This module defines the ProgressCallback trait, which decouples the
//! copy engine from any specific UI. The CLI implements it for console
//! output; all methods are called synchronously during job execution.

use crate::model::{CopyJob, CopyReport, GameEntry};

/// Trait for receiving progress updates from a copy job.
///
/// `on_entry_started` fires after the entry's fate for this run is known:
/// its state is `Copying` when the engine is about to copy it, or
/// `Skipped` when the destination already has it. `on_entry_completed`
/// fires once the entry reaches a terminal state.
pub trait ProgressCallback: Send {
    /// Called when job execution starts.
    fn on_job_started(&self, job: &CopyJob);

    /// Called when an entry is about to be processed.
    fn on_entry_started(&self, job: &CopyJob, index: usize, entry: &GameEntry);

    /// Called when an entry is done (copied, skipped, or failed).
    fn on_entry_completed(&self, job: &CopyJob, index: usize, entry: &GameEntry);

    /// Called when job execution is complete (all entries processed).
    fn on_job_completed(&self, job: &CopyJob, report: &CopyReport);
}
