//! Core data model for copy jobs.
//!
//! This module defines the main data structures for representing a
//! copy-and-sort run:
//! - CopyJob: the entire operation against one source/destination pair
//! - GameEntry: a single game folder or image file within a job
//! - Mode, EntryState, JobState: enums controlling behavior
//! - CopyReport: the transient result handed back to the caller

use std::path::PathBuf;
use std::time::SystemTime;
use serde::Serialize;
use uuid::Uuid;

/// Represents a single copy-and-sort job.
///
/// A CopyJob encompasses:
/// - Source and destination directories
/// - The library mode (PS1 folders or PSP image files)
/// - All entries to be copied, in processing order
/// - Current state and progress tracking
#[derive(Debug)]
pub struct CopyJob {
    /// Unique identifier for this job
    pub id: Uuid,

    /// Library mode: PS1 (folder copy) or PSP (file copy)
    pub mode: Mode,

    /// Root source directory
    pub source_path: PathBuf,

    /// Root destination directory
    pub destination_path: PathBuf,

    /// All entries in this job, sorted into processing order by planning
    pub entries: Vec<GameEntry>,

    /// Current job state (Pending, Running, Completed)
    pub state: JobState,

    /// Total bytes to copy (sum of all file sizes known at planning)
    pub total_bytes_to_copy: u64,

    /// Bytes copied so far
    pub total_bytes_copied: u64,

    /// Index of currently processing entry (if Running)
    pub current_entry_index: Option<usize>,

    /// When job was created
    pub created_at: SystemTime,

    /// When job execution started
    pub start_time: Option<SystemTime>,

    /// When job execution completed
    pub end_time: Option<SystemTime>,

    /// Optional checksum algorithm for verify-after-copy
    pub checksum_algorithm: Option<crate::checksums::ChecksumAlgorithm>,

    /// Whether to verify files after copying (PSP file mode)
    pub verify_after_copy: bool,
}

/// Represents a single game title within a job: a disc folder in PS1 mode,
/// an image file in PSP mode.
#[derive(Debug, Clone)]
pub struct GameEntry {
    /// Unique identifier for this entry within the job
    pub id: Uuid,

    /// File or folder name as it appears in the source directory
    pub name: String,

    /// Key used to order this entry (title after " - " in PS1 mode,
    /// the full name in PSP mode)
    pub sort_key: String,

    /// Full source path
    pub source_path: PathBuf,

    /// Full destination path
    pub destination_path: PathBuf,

    /// File size in bytes (0 for folders)
    pub file_size: u64,

    /// True if this entry is a game folder rather than a single file
    pub is_dir: bool,

    /// Current state of this entry
    pub state: EntryState,

    /// Bytes copied for this entry
    pub bytes_copied: u64,

    /// OS error code if state is Failed
    pub error_code: Option<u32>,

    /// Human-readable error message
    pub error_message: Option<String>,

    /// Whether post-copy verification passed (None when not verified)
    pub verification_passed: Option<bool>,
}

/// The library mode for a copy job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// PS1 library: one source folder per game title, copied recursively
    Ps1,
    /// PSP library: one source image file per game, copied individually
    Psp,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Ps1 => write!(f, "PS1"),
            Mode::Psp => write!(f, "PSP"),
        }
    }
}

/// The state of an individual entry within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    /// Not yet processed
    Pending,
    /// Currently copying
    Copying,
    /// Successfully copied
    Done,
    /// Left untouched because the destination already has it
    Skipped,
    /// Error occurred; entry not copied
    Failed,
}

impl EntryState {
    /// Returns true if this state is terminal (no further changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntryState::Done | EntryState::Skipped | EntryState::Failed)
    }
}

/// The state of an entire copy job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created, not yet started
    Pending,
    /// Currently executing
    Running,
    /// All entries processed (some may have failed)
    Completed,
}

/// The result of a completed run: the destination listing in sort order
/// plus the skipped and newly copied names. Discarded after reporting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CopyReport {
    /// Library mode the run executed in
    pub mode: Option<Mode>,

    /// Destination entries after the run, in descending sort order
    pub listing: Vec<String>,

    /// Names left untouched because they already existed in the destination
    pub skipped: Vec<String>,

    /// Names newly copied by this run
    pub added: Vec<String>,
}
