//! # romsort engine - Game Library Copy Engine
//!
//! A headless library for copying retro game libraries (PS1 disc folders,
//! PSP image files) onto destination storage in a deliberate sort order.
//! Designed as the foundation for multiple front-ends (CLI, automation).
//!
//! ## Overview
//!
//! The engine copies a source library into a destination directory and
//! stamps modification times so the destination device lists titles in
//! the intended order. It features:
//! - Sort-key extraction from `"<index> - <Title>"` folder names
//! - Per-entry state tracking and error isolation
//! - Skip-if-exists semantics for PSP image files
//! - Progress reporting via callbacks (decoupled from UI technology)
//! - An injectable clock for deterministic tests
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{create_job, plan_job, run_job, Mode, SystemClock};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a job
//! let mut job = create_job("/games/psp", "/mnt/card/ISO", Mode::Psp)?;
//!
//! // Plan the job (list and sort the source entries)
//! plan_job(&mut job)?;
//! println!("Will process {} entries", job.entries.len());
//!
//! // Run the job (execute the copy loop)
//! let report = run_job(&mut job, &SystemClock, None)?;
//!
//! // Check results
//! for name in &report.listing {
//!     println!("{}", name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Core data structures (CopyJob, GameEntry, CopyReport, enums)
//! - **error**: Error types and handling
//! - **sortkey**: Title extraction and ordering
//! - **fs_ops**: Low-level filesystem operations
//! - **job**: Job orchestration (create, plan, run)
//! - **progress**: Progress callback trait
//! - **clock**: Injectable wall-clock
//! - **checksums**: Verify-after-copy support

pub mod checksums;
pub mod clock;
pub mod error;
pub mod fs_ops;
pub mod job;
pub mod model;
pub mod progress;
pub mod sortkey;

// Re-export main types and functions
pub use checksums::{compute_file_checksum, verify_copy, ChecksumAlgorithm, ChecksumValue};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::EngineError;
pub use job::{create_job, plan_job, run_job};
pub use model::{CopyJob, CopyReport, EntryState, GameEntry, JobState, Mode};
pub use progress::ProgressCallback;
pub use sortkey::title_key;
