//! Job orchestration module.
//!
//! This module provides the main job lifecycle functions:
//! - Creating a job from source/destination paths and a library mode
//! - Planning a job (listing and sorting the source entries)
//! - Running a job (executing the copy loop and building the report)

use std::path::Path;
use std::time::{Duration, SystemTime};
use log::warn;
use uuid::Uuid;
use crate::checksums;
use crate::clock::Clock;
use crate::error::EngineError;
use crate::fs_ops;
use crate::model::{CopyJob, CopyReport, EntryState, GameEntry, JobState, Mode};
use crate::progress::ProgressCallback;
use crate::sortkey;

/// Pause between PSP file copies, so the destination device is never
/// hammered with back-to-back writes.
const FILE_COPY_PAUSE: Duration = Duration::from_secs(1);

/// Create a new copy job.
///
/// Validates that the source path exists and is a directory. The
/// destination path may not exist yet; it is created during execution.
///
/// # Errors
/// Returns EngineError if the source is missing or invalid
pub fn create_job<P: AsRef<Path>>(
    source: P,
    destination: P,
    mode: Mode,
) -> Result<CopyJob, EngineError> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    match std::fs::metadata(source) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(EngineError::InvalidPath {
                    path: source.to_path_buf(),
                    reason: "source must be a directory".to_string(),
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EngineError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(EngineError::SourceAccessDenied {
                path: source.to_path_buf(),
                source: e,
            });
        }
    }

    if destination.as_os_str().is_empty() {
        return Err(EngineError::InvalidPath {
            path: destination.to_path_buf(),
            reason: "destination path is empty".to_string(),
        });
    }

    Ok(CopyJob {
        id: Uuid::new_v4(),
        mode,
        source_path: source.to_path_buf(),
        destination_path: destination.to_path_buf(),
        entries: Vec::new(),
        state: JobState::Pending,
        total_bytes_to_copy: 0,
        total_bytes_copied: 0,
        current_entry_index: None,
        created_at: SystemTime::now(),
        start_time: None,
        end_time: None,
        checksum_algorithm: None,
        verify_after_copy: false,
    })
}

/// Plan a job by listing the source directory and sorting the entries
/// into processing order.
///
/// PS1 mode lists the immediate subdirectories and orders them descending
/// by the title after `" - "`; PSP mode lists the files and orders them
/// descending by full filename.
///
/// # Errors
/// Returns EngineError if the source cannot be listed
pub fn plan_job(job: &mut CopyJob) -> Result<(), EngineError> {
    if job.state != JobState::Pending {
        return Err(EngineError::InvalidPath {
            path: job.source_path.clone(),
            reason: format!("job must be Pending to plan; current state: {:?}", job.state),
        });
    }

    job.entries = match job.mode {
        Mode::Ps1 => fs_ops::list_game_folders(&job.source_path, &job.destination_path)?,
        Mode::Psp => fs_ops::list_game_files(&job.source_path, &job.destination_path)?,
    };
    job.entries.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));

    job.total_bytes_to_copy = job
        .entries
        .iter()
        .filter(|e| !e.is_dir)
        .map(|e| e.file_size)
        .sum();

    Ok(())
}

/// Run a job, executing the copy loop.
///
/// Transitions job state from Pending to Running to Completed and returns
/// the report: the final destination listing in sort order plus the
/// skipped and newly copied names. Individual entry errors are recorded
/// on the entry and do NOT stop the job.
///
/// # Errors
/// Returns EngineError only for unrecoverable job-level issues (invalid
/// state, destination creation failure, final re-listing failure).
pub fn run_job(
    job: &mut CopyJob,
    clock: &dyn Clock,
    progress: Option<&dyn ProgressCallback>,
) -> Result<CopyReport, EngineError> {
    if job.state != JobState::Pending {
        return Err(EngineError::InvalidPath {
            path: job.source_path.clone(),
            reason: format!("job must be Pending to run; current state: {:?}", job.state),
        });
    }

    job.state = JobState::Running;
    job.start_time = Some(clock.now());

    std::fs::create_dir_all(&job.destination_path).map_err(|e| {
        EngineError::DirectoryCreationFailed {
            path: job.destination_path.clone(),
            source: e,
        }
    })?;

    if let Some(callback) = progress {
        callback.on_job_started(job);
    }

    let mut report = CopyReport {
        mode: Some(job.mode),
        ..CopyReport::default()
    };

    match job.mode {
        Mode::Ps1 => run_folder_mode(job, clock, progress, &mut report)?,
        Mode::Psp => run_file_mode(job, clock, progress, &mut report)?,
    }

    job.state = JobState::Completed;
    job.end_time = Some(clock.now());
    job.current_entry_index = None;

    if let Some(callback) = progress {
        callback.on_job_completed(job, &report);
    }

    Ok(report)
}

/// PS1 folder mode: merge-copy each game folder into the destination and
/// stamp every file inside it with the copy time.
fn run_folder_mode(
    job: &mut CopyJob,
    clock: &dyn Clock,
    progress: Option<&dyn ProgressCallback>,
    report: &mut CopyReport,
) -> Result<(), EngineError> {
    for index in 0..job.entries.len() {
        job.current_entry_index = Some(index);
        let src = job.entries[index].source_path.clone();
        let dst = job.entries[index].destination_path.clone();

        job.entries[index].state = EntryState::Copying;
        if let Some(callback) = progress {
            callback.on_entry_started(job, index, &job.entries[index]);
        }

        let result = fs_ops::copy_dir_merged(&src, &dst)
            .and_then(|bytes| fs_ops::stamp_tree(&dst, clock.now()).map(|_| bytes));
        match result {
            Ok(bytes) => {
                job.entries[index].bytes_copied = bytes;
                job.entries[index].state = EntryState::Done;
                job.total_bytes_copied += bytes;
                report.added.push(job.entries[index].name.clone());
            }
            Err(e) => fail_entry(&mut job.entries[index], e),
        }

        if let Some(callback) = progress {
            callback.on_entry_completed(job, index, &job.entries[index]);
        }
    }

    // The destination may hold folders from earlier runs; report what is
    // actually there, in the same order the device will list it.
    let mut names: Vec<String> =
        fs_ops::list_game_folders(&job.destination_path, &job.destination_path)?
            .into_iter()
            .map(|e| e.name)
            .collect();
    sortkey::sort_by_title_desc(&mut names);
    report.listing = names;

    Ok(())
}

/// PSP file mode: copy each image file unless the destination already has
/// it, pausing between copies, then stamp the final listing with strictly
/// increasing modification times so name order and time order agree.
fn run_file_mode(
    job: &mut CopyJob,
    clock: &dyn Clock,
    progress: Option<&dyn ProgressCallback>,
    report: &mut CopyReport,
) -> Result<(), EngineError> {
    for index in 0..job.entries.len() {
        job.current_entry_index = Some(index);
        let src = job.entries[index].source_path.clone();
        let dst = job.entries[index].destination_path.clone();

        if dst.exists() {
            job.entries[index].state = EntryState::Skipped;
            report.skipped.push(job.entries[index].name.clone());
            if let Some(callback) = progress {
                callback.on_entry_started(job, index, &job.entries[index]);
                callback.on_entry_completed(job, index, &job.entries[index]);
            }
            continue;
        }

        job.entries[index].state = EntryState::Copying;
        if let Some(callback) = progress {
            callback.on_entry_started(job, index, &job.entries[index]);
        }

        let result = fs_ops::copy_file(&src, &dst)
            .and_then(|bytes| fs_ops::set_mtime(&dst, clock.now()).map(|_| bytes));
        match result {
            Ok(bytes) => {
                job.entries[index].bytes_copied = bytes;
                job.total_bytes_copied += bytes;

                if job.verify_after_copy {
                    if let Some(algorithm) = job.checksum_algorithm {
                        verify_entry(&mut job.entries[index], &src, &dst, algorithm);
                    }
                }

                job.entries[index].state = EntryState::Done;
                report.added.push(job.entries[index].name.clone());
            }
            Err(e) => fail_entry(&mut job.entries[index], e),
        }

        if let Some(callback) = progress {
            callback.on_entry_completed(job, index, &job.entries[index]);
        }

        clock.sleep(FILE_COPY_PAUSE);
    }

    let mut names: Vec<String> =
        fs_ops::list_game_files(&job.destination_path, &job.destination_path)?
            .into_iter()
            .map(|e| e.name)
            .collect();
    sortkey::sort_by_name_desc(&mut names);

    // Stamp the listing so timestamp order matches name order: earlier
    // listing positions get earlier times.
    let base = clock.now();
    for (index, name) in names.iter().enumerate() {
        let path = job.destination_path.join(name);
        fs_ops::set_mtime(&path, base + Duration::from_secs(index as u64))?;
    }
    report.listing = names;

    Ok(())
}

/// Record a copy failure on the entry and keep going.
fn fail_entry(entry: &mut GameEntry, error: EngineError) {
    warn!("failed to copy {}: {}", entry.name, error);
    entry.state = EntryState::Failed;
    entry.error_code = error.raw_os_error();
    entry.error_message = Some(error.to_string());
}

/// Compare the copied file against its source; a mismatch is recorded on
/// the entry without failing it.
fn verify_entry(
    entry: &mut GameEntry,
    src: &Path,
    dst: &Path,
    algorithm: checksums::ChecksumAlgorithm,
) {
    match checksums::verify_copy(src, dst, algorithm) {
        Ok(true) => entry.verification_passed = Some(true),
        Ok(false) => {
            warn!("checksum mismatch after copying {}", entry.name);
            entry.verification_passed = Some(false);
            entry.error_message =
                Some("checksum verification failed: source and destination differ".to_string());
        }
        Err(e) => {
            entry.error_message = Some(format!("checksum verification error: {}", e));
        }
    }
}
