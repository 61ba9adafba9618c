//! romsort - Command-line interface for the game library copy engine.
//!
//! Copies a PS1 or PSP game library into a destination directory in
//! sorted order. Source, destination, and mode come from the command line
//! when given, or from native dialogs when omitted, matching the original
//! pick-and-go workflow.

mod select;

use std::path::PathBuf;
use std::time::Instant;
use chrono::Local;
use clap::Parser;
use engine::{
    create_job, plan_job, run_job, ChecksumAlgorithm, Clock, CopyJob, CopyReport, EntryState,
    GameEntry, Mode, ProgressCallback, SystemClock,
};
use select::{DialogSelect, Select};

/// romsort - copy game libraries in sorted order
#[derive(Parser, Debug)]
#[command(name = "romsort")]
#[command(version = "0.1.0")]
#[command(about = "Copy PS1/PSP game libraries into sorted, timestamp-ordered storage")]
struct Args {
    /// Source directory (folder picker when omitted)
    #[arg(long, value_name = "PATH")]
    src: Option<PathBuf>,

    /// Destination directory (folder picker when omitted)
    #[arg(long, value_name = "PATH")]
    dst: Option<PathBuf>,

    /// Library mode: ps1 (disc folders) or psp (image files);
    /// yes/no dialog when omitted
    #[arg(long, value_name = "MODE")]
    mode: Option<String>,

    /// Verify each copied file against its source
    #[arg(long)]
    verify: bool,

    /// Checksum algorithm for verification: crc32, md5, sha256, blake3
    #[arg(long, value_name = "ALGORITHM", default_value = "sha256", requires = "verify")]
    hash: String,

    /// Write the final report as JSON
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

/// CLI implementation of ProgressCallback for console output
struct ConsoleProgress {
    verbose: bool,
    start_time: Instant,
}

impl ConsoleProgress {
    fn new(verbose: bool) -> Self {
        ConsoleProgress {
            verbose,
            start_time: Instant::now(),
        }
    }

    fn kind(entry: &GameEntry) -> &'static str {
        if entry.is_dir {
            "folder"
        } else {
            "file"
        }
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_job_started(&self, job: &CopyJob) {
        if self.verbose {
            eprintln!("Preparing copy...");
            eprintln!("  Source: {}", job.source_path.display());
            eprintln!("  Destination: {}", job.destination_path.display());
            eprintln!("  Mode: {}", job.mode);
            eprintln!("  Entries: {}", job.entries.len());
        }
    }

    fn on_entry_started(&self, _job: &CopyJob, _index: usize, entry: &GameEntry) {
        let kind = Self::kind(entry);
        match entry.state {
            EntryState::Copying => {
                println!("\n[INFO] Currently copying {}: {}...", kind, entry.name);
            }
            EntryState::Skipped => {
                println!(
                    "\n[INFO] Currently skipping {}: {} (already exists in destination)...",
                    kind, entry.name
                );
            }
            _ => {}
        }
    }

    fn on_entry_completed(&self, _job: &CopyJob, _index: usize, entry: &GameEntry) {
        let kind = Self::kind(entry);
        match entry.state {
            EntryState::Done => {
                println!("[INFO] Finished copying {}: {} - Complete", kind, entry.name);
            }
            EntryState::Skipped => {
                println!("[INFO] Finished skipping {}: {} - Complete", kind, entry.name);
            }
            EntryState::Failed => {
                println!(
                    "[ERROR] Failed to copy {}: {} - {}",
                    kind,
                    entry.name,
                    entry.error_message.as_deref().unwrap_or("unknown error")
                );
            }
            _ => {}
        }
    }

    fn on_job_completed(&self, job: &CopyJob, report: &CopyReport) {
        println!();
        match job.mode {
            Mode::Ps1 => {
                println!("Folders in destination folder (sorted by name after ' - '):");
                for name in &report.listing {
                    println!("{}", name);
                }
            }
            Mode::Psp => {
                println!("Files in destination folder (sorted by name in descending alphabetical order):");
                for name in &report.listing {
                    println!("{}", name);
                }

                if !report.skipped.is_empty() {
                    println!("\nSkipped files (already exist):");
                    for name in &report.skipped {
                        println!("{}", name);
                    }
                }

                if !report.added.is_empty() {
                    println!("\nNew files copied:");
                    for name in &report.added {
                        println!("{}", name);
                    }
                }
            }
        }
        println!("All files have been copied and sorted successfully.");

        if self.verbose {
            let mut done = 0;
            let mut skipped = 0;
            let mut failed = 0;
            for entry in &job.entries {
                match entry.state {
                    EntryState::Done => done += 1,
                    EntryState::Skipped => skipped += 1,
                    EntryState::Failed => failed += 1,
                    _ => {}
                }
            }
            eprintln!("Summary: {} copied, {} skipped, {} failed", done, skipped, failed);
            eprintln!("Elapsed: {:.1}s", self.start_time.elapsed().as_secs_f64());
            eprintln!("Finished at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let exit_code = match run_cli(&args, &DialogSelect, &SystemClock) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated from main for testability.
///
/// Returns Ok(true) on a clean run, Ok(false) when one or more entries
/// failed to copy, Err for usage and job-level errors.
fn run_cli(args: &Args, select: &dyn Select, clock: &dyn Clock) -> Result<bool, String> {
    let mode = match args.mode.as_deref() {
        Some(s) => match s.to_lowercase().as_str() {
            "ps1" => Mode::Ps1,
            "psp" => Mode::Psp,
            other => return Err(format!("Invalid mode '{}'. Must be 'ps1' or 'psp'", other)),
        },
        None => {
            if select.confirm("Game Type", "Select the game type:\n\nYes for PS1\nNo for PSP") {
                Mode::Ps1
            } else {
                Mode::Psp
            }
        }
    };

    let source = args
        .src
        .clone()
        .or_else(|| select.pick_folder("Select the source folder"))
        .filter(|p| !p.as_os_str().is_empty());
    let destination = args
        .dst
        .clone()
        .or_else(|| select.pick_folder("Select the destination folder"))
        .filter(|p| !p.as_os_str().is_empty());
    let (source, destination) = match (source, destination) {
        (Some(source), Some(destination)) => (source, destination),
        _ => {
            println!("Source and destination folders must be selected.");
            return Ok(true);
        }
    };

    let checksum_algorithm = if args.verify {
        match ChecksumAlgorithm::from_str(&args.hash) {
            Some(algorithm) => Some(algorithm),
            None => {
                return Err(format!(
                    "Invalid hash algorithm '{}'. Must be 'crc32', 'md5', 'sha256', or 'blake3'",
                    args.hash
                ))
            }
        }
    } else {
        None
    };

    let mut job = create_job(&source, &destination, mode)
        .map_err(|e| format!("Job creation failed: {}", e))?;

    if args.verify {
        job.verify_after_copy = true;
        job.checksum_algorithm = checksum_algorithm;
    }

    plan_job(&mut job).map_err(|e| format!("Job planning failed: {}", e))?;

    let progress = ConsoleProgress::new(args.verbose);
    let report = run_job(&mut job, clock, Some(&progress))
        .map_err(|e| format!("Job execution failed: {}", e))?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Report serialization failed: {}", e))?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write report {}: {}", path.display(), e))?;
    }

    let has_failures = job.entries.iter().any(|e| e.state == EntryState::Failed);
    Ok(!has_failures)
}
