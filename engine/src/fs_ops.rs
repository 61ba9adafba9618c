//! Filesystem operations module.
//!
//! This module provides the low-level operations the orchestrator builds on:
//! - Listing the game folders / image files of a directory
//! - Copying single files and merging folder trees into the destination
//! - Updating modification timestamps (single path or whole tree)

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use filetime::FileTime;
use log::debug;
use uuid::Uuid;
use crate::error::EngineError;
use crate::model::{EntryState, GameEntry};
use crate::sortkey;

/// List the immediate subdirectories of `source` as game entries.
///
/// Each entry's sort key is the title after `" - "` in its folder name.
/// The order of the returned entries is whatever the OS reports; planning
/// sorts them.
///
/// # Errors
/// Returns EngineError::ListingFailed if the directory cannot be read.
pub fn list_game_folders(
    source: &Path,
    destination_root: &Path,
) -> Result<Vec<GameEntry>, EngineError> {
    let mut entries = Vec::new();

    for dir_entry in read_dir(source)? {
        let dir_entry = dir_entry.map_err(|e| EngineError::ListingFailed {
            path: source.to_path_buf(),
            source: e,
        })?;
        let metadata = dir_entry.metadata().map_err(|e| EngineError::ListingFailed {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_dir() {
            continue;
        }

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        entries.push(GameEntry {
            id: Uuid::new_v4(),
            sort_key: sortkey::title_key(&name).to_string(),
            source_path: dir_entry.path(),
            destination_path: destination_root.join(&name),
            name,
            file_size: 0,
            is_dir: true,
            state: EntryState::Pending,
            bytes_copied: 0,
            error_code: None,
            error_message: None,
            verification_passed: None,
        });
    }

    Ok(entries)
}

/// List the files of `source` as game entries.
///
/// Subdirectories are ignored. Each entry's sort key is its full filename.
///
/// # Errors
/// Returns EngineError::ListingFailed if the directory cannot be read.
pub fn list_game_files(
    source: &Path,
    destination_root: &Path,
) -> Result<Vec<GameEntry>, EngineError> {
    let mut entries = Vec::new();

    for dir_entry in read_dir(source)? {
        let dir_entry = dir_entry.map_err(|e| EngineError::ListingFailed {
            path: source.to_path_buf(),
            source: e,
        })?;
        let metadata = dir_entry.metadata().map_err(|e| EngineError::ListingFailed {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_file() {
            continue;
        }

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        entries.push(GameEntry {
            id: Uuid::new_v4(),
            sort_key: name.clone(),
            source_path: dir_entry.path(),
            destination_path: destination_root.join(&name),
            name,
            file_size: metadata.len(),
            is_dir: false,
            state: EntryState::Pending,
            bytes_copied: 0,
            error_code: None,
            error_message: None,
            verification_passed: None,
        });
    }

    Ok(entries)
}

fn read_dir(path: &Path) -> Result<fs::ReadDir, EngineError> {
    fs::read_dir(path).map_err(|e| EngineError::ListingFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy a single file from source to destination.
///
/// The destination's parent directory is created if necessary. An existing
/// destination file is overwritten; the skip-if-exists decision belongs to
/// the orchestrator.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// Returns EngineError if the copy fails
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, EngineError> {
    ensure_parent_dir_exists(dst)?;

    let mut src_file = fs::File::open(src).map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let mut dst_file = fs::File::create(dst).map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let bytes_copied = io::copy(&mut src_file, &mut dst_file).map_err(|e| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            EngineError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            }
        } else {
            EngineError::ReadError {
                path: src.to_path_buf(),
                source: e,
            }
        }
    })?;

    debug!("copied {} -> {} ({} bytes)", src.display(), dst.display(), bytes_copied);
    Ok(bytes_copied)
}

/// Recursively copy a folder tree into the destination, merging with
/// whatever is already there.
///
/// Existing destination files with the same relative path are overwritten;
/// destination entries with no source counterpart are left alone.
///
/// # Returns
/// Total number of bytes copied
///
/// # Errors
/// Returns EngineError on the first listing, directory-creation, or copy
/// failure inside the tree.
pub fn copy_dir_merged(src: &Path, dst: &Path) -> Result<u64, EngineError> {
    fs::create_dir_all(dst).map_err(|e| EngineError::DirectoryCreationFailed {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let mut bytes_copied = 0;
    for dir_entry in read_dir(src)? {
        let dir_entry = dir_entry.map_err(|e| EngineError::ListingFailed {
            path: src.to_path_buf(),
            source: e,
        })?;
        let metadata = dir_entry.metadata().map_err(|e| EngineError::ListingFailed {
            path: src.to_path_buf(),
            source: e,
        })?;

        let target = dst.join(dir_entry.file_name());
        if metadata.is_dir() {
            bytes_copied += copy_dir_merged(&dir_entry.path(), &target)?;
        } else {
            bytes_copied += copy_file(&dir_entry.path(), &target)?;
        }
    }

    Ok(bytes_copied)
}

/// Ensure the parent directory of a path exists, creating it if necessary.
///
/// # Errors
/// Returns EngineError if directory creation fails
pub fn ensure_parent_dir_exists(path: &Path) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }

        match fs::metadata(parent) {
            Ok(metadata) => {
                if metadata.is_dir() {
                    Ok(())
                } else {
                    Err(EngineError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source: io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "parent path exists but is not a directory",
                        ),
                    })
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
                Ok(())
            }
            Err(e) => Err(EngineError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            }),
        }
    } else {
        Ok(())
    }
}

/// Set a path's access and modification times to `time`.
///
/// # Errors
/// Returns EngineError::TimestampFailed if the update fails
pub fn set_mtime(path: &Path, time: SystemTime) -> Result<(), EngineError> {
    let ft = FileTime::from_system_time(time);
    filetime::set_file_times(path, ft, ft).map_err(|e| EngineError::TimestampFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Set the modification time of every file under `dir` to `time`.
///
/// Directories themselves are not stamped, only the files inside them.
///
/// # Errors
/// Returns EngineError on the first listing or timestamp failure.
pub fn stamp_tree(dir: &Path, time: SystemTime) -> Result<(), EngineError> {
    for dir_entry in read_dir(dir)? {
        let dir_entry = dir_entry.map_err(|e| EngineError::ListingFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let metadata = dir_entry.metadata().map_err(|e| EngineError::ListingFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        if metadata.is_dir() {
            stamp_tree(&dir_entry.path(), time)?;
        } else {
            set_mtime(&dir_entry.path(), time)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_list_game_folders_ignores_files() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(src.join("1 - Zelda")).expect("Failed to create folder");
        fs::write(src.join("stray.txt"), b"x").expect("Failed to write file");

        let dst = temp_dir.path().join("dst");
        let entries = list_game_folders(&src, &dst).expect("Failed to list");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "1 - Zelda");
        assert_eq!(entries[0].sort_key, "Zelda");
        assert!(entries[0].is_dir);
        assert_eq!(entries[0].destination_path, dst.join("1 - Zelda"));
    }

    #[test]
    fn test_list_game_files_ignores_folders() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(src.join("subdir")).expect("Failed to create folder");
        fs::write(src.join("game.iso"), b"disc image").expect("Failed to write file");

        let dst = temp_dir.path().join("dst");
        let entries = list_game_files(&src, &dst).expect("Failed to list");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "game.iso");
        assert_eq!(entries[0].sort_key, "game.iso");
        assert_eq!(entries[0].file_size, 10);
        assert!(!entries[0].is_dir);
    }

    #[test]
    fn test_copy_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("source.bin");
        let dst_file = temp_dir.path().join("nested").join("dest.bin");

        let mut file = fs::File::create(&src_file).expect("Failed to create source");
        file.write_all(b"test content").expect("Failed to write source");
        drop(file);

        let bytes = copy_file(&src_file, &dst_file).expect("Failed to copy");
        assert_eq!(bytes, 12);

        let content = fs::read_to_string(&dst_file).expect("Failed to read dest");
        assert_eq!(content, "test content");
    }

    #[test]
    fn test_copy_dir_merged_copies_nested_tree() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir_all(src.join("CD2")).expect("Failed to create src tree");
        fs::write(src.join("disc.bin"), b"disc1").expect("Failed to write file");
        fs::write(src.join("CD2").join("disc.bin"), b"disc2").expect("Failed to write file");

        let dst = temp_dir.path().join("dst");
        let bytes = copy_dir_merged(&src, &dst).expect("Failed to copy");

        assert_eq!(bytes, 10);
        assert_eq!(fs::read_to_string(dst.join("disc.bin")).unwrap(), "disc1");
        assert_eq!(fs::read_to_string(dst.join("CD2").join("disc.bin")).unwrap(), "disc2");
    }

    #[test]
    fn test_copy_dir_merged_overwrites_files_keeps_strangers() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::write(src.join("game.bin"), b"fresh").expect("Failed to write file");

        let dst = temp_dir.path().join("dst");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        fs::write(dst.join("game.bin"), b"stale data").expect("Failed to write file");
        fs::write(dst.join("save.mcr"), b"save").expect("Failed to write file");

        copy_dir_merged(&src, &dst).expect("Failed to copy");

        assert_eq!(fs::read_to_string(dst.join("game.bin")).unwrap(), "fresh");
        assert_eq!(fs::read_to_string(dst.join("save.mcr")).unwrap(), "save");
    }

    #[test]
    fn test_set_mtime() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file = temp_dir.path().join("file.bin");
        fs::write(&file, b"x").expect("Failed to write file");

        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&file, stamp).expect("Failed to set mtime");

        let modified = fs::metadata(&file).unwrap().modified().unwrap();
        assert_eq!(modified, stamp);
    }

    #[test]
    fn test_stamp_tree_touches_every_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path().join("game");
        fs::create_dir_all(root.join("CD2")).expect("Failed to create tree");
        fs::write(root.join("a.bin"), b"a").expect("Failed to write file");
        fs::write(root.join("CD2").join("b.bin"), b"b").expect("Failed to write file");

        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        stamp_tree(&root, stamp).expect("Failed to stamp tree");

        for path in [root.join("a.bin"), root.join("CD2").join("b.bin")] {
            let modified = fs::metadata(&path).unwrap().modified().unwrap();
            assert_eq!(modified, stamp, "wrong mtime for {}", path.display());
        }
    }

    #[test]
    fn test_list_nonexistent_source_fails() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("nonexistent");
        let dst = temp_dir.path().join("dst");

        assert!(list_game_folders(&src, &dst).is_err());
        assert!(list_game_files(&src, &dst).is_err());
    }
}
