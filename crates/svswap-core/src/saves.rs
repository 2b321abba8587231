use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Marker file every valid save directory carries.
pub const SENTINEL_FILE: &str = "SaveGameInfo";

/// Validate the save-directory contract and return the save file path.
///
/// The directory must contain a `SaveGameInfo` marker and a regular file
/// named after the directory itself; that file is the save. Symlinks are
/// resolved first so the name comparison uses the real directory name.
pub fn locate_save_file(dir: &Path) -> Result<PathBuf, CoreError> {
    if !dir.exists() {
        return Err(CoreError::BadSaveDir {
            path: dir.to_path_buf(),
            reason: "does not exist".into(),
        });
    }
    if !dir.is_dir() {
        return Err(CoreError::BadSaveDir {
            path: dir.to_path_buf(),
            reason: "is not a directory".into(),
        });
    }
    let dir = dir.canonicalize()?;
    let dir_name = dir
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .ok_or_else(|| CoreError::BadSaveDir {
            path: dir.clone(),
            reason: "has no usable directory name".into(),
        })?;
    log::debug!("Using save directory name {dir_name}");

    let mut found_sentinel = false;
    let mut save_file: Option<PathBuf> = None;
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(SENTINEL_FILE) => found_sentinel = true,
            Some(name) if name == dir_name => save_file = Some(path),
            _ => {}
        }
    }
    if !found_sentinel {
        return Err(CoreError::NotASave {
            path: dir,
            missing: SENTINEL_FILE.into(),
        });
    }
    save_file.ok_or(CoreError::NotASave {
        path: dir,
        missing: dir_name,
    })
}
