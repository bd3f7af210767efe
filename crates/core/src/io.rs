//! Filesystem helpers shared by the pipeline steps.

use std::{
    fs::{self, create_dir_all, read, remove_dir_all, write},
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};

use crate::error::{Error, Result};

pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    read(path).map_err(|e| Error::io("read", path, e))
}

pub fn write_file(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    write(path, data).map_err(|e| Error::io("write", path, e))
}

pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    create_dir_all(path).map_err(|e| Error::io("create directory", path, e))
}

/// Removes a directory tree; a missing directory is not an error.
pub fn remove_dir_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }
    remove_dir_all(path).map_err(|e| Error::io("remove", path, e))?;
    Ok(true)
}

/// Find files matching a glob pattern in a directory, sorted by path.
///
/// Only `pattern` is interpreted; `dir` is matched literally.
pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir_str = dir.to_str().ok_or_else(|| invalid_input("list", dir, "non UTF-8 path"))?;
    let full = format!("{}/{pattern}", Pattern::escape(dir_str));
    let mut paths: Vec<PathBuf> = glob(&full)
        .map_err(|e| invalid_input("list", dir, &format!("invalid glob pattern {full}: {e}")))?
        .filter_map(|entry| entry.ok())
        .collect();
    paths.sort();
    Ok(paths)
}

/// `.ttf` files directly inside `dir`.
pub fn glob_fonts(dir: &Path) -> Result<Vec<PathBuf>> {
    glob_files(dir, "*.ttf")
}

/// Immediate subdirectories of `dir`, sorted by name.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io("list", dir, e))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io("list", dir, e))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Final path component as UTF-8, for directory and file names we created.
pub fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| invalid_input("name", path, "invalid file name"))
}

fn invalid_input(action: &'static str, path: &Path, message: &str) -> Error {
    Error::io(action, path, std::io::Error::new(std::io::ErrorKind::InvalidInput, message))
}
