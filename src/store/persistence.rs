//! File persistence: atomic replace and durable line append.

use crate::error::StorageError;
use std::fs;
use std::io::Write;
use std::path::Path;

fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Replace `path` with `bytes` atomically.
///
/// Writes to a sibling temporary file, syncs it, then renames over the target, so a
/// crash leaves either the old or the new contents, never a partial file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    ensure_parent(path)?;

    let mut temp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let write_temp = || -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    };
    write_temp().map_err(|source| StorageError::Write {
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        StorageError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Append one newline-terminated record to `path` and sync it.
///
/// The record is issued as a single write on an append-mode handle. Readers must
/// tolerate a torn final line left by a crash mid-write.
pub fn append_line(path: &Path, line: &str) -> Result<(), StorageError> {
    ensure_parent(path)?;

    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');

    let append = || -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(buf.as_bytes())?;
        file.sync_data()
    };
    append().map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file if it exists.
pub fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::IoError(e)),
    }
}
