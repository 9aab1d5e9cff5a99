//! File I/O utilities with staged writes
//!
//! New versions are copied to a staging file first and renamed into place
//! only once the copy is complete, so a failed copy never disturbs existing
//! versions.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::BackupError;

/// Copy `source` to `staging`, flushing it to disk
///
/// A partially written staging file is removed on failure.
pub fn stage_copy(source: &Path, staging: &Path) -> Result<u64, BackupError> {
    let result = copy_synced(source, staging);
    if result.is_err() {
        discard(staging);
    }
    result.map_err(|e| {
        BackupError::Io(format!(
            "Could not copy {} to {}: {}",
            source.display(),
            staging.display(),
            e
        ))
    })
}

fn copy_synced(source: &Path, staging: &Path) -> io::Result<u64> {
    let mut reader = BufReader::new(File::open(source)?);
    let mut writer = BufWriter::new(File::create(staging)?);

    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;

    Ok(bytes)
}

/// Rename a staged file to its final name, replacing any file already there
///
/// The staging file is removed if the rename fails.
pub fn promote(staging: &Path, target: &Path) -> Result<(), BackupError> {
    fs::rename(staging, target).map_err(|e| {
        discard(staging);
        BackupError::Io(format!(
            "Could not move {} to {}: {}",
            staging.display(),
            target.display(),
            e
        ))
    })
}

/// Best-effort removal of a leftover file
pub fn discard(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove leftover file");
        }
    }
}
