//! Directory archiving
//!
//! Tracked directories are packed into a single file before rotation so they
//! can be stored and rotated exactly like tracked files.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{BackupError, BackupResult};

/// Turns a directory into one backup-ready file
pub trait Archiver {
    /// Archive `directory` into `scratch_dir/name` and return the archive path
    fn archive(&self, directory: &Path, scratch_dir: &Path, name: &str) -> BackupResult<PathBuf>;
}

/// Deflate-compressed zip archives
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn archive(&self, directory: &Path, scratch_dir: &Path, name: &str) -> BackupResult<PathBuf> {
        if !directory.is_dir() {
            return Err(BackupError::archive(directory, "not a directory"));
        }

        let archive_path = scratch_dir.join(name);
        let file = File::create(&archive_path)
            .map_err(|e| BackupError::archive(directory, format!("cannot create archive: {}", e)))?;

        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in WalkDir::new(directory).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| BackupError::archive(directory, e))?;
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                tracing::debug!(path = %entry.path().display(), "skipping symlink");
                continue;
            }

            let name = entry_name(directory, entry.path())
                .ok_or_else(|| BackupError::archive(directory, "entry outside directory"))?;

            if file_type.is_dir() {
                zip.add_directory(name, options)
                    .map_err(|e| BackupError::archive(directory, e))?;
            } else {
                zip.start_file(name, options)
                    .map_err(|e| BackupError::archive(directory, e))?;
                let mut reader = BufReader::new(
                    File::open(entry.path()).map_err(|e| BackupError::archive(entry.path(), e))?,
                );
                io::copy(&mut reader, &mut zip).map_err(|e| BackupError::archive(entry.path(), e))?;
            }
        }

        zip.finish().map_err(|e| BackupError::archive(directory, e))?;

        tracing::debug!(
            directory = %directory.display(),
            archive = %archive_path.display(),
            "archived directory"
        );

        Ok(archive_path)
    }
}

/// Zip entry name of `path`, relative to `root` and always `/`-separated
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
