use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Suffixes tried before giving up on a name that is already taken.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("export directory {path:?} is unusable: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("no free file name for {0}")]
    NameTaken(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Directory that downloaded exports land in.
///
/// Files are staged in a temp file next to their target and only linked in
/// under their final name once fully written. An existing export is never
/// replaced: a clashing name gets a `-N` suffix instead.
#[derive(Debug, Clone)]
pub struct ExportDir {
    path: PathBuf,
}

impl ExportDir {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the directory if missing and checks that it accepts new files.
    pub fn prepare(&self) -> Result<(), PersistError> {
        let unusable = |reason: String| PersistError::OutputDir {
            path: self.path.clone(),
            reason,
        };
        match fs::metadata(&self.path) {
            Ok(meta) if !meta.is_dir() => return Err(unusable("not a directory".to_string())),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&self.path).map_err(|err| unusable(err.to_string()))?;
            }
            Err(err) => return Err(unusable(err.to_string())),
        }
        NamedTempFile::new_in(&self.path).map_err(|err| unusable(err.to_string()))?;
        Ok(())
    }

    /// Stores `bytes` as `filename`, or a suffixed variant if that is taken.
    pub fn store(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        self.prepare()?;

        let mut staged = NamedTempFile::new_in(&self.path)?;
        staged.write_all(bytes)?;
        staged.as_file_mut().sync_all()?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let target = self.path.join(candidate_name(filename, attempt));
            match staged.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == ErrorKind::AlreadyExists => staged = err.file,
                Err(err) => return Err(PersistError::Io(err.error)),
            }
        }
        Err(PersistError::NameTaken(filename.to_string()))
    }
}

fn candidate_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{attempt}.{ext}"),
        None => format!("{filename}-{attempt}"),
    }
}
