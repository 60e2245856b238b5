use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use portal_core::ExportKind;
use portal_logging::portal_info;

use crate::engine::Clock;
use crate::persist::{ExportDir, PersistError};

/// `{kind}_{unix_millis}.csv`
pub fn export_filename(kind: ExportKind, at: DateTime<Utc>) -> String {
    format!("{}_{}.csv", kind.as_str(), at.timestamp_millis())
}

/// Saves downloaded CSV exports into the export directory.
pub struct ExportSaver {
    dir: ExportDir,
    clock: Clock,
}

impl ExportSaver {
    pub fn new(dir: PathBuf, clock: Clock) -> Self {
        Self {
            dir: ExportDir::new(dir),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn save(&self, kind: ExportKind, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        let filename = export_filename(kind, (self.clock)());
        let path = self.dir.store(&filename, bytes)?;
        portal_info!("Saved {} export ({} bytes) to {:?}", kind, bytes.len(), path);
        Ok(path)
    }
}
