//! Packaging run reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of a successful packaging run.
///
/// # Examples
///
/// ```
/// use treepack_core::PackReport;
///
/// let mut report = PackReport::default();
/// report.files_added = 10;
/// report.bytes_read = 1024;
/// report.archive_size = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// assert_eq!(report.compression_percentage(), 50.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    /// Where the archive was written.
    pub output_path: PathBuf,

    /// Number of files added to the archive.
    pub files_added: usize,

    /// Total bytes read from source files (uncompressed payload).
    pub bytes_read: u64,

    /// Size of the finalized archive on disk.
    pub archive_size: u64,

    /// Whether an archive from a previous run was deleted first.
    pub replaced_existing: bool,

    /// Duration of the run.
    pub duration: Duration,

    /// Non-fatal oddities noticed during the run.
    pub warnings: Vec<String>,
}

impl PackReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (bytes read / archive size).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.archive_size as f64
    }

    /// Returns the percentage of space saved, clamped at 0.
    ///
    /// Small inputs usually grow once ZIP headers are added, which reports
    /// as 0.0 rather than a negative value.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        let saved = self.bytes_read.saturating_sub(self.archive_size);
        (saved as f64 / self.bytes_read as f64) * 100.0
    }
}
