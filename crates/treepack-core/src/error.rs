//! Error types for packaging operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while walking a tree or writing an archive.
///
/// Every variant is fatal to the run that produced it. A partially written
/// archive left behind by a failed run must not be trusted.
#[derive(Error, Debug)]
pub enum PackError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Listing a directory or reading entry metadata failed during traversal.
    #[error("cannot walk {}: {source}", path.display())]
    Walk {
        /// Path whose listing or metadata could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file could not be opened or read while being packaged.
    #[error("cannot read {}: {source}", path.display())]
    ReadFile {
        /// The file being packaged.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An existing archive at the output path could not be deleted.
    #[error("cannot remove existing output {}: {source}", path.display())]
    RemoveOutput {
        /// The output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The output archive could not be created.
    #[error("cannot create output {}: {source}", path.display())]
    CreateOutput {
        /// The output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file appeared at the output path between deletion and creation.
    #[error("output already exists: {}", path.display())]
    OutputExists {
        /// The output path.
        path: PathBuf,
    },

    /// The output path names a directory.
    #[error("output path is a directory: {}", path.display())]
    OutputIsDirectory {
        /// The output path.
        path: PathBuf,
    },

    /// Source root does not exist.
    #[error("source not found: {}", path.display())]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// Source root exists but is not a directory.
    #[error("source is not a directory: {}", path.display())]
    SourceNotDirectory {
        /// The source path.
        path: PathBuf,
    },

    /// Source root is not the packaging root or one of its descendants.
    #[error(
        "source {} is not under packaging root {}",
        source_root.display(),
        packaging_root.display()
    )]
    SourceOutsideRoot {
        /// Configured source root.
        source_root: PathBuf,
        /// Configured packaging root.
        packaging_root: PathBuf,
    },

    /// A walked path does not lie under the packaging root.
    #[error("path {} is not under root {}", path.display(), root.display())]
    OutsideRoot {
        /// The offending path.
        path: PathBuf,
        /// The packaging root.
        root: PathBuf,
    },

    /// A path component is not valid UTF-8 and cannot become an entry name.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// A relative path failed validation.
    #[error("invalid relative path '{path}': {reason}")]
    InvalidRelativePath {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An exclusion pattern could not be compiled.
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// The ZIP writer reported an error other than I/O.
    #[error("ZIP error: {0}")]
    Zip(#[source] zip::result::ZipError),
}

impl PackError {
    /// Returns `true` if this error comes from the filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use treepack_core::PackError;
    ///
    /// let err = PackError::ReadFile {
    ///     path: PathBuf::from("a.txt"),
    ///     source: std::io::Error::other("gone"),
    /// };
    /// assert!(err.is_io_error());
    ///
    /// let err = PackError::InvalidCompressionLevel { level: 0 };
    /// assert!(!err.is_io_error());
    /// ```
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::Walk { .. }
                | Self::ReadFile { .. }
                | Self::RemoveOutput { .. }
                | Self::CreateOutput { .. }
        )
    }

    /// Returns `true` if this error was caused by invalid configuration and
    /// was raised before any output was touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use treepack_core::PackError;
    ///
    /// let err = PackError::InvalidPattern {
    ///     pattern: String::new(),
    ///     reason: "empty pattern",
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. }
                | Self::SourceNotDirectory { .. }
                | Self::SourceOutsideRoot { .. }
                | Self::OutputIsDirectory { .. }
                | Self::InvalidPattern { .. }
                | Self::InvalidCompressionLevel { .. }
        )
    }

    /// Returns the filesystem path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Walk { path, .. }
            | Self::ReadFile { path, .. }
            | Self::RemoveOutput { path, .. }
            | Self::CreateOutput { path, .. }
            | Self::OutputExists { path }
            | Self::OutputIsDirectory { path }
            | Self::SourceNotFound { path }
            | Self::SourceNotDirectory { path }
            | Self::OutsideRoot { path, .. }
            | Self::NonUtf8Path { path } => Some(path),
            Self::SourceOutsideRoot { source_root, .. } => Some(source_root),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for PackError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Zip(other),
        }
    }
}
