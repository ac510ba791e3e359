//! Configuration for packaging runs.

use crate::PackError;
use crate::Result;
use crate::creation::filters::ExcludeSet;
use crate::creation::filters::host_case_sensitive;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Exclusion patterns used when none are configured explicitly.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.pdb"];

/// Archive file name used when the packaging root has no usable name.
pub const FALLBACK_ARCHIVE_NAME: &str = "archive";

/// Configuration for one packaging run.
///
/// All values are fixed for the lifetime of a run. Paths should be absolute;
/// the CLI resolves relative arguments before building the config.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use treepack_core::PackConfig;
///
/// let config = PackConfig::new("/build/VesselAutoRenamer")
///     .with_source_root("/build/VesselAutoRenamer/GameData")
///     .with_compression_level(9);
///
/// assert_eq!(
///     config.output_path,
///     Path::new("/build/VesselAutoRenamer/VesselAutoRenamer.zip")
/// );
/// assert_eq!(config.exclude_patterns, vec!["*.pdb".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Base for relative paths and default location of the archive.
    pub packaging_root: PathBuf,

    /// Directory tree to walk. Must be `packaging_root` or beneath it.
    ///
    /// Default: `packaging_root`.
    pub source_root: PathBuf,

    /// Where the archive is written. Any existing file here is deleted.
    ///
    /// Default: `<packaging_root>/<packaging_root name>.zip`.
    pub output_path: PathBuf,

    /// Glob patterns tested against each entry's relative path.
    ///
    /// Default: `["*.pdb"]`.
    pub exclude_patterns: Vec<String>,

    /// Whether pattern matching is case-sensitive.
    ///
    /// Default: `false` on Windows, `true` elsewhere.
    pub case_sensitive: bool,

    /// Descend into symlinked directories.
    ///
    /// Default: `false` (symlinked directories are skipped; symlinked files
    /// are packaged with their target's contents).
    pub follow_symlinks: bool,

    /// Visit each directory's children in file-name order.
    ///
    /// Default: `true`, which makes archives reproducible across hosts.
    pub sort_entries: bool,

    /// Deflate compression level (1-9).
    ///
    /// Default: `6`.
    pub compression_level: u8,

    /// Record Unix file modes in the archive.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl PackConfig {
    /// Creates a config rooted at `packaging_root` with default settings.
    #[must_use]
    pub fn new<P: AsRef<Path>>(packaging_root: P) -> Self {
        let packaging_root = packaging_root.as_ref().to_path_buf();
        let output_path = Self::default_output_path(&packaging_root, None);
        Self {
            source_root: packaging_root.clone(),
            packaging_root,
            output_path,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            case_sensitive: host_case_sensitive(),
            follow_symlinks: false,
            sort_entries: true,
            compression_level: 6,
            preserve_permissions: true,
        }
    }

    /// Computes `<root>/<name>.zip`.
    ///
    /// When `name` is `None` the root directory's own name is used, falling
    /// back to `archive` for roots without one (such as `/`).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use treepack_core::PackConfig;
    ///
    /// assert_eq!(
    ///     PackConfig::default_output_path(Path::new("/b/MyMod"), None),
    ///     Path::new("/b/MyMod/MyMod.zip")
    /// );
    /// assert_eq!(
    ///     PackConfig::default_output_path(Path::new("/b/MyMod"), Some("Release")),
    ///     Path::new("/b/MyMod/Release.zip")
    /// );
    /// ```
    #[must_use]
    pub fn default_output_path(root: &Path, name: Option<&str>) -> PathBuf {
        let root = normalize_path(root);
        let name = name
            .map(ToString::to_string)
            .or_else(|| {
                root.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| FALLBACK_ARCHIVE_NAME.to_string());
        root.join(format!("{name}.zip"))
    }

    /// Sets the source root.
    #[must_use]
    pub fn with_source_root<P: AsRef<Path>>(mut self, source_root: P) -> Self {
        self.source_root = source_root.as_ref().to_path_buf();
        self
    }

    /// Sets the output archive path.
    #[must_use]
    pub fn with_output_path<P: AsRef<Path>>(mut self, output_path: P) -> Self {
        self.output_path = output_path.as_ref().to_path_buf();
        self
    }

    /// Replaces the exclusion patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Sets case sensitivity for pattern matching.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Sets whether to descend into symlinked directories.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets whether children are visited in file-name order.
    #[must_use]
    pub fn with_sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the level is not in 1-9. Use `validate()` for a
    /// non-panicking check on configs built by field assignment.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = level;
        self
    }

    /// Sets whether Unix permissions are recorded.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Compiles the exclusion patterns.
    pub fn exclude_set(&self) -> Result<ExcludeSet> {
        ExcludeSet::new(&self.exclude_patterns, self.case_sensitive)
    }

    /// Validates the configuration against the filesystem.
    ///
    /// # Errors
    ///
    /// - `PackError::InvalidCompressionLevel` for a level outside 1-9
    /// - `PackError::InvalidPattern` for an uncompilable pattern
    /// - `PackError::SourceNotFound` / `SourceNotDirectory` for a bad source
    /// - `PackError::SourceOutsideRoot` if the source is not under the
    ///   packaging root
    /// - `PackError::OutputIsDirectory` if the output path is a directory
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.compression_level) {
            return Err(PackError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }

        self.exclude_set()?;

        if !self.source_root.starts_with(&self.packaging_root) {
            return Err(PackError::SourceOutsideRoot {
                source_root: self.source_root.clone(),
                packaging_root: self.packaging_root.clone(),
            });
        }

        match std::fs::metadata(&self.source_root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(PackError::SourceNotDirectory {
                    path: self.source_root.clone(),
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PackError::SourceNotFound {
                    path: self.source_root.clone(),
                });
            }
            Err(source) => {
                return Err(PackError::Walk {
                    path: self.source_root.clone(),
                    source,
                });
            }
        }

        if self.output_path.is_dir() {
            return Err(PackError::OutputIsDirectory {
                path: self.output_path.clone(),
            });
        }

        Ok(())
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root; leading `..` of a relative path is
/// kept. Symlinks are not resolved, so `link/..` becomes the directory that
/// holds `link`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use treepack_core::creation::config::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("/b/Mod/sub/../Mod.zip")), Path::new("/b/Mod/Mod.zip"));
/// assert_eq!(normalize_path(Path::new("/b/Mod/sub/..")), Path::new("/b/Mod"));
/// assert_eq!(normalize_path(Path::new("../x/./y")), Path::new("../x/y"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => {
                    normalized.push("..");
                }
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
