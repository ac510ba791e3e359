//! Builder for packaging runs with a fluent API.

use std::path::Path;

use crate::NoopProgress;
use crate::ProgressCallback;
use crate::creation::config::PackConfig;
use crate::creation::report::PackReport;
use crate::creation::walker::FilteredWalker;
use crate::creation::walker::PackEntry;
use crate::error::Result;

/// Builder for packaging a directory tree into a ZIP archive.
///
/// # Examples
///
/// ```no_run
/// use treepack_core::Packer;
///
/// let report = Packer::new("/build/VesselAutoRenamer")
///     .source("/build/VesselAutoRenamer/GameData")
///     .exclude("*.mdb")
///     .compression_level(9)
///     .pack()?;
///
/// println!("Packaged {} files", report.files_added);
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Packer {
    config: PackConfig,
}

impl Packer {
    /// Creates a packer rooted at `packaging_root` with default settings.
    ///
    /// The source root defaults to the packaging root and the output to
    /// `<packaging_root>/<packaging_root name>.zip`.
    #[must_use]
    pub fn new<P: AsRef<Path>>(packaging_root: P) -> Self {
        Self {
            config: PackConfig::new(packaging_root),
        }
    }

    /// Sets the directory to walk.
    #[must_use]
    pub fn source<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.source_root = path.as_ref().to_path_buf();
        self
    }

    /// Sets the archive path.
    #[must_use]
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.output_path = path.as_ref().to_path_buf();
        self
    }

    /// Appends an exclusion pattern to the current set.
    ///
    /// # Examples
    ///
    /// ```
    /// use treepack_core::Packer;
    ///
    /// let packer = Packer::new("/build").exclude("*.log").exclude("Backups");
    /// assert_eq!(packer.settings().exclude_patterns, ["*.pdb", "*.log", "Backups"]);
    /// ```
    #[must_use]
    pub fn exclude<S: Into<String>>(mut self, pattern: S) -> Self {
        self.config.exclude_patterns.push(pattern.into());
        self
    }

    /// Replaces the exclusion patterns, dropping the defaults.
    #[must_use]
    pub fn exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether pattern matching is case-sensitive.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config.case_sensitive = case_sensitive;
        self
    }

    /// Sets whether symlinked directories are descended into.
    #[must_use]
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    /// Sets whether children are visited in file-name order.
    #[must_use]
    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.config.sort_entries = sort;
        self
    }

    /// Sets the compression level (1-9). Checked when the packer runs.
    #[must_use]
    pub fn compression_level(mut self, level: u8) -> Self {
        self.config.compression_level = level;
        self
    }

    /// Sets whether Unix permissions are recorded.
    #[must_use]
    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.config.preserve_permissions = preserve;
        self
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: PackConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration the packer will run with.
    #[must_use]
    pub fn settings(&self) -> &PackConfig {
        &self.config
    }

    /// Packages the tree.
    ///
    /// # Errors
    ///
    /// Returns configuration errors before touching the output, then any
    /// traversal, read or write error from the run.
    pub fn pack(&self) -> Result<PackReport> {
        self.pack_with_progress(&mut NoopProgress)
    }

    /// Packages the tree, reporting progress for every entry.
    pub fn pack_with_progress(&self, progress: &mut dyn ProgressCallback) -> Result<PackReport> {
        crate::api::pack_tree_with_progress(&self.config, progress)
    }

    /// Lists the entries a run would package without writing anything.
    ///
    /// An existing archive at the output path is left untouched and is
    /// never listed.
    pub fn dry_run(&self) -> Result<Vec<PackEntry>> {
        self.config.validate()?;
        FilteredWalker::new(&self.config)?
            .skip_path(&self.config.output_path)
            .walk()
            .collect()
    }
}
