//! Directory tree walking with exclusion filtering.
//!
//! The walker yields regular files lazily, one per `next()` call, so the
//! archive writer can read and compress each file before the next one is
//! discovered. Excluded directories are pruned before descent.

use crate::PackError;
use crate::Result;
use crate::creation::config::PackConfig;
use crate::creation::config::normalize_path;
use crate::creation::filters::ExcludeSet;
use crate::types::RelativePath;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use walkdir::DirEntry;
use walkdir::WalkDir;

/// Walks the source root, yielding every regular file not excluded by the
/// configured patterns.
///
/// This walker handles:
/// - Pattern-based exclusion on paths relative to the packaging root
/// - Pruning of excluded directories (their subtree is never listed)
/// - Symlink policy (see [`PackConfig::follow_symlinks`])
/// - Deterministic per-directory ordering when `sort_entries` is set
///
/// # Examples
///
/// ```no_run
/// use treepack_core::PackConfig;
/// use treepack_core::creation::walker::FilteredWalker;
///
/// let config = PackConfig::new("/build/MyMod").with_source_root("/build/MyMod/GameData");
/// let walker = FilteredWalker::new(&config)?;
///
/// for entry in walker.walk() {
///     println!("{}", entry?.relative);
/// }
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[derive(Debug)]
pub struct FilteredWalker<'a> {
    config: &'a PackConfig,
    excludes: ExcludeSet,
    skip_paths: Vec<PathBuf>,
}

impl<'a> FilteredWalker<'a> {
    /// Creates a walker for `config`, compiling its exclusion patterns.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidPattern` if a pattern cannot be compiled.
    pub fn new(config: &'a PackConfig) -> Result<Self> {
        Ok(Self {
            config,
            excludes: config.exclude_set()?,
            skip_paths: Vec::new(),
        })
    }

    /// Never yields `path`, even if it lies under the source root.
    ///
    /// Used to keep the archive being written out of its own contents.
    #[must_use]
    pub fn skip_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.skip_paths.push(normalize_path(path.as_ref()));
        self
    }

    /// Returns a lazy iterator over the files to package.
    ///
    /// Directories are traversed but never yielded. Any error listing a
    /// directory or reading metadata is yielded as `Err`; callers are
    /// expected to stop at the first one.
    pub fn walk(&self) -> impl Iterator<Item = Result<PackEntry>> + '_ {
        let mut walker = WalkDir::new(&self.config.source_root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks);
        if self.config.sort_entries {
            walker = walker.sort_by_file_name();
        }

        walker
            .into_iter()
            .filter_entry(move |entry| self.keep(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.build_entry(&entry).transpose(),
                Err(e) => Some(Err(self.walk_error(e))),
            })
    }

    /// Decides whether an entry is visited at all. Returning `false` for a
    /// directory prunes its subtree.
    fn keep(&self, entry: &DirEntry) -> bool {
        let path = entry.path();

        if !self.skip_paths.is_empty()
            && self.skip_paths.contains(&normalize_path(path))
        {
            debug!(path = %path.display(), "skipping output archive");
            return false;
        }

        // Paths that cannot be made relative are kept so that `build_entry`
        // reports the error instead of silently dropping them.
        let Ok(relative) = RelativePath::from_root(path, &self.config.packaging_root) else {
            return true;
        };

        if let Some(pattern) = self.excludes.first_match(&relative) {
            debug!(path = %relative, pattern, "excluded");
            return false;
        }

        true
    }

    /// Builds a `PackEntry` from a `walkdir::DirEntry`.
    ///
    /// Returns `Ok(None)` for entries that are traversed or skipped rather
    /// than packaged.
    fn build_entry(&self, entry: &DirEntry) -> Result<Option<PackEntry>> {
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return Ok(None);
        }

        let metadata = if file_type.is_symlink() {
            // Only reached when not following links: inspect the target.
            let target = std::fs::metadata(path).map_err(|source| PackError::Walk {
                path: path.to_path_buf(),
                source,
            })?;
            if target.is_dir() {
                debug!(path = %path.display(), "skipping symlinked directory");
                return Ok(None);
            }
            target
        } else {
            entry.metadata().map_err(|e| self.walk_error(e))?
        };

        if !metadata.is_file() {
            debug!(path = %path.display(), "skipping special file");
            return Ok(None);
        }

        let relative = RelativePath::from_root(path, &self.config.packaging_root)?;

        Ok(Some(PackEntry {
            path: path.to_path_buf(),
            relative,
            size: metadata.len(),
        }))
    }

    fn walk_error(&self, err: walkdir::Error) -> PackError {
        let path = err
            .path()
            .map_or_else(|| self.config.source_root.clone(), Path::to_path_buf);
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other(message));
        PackError::Walk { path, source }
    }
}

/// A regular file selected for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    /// Full filesystem path as discovered by the walk.
    pub path: PathBuf,

    /// Path relative to the packaging root; also the archive entry name.
    pub relative: RelativePath,

    /// Size in bytes at the time the entry was listed.
    pub size: u64,
}

/// Collects every entry the walker would yield.
///
/// The packing pipeline never calls this; it exists for dry runs and
/// inspection, where holding the whole list is acceptable.
///
/// # Errors
///
/// Returns the first pattern, traversal or metadata error.
pub fn collect_entries(config: &PackConfig) -> Result<Vec<PackEntry>> {
    FilteredWalker::new(config)?.walk().collect()
}
