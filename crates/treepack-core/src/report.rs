//! Progress reporting hooks.

use crate::types::RelativePath;

/// Callback trait for progress reporting while an archive is written.
///
/// The total number of entries is never known up front: the tree is walked
/// lazily while the archive is being written.
///
/// # Examples
///
/// ```
/// use treepack_core::ProgressCallback;
/// use treepack_core::RelativePath;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_entry_start(&mut self, path: &RelativePath, current: usize) {
///         println!("[{current}] {path}");
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &RelativePath) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called before an entry is written.
    ///
    /// # Arguments
    ///
    /// * `path` - Entry name inside the archive
    /// * `current` - Entry number (1-indexed)
    fn on_entry_start(&mut self, path: &RelativePath, current: usize);

    /// Called for each chunk of file data fed to the compressor.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called once an entry has been fully written.
    fn on_entry_complete(&mut self, path: &RelativePath);

    /// Called once after the archive has been finalized.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &RelativePath, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &RelativePath) {}

    fn on_complete(&mut self) {}
}
