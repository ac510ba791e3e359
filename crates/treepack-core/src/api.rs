//! High-level public API for packaging a directory tree.

use tracing::info;

use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::creation::PackConfig;
use crate::creation::PackReport;
use crate::creation::walker::FilteredWalker;
use crate::creation::zip;

/// Packages the tree described by `config` into a ZIP archive.
///
/// The configuration is validated first, so configuration errors never
/// touch an existing archive. The output file itself is kept out of the
/// walk.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid (bad level, bad pattern, source outside
///   the packaging root, missing source)
/// - The old archive cannot be deleted or the new one cannot be created
/// - A directory cannot be listed or a file cannot be read
/// - Writing or finalizing the archive fails
///
/// # Examples
///
/// ```no_run
/// use treepack_core::PackConfig;
/// use treepack_core::pack_tree;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PackConfig::new("/build/VesselAutoRenamer")
///     .with_source_root("/build/VesselAutoRenamer/GameData");
/// let report = pack_tree(&config)?;
/// println!("Packaged {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn pack_tree(config: &PackConfig) -> Result<PackReport> {
    pack_tree_with_progress(config, &mut NoopProgress)
}

/// Packages the tree described by `config`, reporting progress per entry.
///
/// # Errors
///
/// Same as [`pack_tree`].
pub fn pack_tree_with_progress(
    config: &PackConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<PackReport> {
    config.validate()?;

    let walker = FilteredWalker::new(config)?.skip_path(&config.output_path);
    info!(
        source = %config.source_root.display(),
        root = %config.packaging_root.display(),
        patterns = ?config.exclude_patterns,
        "packaging tree"
    );

    zip::pack(&config.output_path, walker.walk(), config, progress)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::PackError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pack_tree_skips_own_output() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Mod");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let config = PackConfig::new(&root);
        let report = pack_tree(&config).unwrap();
        assert_eq!(report.files_added, 1);

        let report = pack_tree(&config).unwrap();
        assert_eq!(report.files_added, 1);
        assert!(report.replaced_existing);
        assert_eq!(report.output_path, root.join("Mod.zip"));
    }

    #[test]
    fn test_pack_tree_skips_output_given_with_parent_components() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Mod");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let config = PackConfig::new(&root).with_output_path(root.join("sub/../Mod.zip"));
        let report = pack_tree(&config).unwrap();

        assert_eq!(report.files_added, 1);
        assert!(!report.has_warnings());
        assert!(root.join("Mod.zip").is_file());
    }

    #[test]
    fn test_pack_tree_validates_before_writing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("archive.zip"), "keep me").unwrap();

        let config = PackConfig::new(root)
            .with_output_path(root.join("archive.zip"))
            .with_exclude_patterns(vec!["[".into(), String::new()]);

        let err = pack_tree(&config).unwrap_err();
        assert!(matches!(err, PackError::InvalidPattern { .. }));
        assert_eq!(fs::read_to_string(root.join("archive.zip")).unwrap(), "keep me");
    }

    #[test]
    fn test_pack_tree_missing_source() {
        let temp = TempDir::new().unwrap();
        let config = PackConfig::new(temp.path()).with_source_root(temp.path().join("GameData"));

        let err = pack_tree(&config).unwrap_err();
        assert!(matches!(err, PackError::SourceNotFound { .. }));
        assert!(!config.output_path.exists());
    }
}
