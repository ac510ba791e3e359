//! Integration tests for treepack-core.
//!
//! These tests run whole packaging passes against real directory trees and
//! read the resulting archives back.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tempfile::TempDir;
use treepack_core::NoopProgress;
use treepack_core::PackConfig;
use treepack_core::PackError;
use treepack_core::Packer;
use treepack_core::creation::walker::collect_entries;
use treepack_core::creation::zip::pack;
use treepack_core::pack_tree;
use zip::CompressionMethod;
use zip::ZipArchive;

/// Reads an archive into a map of entry name to content.
fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        let previous = entries.insert(file.name().to_string(), content);
        assert!(previous.is_none(), "duplicate entry {}", file.name());
    }
    entries
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(String::from).collect()
}

/// Builds the layout of a typical mod release folder.
fn create_mod_tree(root: &Path) {
    let plugins = root.join("GameData/VesselAutoRenamer/Plugins");
    fs::create_dir_all(&plugins).unwrap();
    fs::write(plugins.join("VesselAutoRenamer.dll"), b"MZ\x90\x00binary").unwrap();
    fs::write(plugins.join("VesselAutoRenamer.pdb"), b"debug symbols").unwrap();
    fs::write(root.join("GameData/VesselAutoRenamer/README.md"), "# Readme\n").unwrap();
    fs::create_dir_all(root.join("GameData/VesselAutoRenamer/Localization")).unwrap();
    fs::write(
        root.join("GameData/VesselAutoRenamer/Localization/en-us.cfg"),
        "Localization { en-us { } }\n",
    )
    .unwrap();
}

#[test]
fn test_scenario_excluded_extension() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("b.pdb"), "b").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/c.txt"), "c").unwrap();

    let config = PackConfig::new(root).with_output_path(temp.path().join("out.zip"));
    let report = pack_tree(&config).unwrap();

    assert_eq!(report.files_added, 2);
    assert_eq!(archive_names(&config.output_path), ["a.txt", "sub/c.txt"]);
}

#[test]
fn test_scenario_empty_directory_has_no_entry() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("empty")).unwrap();
    fs::write(root.join("keep.txt"), "k").unwrap();

    let config = PackConfig::new(root);
    pack_tree(&config).unwrap();

    assert_eq!(archive_names(&config.output_path), ["keep.txt"]);
}

#[test]
fn test_scenario_empty_source_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Empty");
    fs::create_dir(&root).unwrap();

    let config = PackConfig::new(&root);
    let report = pack_tree(&config).unwrap();

    assert_eq!(report.files_added, 0);
    assert_eq!(report.bytes_read, 0);
    assert!(report.archive_size > 0);
    assert!(read_archive(&config.output_path).is_empty());
}

#[test]
fn test_scenario_file_vanishes_after_listing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("b.txt"), "b").unwrap();

    let config = PackConfig::new(&root).with_output_path(temp.path().join("out.zip"));
    let entries = collect_entries(&config).unwrap();
    assert_eq!(entries.len(), 2);

    fs::remove_file(root.join("b.txt")).unwrap();

    let err = pack(
        &config.output_path,
        entries.into_iter().map(Ok),
        &config,
        &mut NoopProgress,
    )
    .unwrap_err();

    match err {
        PackError::ReadFile { path, .. } => assert_eq!(path, root.join("b.txt")),
        other => panic!("expected ReadFile, got {other:?}"),
    }
}

#[test]
fn test_completeness_and_content() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("VesselAutoRenamer");
    create_mod_tree(&root);

    let config = PackConfig::new(&root).with_source_root(root.join("GameData"));
    let report = pack_tree(&config).unwrap();

    let entries = read_archive(&config.output_path);
    assert_eq!(report.files_added, entries.len());
    assert_eq!(
        entries.keys().map(String::as_str).collect::<Vec<_>>(),
        [
            "GameData/VesselAutoRenamer/Localization/en-us.cfg",
            "GameData/VesselAutoRenamer/Plugins/VesselAutoRenamer.dll",
            "GameData/VesselAutoRenamer/README.md",
        ]
    );
    for (name, content) in &entries {
        assert_eq!(content, &fs::read(root.join(name)).unwrap(), "content of {name}");
    }
}

#[test]
fn test_entries_are_deflated() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("big.txt"), "treepack ".repeat(4096)).unwrap();

    let config = PackConfig::new(root);
    let report = pack_tree(&config).unwrap();

    let mut archive = ZipArchive::new(File::open(&config.output_path).unwrap()).unwrap();
    let file = archive.by_name("big.txt").unwrap();
    assert_eq!(file.compression(), CompressionMethod::Deflated);
    assert!(file.compressed_size() < file.size());
    assert!(report.compression_percentage() > 50.0);
}

#[test]
fn test_excluded_directory_subtree_is_absent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("Backups/old/deeper")).unwrap();
    fs::write(root.join("Backups/old/deeper/save.sfs"), "save").unwrap();
    fs::write(root.join("Backups/top.sfs"), "save").unwrap();
    fs::write(root.join("craft.craft"), "craft").unwrap();

    let config = PackConfig::new(root)
        .with_output_path(temp.path().join("out.zip"))
        .with_exclude_patterns(vec!["Backups".into(), "*.pdb".into()]);
    pack_tree(&config).unwrap();

    assert_eq!(archive_names(&config.output_path), ["craft.craft"]);
}

#[test]
fn test_rerun_is_identical() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("VesselAutoRenamer");
    create_mod_tree(&root);

    let config = PackConfig::new(&root);
    pack_tree(&config).unwrap();
    let first = read_archive(&config.output_path);

    let report = pack_tree(&config).unwrap();
    let second = read_archive(&config.output_path);

    assert!(report.replaced_existing);
    assert_eq!(first, second);
    assert!(!second.contains_key("VesselAutoRenamer.zip"));
}

#[test]
fn test_stale_entries_do_not_survive() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Mod");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("old.txt"), "old").unwrap();
    fs::write(root.join("kept.txt"), "kept").unwrap();

    let config = PackConfig::new(&root);
    pack_tree(&config).unwrap();
    assert_eq!(archive_names(&config.output_path), ["kept.txt", "old.txt"]);

    fs::remove_file(root.join("old.txt")).unwrap();
    fs::write(root.join("new.txt"), "new").unwrap();
    pack_tree(&config).unwrap();

    assert_eq!(archive_names(&config.output_path), ["kept.txt", "new.txt"]);
}

#[test]
fn test_unrelated_file_at_output_is_replaced() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Mod");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("Mod.zip"), "not a zip at all").unwrap();

    let report = pack_tree(&PackConfig::new(&root)).unwrap();

    assert!(report.replaced_existing);
    assert_eq!(archive_names(&root.join("Mod.zip")), ["a.txt"]);
}

#[test]
fn test_names_use_forward_slashes() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("a/b/c")).unwrap();
    fs::write(root.join("a/b/c/deep.txt"), "deep").unwrap();

    let config = PackConfig::new(root);
    pack_tree(&config).unwrap();

    for name in archive_names(&config.output_path) {
        assert!(!name.contains('\\'), "backslash in {name}");
        assert!(!name.starts_with('/'), "absolute name {name}");
    }
    assert_eq!(archive_names(&config.output_path), ["a/b/c/deep.txt"]);
}

#[test]
fn test_output_with_parent_components_is_not_packaged() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Mod");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();

    let config = PackConfig::new(&root).with_output_path(root.join("sub/../Mod.zip"));
    pack_tree(&config).unwrap();
    let report = pack_tree(&config).unwrap();

    assert!(report.replaced_existing);
    assert!(report.warnings.is_empty());
    assert_eq!(archive_names(&root.join("Mod.zip")), ["a.txt"]);
}

#[test]
fn test_output_outside_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Mod");
    let dist = temp.path().join("dist");
    create_mod_tree(&root);
    fs::create_dir(&dist).unwrap();

    let report = Packer::new(&root)
        .source(root.join("GameData"))
        .output(dist.join("release.zip"))
        .pack()
        .unwrap();

    assert_eq!(report.output_path, dist.join("release.zip"));
    assert_eq!(report.files_added, 3);
    assert!(!root.join("Mod.zip").exists());
}

#[test]
fn test_source_outside_root_rejected() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Mod");
    let other = temp.path().join("Other");
    fs::create_dir(&root).unwrap();
    fs::create_dir(&other).unwrap();

    let err = Packer::new(&root).source(&other).pack().unwrap_err();

    assert!(matches!(err, PackError::SourceOutsideRoot { .. }));
    assert!(err.is_config_error());
    assert!(!root.join("Mod.zip").exists());
}

#[test]
fn test_custom_patterns_and_case_insensitive() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("Notes.TXT"), "n").unwrap();
    fs::write(root.join("data.cfg"), "d").unwrap();
    fs::write(root.join("symbols.pdb"), "s").unwrap();

    let config = PackConfig::new(root)
        .with_output_path(temp.path().join("out.zip"))
        .with_exclude_patterns(vec!["*.txt".into()])
        .with_case_sensitive(false);
    pack_tree(&config).unwrap();

    assert_eq!(archive_names(&config.output_path), ["data.cfg", "symbols.pdb"]);
}

#[test]
fn test_anchored_pattern_only_matches_at_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("build.log"), "top").unwrap();
    fs::write(root.join("nested/build.log"), "nested").unwrap();

    let config = PackConfig::new(root)
        .with_output_path(temp.path().join("out.zip"))
        .with_exclude_patterns(vec!["/build.log".into()]);
    pack_tree(&config).unwrap();

    assert_eq!(archive_names(&config.output_path), ["nested/build.log"]);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_aborts_run() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Mod");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    std::os::unix::fs::symlink(root.join("missing.txt"), root.join("z-link.txt")).unwrap();

    let err = pack_tree(&PackConfig::new(&root)).unwrap_err();

    assert!(matches!(err, PackError::Walk { .. }));
    assert!(err.is_io_error());
}
