//! Property-based tests for path normalization and exclusion matching.
//!
//! These tests use proptest to generate arbitrary names and trees and check
//! that matching and packaging invariants hold across them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::TempDir;
use treepack_core::PackConfig;
use treepack_core::RelativePath;
use treepack_core::creation::filters::ExcludePattern;
use treepack_core::creation::filters::ExcludeSet;
use treepack_core::pack_tree;
use zip::ZipArchive;

fn component() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,12}"
}

proptest! {
    /// Either separator normalizes to the same forward-slash path.
    #[test]
    fn prop_separators_normalize(components in prop::collection::vec(component(), 1..6)) {
        let forward = RelativePath::new(&components.join("/")).unwrap();
        let backward = RelativePath::new(&components.join("\\")).unwrap();

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.as_str(), components.join("/"));
        prop_assert_eq!(forward.depth(), components.len());
        prop_assert_eq!(forward.file_name(), components.last().unwrap().as_str());
    }

    /// A path built by joining onto a root comes back unchanged.
    #[test]
    fn prop_from_root_matches_new(components in prop::collection::vec(component(), 1..6)) {
        let root = PathBuf::from("/packaging/root");
        let full = components.iter().fold(root.clone(), |acc, c| acc.join(c));

        let from_root = RelativePath::from_root(&full, &root).unwrap();
        prop_assert_eq!(from_root.as_str(), components.join("/"));
        prop_assert_eq!(from_root.resolve(&root), full);
    }

    /// Any `..` component is rejected.
    #[test]
    fn prop_parent_component_rejected(
        prefix in prop::collection::vec(component(), 0..4),
        suffix in prop::collection::vec(component(), 0..4),
    ) {
        let mut parts = prefix;
        parts.push("..".to_string());
        parts.extend(suffix);
        prop_assert!(RelativePath::new(&parts.join("/")).is_err());
    }

    /// A literal file-name pattern matches that name at any depth.
    #[test]
    fn prop_literal_name_matches_at_any_depth(
        dirs in prop::collection::vec(component(), 0..5),
        name in component(),
    ) {
        let pattern = ExcludePattern::new(&name, true).unwrap();
        let mut parts = dirs;
        parts.push(name);
        let path = RelativePath::new(&parts.join("/")).unwrap();
        prop_assert!(pattern.matches(&path));
    }

    /// `*.ext` matches exactly the names ending in `.ext`.
    #[test]
    fn prop_extension_pattern(
        dirs in prop::collection::vec(component(), 0..4),
        stem in component(),
        ext in "[a-z]{1,4}",
        other in "[a-z]{1,4}",
    ) {
        let pattern = ExcludePattern::new(&format!("*.{ext}"), true).unwrap();
        let prefix = if dirs.is_empty() { String::new() } else { format!("{}/", dirs.join("/")) };

        let hit = RelativePath::new(&format!("{prefix}{stem}.{ext}")).unwrap();
        prop_assert!(pattern.matches(&hit));

        let miss = RelativePath::new(&format!("{prefix}{stem}.{ext}.{other}")).unwrap();
        prop_assert_eq!(pattern.matches(&miss), other == ext);
    }

    /// An anchored pattern matches its own path and nothing deeper.
    #[test]
    fn prop_anchored_pattern_is_exact(
        components in prop::collection::vec(component(), 1..5),
        extra in component(),
    ) {
        let joined = components.join("/");
        let pattern = ExcludePattern::new(&format!("/{joined}"), true).unwrap();

        prop_assert!(pattern.matches(&RelativePath::new(&joined).unwrap()));
        let deeper = format!("{extra}/{joined}");
        prop_assert!(!pattern.matches(&RelativePath::new(&deeper).unwrap()));
    }

    /// Case-insensitive matching ignores ASCII case on both sides.
    #[test]
    fn prop_case_insensitive(name in "[a-z]{1,10}", ext in "[a-z]{1,4}") {
        let pattern = ExcludePattern::new(&format!("*.{}", ext.to_uppercase()), false).unwrap();
        let path = RelativePath::new(&format!("{name}.{ext}")).unwrap();
        prop_assert!(pattern.matches(&path));
    }

    /// An empty pattern set never excludes anything.
    #[test]
    fn prop_empty_set_matches_nothing(components in prop::collection::vec(component(), 1..6)) {
        let set = ExcludeSet::new::<&str>(&[], true).unwrap();
        prop_assert!(!set.matches(&RelativePath::new(&components.join("/")).unwrap()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// The archive holds exactly the files not excluded by `*.pdb`.
    #[test]
    fn prop_archive_holds_exactly_unexcluded_files(
        files in prop::collection::btree_set(
            (prop::collection::vec("[a-d]{1,3}", 0..3), "[a-z]{1,6}", prop::sample::select(vec!["txt", "pdb", "cfg"])),
            0..12,
        )
    ) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir(&root).unwrap();
        let output = temp.path().join("out.zip");

        let mut expected = BTreeSet::new();
        for (dirs, stem, ext) in &files {
            // Directory names use a disjoint alphabet from stems with
            // extensions, so a file path never collides with a directory.
            let dir = dirs.iter().fold(root.clone(), |acc, d| acc.join(d));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("{stem}.{ext}")), stem).unwrap();

            if *ext != "pdb" {
                let mut parts = dirs.clone();
                parts.push(format!("{stem}.{ext}"));
                expected.insert(parts.join("/"));
            }
        }

        let config = PackConfig::new(&root).with_output_path(&output);
        let report = pack_tree(&config).unwrap();

        let archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let names: BTreeSet<String> = archive.file_names().map(String::from).collect();
        prop_assert_eq!(report.files_added, expected.len());
        prop_assert_eq!(names, expected);
    }
}
