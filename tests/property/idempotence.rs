//! Property-based idempotence over generated trees
//!
//! A second reconciliation of an untouched tree must be a pure no-op:
//! byte-identical manifest, identical timestamps everywhere, nothing added,
//! restored, or changed.

use proptest::prelude::*;
use proptest::test_runner::{Config, TestRunner};
use retime::manifest::Manifest;
use retime::reconcile::Reconciler;
use retime::times;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

const DIR_CHOICES: &[&str] = &["", "a", "a/b", "c"];

fn tree_strategy() -> impl Strategy<Value = Vec<(usize, u8, Vec<u8>, i64)>> {
    prop::collection::vec(
        (
            0..DIR_CHOICES.len(),
            0u8..4u8,
            prop::collection::vec(any::<u8>(), 0..64),
            1_500_000_000i64..1_700_000_000i64,
        ),
        0..10,
    )
}

/// Every path under `root` with its observed mtime, in sorted order.
fn snapshot_mtimes(root: &Path) -> Vec<(PathBuf, i64)> {
    let mut snapshot: Vec<(PathBuf, i64)> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let meta = fs::symlink_metadata(entry.path()).unwrap();
            (entry.path().to_path_buf(), times::mtime_seconds(&meta))
        })
        .collect();
    snapshot.sort();
    snapshot
}

#[test]
fn test_second_run_never_moves_anything() {
    let mut runner = TestRunner::new(Config {
        cases: 16,
        ..Config::default()
    });

    runner
        .run(&tree_strategy(), |files| {
            let temp = TempDir::new().unwrap();
            let root = temp.path().join("tree");
            let manifest_path = temp.path().join("manifest.json");
            Manifest::default().save(&manifest_path).unwrap();

            // Materialize all candidate directories so empty ones exercise
            // the floor, then the generated files.
            for dir in DIR_CHOICES {
                fs::create_dir_all(root.join(dir)).unwrap();
            }
            for (dir, name, content, mtime) in &files {
                let path = root.join(DIR_CHOICES[*dir]).join(format!("f{}", name));
                fs::write(&path, content).unwrap();
                times::set_seconds(&path, *mtime).unwrap();
            }

            Reconciler::new(root.clone(), manifest_path.clone())
                .run()
                .unwrap();

            let manifest_after_first = fs::read(&manifest_path).unwrap();
            let mtimes_after_first = snapshot_mtimes(&root);

            let second = Reconciler::new(root.clone(), manifest_path.clone())
                .run()
                .unwrap();

            assert_eq!(second.files_added, 0);
            assert_eq!(second.files_restored, 0);
            assert_eq!(second.files_changed, 0);
            assert_eq!(fs::read(&manifest_path).unwrap(), manifest_after_first);
            assert_eq!(snapshot_mtimes(&root), mtimes_after_first);
            Ok(())
        })
        .unwrap();
}
