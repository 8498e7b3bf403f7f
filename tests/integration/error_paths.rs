//! Failure behavior: every error aborts before the manifest save

use super::test_utils::Fixture;
use retime::error::{ManifestError, ReconcileError};
use retime::reconcile::Reconciler;
use std::fs;
use tempfile::TempDir;

/// Without a readable prior manifest the run does nothing at all.
#[test]
fn test_missing_manifest_aborts_run() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("tree");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("file.txt"), "content").unwrap();
    let manifest_path = temp.path().join("absent.json");

    let err = Reconciler::new(root, manifest_path.clone())
        .run()
        .unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::Manifest(ManifestError::Unreadable { .. })
    ));
    assert!(!manifest_path.exists());
}

/// A malformed manifest aborts the run and the broken file is left exactly
/// as it was for inspection.
#[test]
fn test_malformed_manifest_is_left_untouched() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("tree");
    fs::create_dir(&root).unwrap();
    let manifest_path = temp.path().join("manifest.json");
    let garbage = b"{\"files\": \"not a map\"}".to_vec();
    fs::write(&manifest_path, &garbage).unwrap();

    let err = Reconciler::new(root, manifest_path.clone())
        .run()
        .unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::Manifest(ManifestError::Malformed { .. })
    ));
    assert_eq!(fs::read(&manifest_path).unwrap(), garbage);
}

/// A root that cannot be walked fails the run and the prior manifest
/// survives byte for byte.
#[test]
fn test_unwalkable_root_preserves_prior_manifest() {
    let fixture = Fixture::new();
    fixture.write_file("file.txt", "content", 1_600_000_000);
    fixture.run();
    let before = fixture.manifest_bytes();

    let gone = fixture.root.join("does-not-exist");
    let err = Reconciler::new(gone, fixture.manifest_path.clone())
        .run()
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Walk(_)));
    assert_eq!(fixture.manifest_bytes(), before);
}
