use photoscan::scanner::scan;
use photoscan::snapshot::{snapshot_file_name, snapshot_path, DirEntry, SnapshotError};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_scan_save_load_roundtrip() {
    let photos = tempdir().unwrap();
    let store = tempdir().unwrap();
    fs::create_dir(photos.path().join("2023")).unwrap();
    fs::write(photos.path().join("a.jpg"), b"a").unwrap();
    fs::write(photos.path().join("2023/b.jpg"), b"b").unwrap();

    let tree = scan(photos.path()).unwrap();
    let path = snapshot_path(store.path(), photos.path());
    tree.save(&path).unwrap();

    assert_eq!(DirEntry::load(&path).unwrap(), tree);
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        snapshot_file_name(photos.path())
    );
}

#[test]
fn test_saved_file_layout() {
    let photos = tempdir().unwrap();
    let store = tempdir().unwrap();
    fs::write(photos.path().join("a.jpg"), b"").unwrap();

    let tree = scan(photos.path()).unwrap();
    let path = store.path().join("out.json");
    tree.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let name_pos = text.find("\"Name\"").unwrap();
    let files_pos = text.find("\"Files\"").unwrap();
    assert!(name_pos < files_pos);
    assert!(!text.contains("\"Dirs\""));
    assert!(text.contains("d41d8cd98f00b204e9800998ecf8427e"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn test_load_snapshot_written_by_hand() {
    let store = tempdir().unwrap();
    let path = store.path().join("home_me_pics.json");
    fs::write(
        &path,
        r#"{
  "Name": "/home/me/pics",
  "Dirs": null,
  "Files": [
    { "Name": "/home/me/pics/a.jpg", "Hash": "9e107d9d372bb6826bd81d3542a419d6" }
  ]
}"#,
    )
    .unwrap();

    let tree = DirEntry::load(&path).unwrap();

    assert_eq!(tree.name, Path::new("/home/me/pics"));
    assert!(tree.dirs.is_empty());
    assert_eq!(tree.files[0].hash, "9e107d9d372bb6826bd81d3542a419d6");
}

#[test]
fn test_load_rejects_bad_digest() {
    let store = tempdir().unwrap();
    let path = store.path().join("bad.json");
    fs::write(
        &path,
        r#"{"Name": "/p", "Files": [{"Name": "/p/a.jpg", "Hash": "xyz"}]}"#,
    )
    .unwrap();

    assert!(matches!(
        DirEntry::load(&path),
        Err(SnapshotError::InvalidDigest { .. })
    ));
}

#[test]
fn test_load_truncated_file() {
    let store = tempdir().unwrap();
    let path = store.path().join("cut.json");
    fs::write(&path, r#"{"Name": "/p", "Files": ["#).unwrap();

    assert!(matches!(
        DirEntry::load(&path),
        Err(SnapshotError::Parse { .. })
    ));
}

#[test]
fn test_snapshot_names_for_distinct_roots_differ() {
    let a = snapshot_file_name(Path::new("/photos/2023"));
    let b = snapshot_file_name(Path::new("/photos/2024"));
    assert_ne!(a, b);
    assert_eq!(a, "photos_2023.json");
}
