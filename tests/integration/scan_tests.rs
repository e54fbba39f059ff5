use md5::{Digest, Md5};
use photoscan::scanner::{scan, ScanConfig, ScanError, Scanner};
use photoscan::scanner::{FileDigest, Hasher, MediaFilter};
use photoscan::snapshot::DirEntry;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

fn reference_md5(path: &Path) -> String {
    format!("{:x}", Md5::digest(fs::read(path).unwrap()))
}

fn all_files(tree: &DirEntry) -> Vec<PathBuf> {
    tree.files_depth_first().map(|f| f.name.clone()).collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let tree = scan(dir.path()).unwrap();

    assert_eq!(tree.name, dir.path());
    assert!(tree.is_empty());
    assert_eq!(tree.file_count(), 0);
}

#[test]
fn test_scan_hashes_match_reference_digest() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"first photo").unwrap();
    fs::write(dir.path().join("b.mp4"), vec![7u8; 200_000]).unwrap();
    fs::write(dir.path().join("c.PNG"), b"").unwrap();

    let tree = scan(dir.path()).unwrap();

    assert_eq!(tree.files.len(), 3);
    for file in &tree.files {
        assert_eq!(file.hash, reference_md5(&file.name));
        assert!(file.name.starts_with(dir.path()));
    }
}

#[test]
fn test_scan_only_media_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("photo.heic"), b"x").unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    fs::write(dir.path().join("Makefile"), b"x").unwrap();
    fs::write(dir.path().join("clip.3gp"), b"x").unwrap();

    let tree = scan(dir.path()).unwrap();

    assert_eq!(
        all_files(&tree),
        [dir.path().join("clip.3gp"), dir.path().join("photo.heic")]
    );
}

#[test]
fn test_scan_nested_sorted_and_pruned() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("b/inner")).unwrap();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("empty/deeper")).unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("z.jpg"), b"z").unwrap();
    fs::write(root.join("m.jpg"), b"m").unwrap();
    fs::write(root.join("b/inner/x.gif"), b"x").unwrap();
    fs::write(root.join("a/y.webm"), b"y").unwrap();
    fs::write(root.join("docs/readme.md"), b"r").unwrap();

    let tree = scan(root).unwrap();

    assert!(tree.is_sorted());
    let dirs: Vec<_> = tree.dirs.iter().map(|d| d.name.clone()).collect();
    assert_eq!(dirs, [root.join("a"), root.join("b")]);
    assert_eq!(
        all_files(&tree),
        [
            root.join("m.jpg"),
            root.join("z.jpg"),
            root.join("a/y.webm"),
            root.join("b/inner/x.gif"),
        ]
    );
}

#[test]
fn test_scan_skips_hidden_everywhere() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::create_dir_all(root.join("album/.thumbs")).unwrap();
    fs::write(root.join(".cache/a.jpg"), b"a").unwrap();
    fs::write(root.join("album/.b.jpg"), b"b").unwrap();
    fs::write(root.join("album/.thumbs/c.jpg"), b"c").unwrap();
    fs::write(root.join("album/d.jpg"), b"d").unwrap();

    let tree = scan(root).unwrap();

    assert_eq!(all_files(&tree), [root.join("album/d.jpg")]);
    assert_eq!(tree.dirs.len(), 1);
    assert!(tree.dirs[0].dirs.is_empty());
}

#[test]
fn test_rescan_is_byte_identical() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("img_{i:02}.jpg")), format!("{i}")).unwrap();
        fs::write(dir.path().join(format!("sub/v_{i:02}.mov")), format!("v{i}")).unwrap();
    }

    let first = scan(dir.path()).unwrap().to_json().unwrap();
    let second = scan(dir.path()).unwrap().to_json().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_scan_thread_count_does_not_change_output() {
    let dir = tempdir().unwrap();
    for i in 0..30 {
        fs::write(dir.path().join(format!("{i}.jpg")), vec![i as u8; 1000 + i]).unwrap();
    }

    let single = Scanner::new(ScanConfig::new(1, MediaFilter::default()))
        .scan(dir.path())
        .unwrap();
    let many = Scanner::new(ScanConfig::new(8, MediaFilter::default()))
        .scan(dir.path())
        .unwrap();

    assert_eq!(single, many);
}

#[test]
fn test_scan_extra_extensions() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("raw.cr2"), b"raw").unwrap();

    assert!(scan(dir.path()).unwrap().is_empty());

    let config = ScanConfig::new(0, MediaFilter::with_extra(["cr2"]));
    let tree = Scanner::new(config).scan(dir.path()).unwrap();
    assert_eq!(tree.file_count(), 1);
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();
    let result = scan(&dir.path().join("nope"));
    assert!(matches!(result, Err(ScanError::NotFound(_))));
}

#[test]
fn test_scan_file_as_root() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.jpg");
    fs::write(&file, b"a").unwrap();

    let result = scan(&file);
    assert!(matches!(result, Err(ScanError::NotADirectory(_))));
}

#[test]
fn test_hash_failure_in_subdirectory_aborts_scan() {
    struct Unreadable;
    impl FileDigest for Unreadable {
        fn digest_file(&self, path: &Path) -> Result<String, photoscan::scanner::HashError> {
            if path.ends_with("deep/bad.jpg") {
                return Err(photoscan::scanner::HashError::PermissionDenied(
                    path.to_path_buf(),
                ));
            }
            Hasher::new().digest_file(path)
        }
    }

    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/deep")).unwrap();
    fs::write(dir.path().join("ok.jpg"), b"ok").unwrap();
    fs::write(dir.path().join("a/deep/bad.jpg"), b"bad").unwrap();

    let result = Scanner::new(ScanConfig::default())
        .with_digest(Arc::new(Unreadable))
        .scan(dir.path());

    match result {
        Err(ScanError::Hash(e)) => assert!(e.path().ends_with("deep/bad.jpg")),
        other => panic!("expected hash error, got {other:?}"),
    }
}
