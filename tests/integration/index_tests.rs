use photoscan::duplicates::{index_snapshots, HashIndex};
use photoscan::scanner::scan;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_index_single_scanned_tree() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"same").unwrap();
    fs::write(dir.path().join("b.jpg"), b"other").unwrap();
    fs::write(dir.path().join("c.jpg"), b"same").unwrap();

    let groups = index_snapshots(&[scan(dir.path()).unwrap()]);

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths,
        [dir.path().join("a.jpg"), dir.path().join("c.jpg")]
    );
}

#[test]
fn test_index_merges_two_trees() {
    let home = tempdir().unwrap();
    let backup = tempdir().unwrap();
    fs::create_dir(backup.path().join("old")).unwrap();
    fs::write(home.path().join("beach.jpg"), b"waves").unwrap();
    fs::write(backup.path().join("old/IMG_0001.JPG"), b"waves").unwrap();
    fs::write(backup.path().join("unrelated.mp4"), b"movie").unwrap();

    let snapshots = [scan(home.path()).unwrap(), scan(backup.path()).unwrap()];
    let groups = index_snapshots(&snapshots);

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths,
        [
            home.path().join("beach.jpg"),
            backup.path().join("old/IMG_0001.JPG")
        ]
    );
}

#[test]
fn test_index_overlapping_trees_lists_each_path_once() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.jpg"), b"dup").unwrap();
    fs::write(sub.join("b.jpg"), b"dup").unwrap();

    let mut index = HashIndex::new();
    index.add_snapshot(&scan(dir.path()).unwrap());
    index.add_snapshot(&scan(&sub).unwrap());

    assert_eq!(index.stats().repeated_paths, 1);
    let groups = index.into_duplicate_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, [dir.path().join("a.jpg"), sub.join("b.jpg")]);
}

#[test]
fn test_index_no_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"1").unwrap();
    fs::write(dir.path().join("b.jpg"), b"2").unwrap();

    let mut index = HashIndex::new();
    index.add_snapshot(&scan(dir.path()).unwrap());

    let stats = index.stats();
    assert_eq!(stats.files_indexed, 2);
    assert_eq!(stats.unique_hashes, 2);
    assert_eq!(stats.duplicate_groups, 0);
    assert!(index.into_duplicate_groups().is_empty());
}
