use clap::Parser;
use photoscan::cli::Cli;
use photoscan::config::Config;
use photoscan::error::ExitCode;
use photoscan::signal::ShutdownHandler;
use photoscan::snapshot::{snapshot_path, DirEntry};
use std::fs;
use tempfile::tempdir;

fn run(args: &[&str]) -> anyhow::Result<ExitCode> {
    let cli = Cli::try_parse_from(std::iter::once("photoscan").chain(args.iter().copied()))?;
    photoscan::run_app(cli)
}

#[test]
fn test_scan_command_writes_snapshot() {
    let photos = tempdir().unwrap();
    let store = tempdir().unwrap();
    fs::write(photos.path().join("a.jpg"), b"a").unwrap();

    let code = run(&[
        "-q",
        "scan",
        photos.path().to_str().unwrap(),
        "--snapshot-dir",
        store.path().to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    let snapshot = DirEntry::load(&snapshot_path(store.path(), photos.path())).unwrap();
    assert_eq!(snapshot.file_count(), 1);
}

#[test]
fn test_scan_command_missing_directory() {
    let store = tempdir().unwrap();
    let missing = store.path().join("not-here");

    let err = run(&[
        "-q",
        "scan",
        missing.to_str().unwrap(),
        "--snapshot-dir",
        store.path().to_str().unwrap(),
    ])
    .unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(format!("{err:#}").contains("not-here"));
    assert_eq!(fs::read_dir(store.path()).unwrap().count(), 0);
}

#[test]
fn test_dedup_json_across_two_directories() {
    let home = tempdir().unwrap();
    let backup = tempdir().unwrap();
    let store = tempdir().unwrap();
    fs::write(home.path().join("a.jpg"), b"dup").unwrap();
    fs::write(backup.path().join("b.jpg"), b"dup").unwrap();

    let code = run(&[
        "-q",
        "dedup",
        home.path().to_str().unwrap(),
        backup.path().to_str().unwrap(),
        "--json",
        "--snapshot-dir",
        store.path().to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    // Both snapshots were created on the way
    assert!(snapshot_path(store.path(), home.path()).exists());
    assert!(snapshot_path(store.path(), backup.path()).exists());
}

#[test]
fn test_dedup_without_duplicates_succeeds() {
    let photos = tempdir().unwrap();
    let store = tempdir().unwrap();
    fs::write(photos.path().join("a.jpg"), b"1").unwrap();
    fs::write(photos.path().join("b.jpg"), b"2").unwrap();

    let code = run(&[
        "-q",
        "dedup",
        photos.path().to_str().unwrap(),
        "--snapshot-dir",
        store.path().to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(snapshot_path(store.path(), photos.path()).exists());
}

#[test]
fn test_existing_snapshot_is_reused_until_rescan() {
    let photos = tempdir().unwrap();
    let store = tempdir().unwrap();
    fs::write(photos.path().join("a.jpg"), b"a").unwrap();

    let config = Config {
        snapshot_dir: store.path().to_path_buf(),
        ..Config::default()
    };
    let shutdown = ShutdownHandler::new();

    let first = photoscan::load_or_scan(photos.path(), &config, false, &shutdown, true).unwrap();
    fs::write(photos.path().join("b.jpg"), b"b").unwrap();

    let cached = photoscan::load_or_scan(photos.path(), &config, false, &shutdown, true).unwrap();
    assert_eq!(cached, first);

    let fresh = photoscan::load_or_scan(photos.path(), &config, true, &shutdown, true).unwrap();
    assert_eq!(fresh.file_count(), 2);
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
    let photos = tempdir().unwrap();
    let store = tempdir().unwrap();
    fs::write(snapshot_path(store.path(), photos.path()), "{ nope").unwrap();

    let config = Config {
        snapshot_dir: store.path().to_path_buf(),
        ..Config::default()
    };

    let result =
        photoscan::load_or_scan(photos.path(), &config, false, &ShutdownHandler::new(), true);
    assert!(result.is_err());
}
