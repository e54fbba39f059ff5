use photoscan::actions::{DeleteMethod, PlainPreviewer, PreviewError, TerminalPreviewer};
use photoscan::duplicates::index_snapshots;
use photoscan::resolve::{
    Chooser, DeletePolicy, Previewer, ResolveConfig, ResolveError, Resolver, KEEP_ALL_LABEL,
};
use photoscan::scanner::scan;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Answers prompts from a fixed list and keeps every option set it was shown.
struct Scripted {
    answers: VecDeque<Option<usize>>,
    shown: Vec<Vec<String>>,
}

impl Scripted {
    fn new(answers: &[Option<usize>]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            shown: Vec::new(),
        }
    }
}

impl Chooser for Scripted {
    fn choose(
        &mut self,
        _prompt: &str,
        options: &[String],
    ) -> Result<Option<usize>, ResolveError> {
        self.shown.push(options.to_vec());
        Ok(self.answers.pop_front().unwrap_or(Some(0)))
    }
}

struct AlwaysFails;

impl Previewer for AlwaysFails {
    fn render(&self, path: &Path) -> Result<(), PreviewError> {
        Err(PreviewError::NotFound(path.to_path_buf()))
    }
}

fn three_copies() -> TempDir {
    let dir = tempdir().unwrap();
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        fs::write(dir.path().join(name), b"identical bytes").unwrap();
    }
    dir
}

fn delete_permanently() -> ResolveConfig {
    ResolveConfig::new(DeletePolicy::Delete(DeleteMethod::Permanent))
}

#[test]
fn test_missing_file_reduces_choices() {
    let dir = three_copies();
    let groups = index_snapshots(&[scan(dir.path()).unwrap()]);
    fs::remove_file(dir.path().join("b.jpg")).unwrap();

    let mut resolver = Resolver::new(delete_permanently(), PlainPreviewer, Scripted::new(&[Some(0)]));
    let summary = resolver.resolve_all(&groups).unwrap();

    let shown = &resolver.chooser().shown;
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].len(), 3);
    assert_eq!(shown[0][0], KEEP_ALL_LABEL);
    assert_eq!(summary.stale, [dir.path().join("b.jpg")]);
    assert!(dir.path().join("a.jpg").exists());
    assert!(dir.path().join("c.jpg").exists());
}

#[test]
fn test_deleting_until_one_copy_survives() {
    let dir = three_copies();
    let groups = index_snapshots(&[scan(dir.path()).unwrap()]);

    let mut resolver = Resolver::new(
        delete_permanently(),
        PlainPreviewer,
        Scripted::new(&[Some(1), Some(1)]),
    );
    let summary = resolver.resolve_all(&groups).unwrap();

    let survivors: Vec<_> = ["a.jpg", "b.jpg", "c.jpg"]
        .iter()
        .filter(|n| dir.path().join(n).exists())
        .collect();
    assert_eq!(survivors, [&"c.jpg"]);
    assert_eq!(summary.deleted.len(), 2);
    assert_eq!(summary.bytes_freed, 30);
    assert!(!summary.cancelled);

    // The deleted candidate never reappears
    let shown = &resolver.chooser().shown;
    assert!(!shown[1].iter().any(|o| o.ends_with("a.jpg")));
}

#[test]
fn test_report_only_touches_nothing() {
    let dir = three_copies();
    let groups = index_snapshots(&[scan(dir.path()).unwrap()]);

    let mut resolver = Resolver::new(
        ResolveConfig::default(),
        PlainPreviewer,
        Scripted::new(&[Some(3), Some(2)]),
    );
    let summary = resolver.resolve_all(&groups).unwrap();

    assert_eq!(
        summary.would_delete,
        [dir.path().join("c.jpg"), dir.path().join("b.jpg")]
    );
    assert!(["a.jpg", "b.jpg", "c.jpg"]
        .iter()
        .all(|n| dir.path().join(n).exists()));
}

#[test]
fn test_all_previews_failing_skips_group() {
    let dir = three_copies();
    let groups = index_snapshots(&[scan(dir.path()).unwrap()]);

    let mut resolver = Resolver::new(delete_permanently(), AlwaysFails, Scripted::new(&[]));
    let summary = resolver.resolve_all(&groups).unwrap();

    assert!(resolver.chooser().shown.is_empty());
    assert_eq!(summary.preview_failures.len(), 3);
    assert_eq!(summary.groups_visited, 1);
}

#[test]
fn test_terminal_previewer_rejects_corrupt_image() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("broken.png");
    let good = dir.path().join("clip.mov");
    let other = dir.path().join("clip2.mov");
    fs::write(&bad, b"same").unwrap();
    fs::write(&good, b"same").unwrap();
    fs::write(&other, b"same").unwrap();
    let groups = index_snapshots(&[scan(dir.path()).unwrap()]);

    let mut resolver = Resolver::new(
        ResolveConfig::default(),
        TerminalPreviewer::new(16),
        Scripted::new(&[Some(0)]),
    );
    let summary = resolver.resolve_all(&groups).unwrap();

    assert_eq!(summary.preview_failures, [bad]);
    assert_eq!(resolver.chooser().shown[0].len(), 3);
}

#[test]
fn test_cancel_leaves_later_groups_untouched() {
    let dir = tempdir().unwrap();
    for (name, content) in [("a1.jpg", "A"), ("a2.jpg", "A"), ("b1.jpg", "B"), ("b2.jpg", "B")] {
        fs::write(dir.path().join(name), content).unwrap();
    }
    let groups = index_snapshots(&[scan(dir.path()).unwrap()]);
    assert_eq!(groups.len(), 2);

    let mut resolver = Resolver::new(delete_permanently(), PlainPreviewer, Scripted::new(&[None]));
    let summary = resolver.resolve_all(&groups).unwrap();

    assert!(summary.cancelled);
    assert_eq!(resolver.chooser().shown.len(), 1);
    assert!(summary.deleted.is_empty());
}
