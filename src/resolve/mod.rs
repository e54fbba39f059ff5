//! Interactive resolution of duplicate groups.
//!
//! # Overview
//!
//! Each [`DuplicateGroup`] is resolved in two phases:
//!
//! 1. **Presenting**: every path is checked for existence and previewed once.
//!    Paths that vanished since the scan are reported as stale; paths whose
//!    preview fails are set aside for this group. Neither is ever deleted.
//! 2. **Deciding**: the user picks from "keep all" plus one "delete" option
//!    per surviving candidate. Deleting (or, without a delete method, just
//!    reporting) a candidate removes it from [`ResolutionState`] and the
//!    prompt repeats with the shorter list, without re-checking or
//!    re-previewing the rest.
//!
//! A group is finished when "keep all" is chosen or one candidate is left.
//! A cancelled prompt (Esc / `q`) or a raised shutdown flag stops the whole
//! run; files already deleted stay deleted.
//!
//! The terminal side is pluggable through [`Previewer`] and [`Chooser`]; the
//! CLI uses [`TerminalPreviewer`](crate::actions::TerminalPreviewer) and
//! [`prompt::SelectChooser`].

pub mod prompt;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::actions::delete::{delete_file, DeleteMethod};
use crate::actions::preview::PreviewError;
use crate::duplicates::DuplicateGroup;

/// Label of the option at index 0.
pub const KEEP_ALL_LABEL: &str = "Keep all (next group)";

/// Renders a candidate for the user before the choice is made.
pub trait Previewer {
    /// Show `path`. An error takes the candidate out of this group's choices.
    fn render(&self, path: &Path) -> Result<(), PreviewError>;
}

/// Picks one entry from a list of options.
pub trait Chooser {
    /// Return the chosen index, or `None` if the user cancelled.
    ///
    /// Index 0 is always "keep all".
    fn choose(&mut self, prompt: &str, options: &[String])
        -> Result<Option<usize>, ResolveError>;
}

/// Errors that stop resolution altogether.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The selection prompt failed (terminal gone, not a TTY).
    #[error("selection prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// The chooser returned an index outside the option list.
    #[error("choice {index} out of range for {options} options")]
    InvalidChoice { index: usize, options: usize },
}

/// What happens to a candidate the user chose to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Report the path only; the file stays.
    #[default]
    ReportOnly,
    /// Remove the file with the given method.
    Delete(DeleteMethod),
}

/// Resolver settings.
#[derive(Debug, Clone, Default)]
pub struct ResolveConfig {
    /// Whether chosen candidates are removed from disk.
    pub policy: DeletePolicy,
}

impl ResolveConfig {
    /// Config with the given deletion policy.
    #[must_use]
    pub fn new(policy: DeletePolicy) -> Self {
        Self { policy }
    }
}

/// Candidates of one group that are still undecided.
///
/// The order is the group's path order; removal keeps the rest in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolutionState {
    candidates: Vec<PathBuf>,
}

impl ResolutionState {
    /// State holding `candidates` in the given order.
    #[must_use]
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Remaining candidates.
    #[must_use]
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Number of remaining candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when nothing is left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// True once the prompt would offer nothing but "keep all".
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.candidates.len() <= 1
    }

    /// "Keep all" followed by one delete option per candidate.
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        std::iter::once(KEEP_ALL_LABEL.to_string())
            .chain(
                self.candidates
                    .iter()
                    .map(|p| format!("Delete {}", p.display())),
            )
            .collect()
    }

    /// Remove and return the candidate at `index` (0-based, without the
    /// "keep all" slot).
    pub fn take(&mut self, index: usize) -> Option<PathBuf> {
        (index < self.candidates.len()).then(|| self.candidates.remove(index))
    }
}

/// How one group ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOutcome {
    /// One candidate (or none) left.
    Settled,
    /// "Keep all" chosen while two or more candidates remained.
    KeptAll,
    /// The prompt was cancelled.
    Cancelled,
}

/// Running totals over a resolution session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Groups that reached the presenting phase.
    pub groups_visited: usize,
    /// Files removed from disk.
    pub deleted: Vec<PathBuf>,
    /// Bytes freed by `deleted`.
    pub bytes_freed: u64,
    /// Files chosen for deletion under [`DeletePolicy::ReportOnly`].
    pub would_delete: Vec<PathBuf>,
    /// Removal failures with their messages.
    pub delete_failures: Vec<(PathBuf, String)>,
    /// Paths missing at resolution time.
    pub stale: Vec<PathBuf>,
    /// Paths whose preview failed.
    pub preview_failures: Vec<PathBuf>,
    /// Whether the session was cut short by cancellation or Ctrl+C.
    pub cancelled: bool,
}

impl ResolveSummary {
    /// Human-readable one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!("Resolved {} group(s)", self.groups_visited);
        if !self.deleted.is_empty() {
            text.push_str(&format!(
                ", deleted {} file(s) ({})",
                self.deleted.len(),
                bytesize::ByteSize(self.bytes_freed)
            ));
        }
        if !self.would_delete.is_empty() {
            text.push_str(&format!(", {} marked for deletion", self.would_delete.len()));
        }
        if !self.delete_failures.is_empty() {
            text.push_str(&format!(", {} deletion(s) failed", self.delete_failures.len()));
        }
        if !self.stale.is_empty() {
            text.push_str(&format!(", {} stale path(s)", self.stale.len()));
        }
        if !self.preview_failures.is_empty() {
            text.push_str(&format!(", {} preview failure(s)", self.preview_failures.len()));
        }
        if self.cancelled {
            text.push_str(" (cancelled)");
        }
        text
    }
}

/// Drives the presenting/deciding loop over duplicate groups.
pub struct Resolver<P, C> {
    config: ResolveConfig,
    previewer: P,
    chooser: C,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl<P: Previewer, C: Chooser> Resolver<P, C> {
    /// Create a resolver.
    #[must_use]
    pub fn new(config: ResolveConfig, previewer: P, chooser: C) -> Self {
        Self {
            config,
            previewer,
            chooser,
            shutdown_flag: None,
        }
    }

    /// Stop between groups once `flag` is raised.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The chooser, for inspecting scripted fakes.
    #[must_use]
    pub fn chooser(&self) -> &C {
        &self.chooser
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Resolve `groups` in order until done or cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error only if the chooser fails; per-file problems are
    /// recorded in the summary.
    pub fn resolve_all(
        &mut self,
        groups: &[DuplicateGroup],
    ) -> Result<ResolveSummary, ResolveError> {
        let mut summary = ResolveSummary::default();
        let total = groups.len();

        for (i, group) in groups.iter().enumerate() {
            if self.is_shutdown_requested() {
                log::info!("Resolution interrupted before group {}/{}", i + 1, total);
                summary.cancelled = true;
                break;
            }

            let prompt = format!(
                "Group {}/{}: {} copies of {}",
                i + 1,
                total,
                group.len(),
                group.hash
            );
            if self.resolve_group(&prompt, group, &mut summary)? == GroupOutcome::Cancelled {
                log::info!("Resolution cancelled at group {}/{}", i + 1, total);
                summary.cancelled = true;
                break;
            }
        }

        log::info!("{}", summary.summary());
        Ok(summary)
    }

    /// Resolve a single group, adding to `summary`.
    ///
    /// # Errors
    ///
    /// See [`resolve_all`](Self::resolve_all).
    pub fn resolve_group(
        &mut self,
        prompt: &str,
        group: &DuplicateGroup,
        summary: &mut ResolveSummary,
    ) -> Result<GroupOutcome, ResolveError> {
        summary.groups_visited += 1;
        let mut state = self.present(group, summary);

        while !state.is_settled() {
            let options = state.options();
            let choice = match self.chooser.choose(prompt, &options)? {
                None => return Ok(GroupOutcome::Cancelled),
                Some(0) => return Ok(GroupOutcome::KeptAll),
                Some(index) => index,
            };

            let path = state
                .take(choice - 1)
                .ok_or(ResolveError::InvalidChoice {
                    index: choice,
                    options: options.len(),
                })?;
            self.apply(path, summary);
        }

        Ok(GroupOutcome::Settled)
    }

    /// Existence check and preview; returns the candidates on offer.
    fn present(&self, group: &DuplicateGroup, summary: &mut ResolveSummary) -> ResolutionState {
        let mut candidates = Vec::with_capacity(group.len());

        for path in &group.paths {
            match path.try_exists() {
                Ok(true) => {}
                Ok(false) => {
                    log::warn!("Skipping {}: no longer exists", path.display());
                    summary.stale.push(path.clone());
                    continue;
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    summary.stale.push(path.clone());
                    continue;
                }
            }

            if let Err(e) = self.previewer.render(path) {
                log::warn!("Preview failed for {}: {}", path.display(), e);
                summary.preview_failures.push(path.clone());
                continue;
            }

            candidates.push(path.clone());
        }

        ResolutionState::new(candidates)
    }

    fn apply(&self, path: PathBuf, summary: &mut ResolveSummary) {
        match self.config.policy {
            DeletePolicy::ReportOnly => {
                log::info!("Would delete {}", path.display());
                summary.would_delete.push(path);
            }
            DeletePolicy::Delete(method) => match delete_file(&path, method) {
                Ok(result) => {
                    summary.bytes_freed += result.size;
                    summary.deleted.push(path);
                }
                Err(e) => {
                    log::warn!("Failed to delete {}: {}", path.display(), e);
                    summary.delete_failures.push((path, e.to_string()));
                }
            },
        }
    }
}
