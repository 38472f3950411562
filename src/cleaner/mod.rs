use crate::scanner::{Target, TargetKind};
use crate::utils::format_size;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Options for cleaning operations
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Dry run mode - don't actually delete
    pub dry_run: bool,

    /// Hide the progress bar and per-item lines
    pub quiet: bool,
}

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionStatus {
    Deleted,
    DryRun,
    /// The directory was gone before we got to it
    Missing,
    PermissionDenied,
    Failed(String),
}

impl DeletionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Deleted | Self::DryRun | Self::Missing)
    }

    /// Short machine-friendly label for diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::DryRun => "dry_run",
            Self::Missing => "missing",
            Self::PermissionDenied => "permission_denied",
            Self::Failed(_) => "failed",
        }
    }
}

/// Outcome of a deletion attempt for one target
#[derive(Debug, Clone)]
pub struct DeletionOutcome {
    pub path: PathBuf,
    pub kind: TargetKind,
    pub bytes: u64,
    pub status: DeletionStatus,
}

impl DeletionOutcome {
    /// Line printed to the user for this outcome
    pub fn message(&self) -> String {
        let path = self.path.display();
        match &self.status {
            DeletionStatus::Deleted => format!("Deleted: {}", path),
            DeletionStatus::DryRun => format!(
                "Would delete: {} ({})",
                path,
                format_size(self.bytes)
            ),
            DeletionStatus::Missing => format!("Already gone: {}", path),
            DeletionStatus::PermissionDenied => format!("Permission denied: {}", path),
            DeletionStatus::Failed(err) => format!("Error: {} - {}", path, err),
        }
    }
}

/// Result of a cleaning operation
#[derive(Debug, Default)]
pub struct CleanResult {
    /// One entry per requested target, in request order
    pub outcomes: Vec<DeletionOutcome>,

    /// Number of directories cleaned
    pub cleaned_count: usize,

    /// Total bytes freed
    pub bytes_freed: u64,

    /// Number of failed operations
    pub failed_count: usize,
}

impl CleanResult {
    /// Returns a human-readable size string
    pub fn size_freed_human(&self) -> String {
        format_size(self.bytes_freed)
    }

    fn record(&mut self, outcome: DeletionOutcome) {
        match outcome.status {
            DeletionStatus::Deleted | DeletionStatus::DryRun => {
                self.cleaned_count += 1;
                self.bytes_freed = self.bytes_freed.saturating_add(outcome.bytes);
            }
            DeletionStatus::Missing => {}
            DeletionStatus::PermissionDenied | DeletionStatus::Failed(_) => {
                self.failed_count += 1;
            }
        }
        self.outcomes.push(outcome);
    }
}

/// Removes target directories one by one
pub struct Cleaner {
    options: CleanOptions,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner {
    /// Create a new cleaner with default options
    pub fn new() -> Self {
        Self {
            options: CleanOptions::default(),
        }
    }

    /// Create a cleaner with custom options
    pub fn with_options(options: CleanOptions) -> Self {
        Self { options }
    }

    /// Set dry run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.options.dry_run = dry_run;
        self
    }

    /// Set quiet mode
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.options.quiet = quiet;
        self
    }

    /// Clean every target with a progress bar.
    ///
    /// A failure on one target never stops the others, and every target is
    /// reported exactly once.
    pub fn clean_multiple(&self, targets: &[Target]) -> CleanResult {
        let mut result = CleanResult::default();
        if targets.is_empty() {
            return result;
        }

        let pb = if self.options.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(targets.len() as u64)
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{bar:40.cyan/blue} {pos}/{len} folders")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(if self.options.dry_run {
            "Checking folders (dry run)"
        } else {
            "Deleting folders"
        });

        for target in targets {
            let outcome = self.clean_single(target);

            if !self.options.quiet {
                let line = outcome.message();
                let line = if outcome.status.is_success() {
                    line.green()
                } else {
                    line.red()
                };
                pb.suspend(|| println!("{}", line));
            }

            result.record(outcome);
            pb.inc(1);
        }

        pb.finish_and_clear();
        result
    }

    /// Clean a single target directory
    pub fn clean_single(&self, target: &Target) -> DeletionOutcome {
        let bytes = target.size.unwrap_or(0);
        let status = self.delete(&target.path);

        tracing::debug!("{}: {}", target.path.display(), status.label());

        DeletionOutcome {
            path: target.path.clone(),
            kind: target.kind,
            bytes,
            status,
        }
    }

    fn delete(&self, path: &Path) -> DeletionStatus {
        match path.symlink_metadata() {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => return DeletionStatus::Missing,
            Err(err) => return classify(&err),
        }

        if self.options.dry_run {
            return DeletionStatus::DryRun;
        }

        match remove_dir_all(path) {
            Ok(()) => DeletionStatus::Deleted,
            Err(err) => match err.root_cause().downcast_ref::<io::Error>() {
                Some(io_err) => classify(io_err),
                None => DeletionStatus::Failed(format!("{:#}", err)),
            },
        }
    }
}

fn classify(err: &io::Error) -> DeletionStatus {
    if err.kind() == io::ErrorKind::PermissionDenied {
        DeletionStatus::PermissionDenied
    } else {
        DeletionStatus::Failed(err.to_string())
    }
}

/// Remove a directory and all its contents
fn remove_dir_all(path: &Path) -> Result<()> {
    fs::remove_dir_all(path)
        .with_context(|| format!("Failed to remove directory: {}", path.display()))
}
