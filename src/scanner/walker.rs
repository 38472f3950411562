use super::{ExcludeMatcher, ScanError, ScanErrorKind, ScanReport, Target, TargetDetector};
use crate::config::Config;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};

/// Main scanner for finding venv and __pycache__ directories
pub struct Scanner {
    /// Root path to scan
    root: PathBuf,

    /// Maximum depth to scan (None = unlimited)
    max_depth: Option<usize>,

    /// Path components that are never descended into
    exclude: ExcludeMatcher,

    /// Decides which directories are targets
    detector: TargetDetector,
}

impl Scanner {
    /// Create a new scanner for the given root path
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_depth: None,
            exclude: ExcludeMatcher::default(),
            detector: TargetDetector::default(),
        }
    }

    /// Create a scanner with exclusions, names and depth taken from config
    pub fn from_config<P: AsRef<Path>>(root: P, config: &Config) -> Self {
        let detector = TargetDetector::new(&config.venv_names, &config.pycache_names)
            .require_pyvenv_cfg(config.require_pyvenv_cfg);

        let mut scanner = Self::new(root)
            .exclude_dirs(&config.exclude_dirs)
            .detector(detector);
        scanner.max_depth = config.max_depth;
        scanner
    }

    /// Set path components to exclude from scanning
    pub fn exclude_dirs(mut self, patterns: &[String]) -> Self {
        self.exclude = ExcludeMatcher::new(patterns);
        self
    }

    /// Set the target detector
    pub fn detector(mut self, detector: TargetDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Set maximum scan depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Walk the root and collect every target directory.
    ///
    /// Sizes are left unmeasured. Unreadable directories are recorded in
    /// `ScanReport::errors` and the walk continues past them.
    pub fn scan(&self) -> Result<ScanReport> {
        let metadata = self
            .root
            .metadata()
            .with_context(|| format!("Cannot access scan root: {}", self.root.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("Scan root is not a directory: {}", self.root.display());
        }

        let mut report = ScanReport::new(self.root.clone());

        if self.exclude.is_excluded(&self.root) {
            tracing::warn!(
                "scan root {} is inside an excluded directory",
                self.root.display()
            );
            return Ok(report);
        }

        let mut walker = WalkBuilder::new(&self.root);
        let exclude = self.exclude.clone();
        let detector = self.detector.clone();
        walker
            .standard_filters(false) // Scan hidden and gitignored directories too
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if !entry.file_type().map_or(false, |ft| ft.is_dir()) {
                    return false;
                }

                let path = entry.path();
                if exclude.is_excluded(path) {
                    tracing::debug!("skipping excluded directory {}", path.display());
                    return false;
                }

                // Found targets are reported whole; never walk into them.
                if entry.depth() >= 2 {
                    if let Some(parent) = path.parent() {
                        if detector.detect(parent).is_some() {
                            return false;
                        }
                    }
                }

                true
            });

        if let Some(depth) = self.max_depth {
            walker.max_depth(Some(depth));
        }

        for result in walker.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    let error = scan_error(&err);
                    tracing::debug!("walk error: {}", error.message);
                    report.errors.push(error);
                    continue;
                }
            };

            if entry.depth() == 0 || !entry.file_type().map_or(false, |ft| ft.is_dir()) {
                continue;
            }

            if let Some(kind) = self.detector.detect(entry.path()) {
                tracing::debug!("found {} at {}", kind, entry.path().display());
                report.push(Target::new(entry.into_path(), kind));
            }
        }

        Ok(report)
    }
}

fn scan_error(err: &ignore::Error) -> ScanError {
    let kind = match err.io_error().map(io::Error::kind) {
        Some(io::ErrorKind::PermissionDenied) => ScanErrorKind::PermissionDenied,
        _ => ScanErrorKind::Other,
    };

    ScanError {
        path: error_path(err),
        kind,
        message: err.to_string(),
    }
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        _ => None,
    }
}
