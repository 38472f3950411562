mod detector;
mod size_calculator;
mod walker;

pub use detector::{ExcludeMatcher, TargetDetector, TargetKind};
pub use size_calculator::{dir_size, SizeCalculator};
pub use walker::Scanner;

use crate::utils::format_size;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A disposable directory found by the scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Absolute path of the directory
    pub path: PathBuf,

    /// What kind of artifact the directory holds
    pub kind: TargetKind,

    /// Size in bytes; `None` until measured or when measuring failed
    pub size: Option<u64>,
}

impl Target {
    pub fn new(path: PathBuf, kind: TargetKind) -> Self {
        Self {
            path,
            kind,
            size: None,
        }
    }

    /// Returns a human-readable size string
    pub fn size_human(&self) -> String {
        match self.size {
            Some(size) => format_size(size),
            None => String::from("size calculation failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    PermissionDenied,
    Other,
}

/// A non-fatal error hit while walking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanError {
    pub path: Option<PathBuf>,
    pub kind: ScanErrorKind,
    pub message: String,
}

/// Everything a scan found under one root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub root: PathBuf,

    /// Virtual environment directories, in walk order
    pub venvs: Vec<Target>,

    /// Bytecode cache directories, in walk order
    pub pycaches: Vec<Target>,

    /// Directories that could not be read
    pub errors: Vec<ScanError>,
}

impl ScanReport {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    pub fn push(&mut self, target: Target) {
        match target.kind {
            TargetKind::Venv => self.venvs.push(target),
            TargetKind::Pycache => self.pycaches.push(target),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.venvs.is_empty() && self.pycaches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.venvs.len() + self.pycaches.len()
    }

    /// All targets, venvs first
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.venvs.iter().chain(self.pycaches.iter())
    }

    pub fn targets_mut(&mut self) -> impl Iterator<Item = &mut Target> {
        self.venvs.iter_mut().chain(self.pycaches.iter_mut())
    }

    /// Sum of every measured size; unmeasured targets count as zero
    pub fn total_size(&self) -> u64 {
        self.targets().filter_map(|t| t.size).sum()
    }

    pub fn into_targets(self) -> Vec<Target> {
        let mut targets = self.venvs;
        targets.extend(self.pycaches);
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(path: &str, kind: TargetKind, size: Option<u64>) -> Target {
        Target {
            path: PathBuf::from(path),
            kind,
            size,
        }
    }

    #[test]
    fn test_report_partitions_by_kind() {
        let mut report = ScanReport::new(PathBuf::from("/proj"));
        report.push(target("/proj/a/__pycache__", TargetKind::Pycache, Some(10)));
        report.push(target("/proj/venv", TargetKind::Venv, Some(100)));
        report.push(target("/proj/b/__pycache__", TargetKind::Pycache, None));

        assert_eq!(report.venvs.len(), 1);
        assert_eq!(report.pycaches.len(), 2);
        assert_eq!(report.len(), 3);
        assert_eq!(report.total_size(), 110);

        let order: Vec<_> = report.targets().map(|t| t.path.clone()).collect();
        assert_eq!(order[0], PathBuf::from("/proj/venv"));
        assert_eq!(order[1], PathBuf::from("/proj/a/__pycache__"));
    }

    #[test]
    fn test_size_human_reports_failure() {
        assert_eq!(
            target("/x", TargetKind::Venv, None).size_human(),
            "size calculation failed"
        );
        assert_eq!(
            target("/x", TargetKind::Venv, Some(2048)).size_human(),
            "2.00 KB"
        );
    }
}
