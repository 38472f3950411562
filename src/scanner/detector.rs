use colored::Color;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path};

/// Kinds of disposable directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Venv,
    Pycache,
}

impl TargetKind {
    /// Returns the color used for CLI display
    pub fn color(&self) -> Color {
        match self {
            Self::Venv => Color::Blue,
            Self::Pycache => Color::Yellow,
        }
    }

    /// Returns the short tag shown next to each path
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Venv => "venv",
            Self::Pycache => "pycache",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Classifies directories by name
#[derive(Debug, Clone)]
pub struct TargetDetector {
    venv_names: HashSet<String>,
    pycache_names: HashSet<String>,
    require_pyvenv_cfg: bool,
}

impl Default for TargetDetector {
    fn default() -> Self {
        Self::new(&["venv".to_string()], &["__pycache__".to_string()])
    }
}

impl TargetDetector {
    pub fn new(venv_names: &[String], pycache_names: &[String]) -> Self {
        Self {
            venv_names: venv_names.iter().cloned().collect(),
            pycache_names: pycache_names.iter().cloned().collect(),
            require_pyvenv_cfg: false,
        }
    }

    /// Only accept venv directories that contain a `pyvenv.cfg`
    pub fn require_pyvenv_cfg(mut self, require: bool) -> Self {
        self.require_pyvenv_cfg = require;
        self
    }

    /// Classify the directory at `dir`, if its name marks it as disposable
    pub fn detect(&self, dir: &Path) -> Option<TargetKind> {
        let name = dir.file_name()?.to_string_lossy();

        if self.venv_names.contains(name.as_ref()) {
            if self.require_pyvenv_cfg && !dir.join("pyvenv.cfg").is_file() {
                return None;
            }
            return Some(TargetKind::Venv);
        }

        if self.pycache_names.contains(name.as_ref()) {
            return Some(TargetKind::Pycache);
        }

        None
    }
}

/// Matches paths that contain an excluded component.
///
/// Each pattern is a glob matched against single path components, ignoring
/// ASCII case, so `AppData` excludes both `C:\Users\me\AppData\Local` and
/// `/mnt/c/Users/me/appdata`.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    set: GlobSet,
}

impl Default for ExcludeMatcher {
    fn default() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }
}

impl ExcludeMatcher {
    /// Build a matcher, skipping patterns that are not valid globs
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob = match GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
            {
                Ok(g) => g,
                Err(err) => {
                    tracing::warn!("ignoring invalid exclude pattern `{}`: {}", pattern, err);
                    continue;
                }
            };
            builder.add(glob);
        }

        let set = builder.build().unwrap_or_else(|err| {
            tracing::warn!("failed to compile exclude patterns: {}", err);
            GlobSet::empty()
        });

        Self { set }
    }

    /// Whether any normal component of `path` matches an exclusion pattern
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }

        path.components().any(|component| match component {
            Component::Normal(name) => self.set.is_match(Path::new(name)),
            _ => false,
        })
    }
}
