use super::Target;
use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Sequential size calculator for scan results
#[derive(Debug, Default)]
pub struct SizeCalculator;

impl SizeCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Measure every target in place, calling `on_measured` after each one.
    ///
    /// A target whose root cannot be read keeps `size = None`.
    pub fn measure<'a, I, F>(&self, targets: I, mut on_measured: F)
    where
        I: IntoIterator<Item = &'a mut Target>,
        F: FnMut(&Target),
    {
        for target in targets {
            target.size = match dir_size(&target.path) {
                Ok(size) => Some(size),
                Err(err) => {
                    tracing::debug!("{:#}", err);
                    None
                }
            };
            on_measured(target);
        }
    }
}

/// Calculate total size of a directory recursively.
///
/// Symlinks are not followed. Entries that cannot be read are skipped; only a
/// root that cannot be stat'ed is an error.
pub fn dir_size(dir: &Path) -> Result<u64> {
    dir.symlink_metadata()
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut total = 0u64;

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => total = total.saturating_add(metadata.len()),
            Err(err) => tracing::debug!("skipping {}: {}", entry.path().display(), err),
        }
    }

    Ok(total)
}
