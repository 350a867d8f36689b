//! Resource discovery.
//!
//! This module defines the [`ResourceSource`] trait that decouples the generator
//! from how resource files are found. The crate ships [`FsResourceSource`] which
//! walks resource directories on disk.

use crate::error::{Error, Result};
use crate::utils::normalize_rel_path;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use walkdir::WalkDir;

/// Lists the resource files contributed by one source set.
///
/// Implementations must be [`Sync`] so targets can be generated in parallel.
pub trait ResourceSource: Sync {
    /// Return `relative_path -> source file` for every file below `roots`.
    ///
    /// Relative paths use `/` separators. When two roots contain the same
    /// relative path, the later root wins.
    fn list_resources(&self, roots: &[Utf8PathBuf]) -> Result<BTreeMap<String, Utf8PathBuf>>;
}

/// Filesystem-backed resource source.
///
/// ```text
/// src/
///   commonMain/
///     resources/           # resource root
///       images/
///         logo.png         # relative path: images/logo.png
///   linuxX64Main/
///     resources/
///       ...
/// ```
///
/// Missing roots are skipped. Only regular files are collected; directories
/// with no files produce nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsResourceSource;

impl FsResourceSource {
    pub fn new() -> Self {
        Self
    }

    fn walk_root(&self, root: &Utf8Path, found: &mut BTreeMap<String, Utf8PathBuf>) -> Result<()> {
        if !root.as_std_path().is_dir() {
            tracing::debug!("Resource root {} does not exist, skipping", root);
            return Ok(());
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = Utf8PathBuf::from_path_buf(entry.into_path()).map_err(Error::NonUtf8Path)?;
            let relative = path
                .strip_prefix(root)
                .map_err(|_| Error::InvalidResourcePath(path.to_string()))?;
            let relative = normalize_rel_path(relative);

            if let Some(previous) = found.insert(relative.clone(), path) {
                tracing::debug!("Resource '{}' from {} replaced by {}", relative, previous, root);
            }
        }

        Ok(())
    }
}

impl ResourceSource for FsResourceSource {
    fn list_resources(&self, roots: &[Utf8PathBuf]) -> Result<BTreeMap<String, Utf8PathBuf>> {
        let mut found = BTreeMap::new();
        for root in roots {
            self.walk_root(root, &mut found)?;
        }
        Ok(found)
    }
}
