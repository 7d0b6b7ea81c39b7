//! On-disk layout of the cache root and its staged replacement.
//!
//! A refresh builds the new cache in a staging directory next to the root and
//! swaps it in with renames, so the root is always either the previous
//! complete cache or the new verified one.

use crate::archive::STATIC_DIR;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the downloaded archive inside the cache root.
pub const ARCHIVE_FILE: &str = "static.zip";

#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/static`
    pub fn static_dir(&self) -> PathBuf {
        self.root.join(STATIC_DIR)
    }

    /// `<root>/static/<file_name>`
    pub fn asset_path(&self, file_name: &str) -> PathBuf {
        self.static_dir().join(file_name)
    }

    /// `<root>/static.zip`
    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE)
    }

    fn parent(&self) -> io::Result<&Path> {
        match self.root.parent() {
            Some(p) if !p.as_os_str().is_empty() => Ok(p),
            Some(_) => Ok(Path::new(".")),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cache root {} has no parent directory", self.root.display()),
            )),
        }
    }

    fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().trim_start_matches('.').to_string())
            .unwrap_or_else(|| "cache".to_string())
    }

    /// Creates an empty staging directory next to the root.
    pub fn stage(&self) -> io::Result<StagedCache> {
        let parent = self.parent()?;
        fs::create_dir_all(parent)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!(".{}-staging-", self.root_name()))
            .tempdir_in(parent)?;
        Ok(StagedCache { dir })
    }

    /// Removes the whole cache root. A missing root is not an error.
    pub fn remove(&self) -> io::Result<bool> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// A cache under construction. Dropping it without [`StagedCache::commit`]
/// deletes it and leaves the current root untouched.
#[derive(Debug)]
pub struct StagedCache {
    dir: TempDir,
}

impl StagedCache {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Replaces `layout`'s root with the staged directory.
    ///
    /// The old root is first renamed into a scratch directory that is deleted
    /// afterwards, so nothing from it survives the swap.
    pub fn commit(self, layout: &CacheLayout) -> io::Result<()> {
        let parent = layout.parent()?;
        let trash = tempfile::Builder::new()
            .prefix(&format!(".{}-old-", layout.root_name()))
            .tempdir_in(parent)?;

        let had_root = match fs::rename(layout.root(), trash.path().join("root")) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e),
        };

        if let Err(e) = fs::rename(self.dir.path(), layout.root()) {
            if had_root {
                // Put the previous cache back so the root is not left missing.
                let _ = fs::rename(trash.path().join("root"), layout.root());
            }
            return Err(e);
        }
        tracing::debug!(
            "committed staged cache to {} (replaced existing: {})",
            layout.root().display(),
            had_root
        );

        if let Err(e) = trash.close() {
            tracing::warn!("failed to delete previous cache contents: {}", e);
        }
        Ok(())
    }
}
