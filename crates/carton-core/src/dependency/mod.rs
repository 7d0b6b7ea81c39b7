//! Integrity-verified static asset cache.
//!
//! [`CachedArchiveFetcher::ensure`] makes sure `<root>/static/<file>` exists
//! with a pinned SHA-256. On a miss it downloads the release archive once,
//! checks the archive digest, unpacks it into a staging directory, checks the
//! asset digest there, and only then swaps the staging directory in as the new
//! root. Any failure leaves the previous root as it was.

mod error;
mod layout;
mod progress;

pub use error::FetchError;
pub use layout::{CacheLayout, StagedCache, ARCHIVE_FILE};
pub use progress::{FetchEvent, Reporter, TracingReporter};

use crate::archive::{self, STATIC_DIR};
use crate::checksum::{self, Sha256Digest};
use crate::http::{ArchiveSource, CurlSource};
use crate::release;
use error::verify_digest;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// A file expected inside `static/` together with its pinned digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    file_name: String,
    sha256: Sha256Digest,
}

impl AssetDescriptor {
    /// Fails with [`FetchError::InvalidAssetName`] unless `file_name` is a
    /// single normal path component.
    pub fn new(file_name: impl Into<String>, sha256: Sha256Digest) -> Result<Self, FetchError> {
        let file_name = file_name.into();
        let mut components = Path::new(&file_name).components();
        let single_normal = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none()
            && !file_name.contains(['/', '\\']);
        if !single_normal {
            return Err(FetchError::InvalidAssetName(file_name));
        }
        Ok(Self { file_name, sha256 })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn sha256(&self) -> Sha256Digest {
        self.sha256
    }
}

/// Everything the fetcher needs to know about where assets live and come from.
#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub cache_root: PathBuf,
    pub archive_url: String,
    pub archive_sha256: Sha256Digest,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl FetcherSettings {
    /// Settings for the release-pinned archive cached under `cache_root`.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        let curl = CurlSource::default();
        Self {
            cache_root: cache_root.into(),
            archive_url: release::ARCHIVE_URL.to_string(),
            archive_sha256: release::ARCHIVE_SHA256,
            connect_timeout: curl.connect_timeout,
            timeout: curl.timeout,
        }
    }
}

/// `<home>/.carton`
pub fn default_cache_root() -> io::Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".carton"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "home directory not found"))
}

/// Which path a successful `ensure` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    /// The asset already matched; nothing was fetched or written.
    AlreadyCached,
    /// The archive was downloaded and the cache root replaced.
    Refreshed,
}

pub struct CachedArchiveFetcher {
    settings: FetcherSettings,
    layout: CacheLayout,
    source: Box<dyn ArchiveSource + Send + Sync>,
    reporter: Box<dyn Reporter + Send + Sync>,
}

impl CachedArchiveFetcher {
    /// Fetcher using libcurl with the configured timeouts and logging events via tracing.
    pub fn new(settings: FetcherSettings) -> Self {
        let source = CurlSource {
            connect_timeout: settings.connect_timeout,
            timeout: settings.timeout,
        };
        Self {
            layout: CacheLayout::new(settings.cache_root.clone()),
            settings,
            source: Box::new(source),
            reporter: Box::new(TracingReporter),
        }
    }

    pub fn with_source(mut self, source: impl ArchiveSource + Send + Sync + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + Send + Sync + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn settings(&self) -> &FetcherSettings {
        &self.settings
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Ensures `asset` is present in the cache with its pinned digest.
    pub fn ensure(&self, asset: &AssetDescriptor) -> Result<Ensured, FetchError> {
        let target = self.layout.asset_path(asset.file_name());

        if checksum::sha256_if_exists(&target)? == Some(asset.sha256()) {
            tracing::debug!("cache hit for {}", target.display());
            self.reporter.report(&FetchEvent::Verified { path: target });
            return Ok(Ensured::AlreadyCached);
        }

        self.reporter.report(&FetchEvent::CacheMiss {
            static_dir: self.layout.static_dir(),
        });
        self.refresh(asset, &target)?;
        self.reporter.report(&FetchEvent::Verified { path: target });
        Ok(Ensured::Refreshed)
    }

    /// Ensures each asset in order. Assets after a refresh usually hit the
    /// fast path since they ship in the same archive.
    pub fn ensure_all(&self, assets: &[AssetDescriptor]) -> Result<Vec<Ensured>, FetchError> {
        assets.iter().map(|asset| self.ensure(asset)).collect()
    }

    /// Deletes the cache root. Returns false if there was nothing to delete.
    pub fn clean(&self) -> io::Result<bool> {
        self.layout.remove()
    }

    fn refresh(&self, asset: &AssetDescriptor, target: &Path) -> Result<(), FetchError> {
        let url = self.settings.archive_url.as_str();

        let bytes = self.source.fetch(url)?;
        if bytes.is_empty() {
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
            });
        }
        self.reporter.report(&FetchEvent::Downloaded {
            url: url.to_string(),
            bytes: bytes.len() as u64,
        });

        verify_digest(
            checksum::sha256_bytes(&bytes),
            self.settings.archive_sha256,
            url,
        )?;

        let staged = self.layout.stage()?;
        let staged_archive = staged.path().join(ARCHIVE_FILE);
        fs::write(&staged_archive, &bytes)?;
        drop(bytes);

        self.reporter.report(&FetchEvent::Unpacking {
            archive: self.layout.archive_path(),
        });
        archive::extract_zip(&staged_archive, staged.path())?;

        let staged_target = staged.path().join(STATIC_DIR).join(asset.file_name());
        let unpacked = checksum::sha256_path(&staged_target).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} not found in archive {}", target.display(), url),
                )
            } else {
                e
            }
        })?;
        verify_digest(unpacked, asset.sha256(), target.display().to_string())?;

        staged.commit(&self.layout)?;
        Ok(())
    }
}
