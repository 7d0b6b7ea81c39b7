//! Status events emitted while ensuring an asset.
//!
//! Reporting is observational only: a reporter cannot influence the fetch.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// The asset is missing or stale; a refresh of `static_dir` starts.
    CacheMiss { static_dir: PathBuf },
    /// The archive body was fully received.
    Downloaded { url: String, bytes: u64 },
    /// Extraction of the verified archive starts.
    Unpacking { archive: PathBuf },
    /// The asset at `path` matches its pinned digest.
    Verified { path: PathBuf },
}

impl fmt::Display for FetchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchEvent::CacheMiss { static_dir } => write!(
                f,
                "Directory doesn't exist or contains outdated assets: {}",
                static_dir.display()
            ),
            FetchEvent::Downloaded { url, bytes } => {
                write!(f, "Static archive ({} bytes) downloaded from {}", bytes, url)
            }
            FetchEvent::Unpacking { archive } => {
                write!(f, "Unpacking the archive: {}", archive.display())
            }
            FetchEvent::Verified { path } => {
                write!(f, "Asset integrity verified: {}", path.display())
            }
        }
    }
}

/// Receives [`FetchEvent`]s. Implemented for closures so callers can print
/// events however they like.
pub trait Reporter {
    fn report(&self, event: &FetchEvent);
}

impl<F> Reporter for F
where
    F: Fn(&FetchEvent),
{
    fn report(&self, event: &FetchEvent) {
        self(event)
    }
}

/// Forwards events to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &FetchEvent) {
        tracing::info!("{}", event);
    }
}
