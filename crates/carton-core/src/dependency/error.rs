//! Errors from ensuring a cached asset.

use crate::archive::ArchiveError;
use crate::checksum::Sha256Digest;
use std::io;

/// Failure of a single `ensure` call. None of these are retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The remote responded but gave no body to verify.
    #[error("failed to download {url}: empty response body")]
    DownloadFailed { url: String },

    /// The final response (after redirects) was not a 2xx.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// Transport-level failure (DNS, TLS, connect, timeout).
    #[error("GET {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Computed digest differs from the pinned one. `context` names the
    /// artifact: the archive URL, or the unpacked asset's path.
    #[error("Expected SHA256 of {context}, which is\n{computed:X}\nto equal\n{expected:X}")]
    HashMismatch {
        computed: Sha256Digest,
        expected: Sha256Digest,
        context: String,
    },

    /// Asset names must be a single plain file name inside `static/`.
    #[error("invalid asset file name {0:?}")]
    InvalidAssetName(String),

    /// The downloaded bytes matched the pinned digest but could not be unpacked.
    #[error(transparent)]
    Archive(ArchiveError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<ArchiveError> for FetchError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Io(e) => FetchError::Io(e),
            other => FetchError::Archive(other),
        }
    }
}

impl FetchError {
    /// Context string of a hash mismatch, if this is one.
    pub fn mismatch_context(&self) -> Option<&str> {
        match self {
            FetchError::HashMismatch { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Compares `computed` to `expected`, failing with a mismatch labelled `context`.
pub(crate) fn verify_digest(
    computed: Sha256Digest,
    expected: Sha256Digest,
    context: impl Into<String>,
) -> Result<(), FetchError> {
    if computed == expected {
        return Ok(());
    }
    Err(FetchError::HashMismatch {
        computed,
        expected,
        context: context.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::sha256_bytes;

    #[test]
    fn mismatch_message_names_context_and_both_digests() {
        let computed = sha256_bytes(b"a");
        let expected = sha256_bytes(b"b");
        let err = verify_digest(computed, expected, "https://example.com/static.zip").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Expected SHA256 of https://example.com/static.zip, which is\n"));
        assert!(msg.contains(&format!("{:X}", computed)));
        assert!(msg.ends_with(&format!("to equal\n{:X}", expected)));
        assert_eq!(err.mismatch_context(), Some("https://example.com/static.zip"));
    }

    #[test]
    fn equal_digests_verify() {
        let d = sha256_bytes(b"same");
        assert!(verify_digest(d, d, "x").is_ok());
    }

    #[test]
    fn archive_io_errors_stay_io() {
        let err: FetchError = ArchiveError::Io(io::Error::from(io::ErrorKind::PermissionDenied)).into();
        assert!(matches!(err, FetchError::Io(e) if e.kind() == io::ErrorKind::PermissionDenied));
    }
}
