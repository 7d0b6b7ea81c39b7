//! Buffered HTTP GET of the static archive.
//!
//! Uses the curl crate (libcurl) easy interface. The body is collected in
//! memory; the archive is small and must be hashed in full before anything
//! touches the cache.

use crate::dependency::FetchError;
use std::time::Duration;

const USER_AGENT: &str = concat!("carton/", env!("CARGO_PKG_VERSION"));

/// Where archive bytes come from. The fetcher calls this exactly once per refresh.
pub trait ArchiveSource {
    /// GETs `url` and returns the full body.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// libcurl-backed source. Follows redirects (GitHub release assets redirect to
/// a CDN) and applies connect and total timeouts.
#[derive(Debug, Clone, Copy)]
pub struct CurlSource {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CurlSource {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }
}

impl ArchiveSource for CurlSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let http = |source: curl::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(http)?;
        easy.follow_location(true).map_err(http)?;
        easy.max_redirections(10).map_err(http)?;
        easy.useragent(USER_AGENT).map_err(http)?;
        easy.connect_timeout(self.connect_timeout).map_err(http)?;
        easy.timeout(self.timeout).map_err(http)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(http)?;
            transfer.perform().map_err(http)?;
        }

        let code = easy.response_code().map_err(http)?;
        if !(200..300).contains(&code) {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: code,
            });
        }
        if body.is_empty() {
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
            });
        }
        tracing::debug!("GET {} returned {} bytes", url, body.len());
        Ok(body)
    }
}
