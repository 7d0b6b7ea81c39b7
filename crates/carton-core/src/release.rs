//! Release-pinned constants: the static asset archive and its digest.
//!
//! Bump both together when cutting a release with new entrypoint bundles.

use crate::checksum::Sha256Digest;
use std::fmt;
use std::str::FromStr;

/// Default location of the static asset archive.
pub const ARCHIVE_URL: &str =
    "https://github.com/swiftwasm/carton/releases/download/0.3.0/static.zip";

/// SHA-256 of the archive served at [`ARCHIVE_URL`].
pub const ARCHIVE_SHA256: Sha256Digest = Sha256Digest::from_bytes([
    0x1D, 0xCC, 0x1A, 0x8B, 0x89, 0x3C, 0xFD, 0xF6, 0x07, 0xF3, 0x9A, 0xBE, 0x22, 0xF1, 0xB7, 0x22,
    0x5B, 0x7B, 0x41, 0x86, 0x66, 0xDF, 0x98, 0x52, 0x2C, 0x7B, 0xE5, 0x54, 0x73, 0xD2, 0x3E, 0x8A,
]);

/// JavaScript entrypoint bundles shipped in the static archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entrypoint {
    Dev,
    Bundle,
    Test,
    TestNode,
}

impl Entrypoint {
    pub const ALL: [Entrypoint; 4] = [
        Entrypoint::Dev,
        Entrypoint::Bundle,
        Entrypoint::Test,
        Entrypoint::TestNode,
    ];

    /// Name used on the command line and in the release helper.
    pub fn name(self) -> &'static str {
        match self {
            Entrypoint::Dev => "dev",
            Entrypoint::Bundle => "bundle",
            Entrypoint::Test => "test",
            Entrypoint::TestNode => "testNode",
        }
    }

    /// File name of the bundle inside `static/`.
    pub fn file_name(self) -> &'static str {
        match self {
            Entrypoint::Dev => "dev.js",
            Entrypoint::Bundle => "bundle.js",
            Entrypoint::Test => "test.js",
            Entrypoint::TestNode => "testNode.js",
        }
    }

    /// Maps a packed file name back to its entrypoint, if it is one.
    pub fn from_file_name(file_name: &str) -> Option<Entrypoint> {
        Self::ALL.into_iter().find(|e| e.file_name() == file_name)
    }
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entrypoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entrypoint: {}", s))
    }
}
