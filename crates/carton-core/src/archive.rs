//! Zip extraction and packing for the static asset archive.
//!
//! The archive holds a single `static/` directory; extracting it into a cache
//! root yields `<root>/static/<file>`. Packing produces the same layout from a
//! flat directory of built bundles.

use crate::checksum::{sha256_bytes, sha256_path, Sha256Digest};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Directory inside the archive (and inside the cache root) holding the assets.
pub const STATIC_DIR: &str = "static";

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("not a valid zip archive: {0}")]
    InvalidZip(ZipError),

    #[error("failed to extract zip archive: {0}")]
    Extraction(ZipError),

    #[error("failed to write zip archive: {0}")]
    Write(ZipError),
}

/// Extracts a zip archive into `target_directory`, creating it if needed.
///
/// Entries whose paths would land outside the target are rejected by the zip
/// reader and surface as [`ArchiveError::Extraction`].
pub fn extract_zip(archive: &Path, target_directory: &Path) -> Result<(), ArchiveError> {
    fs::create_dir_all(target_directory)?;

    let file = File::open(archive)?;
    let reader = BufReader::with_capacity(1024 * 1024, file);
    let mut zip = ZipArchive::new(reader).map_err(ArchiveError::InvalidZip)?;
    tracing::debug!(
        "extracting {} entries from {} into {}",
        zip.len(),
        archive.display(),
        target_directory.display()
    );
    zip.extract(target_directory).map_err(|e| match e {
        ZipError::Io(io) => ArchiveError::Io(io),
        other => ArchiveError::Extraction(other),
    })?;
    Ok(())
}

/// One file placed in a packed archive.
#[derive(Debug, Clone)]
pub struct PackedFile {
    pub file_name: String,
    pub sha256: Sha256Digest,
}

/// Outcome of [`pack_dir`]: per-file digests plus the digest of the archive.
#[derive(Debug, Clone)]
pub struct PackReport {
    pub files: Vec<PackedFile>,
    pub archive_sha256: Sha256Digest,
}

/// Packs every regular file directly inside `source_dir` into a zip at
/// `output`, under `static/`. Subdirectories are skipped. Entries are written
/// in name order with fixed timestamps, so identical inputs give an identical
/// archive digest.
pub fn pack_dir(source_dir: &Path, output: &Path) -> Result<PackReport, ArchiveError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::warn!("skipping non-UTF-8 file name {:?}", raw);
            }
        }
    }
    names.sort();

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(File::create(output)?);
    zip.add_directory(format!("{}/", STATIC_DIR), options)
        .map_err(ArchiveError::Write)?;

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let data = fs::read(source_dir.join(&name))?;
        zip.start_file(format!("{}/{}", STATIC_DIR, name), options)
            .map_err(ArchiveError::Write)?;
        zip.write_all(&data)?;
        files.push(PackedFile {
            sha256: sha256_bytes(&data),
            file_name: name,
        });
    }
    let mut out = zip.finish().map_err(ArchiveError::Write)?;
    out.flush()?;
    drop(out);

    Ok(PackReport {
        files,
        archive_sha256: sha256_path(output)?,
    })
}
