//! `carton hash-archive` – pack built bundles and print the digests to pin.

use anyhow::{Context, Result};
use carton_core::archive;
use carton_core::release::Entrypoint;
use std::path::Path;

pub async fn run_hash_archive(dir: &Path, output: &Path) -> Result<()> {
    let (src, out) = (dir.to_path_buf(), output.to_path_buf());
    let report = tokio::task::spawn_blocking(move || archive::pack_dir(&src, &out))
        .await?
        .with_context(|| format!("pack {} into {}", dir.display(), output.display()))?;

    if report.files.is_empty() {
        tracing::warn!("{} contains no files", dir.display());
    }
    for file in &report.files {
        let label = match Entrypoint::from_file_name(&file.file_name) {
            Some(entrypoint) => format!("{} ({})", file.file_name, entrypoint),
            None => file.file_name.clone(),
        };
        println!("{:X}  {}", file.sha256, label);
    }
    println!("{:X}  {}", report.archive_sha256, output.display());
    tracing::info!(
        "packed {} file(s) into {}",
        report.files.len(),
        output.display()
    );
    Ok(())
}
