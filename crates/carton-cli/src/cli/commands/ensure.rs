//! `carton ensure` – verify cached assets, fetching the archive when needed.

use anyhow::{Context, Result};
use carton_core::checksum::Sha256Digest;
use carton_core::config;
use carton_core::dependency::{AssetDescriptor, CachedArchiveFetcher, Ensured, FetchEvent};
use carton_core::release::Entrypoint;

/// Resolves the asset list from the command line or config, then ensures each in turn.
pub async fn run_ensure(file: Option<String>, sha256: Option<String>) -> Result<()> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    let settings = cfg.settings()?;

    let assets = match (file, sha256) {
        (Some(file), Some(hex)) => vec![descriptor_from_args(&file, &hex)?],
        _ => cfg.assets()?,
    };
    if assets.is_empty() {
        anyhow::bail!(
            "no assets to check; pass FILE --sha256 HEX or add [[assets]] to {}",
            config::config_path()?.display()
        );
    }

    let fetcher = CachedArchiveFetcher::new(settings).with_reporter(|event: &FetchEvent| {
        tracing::info!("{}", event);
        println!("{}", event);
    });
    let outcomes = tokio::task::spawn_blocking(move || fetcher.ensure_all(&assets)).await??;

    let refreshed = outcomes.iter().filter(|o| **o == Ensured::Refreshed).count();
    tracing::info!(
        "{} asset(s) verified, {} after refreshing the cache",
        outcomes.len(),
        refreshed
    );
    Ok(())
}

/// Accepts either a file name (`dev.js`) or an entrypoint name (`dev`).
fn descriptor_from_args(file: &str, hex: &str) -> Result<AssetDescriptor> {
    let file_name = match file.parse::<Entrypoint>() {
        Ok(entrypoint) => entrypoint.file_name().to_string(),
        Err(_) => file.to_string(),
    };
    let digest: Sha256Digest = hex.parse().context("invalid --sha256")?;
    Ok(AssetDescriptor::new(file_name, digest)?)
}
