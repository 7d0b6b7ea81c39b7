//! `carton clean` – remove the cache directory.

use anyhow::Result;
use carton_core::config;
use carton_core::dependency::CacheLayout;

pub async fn run_clean() -> Result<()> {
    let settings = config::load_or_init()?.settings()?;
    let layout = CacheLayout::new(settings.cache_root);
    if layout.remove()? {
        println!("Removed {}", layout.root().display());
    } else {
        println!("Nothing to remove at {}", layout.root().display());
    }
    Ok(())
}
