//! CLI command handlers, one per file.

mod checksum;
mod clean;
mod completions;
mod ensure;
mod hash_archive;

pub use checksum::run_checksum;
pub use clean::run_clean;
pub use completions::run_completions;
pub use ensure::run_ensure;
pub use hash_archive::run_hash_archive;
