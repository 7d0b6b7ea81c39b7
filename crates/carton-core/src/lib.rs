pub mod config;
pub mod logging;

pub mod archive;
pub mod checksum;
pub mod dependency;
pub mod http;
pub mod release;
