//! Tests for the ensure subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

const DIGEST: &str = "1DCC1A8B893CFDF607F39ABE22F1B7225B7B418666DF98522C7BE55473D23E8A";

#[test]
fn cli_parse_ensure_from_config() {
    match parse(&["carton", "ensure"]) {
        CliCommand::Ensure { file, sha256 } => {
            assert!(file.is_none());
            assert!(sha256.is_none());
        }
        _ => panic!("expected Ensure"),
    }
}

#[test]
fn cli_parse_ensure_single_asset() {
    match parse(&["carton", "ensure", "dev.js", "--sha256", DIGEST]) {
        CliCommand::Ensure { file, sha256 } => {
            assert_eq!(file.as_deref(), Some("dev.js"));
            assert_eq!(sha256.as_deref(), Some(DIGEST));
        }
        _ => panic!("expected Ensure with file"),
    }
}

#[test]
fn cli_ensure_file_requires_digest() {
    assert!(Cli::try_parse_from(["carton", "ensure", "dev.js"]).is_err());
    assert!(Cli::try_parse_from(["carton", "ensure", "--sha256", DIGEST]).is_err());
}
