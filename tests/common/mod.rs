//! This module contains common utilities for simplifying the writing of
//! integration tests for this library.

#![cfg(test)]

use std::{fs::File, io::Read};

use anyhow::anyhow;
use contract_surface_extractor as cse;
use contract_surface_extractor::{
    abi::AbiEntry,
    analyzer::InitialAnalyzer,
    constant::MANIFEST_FILE_NAME,
    contract::Contract,
    extractor,
    manifest::Manifest,
    metadata::AppMetadata,
};

/// The flattened source used by most of the tests.
#[allow(unused)] // It is actually
pub const VAULT_PATH: &str = "./asset/Vault.sol";

/// Initialises logging for the test run, ignoring repeated initialisation.
#[allow(unused)] // It is actually
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Constructs a new analyzer for the contract source at the provided `path`.
///
/// It uses the default configuration for the extractor.
#[allow(unused)] // It is actually
pub fn new_analyzer_from_path(path: impl Into<String>) -> anyhow::Result<InitialAnalyzer> {
    new_analyzer_with_config(path, extractor::Config::default())
}

/// Constructs a new analyzer for the contract source at the provided `path`,
/// with the provided extraction `config`.
#[allow(unused)] // It is actually
pub fn new_analyzer_with_config(
    path: impl Into<String>,
    config: extractor::Config,
) -> anyhow::Result<InitialAnalyzer> {
    init_logging();
    let path = path.into();
    let source = read_file(&path)?;

    Ok(cse::new(Contract::new(source, path), config))
}

/// Reads the application metadata at the provided `path`.
#[allow(unused)] // It is actually
pub fn read_metadata(path: &str) -> anyhow::Result<AppMetadata> {
    serde_json::from_str(&read_file(path)?).map_err(|e| anyhow!("Could not parse metadata: {e}"))
}

/// Reads the compiled ABI at the provided `path`.
#[allow(unused)] // It is actually
pub fn read_abi(path: &str) -> anyhow::Result<Vec<AbiEntry>> {
    serde_json::from_str(&read_file(path)?).map_err(|e| anyhow!("Could not parse ABI: {e}"))
}

/// Reads the manifest stored in the provided `directory`.
#[allow(unused)] // It is actually
pub fn read_manifest(directory: &str) -> anyhow::Result<Manifest> {
    let path = format!("{directory}/{MANIFEST_FILE_NAME}");
    serde_json::from_str(&read_file(&path)?).map_err(|e| anyhow!("Could not parse manifest: {e}"))
}

/// Reads the file at the provided `path` as text.
#[allow(unused)] // It is actually
pub fn read_file(path: &str) -> anyhow::Result<String> {
    let mut file = File::open(path).map_err(|_| anyhow!("File {path} not available"))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|_| anyhow!("File {path} could not be read"))?;

    Ok(contents)
}
