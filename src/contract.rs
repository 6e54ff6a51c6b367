//! This module contains types useful for dealing with the contract sources
//! that you want to analyze.

use std::path::Path;

use crate::{error, extractor};

/// The contract source that is to be analyzed by the library.
///
/// This pairs the flattened source text with the target that identifies the
/// entry contract within it, and is intended to be immutable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contract {
    /// The flattened source text.
    source: String,

    /// The file name or path identifying the entry contract.
    target: String,
}

impl Contract {
    /// Creates a new contract from the provided `source` text and `target`.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self { source, target }
    }

    /// Creates a new contract by reading the flattened source at `path`, using
    /// the path itself as the target.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> error::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            error::Error::other(format!("Could not read {}: {e}", path.display()))
        })?;

        Ok(Self::new(source, path.to_string_lossy()))
    }

    /// Gets the flattened source text of the contract.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Gets the target identifying the entry contract.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Gets the name of the entry contract, derived from the target.
    #[must_use]
    pub fn name(&self) -> &str {
        extractor::target_contract_name(&self.target)
    }
}

#[cfg(test)]
mod tests {
    use crate::contract::Contract;

    #[test]
    fn derives_the_contract_name_from_the_target() {
        let contract = Contract::new("contract Vault {}", "contracts/Vault.sol");
        assert_eq!(contract.source(), "contract Vault {}");
        assert_eq!(contract.target(), "contracts/Vault.sol");
        assert_eq!(contract.name(), "Vault");
    }

    #[test]
    fn reports_unreadable_files() {
        let result = Contract::from_file("does/not/exist/Vault.sol");
        assert!(result.is_err());
    }
}
