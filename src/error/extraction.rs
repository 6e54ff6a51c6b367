//! This module contains the error type for the structural failures that can
//! occur while walking a syntax tree to extract the contract's functions.

use thiserror::Error;

/// Errors that abort function and role extraction.
///
/// These are structural: no partial result is produced when they occur.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Expected the root node to be a source unit but found a {found}")]
    NotACompilationUnit { found: &'static str },

    #[error("The compilation unit contains no contract definitions")]
    NoContracts,

    #[error("No contract named `{name}` exists in the compilation unit")]
    EntryContractNotFound { name: String },
}

/// The result type for functions that may return extraction errors.
pub type Result<T> = std::result::Result<T, Error>;
