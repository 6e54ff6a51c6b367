//! This module contains the error type for artifact assembly.

use thiserror::Error;

/// Errors that prevent an artifact from being assembled.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Invalid input: {_0}")]
    InvalidInput(String),

    #[error("Could not serialize the artifact: {_0}")]
    Serialization(String),
}

/// The result type for functions that may return artifact errors.
pub type Result<T> = std::result::Result<T, Error>;
