//! This module contains the primary error type for the library's interface.
//! It also re-exports the more specific error types that are
//! subsystem-specific.

pub mod artifact;
pub mod container;
pub mod extraction;
pub mod parse;
pub mod validation;

use thiserror::Error;

/// The interface result type for the library.
///
/// # Usage
///
/// Any function considered to be part of the public interface of the library
/// should return this result type. Subsystems should return the more-specific
/// child error types as appropriate.
pub type Result<T> = std::result::Result<T, Errors>;

/// The interface error type for the library.
///
/// All errors returned from the library interface (and hence encountered by the
/// clients of the library) should be members of this enum.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Errors that come from the grammar rejecting the source text.
    #[error(transparent)]
    Parse(#[from] parse::LocatedError),

    /// Structural errors from walking the syntax tree.
    #[error(transparent)]
    Extraction(#[from] extraction::Error),

    /// Errors from assembling the artifact.
    #[error(transparent)]
    Artifact(#[from] artifact::Error),

    /// Errors from enforcing a validation policy.
    #[error(transparent)]
    Validation(#[from] validation::Error),

    /// An unknown error, represented as a string.
    #[error("Unknown Error: {_0:?}")]
    Other(String),
}

impl Error {
    /// Constructs an unknown error with the provided `message`.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// A container of errors that may occur in the library.
pub type Errors = container::Errors<Error>;

/// Allow conversion from the parse errors container to the general errors
/// container, preserving the order of the diagnostics.
impl From<parse::Errors> for Errors {
    fn from(value: parse::Errors) -> Self {
        let errs: Vec<parse::LocatedError> = value.into();
        let new_errs: Vec<Error> = errs.into_iter().map(std::convert::Into::into).collect();

        new_errs.into()
    }
}

impl From<extraction::Error> for Errors {
    fn from(value: extraction::Error) -> Self {
        Error::from(value).into()
    }
}

impl From<artifact::Error> for Errors {
    fn from(value: artifact::Error) -> Self {
        Error::from(value).into()
    }
}

impl From<validation::Error> for Errors {
    fn from(value: validation::Error) -> Self {
        Error::from(value).into()
    }
}
