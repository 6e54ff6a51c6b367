//! This module contains the error type that pertains to turning contract
//! source text into a syntax tree.

use thiserror::Error;

use crate::error::container;

/// Errors that occur when the grammar rejects the provided source text.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("{_0}")]
    Syntax(String),

    #[error("The contract source is empty")]
    EmptySource,
}

/// A parse error with an associated location in the source.
pub type LocatedError = container::Located<Error>;

/// A container for the (possibly many) diagnostics produced by one parse.
pub type Errors = container::Errors<LocatedError>;

/// The result type for functions that may return parse errors.
pub type Result<T> = std::result::Result<T, Errors>;

/// Make it possible to attach locations to these errors.
impl container::Locatable for Error {
    type Located = LocatedError;

    fn locate(self, offset: usize) -> Self::Located {
        container::Located {
            location: offset,
            payload:  self,
        }
    }
}
