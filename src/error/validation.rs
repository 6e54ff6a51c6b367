//! This module contains the error type produced when a validation report is
//! enforced under a strict policy.

use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error(
        "Validation rejected with {role_errors} role mismatch(es) and {missing_files} missing \
         required file(s)"
    )]
    Rejected {
        role_errors:   usize,
        missing_files: usize,
    },
}

/// The result type for functions that may return validation errors.
pub type Result<T> = std::result::Result<T, Error>;
