//! This module contains the validation report, which gathers the advisory
//! findings about an application, and the policies for acting on it.
//!
//! Findings are always collected as data. Whether they block the caller is a
//! decision made by [`Report::enforce`] with an explicit [`Policy`].

use serde::Serialize;

use crate::{
    error::validation::{Error, Result},
    manifest::MissingFile,
    roles::RoleMatchError,
};

/// How the findings of a [`Report`] are acted upon.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Policy {
    /// Any role mismatch or missing required file rejects the report.
    Strict,

    /// Every finding is logged as a warning and the report is accepted.
    #[default]
    Lenient,
}

/// The findings of validating an application.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub role_errors: Vec<RoleMatchError>,

    pub missing_files: Vec<MissingFile>,
}

impl Report {
    #[must_use]
    pub fn new(role_errors: Vec<RoleMatchError>, missing_files: Vec<MissingFile>) -> Self {
        Self {
            role_errors,
            missing_files,
        }
    }

    /// Returns `true` if there are no findings at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.role_errors.is_empty() && self.missing_files.is_empty()
    }

    /// Gets the missing files that are required.
    pub fn required_missing_files(&self) -> impl Iterator<Item = &MissingFile> {
        self.missing_files.iter().filter(|file| file.required)
    }

    /// Acts on the findings according to `policy`.
    ///
    /// Optional missing files never reject a report.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] under [`Policy::Strict`] if there is any role mismatch
    /// or any missing required file.
    pub fn enforce(&self, policy: Policy) -> Result<()> {
        match policy {
            Policy::Strict => {
                let role_errors = self.role_errors.len();
                let missing_files = self.required_missing_files().count();
                if role_errors == 0 && missing_files == 0 {
                    Ok(())
                } else {
                    Err(Error::Rejected {
                        role_errors,
                        missing_files,
                    })
                }
            }
            Policy::Lenient => {
                for error in &self.role_errors {
                    log::warn!("{}", error.message);
                }
                for file in &self.missing_files {
                    let kind = if file.required { "Required" } else { "Optional" };
                    log::warn!("{kind} file `{}` is missing: {}", file.id, file.path);
                }
                Ok(())
            }
        }
    }
}
