//! This module contains the declared metadata of an application: the roles it
//! expects its contract to use, the environments it is deployed to, and the
//! path of its entry contract.
//!
//! Fields that the library does not interpret are preserved so that they pass
//! through to the artifact unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The declared metadata of an application.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AppMetadata {
    /// The roles the contract is expected to use.
    #[serde(default)]
    pub roles: Vec<DeclaredRole>,

    /// The deployment environments, by name.
    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,

    /// The path of the entry contract's source file.
    #[serde(default)]
    pub path: String,

    /// Any other declared fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A role as declared in the application metadata.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DeclaredRole {
    /// A human-readable name for the role.
    #[serde(default)]
    pub name: String,

    /// The identifier of the role, matching the constant used in the source.
    pub id: String,

    /// Descriptions of the parameters the role is checked with. Only the
    /// length is significant to validation.
    #[serde(default)]
    pub params: Vec<String>,

    /// The `0x`-prefixed keccak256 hash of the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeclaredRole {
    /// Constructs a declared role with the provided `id` and `params`.
    #[must_use]
    pub fn new(id: impl Into<String>, params: Vec<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            params,
            ..Self::default()
        }
    }

    /// Gets the number of parameters the role is expected to be checked with.
    #[must_use]
    pub fn expected_param_count(&self) -> usize {
        self.params.len()
    }
}

/// A deployment environment for the application.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// The ENS name of the application, such as `finance.aragonpm.eth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// The namehash of [`Self::app_name`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
