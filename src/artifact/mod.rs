//! This module contains the assembly of the artifact: the canonical document
//! describing a contract's roles, callable functions, ABI and deployment
//! environments, as consumed by client and governance tooling.
//!
//! There are two ways of producing an artifact, which share the same core:
//!
//! - [`generate_artifact_from_functions`] for callers that already have the
//!   extracted functions.
//! - [`generate_artifact_from_source`] for callers with flattened source text,
//!   which runs the whole [`crate::analyzer`] pipeline first.

use std::collections::BTreeMap;

use derivative::Derivative;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    abi::{self, AbiEntry},
    analyzer,
    constant::DEFAULT_FLATTENED_CODE_PATH,
    contract::Contract,
    error,
    error::artifact::Error,
    extractor,
    metadata::{AppMetadata, DeclaredRole, Environment},
    surface::ContractFunction,
    utility,
};

/// The artifact field names written by the assembler, which declared metadata
/// cannot override.
const RESERVED_FIELDS: [&str; 3] = ["functions", "abi", "flattenedCode"];

/// The configuration for artifact assembly.
#[derive(Clone, Debug, Derivative, Eq, PartialEq)]
#[derivative(Default)]
pub struct Config {
    /// The reference to the flattened source written into the artifact.
    ///
    /// Defaults to [`DEFAULT_FLATTENED_CODE_PATH`].
    #[derivative(Default(value = "DEFAULT_FLATTENED_CODE_PATH.to_string()"))]
    pub flattened_code_path: String,
}

impl Config {
    /// Sets the `flattened_code_path` config parameter to `value`.
    #[must_use]
    pub fn with_flattened_code_path(mut self, value: impl Into<String>) -> Config {
        self.flattened_code_path = value.into();
        self
    }
}

/// The artifact describing an application's contract.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// The path of the entry contract, as declared.
    pub path: String,

    /// The declared roles, each with its `bytes` computed.
    pub roles: Vec<DeclaredRole>,

    /// The declared environments, each with its `appId` computed.
    pub environments: BTreeMap<String, Environment>,

    /// The callable, state-changing functions of the contract.
    pub functions: Vec<ArtifactFunction>,

    /// The compiled ABI, unchanged.
    pub abi: Vec<AbiEntry>,

    /// The reference to the flattened source of the contract.
    pub flattened_code: String,

    /// The other declared metadata fields, unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Artifact {
    /// Serializes the artifact as pretty-printed JSON, as it is persisted to
    /// [`crate::constant::ARTIFACT_FILE_NAME`].
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the artifact cannot be serialized.
    pub fn to_json_pretty(&self) -> error::artifact::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Gets the function with the provided `signature`, if there is one.
    #[must_use]
    pub fn function(&self, signature: &str) -> Option<&ArtifactFunction> {
        self.functions.iter().find(|f| f.sig == signature)
    }
}

/// A function as it appears in the artifact.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ArtifactFunction {
    /// The name of the function, empty for the fallback function.
    pub name: String,

    /// The canonical signature of the function.
    pub sig: String,

    /// The ids of the roles required to call the function.
    pub roles: Vec<String>,

    /// The notice of the function, `null` if none was found.
    pub notice: Option<String>,

    /// The matching ABI entry, absent if none could be found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<AbiEntry>,

    /// Reserved for parameter descriptions, and currently always empty.
    #[serde(default)]
    pub params: Vec<String>,
}

/// Assembles an artifact from already-extracted `functions`.
///
/// Each function is matched to the first function entry in `abi` with the same
/// name and number of parameters. Functions without a match are kept, with no
/// ABI entry.
#[must_use]
pub fn generate_artifact_from_functions(
    metadata: &AppMetadata,
    abi: &[AbiEntry],
    functions: &[ContractFunction],
    config: &Config,
) -> Artifact {
    let functions = functions
        .iter()
        .map(|function| decorate_function(function, abi))
        .collect();
    let roles = metadata.roles.iter().map(decorate_role).collect();
    let environments = metadata
        .environments
        .iter()
        .map(|(name, environment)| (name.clone(), decorate_environment(environment)))
        .collect();
    let extra = metadata
        .extra
        .iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Artifact {
        path: metadata.path.clone(),
        roles,
        environments,
        functions,
        abi: abi.to_vec(),
        flattened_code: config.flattened_code_path.clone(),
        extra,
    }
}

/// Assembles an artifact from the flattened `source`, extracting the functions
/// of the contract identified by `target` first.
///
/// # Errors
///
/// Returns [`Err`] if `target` is empty, or if parsing or extraction fails.
pub fn generate_artifact_from_source(
    metadata: &AppMetadata,
    abi: &[AbiEntry],
    source: &str,
    target: &str,
    extractor_config: &extractor::Config,
    config: &Config,
) -> error::Result<Artifact> {
    if target.trim().is_empty() {
        return Err(Error::InvalidInput(
            "a target contract is required to extract functions from source".into(),
        )
        .into());
    }

    let contract = Contract::new(source, target);
    let extracted = analyzer::new(contract, extractor_config.clone()).parse()?.extract()?;

    Ok(extracted.assemble(metadata, abi, config))
}

fn decorate_function(function: &ContractFunction, abi: &[AbiEntry]) -> ArtifactFunction {
    let entry = abi::find_function(abi, function.name(), function.parameter_types().len()).cloned();
    if entry.is_none() {
        log::debug!("No ABI entry matches `{}`", function.signature());
    }

    ArtifactFunction {
        name:   function.name().to_string(),
        sig:    function.signature().to_string(),
        roles:  function.roles().iter().map(|role| role.id.clone()).collect(),
        notice: function.notice().map(ToString::to_string),
        abi:    entry,
        params: Vec::new(),
    }
}

fn decorate_role(role: &DeclaredRole) -> DeclaredRole {
    DeclaredRole {
        bytes: Some(utility::role_bytes(&role.id)),
        ..role.clone()
    }
}

fn decorate_environment(environment: &Environment) -> Environment {
    Environment {
        app_id: environment.app_name.as_deref().map(utility::namehash),
        ..environment.clone()
    }
}
