//! This module contains the representation of a compiled contract's ABI, as
//! emitted by the Solidity compiler.
//!
//! Only the fields needed to match functions are typed. Every other field is
//! kept as-is so that the ABI passes through the library unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constant::ABI_FUNCTION_TYPE;

/// A single entry in a contract's ABI.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    /// The kind of entry, such as `function`, `event` or `constructor`.
    ///
    /// The ABI specification allows this to be omitted for functions.
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<AbiParam>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<AbiParam>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,

    /// Any other fields of the entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn function_type() -> String {
    ABI_FUNCTION_TYPE.to_string()
}

impl AbiEntry {
    /// Constructs a function entry called `name` with inputs of the provided
    /// `input_types`.
    #[must_use]
    pub fn function(name: impl Into<String>, input_types: &[&str]) -> Self {
        let inputs = input_types.iter().map(|ty| AbiParam::new("", *ty)).collect();
        Self {
            kind:             function_type(),
            name:             Some(name.into()),
            inputs:           Some(inputs),
            outputs:          Some(Vec::new()),
            state_mutability: Some("nonpayable".to_string()),
            extra:            Map::new(),
        }
    }

    /// Checks whether the entry describes a callable function.
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.kind == ABI_FUNCTION_TYPE
    }

    /// Gets the number of inputs of the entry.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.inputs.as_ref().map_or(0, Vec::len)
    }

    /// Checks whether the entry is a function called `name` taking `arity`
    /// parameters.
    #[must_use]
    pub fn matches(&self, name: &str, arity: usize) -> bool {
        self.is_function() && self.name.as_deref() == Some(name) && self.arity() == arity
    }
}

/// A parameter of an ABI entry.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    /// Any other fields of the parameter, such as `internalType`,
    /// `components` or `indexed`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AbiParam {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name:  name.into(),
            kind:  kind.into(),
            extra: Map::new(),
        }
    }
}

/// Finds the first function entry in `abi` called `name` taking `arity`
/// parameters.
///
/// Overloads with the same arity cannot be told apart, so the first is
/// returned.
#[must_use]
pub fn find_function<'a>(abi: &'a [AbiEntry], name: &str, arity: usize) -> Option<&'a AbiEntry> {
    abi.iter().find(|entry| entry.matches(name, arity))
}
