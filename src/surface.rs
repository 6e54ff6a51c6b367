//! This module contains the representation types for the callable surface of
//! a contract: its state-changing functions and the roles that guard them.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::signature;

/// A role required by a function, as observed in an authorization modifier.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// The name of the constant passed as the role, or the empty string if the
    /// argument was not a plain identifier.
    pub id: String,

    /// The number of parameters the role check is invoked with, or `0` if it
    /// could not be determined.
    pub param_count: usize,
}

impl Role {
    /// Constructs a new role with the provided `id` and `param_count`.
    #[must_use]
    pub fn new(id: impl Into<String>, param_count: usize) -> Self {
        let id = id.into();
        Self { id, param_count }
    }

    /// Checks whether the role id could be recovered from the source.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.id.is_empty()
    }
}

/// A public or external state-changing function of a contract.
///
/// The identity of the function (its name, signature and roles) is fixed at
/// construction. Later passes may only add information through
/// [`Self::with_notice`], which produces a new value.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFunction {
    /// The name of the function, empty for the fallback function.
    name: String,

    /// The canonical signature of the function.
    #[serde(rename = "sig")]
    signature: String,

    /// The canonical types of the parameters, in order.
    parameter_types: Vec<String>,

    /// The doc-comment notice, where `None` means that no notice was found.
    notice: Option<String>,

    /// The roles required to call the function, in modifier order.
    roles: Vec<Role>,
}

impl ContractFunction {
    /// Constructs a new function called `name` (absent for the fallback
    /// function) that takes parameters of the provided canonical
    /// `parameter_types` and requires `roles`.
    #[must_use]
    pub fn new(name: Option<&str>, parameter_types: Vec<String>, roles: Vec<Role>) -> Self {
        let signature = signature::render(name, &parameter_types);
        let name = name.unwrap_or_default().to_string();
        Self {
            name,
            signature,
            parameter_types,
            notice: None,
            roles,
        }
    }

    /// Returns a copy of the function with its notice set to `notice`.
    #[must_use]
    pub fn with_notice(&self, notice: Option<String>) -> Self {
        Self {
            notice,
            ..self.clone()
        }
    }

    /// Gets the name of the function, empty for the fallback function.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the canonical signature, such as `transfer(address,uint256)`.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Gets the canonical parameter types, in declaration order.
    #[must_use]
    pub fn parameter_types(&self) -> &[String] {
        &self.parameter_types
    }

    /// Gets the notice, if one was attached.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Gets the roles required to call the function.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Checks whether this is the unnamed fallback function.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.name.is_empty()
    }
}

/// The roles and functions found in a contract.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractInfo {
    /// Every resolved role referenced by the functions, de-duplicated by id.
    ///
    /// Where a role occurs with differing parameter counts, the first
    /// occurrence is kept.
    pub roles: Vec<Role>,

    /// The functions of the contract.
    pub functions: Vec<ContractFunction>,
}

impl ContractInfo {
    /// Builds the contract info from the extracted `functions`.
    #[must_use]
    pub fn from_functions(functions: Vec<ContractFunction>) -> Self {
        let roles = unique_roles(&functions);
        Self { roles, functions }
    }
}

/// Flattens the roles of all `functions` into a list de-duplicated by id,
/// keeping the first occurrence of each and skipping unresolved roles.
#[must_use]
pub fn unique_roles(functions: &[ContractFunction]) -> Vec<Role> {
    functions
        .iter()
        .flat_map(ContractFunction::roles)
        .filter(|role| role.is_resolved())
        .unique_by(|role| role.id.clone())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::surface::{ContractFunction, ContractInfo, Role};

    #[test]
    fn computes_signature_on_construction() {
        let types = vec!["address".to_string(), "uint256".to_string()];
        let function = ContractFunction::new(Some("transfer"), types, vec![]);
        assert_eq!(function.signature(), "transfer(address,uint256)");
        assert!(!function.is_fallback());

        let fallback = ContractFunction::new(None, vec![], vec![]);
        assert_eq!(fallback.signature(), "fallback");
        assert!(fallback.is_fallback());
    }

    #[test]
    fn enriching_keeps_identity() {
        let function = ContractFunction::new(Some("f"), vec![], vec![Role::new("R", 1)]);
        let enriched = function.with_notice(Some("Does things".into()));
        assert_eq!(enriched.signature(), function.signature());
        assert_eq!(enriched.roles(), function.roles());
        assert_eq!(enriched.notice(), Some("Does things"));
        assert_eq!(function.notice(), None);
    }

    #[test]
    fn deduplicates_roles_keeping_first() {
        let functions = vec![
            ContractFunction::new(Some("a"), vec![], vec![Role::new("X", 2)]),
            ContractFunction::new(Some("b"), vec![], vec![Role::new("X", 0), Role::new("", 0)]),
            ContractFunction::new(Some("c"), vec![], vec![Role::new("Y", 0)]),
        ];
        let info = ContractInfo::from_functions(functions);
        assert_eq!(info.roles, vec![Role::new("X", 2), Role::new("Y", 0)]);
    }

    #[test]
    fn serializes_missing_notice_as_null() {
        let function = ContractFunction::new(Some("f"), vec![], vec![]);
        let value = serde_json::to_value(&function).unwrap();
        assert_eq!(value["notice"], json!(null));
        assert_eq!(value["sig"], json!("f()"));

        let empty = function.with_notice(Some(String::new()));
        let value = serde_json::to_value(&empty).unwrap();
        assert_eq!(value["notice"], json!(""));
    }
}
