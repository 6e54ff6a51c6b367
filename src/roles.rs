//! This module cross-validates the roles a contract actually uses against the
//! roles declared in its metadata.
//!
//! The findings are returned as data rather than errors, so that the caller
//! can decide whether a mismatch blocks its workflow (see
//! [`crate::validation`]).

use itertools::Itertools;
use serde::Serialize;

use crate::{
    metadata::DeclaredRole,
    surface::{self, ContractFunction, Role},
};

/// The kinds of disagreement between declared and used roles.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RoleMatchKind {
    /// The role is declared but no function requires it.
    Unused,

    /// The role is declared with a different number of parameters than it is
    /// used with.
    ParamCountMismatch,

    /// The role is required by a function but is not declared.
    Undeclared,

    /// The role is used with more than one parameter count in the contract.
    ConflictingParamCounts,
}

/// A reported mismatch for the role `id`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoleMatchError {
    /// The id of the role in question.
    pub id: String,

    /// A human-readable description of the mismatch.
    pub message: String,

    /// The kind of mismatch, which is not part of the serialized form.
    #[serde(skip)]
    pub kind: RoleMatchKind,
}

impl RoleMatchError {
    fn unused(id: &str) -> Self {
        Self {
            id:      id.to_string(),
            message: format!("Role {id} is declared but not used in the contract"),
            kind:    RoleMatchKind::Unused,
        }
    }

    fn mismatch(id: &str, declared: usize, used: usize) -> Self {
        Self {
            id:      id.to_string(),
            message: format!(
                "Role {id} is declared with {declared} parameter(s) but used with {used} \
                 parameter(s) in the contract"
            ),
            kind:    RoleMatchKind::ParamCountMismatch,
        }
    }

    fn undeclared(id: &str) -> Self {
        Self {
            id:      id.to_string(),
            message: format!("Role {id} is used in the contract but not declared"),
            kind:    RoleMatchKind::Undeclared,
        }
    }

    fn conflicting(id: &str, counts: &[usize]) -> Self {
        Self {
            id:      id.to_string(),
            message: format!(
                "Role {id} is used with differing parameter counts: {}",
                counts.iter().join(", ")
            ),
            kind:    RoleMatchKind::ConflictingParamCounts,
        }
    }
}

/// Gets the roles used by the `functions`, de-duplicated by id with the first
/// occurrence of each kept.
#[must_use]
pub fn used_roles(functions: &[ContractFunction]) -> Vec<Role> {
    surface::unique_roles(functions)
}

/// Compares the roles used by `functions` with the `declared` roles.
///
/// Declared roles are checked first, in declaration order, for being unused or
/// having a mismatched parameter count. Used roles are then checked, in order
/// of first use, for being undeclared. Roles used with conflicting parameter
/// counts are logged as warnings; see [`param_count_conflicts`].
#[must_use]
pub fn validate_roles(functions: &[ContractFunction], declared: &[DeclaredRole]) -> Vec<RoleMatchError> {
    let used = used_roles(functions);
    for conflict in param_count_conflicts(functions) {
        log::warn!("{}", conflict.message);
    }

    let mut errors = Vec::new();
    for role in declared {
        match used.iter().find(|u| u.id == role.id) {
            None => errors.push(RoleMatchError::unused(&role.id)),
            Some(u) if u.param_count != role.expected_param_count() => errors.push(
                RoleMatchError::mismatch(&role.id, role.expected_param_count(), u.param_count),
            ),
            Some(_) => {}
        }
    }
    for role in &used {
        if !declared.iter().any(|d| d.id == role.id) {
            errors.push(RoleMatchError::undeclared(&role.id));
        }
    }

    errors
}

/// Finds the roles that `functions` use with more than one distinct parameter
/// count.
///
/// De-duplication keeps only the first count seen, which can hide an
/// inconsistent use of a role.
#[must_use]
pub fn param_count_conflicts(functions: &[ContractFunction]) -> Vec<RoleMatchError> {
    used_roles(functions)
        .iter()
        .filter_map(|role| {
            let counts: Vec<usize> = functions
                .iter()
                .flat_map(ContractFunction::roles)
                .filter(|r| r.id == role.id)
                .map(|r| r.param_count)
                .unique()
                .collect();
            (counts.len() > 1).then(|| RoleMatchError::conflicting(&role.id, &counts))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{
        metadata::DeclaredRole,
        roles::{param_count_conflicts, validate_roles, RoleMatchKind},
        surface::{ContractFunction, Role},
    };

    fn function(name: &str, roles: Vec<Role>) -> ContractFunction {
        ContractFunction::new(Some(name), vec![], roles)
    }

    fn params(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("param {i}")).collect()
    }

    #[test]
    fn reports_a_single_mismatch_for_count_discrepancies() {
        let functions = vec![function("x", vec![Role::new("ROLE_X", 0)])];
        let declared = vec![DeclaredRole::new("ROLE_X", params(2))];

        let errors = validate_roles(&functions, &declared);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, "ROLE_X");
        assert_eq!(errors[0].kind, RoleMatchKind::ParamCountMismatch);
        assert!(errors[0].message.contains('2'));
        assert!(errors[0].message.contains('0'));
    }

    #[test]
    fn reports_unused_and_undeclared_roles() {
        let functions = vec![function("a", vec![Role::new("USED", 1)])];
        let declared = vec![DeclaredRole::new("DECLARED", vec![])];

        let errors = validate_roles(&functions, &declared);
        let kinds: Vec<_> = errors.iter().map(|e| (e.id.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("DECLARED", RoleMatchKind::Unused),
                ("USED", RoleMatchKind::Undeclared)
            ]
        );
    }

    #[test]
    fn accepts_matching_roles() {
        let functions = vec![
            function("a", vec![Role::new("A", 2)]),
            function("b", vec![Role::new("A", 2), Role::new("B", 0)]),
        ];
        let declared = vec![
            DeclaredRole::new("A", params(2)),
            DeclaredRole::new("B", vec![]),
        ];
        assert!(validate_roles(&functions, &declared).is_empty());
    }

    #[test]
    fn is_stable_across_runs() {
        let functions = vec![
            function("a", vec![Role::new("A", 1)]),
            function("b", vec![Role::new("C", 0)]),
        ];
        let declared = vec![DeclaredRole::new("A", vec![]), DeclaredRole::new("B", vec![])];
        assert_eq!(
            validate_roles(&functions, &declared),
            validate_roles(&functions, &declared)
        );
    }

    #[test]
    fn first_use_wins_and_conflicts_are_surfaced() {
        let functions = vec![
            function("a", vec![Role::new("A", 2)]),
            function("b", vec![Role::new("A", 0)]),
        ];
        let declared = vec![DeclaredRole::new("A", params(2))];
        assert!(validate_roles(&functions, &declared).is_empty());

        let conflicts = param_count_conflicts(&functions);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, RoleMatchKind::ConflictingParamCounts);
        assert!(conflicts[0].message.ends_with("2, 0"));
    }
}
