//! This module contains the recognition of authorization modifiers and the
//! helper functions used to build their parameter lists.

use std::collections::HashSet;

use crate::{
    constant::{AUTH_HELPER_RETURN_ELEMENT, AUTH_MODIFIER, AUTH_PARAMS_MODIFIER},
    parser::node::{
        ContractDefinition,
        Expression,
        FunctionDefinition,
        ModifierInvocation,
        StateMutability,
        Visibility,
    },
    surface::Role,
};

/// The names of the functions in a compilation unit that build role parameter
/// lists, such as `arr(address _a, uint256 _b)`.
///
/// These are `internal pure` functions returning a single `uint256[]`. The set
/// is global to the compilation unit, as helpers are usually inherited from a
/// shared base contract.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthHelpers {
    names: HashSet<String>,
}

impl AuthHelpers {
    /// Collects the auth helpers declared in any of the `contracts`.
    #[must_use]
    pub fn discover<'a>(contracts: impl IntoIterator<Item = &'a ContractDefinition>) -> Self {
        let names = contracts
            .into_iter()
            .flat_map(ContractDefinition::functions)
            .filter(|function| is_auth_helper(function))
            .filter_map(|function| function.name.clone())
            .collect();
        Self { names }
    }

    /// Checks whether `name` is a known auth helper.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Gets the number of distinct helper names found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Checks whether no helpers were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn is_auth_helper(function: &FunctionDefinition) -> bool {
    function.visibility == Some(Visibility::Internal)
        && function.state_mutability == Some(StateMutability::Pure)
        && function.return_parameters.len() == 1
        && function.return_parameters[0]
            .type_name
            .is_dynamic_array_of(AUTH_HELPER_RETURN_ELEMENT)
}

/// Derives the roles required by a function from its `modifiers`.
///
/// Only `auth(ROLE)` and `authP(ROLE, params)` are recognised. The role id is
/// only recovered when the first argument is a plain identifier, and is
/// otherwise left empty. The parameter count is the number of arguments given
/// to an auth helper call in second position, and `0` otherwise.
#[must_use]
pub fn roles_from_modifiers(modifiers: &[ModifierInvocation], helpers: &AuthHelpers) -> Vec<Role> {
    modifiers
        .iter()
        .filter(|modifier| is_auth_modifier(&modifier.name))
        .map(|modifier| {
            let arguments = modifier.arguments.as_deref().unwrap_or_default();
            let id = match arguments.first() {
                Some(Expression::Identifier(name)) => name.clone(),
                other => {
                    log::debug!(
                        "Unrecognised role argument {other:?} in `{}` modifier",
                        modifier.name
                    );
                    String::new()
                }
            };
            let param_count = match arguments.get(1) {
                Some(Expression::Call {
                    callee: Some(callee),
                    arguments,
                }) if helpers.contains(callee) => arguments.len(),
                _ => 0,
            };
            Role::new(id, param_count)
        })
        .collect()
}

fn is_auth_modifier(name: &str) -> bool {
    name == AUTH_MODIFIER || name == AUTH_PARAMS_MODIFIER
}

#[cfg(test)]
mod tests {
    use crate::{
        extractor::auth::{roles_from_modifiers, AuthHelpers},
        parser::node::{
            ContractDefinition,
            ContractKind,
            Expression,
            FunctionDefinition,
            FunctionKind,
            ModifierInvocation,
            Node,
            NodeKind,
            Parameter,
            StateMutability,
            TypeDescriptor,
            Visibility,
        },
        surface::Role,
    };

    fn helper(name: &str, visibility: Visibility, returns: TypeDescriptor) -> Node {
        let function = FunctionDefinition {
            name:              Some(name.into()),
            kind:              FunctionKind::Function,
            is_constructor:    false,
            visibility:        Some(visibility),
            state_mutability:  Some(StateMutability::Pure),
            parameters:        vec![],
            return_parameters: vec![Parameter {
                name:      Some("r".into()),
                type_name: returns,
            }],
            modifiers:         vec![],
        };
        Node::new(NodeKind::FunctionDefinition(function), 0..0)
    }

    fn uint_array() -> TypeDescriptor {
        TypeDescriptor::Array {
            base:   Box::new(TypeDescriptor::Elementary("uint256".into())),
            length: None,
        }
    }

    fn helpers() -> AuthHelpers {
        let contract = ContractDefinition {
            name:           "Sugar".into(),
            kind:           ContractKind::Contract,
            base_contracts: vec![],
            sub_nodes:      vec![
                helper("arr", Visibility::Internal, uint_array()),
                helper("exposed", Visibility::Public, uint_array()),
                helper("single", Visibility::Internal, TypeDescriptor::Elementary("uint256".into())),
            ],
        };
        AuthHelpers::discover([&contract])
    }

    fn invocation(name: &str, arguments: Vec<Expression>) -> ModifierInvocation {
        ModifierInvocation {
            name:      name.into(),
            arguments: Some(arguments),
        }
    }

    #[test]
    fn discovers_only_internal_pure_uint_array_helpers() {
        let helpers = helpers();
        assert_eq!(helpers.len(), 1);
        assert!(helpers.contains("arr"));
    }

    #[test]
    fn counts_helper_arguments() {
        let modifiers = vec![invocation(
            "authP",
            vec![
                Expression::Identifier("SOME_ROLE".into()),
                Expression::Call {
                    callee:    Some("arr".into()),
                    arguments: vec![
                        Expression::Literal("1".into()),
                        Expression::Literal("2".into()),
                        Expression::Literal("3".into()),
                    ],
                },
            ],
        )];
        assert_eq!(
            roles_from_modifiers(&modifiers, &helpers()),
            vec![Role::new("SOME_ROLE", 3)]
        );
    }

    #[test]
    fn ignores_calls_to_unknown_functions() {
        let modifiers = vec![invocation(
            "authP",
            vec![
                Expression::Identifier("SOME_ROLE".into()),
                Expression::Call {
                    callee:    Some("exposed".into()),
                    arguments: vec![Expression::Literal("1".into())],
                },
            ],
        )];
        assert_eq!(
            roles_from_modifiers(&modifiers, &helpers()),
            vec![Role::new("SOME_ROLE", 0)]
        );
    }

    #[test]
    fn leaves_unrecognised_role_ids_empty() {
        let modifiers = vec![
            invocation("auth", vec![Expression::Other]),
            invocation("onlyOwner", vec![]),
            ModifierInvocation {
                name:      "auth".into(),
                arguments: None,
            },
        ];
        let roles = roles_from_modifiers(&modifiers, &helpers());
        assert_eq!(roles, vec![Role::new("", 0), Role::new("", 0)]);
        assert!(roles.iter().all(|role| !role.is_resolved()));
    }
}
