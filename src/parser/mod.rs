//! This module turns flattened contract source text into the library's typed
//! syntax tree.
//!
//! The grammar itself is provided by [`solang_parser`]. This module only lowers
//! its parse tree into the [`node::Node`] representation, keeping the shapes
//! that the extraction passes care about and discarding everything else.

pub mod node;

use std::ops::Range;

use solang_parser::{
    diagnostics::Diagnostic,
    pt::{self, CodeLocation},
};

use crate::{
    error::{container::Locatable, parse},
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
        StateVariableDeclaration,
        TypeDescriptor,
        Visibility,
    },
    signature,
};

/// Parses the provided `source` into a tree rooted at a
/// [`NodeKind::SourceUnit`].
///
/// The source is expected to be a single compilation unit with all of its
/// imports already inlined.
///
/// # Errors
///
/// Returns [`Err`] containing every diagnostic produced by the grammar if the
/// source cannot be parsed, or if it is empty.
pub fn parse(source: &str) -> parse::Result<Node> {
    if source.trim().is_empty() {
        return Err(parse::Error::EmptySource.locate(0).into());
    }

    let (unit, _comments) = solang_parser::parse(source, 0).map_err(lower_diagnostics)?;
    let parts = unit.0.iter().map(lower_source_unit_part).collect();

    Ok(Node::new(NodeKind::SourceUnit(parts), 0..source.len()))
}

/// Converts the grammar's diagnostics into the library's located parse errors.
fn lower_diagnostics(diagnostics: Vec<Diagnostic>) -> parse::Errors {
    let mut errors = parse::Errors::new();
    let located: Vec<parse::LocatedError> = diagnostics
        .into_iter()
        .map(|d| parse::Error::Syntax(d.message).locate(span(&d.loc).start))
        .collect();
    errors.add_many_located(located);
    errors
}

/// Gets the byte range covered by a grammar location.
fn span(loc: &pt::Loc) -> Range<usize> {
    match loc {
        pt::Loc::File(_, start, end) => *start..*end,
        _ => 0..0,
    }
}

fn lower_source_unit_part(part: &pt::SourceUnitPart) -> Node {
    match part {
        pt::SourceUnitPart::ContractDefinition(contract) => lower_contract(contract),
        other => Node::new(NodeKind::Other, span(&other.loc())),
    }
}

fn lower_contract(contract: &pt::ContractDefinition) -> Node {
    let name = contract
        .name
        .as_ref()
        .map(|id| id.name.clone())
        .unwrap_or_default();
    let kind = match contract.ty {
        pt::ContractTy::Abstract(_) => ContractKind::Abstract,
        pt::ContractTy::Contract(_) => ContractKind::Contract,
        pt::ContractTy::Interface(_) => ContractKind::Interface,
        pt::ContractTy::Library(_) => ContractKind::Library,
    };
    let base_contracts = contract.base.iter().map(|base| path_name(&base.name)).collect();
    let sub_nodes = contract
        .parts
        .iter()
        .map(|part| lower_contract_part(part, &name))
        .collect();

    let definition = ContractDefinition {
        name,
        kind,
        base_contracts,
        sub_nodes,
    };
    Node::new(NodeKind::ContractDefinition(definition), span(&contract.loc))
}

fn lower_contract_part(part: &pt::ContractPart, contract_name: &str) -> Node {
    match part {
        pt::ContractPart::FunctionDefinition(function) => {
            let definition = lower_function(function, contract_name);
            Node::new(NodeKind::FunctionDefinition(definition), span(&function.loc))
        }
        pt::ContractPart::VariableDefinition(variable) => {
            let declaration = StateVariableDeclaration {
                name:        variable.name.as_ref().map(|id| id.name.clone()),
                type_name:   lower_type(&variable.ty),
                is_constant: variable
                    .attrs
                    .iter()
                    .any(|attr| matches!(attr, pt::VariableAttribute::Constant(_))),
            };
            Node::new(
                NodeKind::StateVariableDeclaration(declaration),
                span(&variable.loc),
            )
        }
        other => Node::new(NodeKind::Other, span(&other.loc())),
    }
}

fn lower_function(function: &pt::FunctionDefinition, contract_name: &str) -> FunctionDefinition {
    let kind = match function.ty {
        pt::FunctionTy::Constructor => FunctionKind::Constructor,
        pt::FunctionTy::Function => FunctionKind::Function,
        pt::FunctionTy::Fallback => FunctionKind::Fallback,
        pt::FunctionTy::Receive => FunctionKind::Receive,
        pt::FunctionTy::Modifier => FunctionKind::Modifier,
    };

    // The grammar may name the special functions after their keyword, but they
    // are unnamed as far as signatures are concerned.
    let name = match kind {
        FunctionKind::Fallback | FunctionKind::Receive => None,
        _ => function
            .name
            .as_ref()
            .map(|id| id.name.clone())
            .filter(|name| !name.is_empty()),
    };

    // Contracts written before the `constructor` keyword used a function named
    // after the contract.
    let is_constructor = kind == FunctionKind::Constructor
        || (kind == FunctionKind::Function && name.as_deref() == Some(contract_name));

    let mut visibility = None;
    let mut state_mutability = None;
    let mut modifiers = Vec::new();
    for attribute in &function.attributes {
        match attribute {
            pt::FunctionAttribute::Visibility(v) => visibility = Some(lower_visibility(v)),
            pt::FunctionAttribute::Mutability(m) => state_mutability = Some(lower_mutability(m)),
            pt::FunctionAttribute::BaseOrModifier(_, base) => modifiers.push(ModifierInvocation {
                name:      path_name(&base.name),
                arguments: base
                    .args
                    .as_ref()
                    .map(|args| args.iter().map(lower_expression).collect()),
            }),
            _ => {}
        }
    }

    FunctionDefinition {
        name,
        kind,
        is_constructor,
        visibility,
        state_mutability,
        parameters: lower_parameters(&function.params),
        return_parameters: lower_parameters(&function.returns),
        modifiers,
    }
}

fn lower_visibility(visibility: &pt::Visibility) -> Visibility {
    match visibility {
        pt::Visibility::External(_) => Visibility::External,
        pt::Visibility::Public(_) => Visibility::Public,
        pt::Visibility::Internal(_) => Visibility::Internal,
        pt::Visibility::Private(_) => Visibility::Private,
    }
}

fn lower_mutability(mutability: &pt::Mutability) -> StateMutability {
    match mutability {
        pt::Mutability::Pure(_) => StateMutability::Pure,
        pt::Mutability::View(_) => StateMutability::View,
        pt::Mutability::Constant(_) => StateMutability::Constant,
        pt::Mutability::Payable(_) => StateMutability::Payable,
    }
}

fn lower_parameters(parameters: &pt::ParameterList) -> Vec<Parameter> {
    parameters
        .iter()
        .filter_map(|(_, parameter)| parameter.as_ref())
        .map(|parameter| Parameter {
            name:      parameter.name.as_ref().map(|id| id.name.clone()),
            type_name: lower_type(&parameter.ty),
        })
        .collect()
}

/// Resolves the expression used in type position into a [`TypeDescriptor`].
fn lower_type(ty: &pt::Expression) -> TypeDescriptor {
    match ty {
        pt::Expression::Type(_, ty) => lower_elementary(ty),
        pt::Expression::ArraySubscript(_, base, length) => {
            let length = match length.as_deref() {
                None => None,
                Some(pt::Expression::NumberLiteral(_, integer, exponent, ..)) => {
                    let literal = if exponent.is_empty() {
                        integer.clone()
                    } else {
                        format!("{integer}e{exponent}")
                    };
                    match signature::array_length(&literal) {
                        Some(length) => Some(length),
                        None => return TypeDescriptor::Unknown,
                    }
                }
                Some(pt::Expression::HexNumberLiteral(_, value, ..)) => {
                    let digits = value.trim_start_matches("0x").trim_start_matches("0X");
                    match signature::array_length(&format!("0x{digits}")) {
                        Some(length) => Some(length),
                        None => return TypeDescriptor::Unknown,
                    }
                }
                Some(pt::Expression::Variable(id)) => Some(id.name.clone()),
                Some(_) => return TypeDescriptor::Unknown,
            };
            TypeDescriptor::Array {
                base: Box::new(lower_type(base)),
                length,
            }
        }
        pt::Expression::Variable(id) => {
            // Keywords the grammar has no dedicated type for, such as `fixed`,
            // arrive as plain names.
            let expanded = signature::expand_elementary(&id.name);
            if signature::is_elementary(&expanded) {
                TypeDescriptor::Elementary(expanded)
            } else {
                TypeDescriptor::UserDefined(id.name.clone())
            }
        }
        pt::Expression::MemberAccess(_, _, member) => TypeDescriptor::UserDefined(member.name.clone()),
        _ => TypeDescriptor::Unknown,
    }
}

fn lower_elementary(ty: &pt::Type) -> TypeDescriptor {
    let name = match ty {
        pt::Type::Address | pt::Type::AddressPayable | pt::Type::Payable => "address".to_string(),
        pt::Type::Bool => "bool".to_string(),
        pt::Type::String => "string".to_string(),
        pt::Type::Int(width) => format!("int{width}"),
        pt::Type::Uint(width) => format!("uint{width}"),
        pt::Type::Bytes(length) => format!("bytes{length}"),
        pt::Type::DynamicBytes => "bytes".to_string(),
        pt::Type::Function { .. } => "function".to_string(),
        _ => return TypeDescriptor::Unknown,
    };
    TypeDescriptor::Elementary(name)
}

fn lower_expression(expression: &pt::Expression) -> Expression {
    match expression {
        pt::Expression::Variable(id) => Expression::Identifier(id.name.clone()),
        pt::Expression::FunctionCall(_, callee, arguments) => Expression::Call {
            callee:    match callee.as_ref() {
                pt::Expression::Variable(id) => Some(id.name.clone()),
                _ => None,
            },
            arguments: arguments.iter().map(lower_expression).collect(),
        },
        pt::Expression::NumberLiteral(_, value, ..) => Expression::Literal(value.clone()),
        _ => Expression::Other,
    }
}

/// Joins a dotted identifier path such as `Lib.Base` back into text.
fn path_name(path: &pt::IdentifierPath) -> String {
    path.identifiers
        .iter()
        .map(|id| id.name.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        node::{Expression, FunctionKind, NodeKind, StateMutability, TypeDescriptor, Visibility},
        parse,
    };

    const SOURCE: &str = r"
pragma solidity ^0.8.0;

contract Base {
    function baseAction(address who) external {}
}

contract Vault is Base {
    bytes32 public constant MOVE_ROLE = keccak256('MOVE_ROLE');
    uint256 count;

    constructor() {}

    function move(address to, uint amount, bytes32[2] calldata tags) external authP(MOVE_ROLE, arr(to, amount)) {}

    function peek() public view returns (uint) { return count; }

    fallback() external payable {}
}
";

    #[test]
    fn lowers_contracts_in_order() -> anyhow::Result<()> {
        let tree = parse(SOURCE)?;
        let NodeKind::SourceUnit(parts) = &tree.kind else {
            anyhow::bail!("root is not a source unit");
        };
        let contracts: Vec<_> = parts.iter().filter_map(|n| n.as_contract()).collect();
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].name, "Base");
        assert_eq!(contracts[1].name, "Vault");
        assert_eq!(contracts[1].base_contracts, vec!["Base".to_string()]);

        Ok(())
    }

    #[test]
    fn lowers_function_shapes() -> anyhow::Result<()> {
        let tree = parse(SOURCE)?;
        let NodeKind::SourceUnit(parts) = &tree.kind else {
            anyhow::bail!("root is not a source unit");
        };
        let vault = parts
            .iter()
            .filter_map(|n| n.as_contract())
            .find(|c| c.name == "Vault")
            .ok_or_else(|| anyhow::anyhow!("missing contract"))?;

        let variables = vault
            .sub_nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::StateVariableDeclaration(_)))
            .count();
        assert_eq!(variables, 2);

        let functions: Vec<_> = vault.functions().collect();
        assert_eq!(functions.len(), 4);
        assert!(functions[0].is_constructor);

        let mover = functions[1];
        assert_eq!(mover.name.as_deref(), Some("move"));
        assert_eq!(mover.visibility, Some(Visibility::External));
        let types: Vec<String> = mover.parameters.iter().map(|p| p.type_name.abi_type()).collect();
        assert_eq!(types, vec!["address", "uint256", "bytes32[2]"]);
        assert_eq!(mover.modifiers[0].name, "authP");
        let args = mover.modifiers[0].arguments.as_ref().unwrap();
        assert_eq!(args[0], Expression::Identifier("MOVE_ROLE".into()));
        assert!(matches!(
            &args[1],
            Expression::Call { callee: Some(callee), arguments } if callee == "arr" && arguments.len() == 2
        ));

        let peek = functions[2];
        assert_eq!(peek.state_mutability, Some(StateMutability::View));
        assert_eq!(
            peek.return_parameters[0].type_name,
            TypeDescriptor::Elementary("uint256".into())
        );

        let fallback = functions[3];
        assert_eq!(fallback.kind, FunctionKind::Fallback);
        assert_eq!(fallback.name, None);

        Ok(())
    }

    #[test]
    fn flags_old_style_constructors() -> anyhow::Result<()> {
        let tree = parse("contract Old { function Old() public {} function go() public {} }")?;
        let NodeKind::SourceUnit(parts) = &tree.kind else {
            anyhow::bail!("root is not a source unit");
        };
        let old = parts[0].as_contract().unwrap();
        let flags: Vec<bool> = old.functions().map(|f| f.is_constructor).collect();
        assert_eq!(flags, vec![true, false]);

        Ok(())
    }

    #[test]
    fn evaluates_literal_array_lengths() -> anyhow::Result<()> {
        let tree = parse(
            "contract Sizes { function f(bytes32[1e2] a, uint[0x10] b, uint[N] c) external {} }",
        )?;
        let NodeKind::SourceUnit(parts) = &tree.kind else {
            anyhow::bail!("root is not a source unit");
        };
        let sizes = parts[0]
            .as_contract()
            .ok_or_else(|| anyhow::anyhow!("missing contract"))?;
        let function = sizes
            .functions()
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing function"))?;
        let types: Vec<String> = function.parameters.iter().map(|p| p.type_name.abi_type()).collect();
        assert_eq!(types, vec!["bytes32[100]", "uint256[16]", "uint256[N]"]);

        Ok(())
    }

    #[test]
    fn rejects_invalid_source() {
        let errors = parse("contract Broken { function ( }").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn rejects_empty_source() {
        let errors = parse("   \n").unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
