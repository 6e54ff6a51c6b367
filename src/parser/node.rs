//! This module contains the typed syntax tree that the rest of the library
//! consumes.
//!
//! The tree only retains the shapes that the extraction passes need. Anything
//! else in the source is kept as a [`NodeKind::Other`] so that the structure of
//! the compilation unit is still visible.

use std::ops::Range;

use crate::constant::USER_DEFINED_ABI_TYPE;

/// A node in the syntax tree, along with the byte range in the source that it
/// was parsed from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    /// The variant-specific payload of the node.
    pub kind: NodeKind,

    /// The byte range in the source text covered by this node.
    pub loc: Range<usize>,
}

impl Node {
    /// Constructs a new node of the provided `kind` covering `loc`.
    #[must_use]
    pub fn new(kind: NodeKind, loc: Range<usize>) -> Self {
        Self { kind, loc }
    }

    /// Gets the contract definition in this node, if it is one.
    #[must_use]
    pub fn as_contract(&self) -> Option<&ContractDefinition> {
        match &self.kind {
            NodeKind::ContractDefinition(contract) => Some(contract),
            _ => None,
        }
    }

    /// Gets the function definition in this node, if it is one.
    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionDefinition> {
        match &self.kind {
            NodeKind::FunctionDefinition(function) => Some(function),
            _ => None,
        }
    }
}

/// The kinds of node that can occur in the tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// The root of a compilation unit, containing its top-level definitions.
    SourceUnit(Vec<Node>),

    /// A contract, interface, library or abstract contract.
    ContractDefinition(ContractDefinition),

    /// A function, constructor, fallback, receive or modifier definition.
    FunctionDefinition(FunctionDefinition),

    /// A state variable declared in the body of a contract.
    StateVariableDeclaration(StateVariableDeclaration),

    /// Anything the library does not inspect: pragmas, imports, events,
    /// structs, enums, errors, and so on.
    Other,
}

impl NodeKind {
    /// Gets a short human-readable name for the kind of node.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::SourceUnit(_) => "source unit",
            Self::ContractDefinition(_) => "contract definition",
            Self::FunctionDefinition(_) => "function definition",
            Self::StateVariableDeclaration(_) => "state variable declaration",
            Self::Other => "unsupported node",
        }
    }
}

/// The flavours of contract-like definitions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContractKind {
    Contract,
    Abstract,
    Interface,
    Library,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractDefinition {
    /// The name of the contract.
    pub name: String,

    /// The flavour of the definition.
    pub kind: ContractKind,

    /// The names of the base contracts, in declaration order.
    pub base_contracts: Vec<String>,

    /// The definitions in the body of the contract.
    pub sub_nodes: Vec<Node>,
}

impl ContractDefinition {
    /// Iterates over the function definitions in the body of the contract.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.sub_nodes.iter().filter_map(Node::as_function)
    }
}

/// The flavours of function-like definitions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FunctionKind {
    Function,
    Constructor,
    Fallback,
    Receive,
    Modifier,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visibility {
    External,
    Public,
    Internal,
    Private,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateMutability {
    Pure,
    View,
    Constant,
    Payable,
}

impl StateMutability {
    /// Checks whether the mutability guarantees the function cannot change
    /// state.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::Pure | Self::View | Self::Constant)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDefinition {
    /// The name of the function, which is absent for the fallback and receive
    /// functions.
    pub name: Option<String>,

    /// The flavour of the definition.
    pub kind: FunctionKind,

    /// Whether the function is a constructor, either through the
    /// `constructor` keyword or by sharing the name of its contract.
    pub is_constructor: bool,

    /// The declared visibility, if any.
    pub visibility: Option<Visibility>,

    /// The declared state mutability, if any.
    pub state_mutability: Option<StateMutability>,

    /// The parameters, in order.
    pub parameters: Vec<Parameter>,

    /// The return parameters, in order.
    pub return_parameters: Vec<Parameter>,

    /// The modifiers invoked on the function, in order.
    pub modifiers: Vec<ModifierInvocation>,
}

impl FunctionDefinition {
    /// Checks whether the function is declared `internal` or `private`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(
            self.visibility,
            Some(Visibility::Internal | Visibility::Private)
        )
    }

    /// Checks whether the function is declared `view`, `pure` or `constant`.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.state_mutability.is_some_and(StateMutability::is_read_only)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    /// The name of the parameter, if it was given one.
    pub name: Option<String>,

    /// The resolved type of the parameter.
    pub type_name: TypeDescriptor,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateVariableDeclaration {
    pub name: Option<String>,
    pub type_name: TypeDescriptor,
    pub is_constant: bool,
}

/// A modifier applied to a function, such as `authP(ROLE, arr(a, b))`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModifierInvocation {
    /// The (possibly dotted) name of the modifier.
    pub name: String,

    /// The literal arguments, absent if the modifier is used without
    /// parentheses.
    pub arguments: Option<Vec<Expression>>,
}

/// The subset of expressions that the extraction passes can recognise.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expression {
    /// A plain reference to a name.
    Identifier(String),

    /// A call, where `callee` is present if the called expression is a plain
    /// name.
    Call {
        callee:    Option<String>,
        arguments: Vec<Expression>,
    },

    /// A number literal.
    Literal(String),

    /// Any other expression shape.
    Other,
}

/// The type of a parameter or variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeDescriptor {
    /// An elementary type in its canonical form, such as `uint256`.
    Elementary(String),

    /// An array of `base`, with a `length` if it is fixed-size.
    Array {
        base:   Box<TypeDescriptor>,
        length: Option<String>,
    },

    /// A contract, interface, struct, enum or other user-defined type.
    UserDefined(String),

    /// A type the library cannot represent, such as a mapping.
    Unknown,
}

impl TypeDescriptor {
    /// Renders the type as it appears in a canonical function signature.
    ///
    /// User-defined types render as `address`, and unknown types render as
    /// the empty string.
    #[must_use]
    pub fn abi_type(&self) -> String {
        match self {
            Self::Elementary(name) => name.clone(),
            Self::Array { base, length } => {
                let base = base.abi_type();
                if base.is_empty() {
                    return base;
                }
                match length {
                    Some(length) => format!("{base}[{length}]"),
                    None => format!("{base}[]"),
                }
            }
            Self::UserDefined(_) => USER_DEFINED_ABI_TYPE.to_string(),
            Self::Unknown => String::new(),
        }
    }

    /// Checks whether the type is a dynamically-sized array of the elementary
    /// type `element`.
    #[must_use]
    pub fn is_dynamic_array_of(&self, element: &str) -> bool {
        match self {
            Self::Array { base, length: None } => {
                matches!(base.as_ref(), Self::Elementary(name) if name == element)
            }
            _ => false,
        }
    }
}
