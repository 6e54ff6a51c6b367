//! This module contains the extraction of a contract's state-changing
//! functions, and the roles that guard them, from a syntax tree.
//!
//! # How it Works
//!
//! 1. Every contract definition in the compilation unit is collected.
//! 2. The unit is scanned for [`auth::AuthHelpers`], the functions used to
//!    build role parameter lists.
//! 3. The entry contract is selected according to the configured
//!    [`EntrySelection`].
//! 4. The entry contract is visited, followed by its base contracts (depth
//!    first, in declaration order, each at most once) unless the extraction is
//!    restricted to the target contract.
//! 5. Each visited contract contributes its public or external, state-changing,
//!    non-constructor functions.

pub mod auth;

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use crate::{
    error::extraction::{Error, Result},
    extractor::auth::{roles_from_modifiers, AuthHelpers},
    parser::node::{ContractDefinition, FunctionDefinition, FunctionKind, Node, NodeKind},
    surface::{ContractFunction, ContractInfo},
};

/// How the entry contract is chosen from the compilation unit.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EntrySelection {
    /// Use the contract named after the target, falling back to the last
    /// contract in the unit. Flattening tools place the target contract last.
    #[default]
    NameOrLast,

    /// Only ever use the contract named after the target.
    NameOnly,
}

/// The configuration for the extractor.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Whether only the functions declared by the entry contract itself are
    /// extracted, ignoring everything it inherits.
    ///
    /// Defaults to `false`.
    pub only_target_contract: bool,

    /// How the entry contract is chosen.
    ///
    /// Defaults to [`EntrySelection::NameOrLast`].
    pub entry_selection: EntrySelection,
}

impl Config {
    /// Sets the `only_target_contract` config parameter to `value`.
    #[must_use]
    pub fn with_only_target_contract(mut self, value: bool) -> Config {
        self.only_target_contract = value;
        self
    }

    /// Sets the `entry_selection` config parameter to `value`.
    #[must_use]
    pub fn with_entry_selection(mut self, value: EntrySelection) -> Config {
        self.entry_selection = value;
        self
    }
}

/// Extracts the state-changing functions reachable from the entry contract
/// identified by `target`, which may be a bare contract name or a path such
/// as `contracts/Finance.sol`.
///
/// The entry contract's own functions come first, followed by those of its
/// base contracts. A signature is only reported once, for the most derived
/// declaration.
///
/// # Errors
///
/// Returns [`Err`] if `tree` is not rooted at a source unit, if the unit
/// contains no contracts, or if no entry contract can be selected.
pub fn extract_functions(tree: &Node, target: &str, config: &Config) -> Result<Vec<ContractFunction>> {
    let NodeKind::SourceUnit(parts) = &tree.kind else {
        return Err(Error::NotACompilationUnit {
            found: tree.kind.describe(),
        });
    };

    let contracts: Vec<&ContractDefinition> = parts.iter().filter_map(Node::as_contract).collect();
    let helpers = AuthHelpers::discover(contracts.iter().copied());
    let entry = select_entry(&contracts, target, config.entry_selection)?;

    let mut traversal = Traversal::new(&contracts, &helpers, config.only_target_contract);
    traversal.visit(entry);

    log::debug!(
        "Extracted {} functions from `{}` using {} auth helpers",
        traversal.functions.len(),
        entry.name,
        helpers.len()
    );
    Ok(traversal.functions)
}

/// Extracts the functions as with [`extract_functions`], along with the
/// de-duplicated set of roles that they reference.
///
/// # Errors
///
/// Returns [`Err`] under the same conditions as [`extract_functions`].
pub fn contract_info(tree: &Node, target: &str, config: &Config) -> Result<ContractInfo> {
    let functions = extract_functions(tree, target, config)?;
    Ok(ContractInfo::from_functions(functions))
}

/// Gets the contract name that `target` refers to: the file name without its
/// directory and extension.
#[must_use]
pub fn target_contract_name(target: &str) -> &str {
    Path::new(target)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(target)
}

fn select_entry<'a>(
    contracts: &[&'a ContractDefinition],
    target: &str,
    selection: EntrySelection,
) -> Result<&'a ContractDefinition> {
    let name = target_contract_name(target);
    if let Some(contract) = contracts.iter().copied().find(|c| c.name == name) {
        return Ok(contract);
    }

    match selection {
        EntrySelection::NameOrLast => {
            let last = contracts.last().copied().ok_or(Error::NoContracts)?;
            log::debug!(
                "No contract named `{name}`, falling back to the last contract `{}`",
                last.name
            );
            Ok(last)
        }
        EntrySelection::NameOnly if contracts.is_empty() => Err(Error::NoContracts),
        EntrySelection::NameOnly => Err(Error::EntryContractNotFound {
            name: name.to_string(),
        }),
    }
}

/// The state of a single walk over the inheritance hierarchy.
struct Traversal<'a> {
    /// The contracts in the unit by name, keeping the first of any duplicates.
    contracts: HashMap<&'a str, &'a ContractDefinition>,
    helpers: &'a AuthHelpers,
    only_target_contract: bool,

    /// The names of the contracts already visited.
    seen: HashSet<&'a str>,

    /// The signatures already emitted. An override or an interface
    /// declaration of the same function is only reported once, as declared by
    /// the most derived contract.
    signatures: HashSet<String>,
    functions: Vec<ContractFunction>,
}

impl<'a> Traversal<'a> {
    fn new(
        contracts: &[&'a ContractDefinition],
        helpers: &'a AuthHelpers,
        only_target_contract: bool,
    ) -> Self {
        let mut by_name = HashMap::new();
        for contract in contracts {
            by_name.entry(contract.name.as_str()).or_insert(*contract);
        }

        Self {
            contracts: by_name,
            helpers,
            only_target_contract,
            seen: HashSet::new(),
            signatures: HashSet::new(),
            functions: Vec::new(),
        }
    }

    fn visit(&mut self, contract: &'a ContractDefinition) {
        if !self.seen.insert(contract.name.as_str()) {
            return;
        }

        for function in contract.functions().filter(|f| is_extractable(f)) {
            let parameter_types = function
                .parameters
                .iter()
                .map(|p| p.type_name.abi_type())
                .collect();
            let roles = roles_from_modifiers(&function.modifiers, self.helpers);
            let function = ContractFunction::new(function.name.as_deref(), parameter_types, roles);
            if self.signatures.insert(function.signature().to_string()) {
                self.functions.push(function);
            } else {
                log::debug!(
                    "Skipping `{}` in `{}`, already declared by a derived contract",
                    function.signature(),
                    contract.name
                );
            }
        }

        if self.only_target_contract {
            return;
        }

        for base in &contract.base_contracts {
            // Qualified bases such as `Lib.Base` are looked up by their last
            // segment.
            let name = base.rsplit('.').next().unwrap_or(base);
            match self.contracts.get(name).copied() {
                Some(base_contract) => self.visit(base_contract),
                None => log::debug!("Base contract `{base}` of `{}` is not in the unit", contract.name),
            }
        }
    }
}

/// Checks whether the function is part of the contract's callable,
/// state-changing surface.
fn is_extractable(function: &FunctionDefinition) -> bool {
    function.kind != FunctionKind::Modifier
        && !function.is_constructor
        && !function.is_hidden()
        && !function.is_read_only()
}
