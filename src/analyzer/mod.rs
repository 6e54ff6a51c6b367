//! This module contains the definition of the analyzer, which drives a
//! contract source through parsing, extraction and artifact assembly.

pub mod state;

use crate::{
    abi::AbiEntry,
    analyzer::state::State,
    artifact::{self, Artifact},
    contract::Contract,
    error,
    extractor,
    metadata::{AppMetadata, DeclaredRole},
    notice,
    parser,
    parser::node::Node,
    roles::{self, RoleMatchError},
    surface::{ContractFunction, ContractInfo},
};

/// Creates a new analyzer wrapping the provided `contract`, and with the
/// provided extraction `config`.
#[must_use]
pub fn new(contract: Contract, config: extractor::Config) -> Analyzer<state::HasContract> {
    let state = state::HasContract { config };
    Analyzer { contract, state }
}

/// The core of the surface analysis, the `Analyzer` is responsible for
/// ingesting a contract source and outputting its callable functions.
///
/// # Enforcing Valid State Transitions
///
/// The analyzer enforces that only correct state transitions can occur through
/// use of structs that implement the exact state required by it at any given
/// point.
///
/// There is the [`Self::state`] function that provides access to the state data
/// of whichever state the analyzer is currently in.
pub struct Analyzer<S: State> {
    /// The contract that is being analyzed.
    contract: Contract,

    /// The internal state of the analyzer.
    state: S,
}

/// The operations available in all states.
impl<S: State> Analyzer<S> {
    /// Gets a reference to the contract being analyzed.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Gets an immutable reference to the current state of the analyzer.
    pub fn state(&self) -> &S {
        &self.state
    }

    fn transform_state<NS: State>(
        self,
        transform: impl FnOnce(&Contract, S) -> error::Result<NS>,
    ) -> error::Result<Analyzer<NS>> {
        let state = transform(&self.contract, self.state)?;
        let contract = self.contract;

        Ok(Analyzer { contract, state })
    }
}

/// A type that allows the user to easily name the initial state of the
/// analyzer.
pub type InitialAnalyzer = Analyzer<state::HasContract>;

/// Operations available on a newly-created analyzer.
impl Analyzer<state::HasContract> {
    /// Executes the analysis process from beginning to end, performing all the
    /// intermediate steps automatically and returning the artifact.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if any step in the process fails.
    pub fn analyze(
        self,
        metadata: &AppMetadata,
        abi: &[AbiEntry],
        config: &artifact::Config,
    ) -> error::Result<Artifact> {
        let analyzer = self.parse()?;
        let analyzer = analyzer.extract()?;

        Ok(analyzer.assemble(metadata, abi, config))
    }

    /// Parses the contract source into its syntax tree.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the source is empty or is not valid Solidity.
    pub fn parse(self) -> error::Result<Analyzer<state::Parsed>> {
        self.transform_state(|contract, old_state| {
            let tree = parser::parse(contract.source())?;
            let config = old_state.config;
            Ok(state::Parsed { tree, config })
        })
    }
}

/// Operations available on an analyzer that has parsed the source.
impl Analyzer<state::Parsed> {
    /// Gets the syntax tree of the contract source.
    #[must_use]
    pub fn tree(&self) -> &Node {
        &self.state.tree
    }

    /// Extracts the callable functions of the entry contract and attaches the
    /// notices found in the source to them.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if no entry contract can be found in the tree.
    pub fn extract(self) -> error::Result<Analyzer<state::Extracted>> {
        self.transform_state(|contract, old_state| {
            let functions =
                extractor::extract_functions(&old_state.tree, contract.target(), &old_state.config)?;
            let notices = notice::extract_notices(contract.source());
            let functions = notice::attach_notices(&functions, &notices);
            let tree = old_state.tree;
            Ok(state::Extracted { tree, functions })
        })
    }
}

/// Operations available on an analyzer that has extracted the functions.
impl Analyzer<state::Extracted> {
    /// Gets the syntax tree of the contract source.
    #[must_use]
    pub fn tree(&self) -> &Node {
        &self.state.tree
    }

    /// Gets the extracted functions.
    #[must_use]
    pub fn functions(&self) -> &[ContractFunction] {
        &self.state.functions
    }

    /// Gets the extracted functions along with the roles they use.
    #[must_use]
    pub fn contract_info(&self) -> ContractInfo {
        ContractInfo::from_functions(self.state.functions.clone())
    }

    /// Checks the roles used by the extracted functions against the
    /// `declared` ones.
    #[must_use]
    pub fn validate_roles(&self, declared: &[DeclaredRole]) -> Vec<RoleMatchError> {
        roles::validate_roles(&self.state.functions, declared)
    }

    /// Assembles the artifact for the extracted functions.
    #[must_use]
    pub fn assemble(
        &self,
        metadata: &AppMetadata,
        abi: &[AbiEntry],
        config: &artifact::Config,
    ) -> Artifact {
        artifact::generate_artifact_from_functions(metadata, abi, &self.state.functions, config)
    }
}
