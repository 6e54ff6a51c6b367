//! This library implements a static analysis of flattened
//! [Solidity](https://soliditylang.org) contract sources that aims to discover
//! the externally callable surface of an application's contract: which
//! functions change state, what roles guard them, and what their `@notice`
//! documentation says. It is a _best effort_ analysis.
//!
//! Note that this library does not compile contracts, and never needs a
//! compiler to be present.
//!
//! # How it Works
//!
//! From a very high level, the surface discovery process is performed as
//! follows:
//!
//! 1. The flattened source is parsed into a [`parser::node::Node`] tree.
//! 2. The entry contract is chosen, and it and its bases are walked to produce
//!    the list of [`surface::ContractFunction`]s, each with the
//!    [`surface::Role`]s required by its `auth` or `authP` modifiers.
//! 3. The source text is scanned a second time for `@notice` comments, which
//!    are joined to the functions by their canonical signature.
//! 4. The functions, the compiled ABI and the declared
//!    [`metadata::AppMetadata`] are assembled into an [`Artifact`].
//!
//! Separately, the [`roles`] and [`manifest`] checks produce findings that a
//! [`validation::Report`] acts upon under an explicit policy.
//!
//! # Basic Usage
//!
//! For the most basic usage of the library, it is sufficient to construct an
//! `Analyzer` and call the `.analyze` method, passing your contract.
//!
//! ```
//! use contract_surface_extractor as cse;
//! use contract_surface_extractor::{artifact, contract::Contract, extractor, metadata::AppMetadata};
//!
//! let source = r"
//! contract Vault {
//!     /// @notice Move the tokens
//!     function move(address _to) external auth(MOVE_ROLE) {}
//!
//!     function balance() public view returns (uint256) {}
//! }
//! ";
//!
//! let contract = Contract::new(source, "contracts/Vault.sol");
//! let artifact = cse::new(contract, extractor::Config::default())
//!     .analyze(&AppMetadata::default(), &[], &artifact::Config::default())
//!     .unwrap();
//!
//! assert_eq!(artifact.functions.len(), 1);
//! assert_eq!(artifact.functions[0].sig, "move(address)");
//! assert_eq!(artifact.functions[0].notice.as_deref(), Some("Move the tokens"));
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod abi;
pub mod analyzer;
pub mod artifact;
pub mod constant;
pub mod contract;
pub mod error;
pub mod extractor;
pub mod manifest;
pub mod metadata;
pub mod notice;
pub mod parser;
pub mod roles;
pub mod signature;
pub mod surface;
pub mod utility;
pub mod validation;

// Re-exports to provide the library interface.
pub use analyzer::new;
pub use artifact::{generate_artifact_from_functions, generate_artifact_from_source, Artifact};
