//! This module contains the state tracking functionality for the analyzer.

use std::fmt::Debug;

use crate::{extractor, parser::node::Node, surface::ContractFunction};

/// A marker trait that says that the type implementing it is an analyzer
/// state.
///
/// Analyzer states can be transitioned between as part of the
/// [`crate::analyzer::Analyzer`] state machine, and are intended to enforce
/// that correct state transitions take place.
pub trait State
where
    Self: Debug + Sized,
{
}

/// The initial state for the analyzer.
#[derive(Debug)]
pub struct HasContract {
    /// The configuration for function extraction.
    pub config: extractor::Config,
}
impl State for HasContract {}

/// The state for an analyzer that has successfully parsed the source.
#[derive(Debug)]
pub struct Parsed {
    /// The syntax tree of the flattened source.
    pub tree: Node,

    /// The configuration for function extraction.
    pub config: extractor::Config,
}
impl State for Parsed {}

/// The state for an analyzer that has extracted the callable functions of the
/// entry contract, with their notices attached.
#[derive(Debug)]
pub struct Extracted {
    /// The syntax tree of the flattened source.
    pub tree: Node,

    /// The extracted functions.
    pub functions: Vec<ContractFunction>,
}
impl State for Extracted {}
