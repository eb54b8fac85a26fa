//! Population synthesis: agent creation and attribute assignment.

/// Probabilistic attribute assignment engine.
pub mod attributes;
/// Household, generator and aggregator construction.
pub mod factory;

pub use attributes::{
    ApplianceChain, ApplianceRule, ApplianceStep, DiscreteDistribution, OccupancyBand,
    assign_discrete, assign_subset_fraction,
};
pub use factory::{DefraInputs, PopulationFactory};
