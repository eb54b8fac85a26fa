//! Agent types created during context synthesis.

/// Aggregator agent bound to the system price signal.
pub mod aggregator;
/// Pure generator agents.
pub mod generator;
/// Household prosumer agents and their synthesized attributes.
pub mod household;
pub mod types;

// Re-export the main types for convenience
pub use aggregator::AggregatorAgent;
pub use generator::{GeneratorAgent, GeneratorKind};
pub use household::{HouseholdAgent, HouseholdCount, HouseholdFlag};
pub use types::{Agent, AgentId, Population};
