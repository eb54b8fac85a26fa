//! Population and relationship-graph synthesis for residential
//! electricity demand/supply agent-based simulation.

/// Household, generator and aggregator agents and the population arena.
pub mod agents;
pub mod config;
/// One-shot build orchestration.
pub mod context;
pub mod error;
pub mod io;
/// Social, economic, electrical and info graphs.
pub mod network;
pub mod report;
/// Agent creation and attribute assignment.
pub mod synth;
pub mod timeseries;
