//! Relationship graphs over the synthesized population.

/// Social, economic, electrical and info layer construction.
pub mod builder;
/// Edge-list graph keyed by agent handles.
pub mod graph;
/// Small-world topology generator.
pub mod small_world;

pub use builder::{COMMON_INTEREST_CATEGORY, COMMON_INTEREST_GROUP_EDGE_WEIGHT, Networks};
pub use graph::{Edge, Network, NetworkError, NetworkKind};
pub use small_world::SmallWorld;
