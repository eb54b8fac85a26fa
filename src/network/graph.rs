//! Directed edge-list graphs over population handles.

use std::fmt;

use thiserror::Error;

use crate::agents::{AgentId, Population};

/// Which relationship layer a graph represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkKind {
    Social,
    Economic,
    Electrical,
    Info,
}

impl NetworkKind {
    /// Name the simulation runtime looks the graph up by.
    pub fn name(self) -> &'static str {
        match self {
            NetworkKind::Social => "socialNetwork",
            NetworkKind::Economic => "economicNetwork",
            NetworkKind::Electrical => "electricalNetwork",
            NetworkKind::Info => "infoNetwork",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Edge construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// An endpoint is not in the population.
    #[error("{network}: edge endpoint {agent} is not in the population")]
    UnknownAgent { network: NetworkKind, agent: AgentId },

    /// Source and target are the same agent.
    #[error("{network}: self-loop on {agent}")]
    SelfLoop { network: NetworkKind, agent: AgentId },

    /// The population has no agent able to act as hub.
    #[error("{network}: no aggregator to act as hub")]
    MissingHub { network: NetworkKind },
}

/// A directed edge carrying payload `W`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<W> {
    pub source: AgentId,
    pub target: AgentId,
    pub weight: W,
}

/// A directed graph stored as an edge list keyed by agent handles.
///
/// Agents are not owned by the graph; cycles such as `a -> b -> a` are plain
/// data. Parallel edges are allowed.
#[derive(Debug, Clone)]
pub struct Network<W> {
    kind: NetworkKind,
    edges: Vec<Edge<W>>,
}

impl<W> Network<W> {
    pub fn new(kind: NetworkKind) -> Self {
        Self {
            kind,
            edges: Vec::new(),
        }
    }

    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Adds `source -> target`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] if either endpoint is missing from
    /// `population` or the edge would be a self-loop.
    pub fn add_edge(
        &mut self,
        population: &Population,
        source: AgentId,
        target: AgentId,
        weight: W,
    ) -> Result<(), NetworkError> {
        for agent in [source, target] {
            if !population.contains(agent) {
                return Err(NetworkError::UnknownAgent {
                    network: self.kind,
                    agent,
                });
            }
        }
        if source == target {
            return Err(NetworkError::SelfLoop {
                network: self.kind,
                agent: source,
            });
        }
        self.edges.push(Edge {
            source,
            target,
            weight,
        });
        Ok(())
    }

    pub fn edges(&self) -> &[Edge<W>] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [Edge<W>] {
        &mut self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges from `source` to `target`, in insertion order.
    pub fn edges_between(
        &self,
        source: AgentId,
        target: AgentId,
    ) -> impl Iterator<Item = &Edge<W>> {
        self.edges
            .iter()
            .filter(move |e| e.source == source && e.target == target)
    }

    pub fn has_edge(&self, source: AgentId, target: AgentId) -> bool {
        self.edges_between(source, target).next().is_some()
    }

    pub fn out_degree(&self, agent: AgentId) -> usize {
        self.edges.iter().filter(|e| e.source == agent).count()
    }

    pub fn in_degree(&self, agent: AgentId) -> usize {
        self.edges.iter().filter(|e| e.target == agent).count()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agents::{Agent, HouseholdAgent};

    fn population(n: usize) -> (Population, Vec<AgentId>) {
        let mut pop = Population::new();
        let profile: Arc<[f32]> = Arc::from(vec![0.0_f32]);
        let ids = pop.add_all((0..n).map(|_| Agent::Household(HouseholdAgent::new(1, Arc::clone(&profile)))));
        (pop, ids)
    }

    #[test]
    fn rejects_self_loops() {
        let (pop, ids) = population(2);
        let mut net = Network::new(NetworkKind::Social);
        let err = net.add_edge(&pop, ids[0], ids[0], 0.5).unwrap_err();
        assert!(matches!(err, NetworkError::SelfLoop { .. }));
        assert!(net.is_empty());
    }

    #[test]
    fn rejects_unknown_endpoints() {
        let (pop, ids) = population(2);
        let (bigger, more) = population(3);
        let mut net: Network<()> = Network::new(NetworkKind::Economic);
        assert!(net.add_edge(&bigger, ids[0], more[2], ()).is_ok());
        let err = net.add_edge(&pop, ids[0], more[2], ()).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownAgent { .. }));
        assert_eq!(net.edge_count(), 1);
    }

    #[test]
    fn keeps_parallel_edges() {
        let (pop, ids) = population(2);
        let mut net = Network::new(NetworkKind::Social);
        net.add_edge(&pop, ids[0], ids[1], 0.2).unwrap();
        net.add_edge(&pop, ids[0], ids[1], 0.9).unwrap();
        net.add_edge(&pop, ids[1], ids[0], 0.4).unwrap();
        assert_eq!(net.edges_between(ids[0], ids[1]).count(), 2);
        assert_eq!(net.out_degree(ids[0]), 2);
        assert_eq!(net.in_degree(ids[0]), 1);
    }

    #[test]
    fn names_match_runtime_lookup() {
        assert_eq!(NetworkKind::Electrical.name(), "electricalNetwork");
        let net: Network<()> = Network::new(NetworkKind::Info);
        assert_eq!(net.name(), "infoNetwork");
    }
}
