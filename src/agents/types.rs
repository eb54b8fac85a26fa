//! Agent handles and the population arena.

use std::fmt;

use super::{AggregatorAgent, GeneratorAgent, HouseholdAgent};

/// Stable handle of an agent inside a [`Population`].
///
/// Handles are arena indices: they are assigned in insertion order and are
/// never reused, so graphs can refer to agents without owning them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(usize);

impl AgentId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Any agent the context builder can create.
#[derive(Debug, Clone)]
pub enum Agent {
    Household(HouseholdAgent),
    Generator(GeneratorAgent),
    Aggregator(AggregatorAgent),
}

impl Agent {
    /// Households and generators both produce and consume; the aggregator does not.
    pub fn is_prosumer(&self) -> bool {
        matches!(self, Agent::Household(_) | Agent::Generator(_))
    }

    /// Human-readable agent type name.
    pub fn agent_type(&self) -> &'static str {
        match self {
            Agent::Household(_) => "Household",
            Agent::Generator(_) => "Generator",
            Agent::Aggregator(_) => "Aggregator",
        }
    }
}

/// All agents of all kinds, addressed by [`AgentId`].
#[derive(Debug, Clone, Default)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an agent and returns its handle.
    pub fn add(&mut self, agent: Agent) -> AgentId {
        let id = AgentId(self.agents.len());
        self.agents.push(agent);
        id
    }

    /// Adds every agent yielded by `agents`, returning their handles in order.
    pub fn add_all(&mut self, agents: impl IntoIterator<Item = Agent>) -> Vec<AgentId> {
        agents.into_iter().map(|a| self.add(a)).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        id.0 < self.agents.len()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0)
    }

    /// Iterates all agents with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Agent)> {
        self.agents.iter().enumerate().map(|(i, a)| (AgentId(i), a))
    }

    pub fn household(&self, id: AgentId) -> Option<&HouseholdAgent> {
        match self.agents.get(id.0) {
            Some(Agent::Household(h)) => Some(h),
            _ => None,
        }
    }

    pub fn households(&self) -> impl Iterator<Item = (AgentId, &HouseholdAgent)> {
        self.iter().filter_map(|(id, a)| match a {
            Agent::Household(h) => Some((id, h)),
            _ => None,
        })
    }

    pub fn households_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut HouseholdAgent)> {
        self.agents
            .iter_mut()
            .enumerate()
            .filter_map(|(i, a)| match a {
                Agent::Household(h) => Some((AgentId(i), h)),
                _ => None,
            })
    }

    /// Mutable access to a household by handle.
    pub fn household_mut(&mut self, id: AgentId) -> Option<&mut HouseholdAgent> {
        match self.agents.get_mut(id.0) {
            Some(Agent::Household(h)) => Some(h),
            _ => None,
        }
    }

    pub fn household_ids(&self) -> Vec<AgentId> {
        self.households().map(|(id, _)| id).collect()
    }

    pub fn household_count(&self) -> usize {
        self.households().count()
    }

    pub fn generators(&self) -> impl Iterator<Item = (AgentId, &GeneratorAgent)> {
        self.iter().filter_map(|(id, a)| match a {
            Agent::Generator(g) => Some((id, g)),
            _ => None,
        })
    }

    pub fn aggregators(&self) -> impl Iterator<Item = (AgentId, &AggregatorAgent)> {
        self.iter().filter_map(|(id, a)| match a {
            Agent::Aggregator(g) => Some((id, g)),
            _ => None,
        })
    }

    /// Handles of every prosumer-type agent (households and generators).
    pub fn prosumer_ids(&self) -> Vec<AgentId> {
        self.iter()
            .filter(|(_, a)| a.is_prosumer())
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agents::GeneratorKind;

    fn profile() -> Arc<[f32]> {
        Arc::from(vec![0.0_f32; 2])
    }

    #[test]
    fn handles_follow_insertion_order() {
        let mut pop = Population::new();
        let a = pop.add(Agent::Household(HouseholdAgent::new(1, profile())));
        let b = pop.add(Agent::Generator(GeneratorAgent::new(
            2000.0,
            GeneratorKind::Wind,
        )));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert!(pop.contains(b));
        assert!(!pop.contains(AgentId(2)));
    }

    #[test]
    fn prosumers_exclude_aggregators() {
        let mut pop = Population::new();
        pop.add_all((0..3).map(|_| Agent::Household(HouseholdAgent::new(2, profile()))));
        pop.add(Agent::Generator(GeneratorAgent::new(
            2000.0,
            GeneratorKind::Wind,
        )));
        pop.add(Agent::Aggregator(AggregatorAgent::new(profile())));

        assert_eq!(pop.len(), 5);
        assert_eq!(pop.household_count(), 3);
        assert_eq!(pop.prosumer_ids().len(), 4);
        assert_eq!(pop.aggregators().count(), 1);
    }

    #[test]
    fn household_lookup_rejects_other_kinds() {
        let mut pop = Population::new();
        let agg = pop.add(Agent::Aggregator(AggregatorAgent::new(profile())));
        assert!(pop.household(agg).is_none());
        assert_eq!(pop.get(agg).map(Agent::agent_type), Some("Aggregator"));
    }
}
