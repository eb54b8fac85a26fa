//! Construction of the four relationship layers.

use rand::Rng;
use tracing::debug;

use super::graph::{Network, NetworkError, NetworkKind};
use super::small_world::SmallWorld;
use crate::agents::{AgentId, Population};

/// Weight of every edge inside the DEFRA category 1 common-interest clique.
pub const COMMON_INTEREST_GROUP_EDGE_WEIGHT: f64 = 0.95;

/// DEFRA category whose members are fully connected in the social graph.
pub const COMMON_INTEREST_CATEGORY: u8 = 1;

/// The four relationship graphs of a built context.
#[derive(Debug, Clone)]
pub struct Networks {
    /// Weighted household influence graph.
    pub social: Network<f64>,
    /// Aggregator to prosumer contracts.
    pub economic: Network<()>,
    /// Electrical connectivity; left empty until a layout is loaded.
    pub electrical: Network<()>,
    /// Aggregator to prosumer information flow.
    pub info: Network<()>,
}

/// Builds the small-world social graph over all households.
///
/// Each generated edge gets an independent weight in `[0, 1)`, so the
/// influence of `a` on `b` differs from that of `b` on `a`.
///
/// # Errors
///
/// Propagates [`NetworkError`]; generated edges always reference households
/// of `population`, so this only fails on an internal inconsistency.
pub fn build_social<R: Rng + ?Sized>(
    population: &Population,
    generator: &SmallWorld,
    rng: &mut R,
) -> Result<Network<f64>, NetworkError> {
    let households = population.household_ids();
    let mut social = Network::new(NetworkKind::Social);
    for (a, b) in generator.generate(households.len(), rng) {
        social.add_edge(population, households[a], households[b], 0.0)?;
    }
    for edge in social.edges_mut() {
        edge.weight = rng.random::<f64>();
    }
    debug!(edges = social.edge_count(), "small-world social graph generated");
    Ok(social)
}

/// Fully connects the households of `category` with fixed-weight edges.
///
/// Every ordered pair `(a, b)` with `a != b` gets one edge of `weight`.
/// Edges already present from the base graph are kept, so a pair may be
/// linked twice. Returns the number of edges added.
///
/// # Errors
///
/// Propagates [`NetworkError`] from [`Network::add_edge`].
pub fn inject_clique(
    social: &mut Network<f64>,
    population: &Population,
    category: u8,
    weight: f64,
) -> Result<usize, NetworkError> {
    let members: Vec<AgentId> = population
        .households()
        .filter(|(_, h)| h.defra_category == category)
        .map(|(id, _)| id)
        .collect();
    debug!(category, members = members.len(), "injecting common-interest clique");

    let mut added = 0;
    for &source in &members {
        for &target in &members {
            if source == target {
                continue;
            }
            social.add_edge(population, source, target, weight)?;
            added += 1;
        }
    }
    Ok(added)
}

/// Builds a star with `hub` pointing at every prosumer.
///
/// # Errors
///
/// Returns [`NetworkError::UnknownAgent`] if `hub` is not in the population.
pub fn build_star(
    kind: NetworkKind,
    population: &Population,
    hub: AgentId,
) -> Result<Network<()>, NetworkError> {
    let mut net = Network::new(kind);
    for leaf in population.prosumer_ids() {
        if leaf == hub {
            continue;
        }
        net.add_edge(population, hub, leaf, ())?;
    }
    Ok(net)
}

/// Builds the economic graph: aggregator to every prosumer.
///
/// # Errors
///
/// See [`build_star`].
pub fn build_economic(population: &Population, hub: AgentId) -> Result<Network<()>, NetworkError> {
    build_star(NetworkKind::Economic, population, hub)
}

/// Creates the electrical graph with no edges yet.
pub fn build_electrical() -> Network<()> {
    Network::new(NetworkKind::Electrical)
}

/// Builds the info graph. Same topology as the economic graph for now.
///
/// # Errors
///
/// See [`build_star`].
pub fn build_info(population: &Population, hub: AgentId) -> Result<Network<()>, NetworkError> {
    build_star(NetworkKind::Info, population, hub)
}

/// First aggregator of the population, used as hub of the star graphs.
///
/// # Errors
///
/// Returns [`NetworkError::MissingHub`] if there is no aggregator.
pub fn find_hub(population: &Population, kind: NetworkKind) -> Result<AgentId, NetworkError> {
    population
        .aggregators()
        .map(|(id, _)| id)
        .next()
        .ok_or(NetworkError::MissingHub { network: kind })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::agents::{Agent, AggregatorAgent, GeneratorAgent, GeneratorKind, HouseholdAgent};

    fn population(categories: &[u8]) -> Population {
        let profile: Arc<[f32]> = Arc::from(vec![0.0_f32; 4]);
        let mut pop = Population::new();
        pop.add_all(
            categories
                .iter()
                .map(|&c| Agent::Household(HouseholdAgent::new(c, Arc::clone(&profile)))),
        );
        pop
    }

    fn with_generator_and_aggregator(mut pop: Population) -> (Population, AgentId) {
        pop.add(Agent::Generator(GeneratorAgent::new(2000.0, GeneratorKind::Wind)));
        let hub = pop.add(Agent::Aggregator(AggregatorAgent::new(Arc::from(vec![1.0_f32]))));
        (pop, hub)
    }

    #[test]
    fn social_weights_in_unit_interval() {
        let pop = population(&[2; 60]);
        let mut rng = StdRng::seed_from_u64(3);
        let social = build_social(&pop, &SmallWorld::default(), &mut rng).unwrap();
        assert_eq!(social.edge_count(), 120);
        assert!(social.edges().iter().all(|e| (0.0..1.0).contains(&e.weight)));
    }

    #[test]
    fn social_graph_skips_non_households() {
        let (pop, hub) = with_generator_and_aggregator(population(&[2; 10]));
        let mut rng = StdRng::seed_from_u64(3);
        let social = build_social(&pop, &SmallWorld::default(), &mut rng).unwrap();
        assert!(social.edges().iter().all(|e| e.source != hub && e.target != hub));
        assert!(
            social
                .edges()
                .iter()
                .all(|e| pop.household(e.source).is_some() && pop.household(e.target).is_some())
        );
    }

    #[test]
    fn clique_connects_category_one() {
        let pop = population(&[1, 2, 1, 3, 1]);
        let mut social = Network::new(NetworkKind::Social);
        let added = inject_clique(&mut social, &pop, 1, COMMON_INTEREST_GROUP_EDGE_WEIGHT).unwrap();
        assert_eq!(added, 6);
        let members: Vec<AgentId> = pop
            .households()
            .filter(|(_, h)| h.defra_category == 1)
            .map(|(id, _)| id)
            .collect();
        for &a in &members {
            assert!(!social.has_edge(a, a));
            for &b in &members {
                if a != b {
                    assert!(
                        social
                            .edges_between(a, b)
                            .any(|e| e.weight == COMMON_INTEREST_GROUP_EDGE_WEIGHT)
                    );
                }
            }
        }
    }

    #[test]
    fn clique_keeps_coinciding_base_edges() {
        let pop = population(&[1, 1]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut social = build_social(&pop, &SmallWorld::default(), &mut rng).unwrap();
        let base = social.edge_count();
        inject_clique(&mut social, &pop, 1, COMMON_INTEREST_GROUP_EDGE_WEIGHT).unwrap();
        assert_eq!(social.edge_count(), base + 2);
        let ids = pop.household_ids();
        assert_eq!(social.edges_between(ids[0], ids[1]).count(), 2);
    }

    #[test]
    fn single_member_clique_adds_nothing() {
        let pop = population(&[1, 2, 2]);
        let mut social = Network::new(NetworkKind::Social);
        assert_eq!(inject_clique(&mut social, &pop, 1, 0.95).unwrap(), 0);
    }

    #[test]
    fn star_reaches_every_prosumer_once() {
        let (pop, hub) = with_generator_and_aggregator(population(&[1, 2, 3, 4]));
        let econ = build_economic(&pop, hub).unwrap();
        let info = build_info(&pop, hub).unwrap();
        assert_eq!(econ.edge_count(), 5);
        assert_eq!(info.edge_count(), 5);
        assert!(econ.edges().iter().all(|e| e.source == hub));
        for leaf in pop.prosumer_ids() {
            assert_eq!(econ.edges_between(hub, leaf).count(), 1);
        }
        assert_eq!(econ.kind(), NetworkKind::Economic);
        assert_eq!(info.kind(), NetworkKind::Info);
    }

    #[test]
    fn hub_lookup() {
        let pop = population(&[1]);
        assert!(matches!(
            find_hub(&pop, NetworkKind::Economic),
            Err(NetworkError::MissingHub { .. })
        ));
        let (pop, hub) = with_generator_and_aggregator(pop);
        assert_eq!(find_hub(&pop, NetworkKind::Economic), Ok(hub));
    }

    #[test]
    fn electrical_graph_starts_empty() {
        let net = build_electrical();
        assert!(net.is_empty());
        assert_eq!(net.name(), "electricalNetwork");
    }
}
