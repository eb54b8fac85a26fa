//! One-shot assembly of the simulation context.
//!
//! Build order:
//! 1. validate parameters, load time series (alignment is warn-only);
//! 2. create households, then assign occupancy, appliances and heating;
//! 3. create the generator and the aggregator, unless the feeder is empty;
//! 4. build the social graph and overlay the category 1 clique;
//! 5. build the economic, electrical and info graphs.
//!
//! All randomness is drawn from the single generator passed to
//! [`ContextBuilder::build`], in the order above.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

use crate::agents::{Agent, AgentId, HouseholdCount, HouseholdFlag, Population};
use crate::config::BuildConfig;
use crate::error::{AlignmentWarning, BuildError};
use crate::network::builder::{
    build_economic, build_electrical, build_info, build_social, find_hub, inject_clique,
};
use crate::network::{COMMON_INTEREST_CATEGORY, Network, NetworkKind, Networks, SmallWorld};
use crate::report::PopulationSummary;
use crate::synth::{DefraInputs, PopulationFactory, assign_discrete, assign_subset_fraction};
use crate::timeseries::TimeSeriesStore;

/// The finished population and relationship graphs, ready for stepping.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub ticks_per_day: usize,
    pub verbose: bool,
    pub time_series: TimeSeriesStore,
    pub population: Population,
    pub networks: Networks,
    /// Handle of the aggregator acting as hub of the star graphs; `None`
    /// for an empty feeder.
    pub aggregator: Option<AgentId>,
    /// Series that are not a whole number of days long.
    pub warnings: Vec<AlignmentWarning>,
}

impl SimulationContext {
    /// Diagnostic summary of the built population.
    pub fn summary(&self) -> PopulationSummary {
        PopulationSummary::from_context(self)
    }
}

/// Builds a [`SimulationContext`] from a configuration.
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder<'a> {
    config: &'a BuildConfig,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(config: &'a BuildConfig) -> Self {
        Self { config }
    }

    /// Random generator for this build: seeded from `run.seed` when set,
    /// otherwise from the operating system.
    pub fn rng(&self) -> StdRng {
        match self.config.run.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Runs the full build.
    ///
    /// # Errors
    ///
    /// Any [`BuildError`] is fatal: parameter errors are raised before
    /// any file is read or agent created, and data errors abort the build.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SimulationContext, BuildError> {
        let cfg = self.config;
        let run = &cfg.run;

        if let Some(err) = cfg.validate().into_iter().next() {
            return Err(err.into());
        }
        let occupancy = cfg.synthesis.occupancy_distribution()?;
        let appliances = cfg.synthesis.appliance_chain()?;

        // 1. time series
        let (time_series, mut warnings) = TimeSeriesStore::load(run, rng)?;
        let defra = DefraInputs::load(
            &run.data_path(&run.defra_categories),
            &run.data_path(&run.defra_profiles),
        )?;
        warnings.extend(defra.check_alignment(run.ticks_per_day));

        // 2. households and their attributes
        let factory = PopulationFactory::new(&time_series);
        let mut population = Population::new();
        let households = factory.create_defra_households(
            run.default_prosumers_per_feeder as usize,
            &defra,
            rng,
        );
        population.add_all(households.into_iter().map(Agent::Household));

        assign_discrete(&mut population, HouseholdCount::NumOccupants, &occupancy, rng);
        appliances.assign(&mut population, rng);
        assign_subset_fraction(
            &mut population,
            HouseholdFlag::ElectricalWaterHeat,
            run.elec_water_fraction,
            rng,
        )?;
        assign_subset_fraction(
            &mut population,
            HouseholdFlag::ElectricalSpaceHeat,
            run.elec_space_fraction,
            rng,
        )?;

        // 3. generator and aggregator
        let feeder_empty = population.is_empty();
        if !feeder_empty {
            population.add(Agent::Generator(
                factory.create_pure_generator(cfg.generator.capacity_kw, cfg.generator.kind),
            ));
            population.add(Agent::Aggregator(factory.create_aggregator()));
        }

        // 4. social graph
        let small_world = SmallWorld::new(cfg.social.degree, cfg.social.beta, cfg.social.symmetric);
        let mut social = build_social(&population, &small_world, rng)?;
        inject_clique(
            &mut social,
            &population,
            COMMON_INTEREST_CATEGORY,
            cfg.synthesis.common_interest_weight,
        )?;

        // 5. star graphs
        let (aggregator, networks) = if feeder_empty {
            let networks = Networks {
                social,
                economic: Network::new(NetworkKind::Economic),
                electrical: build_electrical(),
                info: Network::new(NetworkKind::Info),
            };
            (None, networks)
        } else {
            let hub = find_hub(&population, NetworkKind::Economic)?;
            let networks = Networks {
                social,
                economic: build_economic(&population, hub)?,
                electrical: build_electrical(),
                info: build_info(&population, hub)?,
            };
            (Some(hub), networks)
        };

        let context = SimulationContext {
            ticks_per_day: run.ticks_per_day,
            verbose: run.verbose_output,
            time_series,
            population,
            networks,
            aggregator,
            warnings,
        };

        info!(
            agents = context.population.len(),
            households = context.population.household_count(),
            social_edges = context.networks.social.edge_count(),
            "simulation context built"
        );
        if run.verbose_output {
            info!("\n{}", context.summary());
        }
        Ok(context)
    }
}
