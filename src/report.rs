//! Population diagnostics.

use std::fmt;

use crate::agents::{HouseholdFlag, Population};
use crate::context::SimulationContext;

/// Share of households per attribute, derived post-hoc from a built context.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSummary {
    pub agents: usize,
    pub households: usize,
    pub generators: usize,
    pub aggregators: usize,
    /// Fraction of households with 1..=8 occupants (index 0 is one occupant).
    pub occupancy_shares: [f32; 8],
    /// Fraction of households owning each flag, in [`HouseholdFlag::ALL`] order.
    pub flag_shares: [f32; 6],
    pub social_edges: usize,
    pub economic_edges: usize,
    pub electrical_edges: usize,
    pub info_edges: usize,
    /// Baseline profile column the households share.
    pub base_profile: String,
}

fn share(count: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32
    }
}

impl PopulationSummary {
    /// Household attribute shares only; edge counts are zero.
    pub fn from_population(population: &Population) -> Self {
        let households = population.household_count();
        let mut occupancy = [0_usize; 8];
        let mut flags = [0_usize; 6];
        for (_, h) in population.households() {
            if let Some(n) = h.num_occupants().filter(|n| (1..=8).contains(n)) {
                occupancy[usize::from(n) - 1] += 1;
            }
            for (i, flag) in HouseholdFlag::ALL.iter().enumerate() {
                if h.flag(*flag) {
                    flags[i] += 1;
                }
            }
        }

        Self {
            agents: population.len(),
            households,
            generators: population.generators().count(),
            aggregators: population.aggregators().count(),
            occupancy_shares: occupancy.map(|c| share(c, households)),
            flag_shares: flags.map(|c| share(c, households)),
            social_edges: 0,
            economic_edges: 0,
            electrical_edges: 0,
            info_edges: 0,
            base_profile: String::new(),
        }
    }

    /// Full summary including graph sizes.
    pub fn from_context(context: &SimulationContext) -> Self {
        let n = &context.networks;
        Self {
            social_edges: n.social.edge_count(),
            economic_edges: n.economic.edge_count(),
            electrical_edges: n.electrical.edge_count(),
            info_edges: n.info.edge_count(),
            base_profile: context.time_series.base_profile_name.clone(),
            ..Self::from_population(&context.population)
        }
    }

    /// Share of households owning `flag`.
    pub fn flag_share(&self, flag: HouseholdFlag) -> f32 {
        HouseholdFlag::ALL
            .iter()
            .position(|f| *f == flag)
            .map_or(0.0, |i| self.flag_shares[i])
    }
}

impl fmt::Display for PopulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Population Summary ---")?;
        writeln!(
            f,
            "Agents: {} ({} households, {} generators, {} aggregators)",
            self.agents, self.households, self.generators, self.aggregators
        )?;
        if !self.base_profile.is_empty() {
            writeln!(f, "Base demand profile: {}", self.base_profile)?;
        }
        writeln!(f, "Percentages:")?;
        for (i, s) in self.occupancy_shares.iter().enumerate() {
            writeln!(f, "  households with occupancy {} : {:.3}", i + 1, s)?;
        }
        for (flag, s) in HouseholdFlag::ALL.iter().zip(&self.flag_shares) {
            writeln!(f, "  {:<24}: {:.3}", flag.name(), s)?;
        }
        writeln!(f, "Edges:")?;
        writeln!(f, "  socialNetwork    : {}", self.social_edges)?;
        writeln!(f, "  economicNetwork  : {}", self.economic_edges)?;
        writeln!(f, "  electricalNetwork: {}", self.electrical_edges)?;
        write!(f, "  infoNetwork      : {}", self.info_edges)
    }
}
