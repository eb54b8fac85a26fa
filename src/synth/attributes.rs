//! Probabilistic attribute assignment over the household population.
//!
//! Three modes are supported:
//! - independent discrete draws ([`assign_discrete`]),
//! - an ordered appliance chain with first-match-wins occupancy rules
//!   ([`ApplianceChain::assign`]),
//! - random subset selection of a fixed fraction ([`assign_subset_fraction`]).

use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use crate::agents::{HouseholdAgent, HouseholdCount, HouseholdFlag, Population};
use crate::error::BuildError;

/// Household sizes of the default occupancy table.
pub const DEFAULT_OCCUPANCY_VALUES: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

/// Probability of each household size (UK census shares, skewed to 1–3 occupants).
pub const DEFAULT_OCCUPANCY_PROBABILITIES: [f64; 8] =
    [0.30, 0.34, 0.16, 0.13, 0.05, 0.015, 0.004, 0.001];

/// Tolerance when checking that a probability table sums to at most one.
const PROBABILITY_SUM_EPSILON: f64 = 1e-9;

fn check_probability(name: &str, p: f64) -> Result<(), BuildError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(BuildError::invalid(name, format!("probability {p} is outside [0.0, 1.0]")))
    }
}

/// A discrete distribution over small integer outcomes.
///
/// Probabilities need not sum to one; the remaining mass means "no value
/// drawn" and leaves the attribute at its default.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteDistribution {
    values: Vec<u8>,
    probabilities: Vec<f64>,
}

impl DiscreteDistribution {
    /// Builds a distribution, rejecting out-of-range or mismatched tables.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidParameter`] if the tables differ in
    /// length, a probability lies outside [0, 1], or the total exceeds 1.
    pub fn new(name: &str, values: Vec<u8>, probabilities: Vec<f64>) -> Result<Self, BuildError> {
        if values.len() != probabilities.len() {
            return Err(BuildError::invalid(
                name,
                format!(
                    "{} values but {} probabilities",
                    values.len(),
                    probabilities.len()
                ),
            ));
        }
        for &p in &probabilities {
            check_probability(name, p)?;
        }
        let total: f64 = probabilities.iter().sum();
        if total > 1.0 + PROBABILITY_SUM_EPSILON {
            return Err(BuildError::invalid(
                name,
                format!("probabilities sum to {total}, more than 1.0"),
            ));
        }
        Ok(Self {
            values,
            probabilities,
        })
    }

    /// The default household occupancy distribution.
    pub fn default_occupancy() -> Self {
        Self {
            values: DEFAULT_OCCUPANCY_VALUES.to_vec(),
            probabilities: DEFAULT_OCCUPANCY_PROBABILITIES.to_vec(),
        }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Draws one outcome, or `None` if the draw lands in the unassigned mass.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u8> {
        let u: f64 = rng.random();
        let mut cumulative = 0.0;
        for (&value, &p) in self.values.iter().zip(&self.probabilities) {
            cumulative += p;
            if u < cumulative {
                return Some(value);
            }
        }
        None
    }
}

/// Draws `attribute` independently for every household.
///
/// Returns the number of households that received a value.
pub fn assign_discrete<R: Rng + ?Sized>(
    population: &mut Population,
    attribute: HouseholdCount,
    distribution: &DiscreteDistribution,
    rng: &mut R,
) -> usize {
    let mut assigned = 0;
    for (_, household) in population.households_mut() {
        if let Some(value) = distribution.sample(rng) {
            if household.set_count(attribute, value) {
                assigned += 1;
            }
        }
    }
    debug!(attribute = attribute.name(), assigned, "discrete attribute assigned");
    assigned
}

/// Occupancy predicate of an appliance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyBand {
    /// Exactly this many occupants.
    Exactly(u8),
    /// At least this many occupants.
    AtLeast(u8),
}

impl OccupancyBand {
    /// Unset occupancy never matches.
    pub fn matches(self, occupants: Option<u8>) -> bool {
        match (self, occupants) {
            (OccupancyBand::Exactly(n), Some(o)) => o == n,
            (OccupancyBand::AtLeast(n), Some(o)) => o >= n,
            (_, None) => false,
        }
    }
}

/// One (predicate, probability) rule of an appliance step.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceRule {
    pub band: OccupancyBand,
    pub probability: f64,
}

impl ApplianceRule {
    pub const fn new(band: OccupancyBand, probability: f64) -> Self {
        Self { band, probability }
    }
}

/// Ownership rules for one appliance in the chain.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceStep {
    /// Flag set on success.
    pub appliance: HouseholdFlag,
    /// The step is skipped for households that already own this appliance.
    #[serde(default)]
    pub requires_absent: Option<HouseholdFlag>,
    /// Rules evaluated in order; the first matching rule decides.
    pub rules: Vec<ApplianceRule>,
}

impl ApplianceStep {
    /// Probability that applies to `household`, if any rule fires.
    pub fn applicable_probability(&self, household: &HouseholdAgent) -> Option<f64> {
        if self
            .requires_absent
            .is_some_and(|blocker| household.flag(blocker))
        {
            return None;
        }
        let occupants = household.num_occupants();
        self.rules
            .iter()
            .find(|rule| rule.band.matches(occupants))
            .map(|rule| rule.probability)
    }
}

/// Ordered appliance ownership chain.
///
/// Washer-dryers are only rolled for households without a washing machine
/// and tumble dryers only for households without a washer-dryer, which
/// models substitution between wet appliances.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplianceChain {
    steps: Vec<ApplianceStep>,
}

impl Default for ApplianceChain {
    fn default() -> Self {
        use OccupancyBand::{AtLeast, Exactly};
        Self {
            steps: vec![
                ApplianceStep {
                    appliance: HouseholdFlag::WashingMachine,
                    requires_absent: None,
                    rules: vec![
                        ApplianceRule::new(AtLeast(2), 0.85),
                        ApplianceRule::new(Exactly(1), 0.62),
                    ],
                },
                ApplianceStep {
                    appliance: HouseholdFlag::WasherDryer,
                    requires_absent: Some(HouseholdFlag::WashingMachine),
                    rules: vec![
                        ApplianceRule::new(AtLeast(2), 0.75),
                        ApplianceRule::new(Exactly(1), 0.55),
                    ],
                },
                ApplianceStep {
                    appliance: HouseholdFlag::TumbleDryer,
                    requires_absent: Some(HouseholdFlag::WasherDryer),
                    rules: vec![
                        ApplianceRule::new(AtLeast(3), 0.70),
                        ApplianceRule::new(Exactly(2), 0.45),
                        ApplianceRule::new(Exactly(1), 0.35),
                    ],
                },
                ApplianceStep {
                    appliance: HouseholdFlag::DishWasher,
                    requires_absent: None,
                    rules: vec![
                        ApplianceRule::new(AtLeast(3), 0.55),
                        ApplianceRule::new(Exactly(2), 0.25),
                        ApplianceRule::new(Exactly(1), 0.20),
                    ],
                },
            ],
        }
    }
}

impl ApplianceChain {
    /// Builds a chain from explicit steps, validating every probability.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidParameter`] if a rule probability is
    /// outside [0, 1].
    pub fn new(steps: Vec<ApplianceStep>) -> Result<Self, BuildError> {
        for step in &steps {
            for rule in &step.rules {
                check_probability(step.appliance.name(), rule.probability)?;
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ApplianceStep] {
        &self.steps
    }

    /// Runs the chain over one household.
    ///
    /// Steps run in declared order, so each step sees the flags set by the
    /// steps before it. A Bernoulli trial is drawn only when a rule applies.
    pub fn assign_household<R: Rng + ?Sized>(&self, household: &mut HouseholdAgent, rng: &mut R) {
        for step in &self.steps {
            if let Some(p) = step.applicable_probability(household) {
                if rng.random::<f64>() < p {
                    household.set_flag(step.appliance);
                }
            }
        }
    }

    /// Runs the chain over every household in the population.
    pub fn assign<R: Rng + ?Sized>(&self, population: &mut Population, rng: &mut R) {
        for (_, household) in population.households_mut() {
            self.assign_household(household, rng);
        }
    }
}

/// Number of households selected for a fraction of `population_size`.
pub fn subset_size(population_size: usize, fraction: f64) -> usize {
    (population_size as f64 * fraction).round() as usize
}

/// Switches `flag` on for a uniformly random subset of households.
///
/// Exactly `round(households × fraction)` distinct households are chosen.
/// Separate calls are independent, so two flags may overlap freely.
///
/// # Errors
///
/// Returns [`BuildError::InvalidParameter`] if `fraction` is outside [0, 1].
pub fn assign_subset_fraction<R: Rng + ?Sized>(
    population: &mut Population,
    flag: HouseholdFlag,
    fraction: f64,
    rng: &mut R,
) -> Result<usize, BuildError> {
    check_probability(flag.name(), fraction)?;
    let ids = population.household_ids();
    let amount = subset_size(ids.len(), fraction).min(ids.len());
    for index in rand::seq::index::sample(rng, ids.len(), amount) {
        if let Some(household) = population.household_mut(ids[index]) {
            household.set_flag(flag);
        }
    }
    debug!(attribute = flag.name(), selected = amount, "subset attribute assigned");
    Ok(amount)
}
