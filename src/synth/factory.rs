//! Creation of household, generator and aggregator agents.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use super::attributes::DiscreteDistribution;
use crate::agents::{AggregatorAgent, GeneratorAgent, GeneratorKind, HouseholdAgent};
use crate::error::{AlignmentWarning, BuildError};
use crate::io::TabularFile;
use crate::timeseries::{TimeSeriesStore, check_alignment};

/// Header prefix of per-category profile columns (`profile1`, `profile2`, ...).
pub const CATEGORY_PROFILE_PREFIX: &str = "profile";

/// DEFRA category shares and optional per-category demand profiles.
#[derive(Debug, Clone)]
pub struct DefraInputs {
    distribution: DiscreteDistribution,
    profiles: BTreeMap<u8, Arc<[f32]>>,
}

impl DefraInputs {
    /// Reads the category and profile files.
    ///
    /// # Errors
    ///
    /// Fails if either file is missing or malformed; see [`DefraInputs::from_tables`].
    pub fn load(categories_path: &Path, profiles_path: &Path) -> Result<Self, BuildError> {
        let categories = TabularFile::from_path(categories_path)?;
        let profiles = TabularFile::from_path(profiles_path)?;
        Self::from_tables(&categories, &profiles)
    }

    /// Builds inputs from parsed tables.
    ///
    /// The category table needs `category` (1–255) and `proportion`
    /// (non-negative weight) columns; proportions are normalized.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DataFormat`] on a missing column, a bad
    /// category number, a negative weight, or weights summing to zero.
    pub fn from_tables(categories: &TabularFile, profiles: &TabularFile) -> Result<Self, BuildError> {
        let format_err = |file: &TabularFile, message: String| BuildError::DataFormat {
            path: file.path().to_path_buf(),
            message,
        };

        let ids = categories.column("category")?;
        let weights = categories.column_f32("proportion")?;
        let mut values = Vec::with_capacity(ids.len());
        for (row, cell) in ids.iter().enumerate() {
            let id = cell
                .parse::<u8>()
                .ok()
                .filter(|&c| c > 0)
                .ok_or_else(|| {
                    format_err(
                        categories,
                        format!("column `category`, row {}: `{cell}` is not a category number", row + 2),
                    )
                })?;
            values.push(id);
        }
        if let Some(w) = weights.iter().find(|w| **w < 0.0) {
            return Err(format_err(
                categories,
                format!("column `proportion` has negative weight {w}"),
            ));
        }
        let total: f64 = weights.iter().map(|&w| f64::from(w)).sum();
        if total <= 0.0 {
            return Err(format_err(
                categories,
                "category proportions sum to zero".to_string(),
            ));
        }
        let probabilities = weights.iter().map(|&w| f64::from(w) / total).collect();
        let distribution = DiscreteDistribution::new("defraCategories", values, probabilities)
            .map_err(|e| format_err(categories, e.to_string()))?;

        let mut by_category: BTreeMap<u8, Arc<[f32]>> = BTreeMap::new();
        for name in profiles.columns_starting(CATEGORY_PROFILE_PREFIX) {
            let Ok(category) = name[CATEGORY_PROFILE_PREFIX.len()..].parse::<u8>() else {
                continue;
            };
            by_category.insert(category, Arc::from(profiles.column_f32(name)?));
        }

        Ok(Self {
            distribution,
            profiles: by_category,
        })
    }

    /// Categories that can be drawn, in file order.
    pub fn categories(&self) -> &[u8] {
        self.distribution.values()
    }

    /// Shared demand profile of `category`, if one was supplied.
    pub fn profile(&self, category: u8) -> Option<&Arc<[f32]>> {
        self.profiles.get(&category)
    }

    /// Alignment warnings for every category profile, in category order.
    pub fn check_alignment(&self, ticks_per_day: usize) -> Vec<AlignmentWarning> {
        self.profiles
            .iter()
            .filter_map(|(category, profile)| {
                check_alignment(
                    &format!("{CATEGORY_PROFILE_PREFIX}{category}"),
                    profile,
                    ticks_per_day,
                )
            })
            .collect()
    }

    /// Draws a category; rounding slack falls to the last category.
    pub fn sample_category<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        self.distribution
            .sample(rng)
            .or_else(|| self.distribution.values().last().copied())
            .unwrap_or(1)
    }
}

/// Creates agents bound to the loaded time series.
#[derive(Debug, Clone, Copy)]
pub struct PopulationFactory<'a> {
    store: &'a TimeSeriesStore,
}

impl<'a> PopulationFactory<'a> {
    pub fn new(store: &'a TimeSeriesStore) -> Self {
        Self { store }
    }

    /// Creates `count` households with drawn DEFRA categories.
    ///
    /// Every household shares the store's baseline profile; households whose
    /// category has a profile column also share that profile.
    pub fn create_defra_households<R: Rng + ?Sized>(
        &self,
        count: usize,
        defra: &DefraInputs,
        rng: &mut R,
    ) -> Vec<HouseholdAgent> {
        let households: Vec<HouseholdAgent> = (0..count)
            .map(|_| {
                let category = defra.sample_category(rng);
                let household =
                    HouseholdAgent::new(category, Arc::clone(&self.store.household_base_demand));
                match defra.profile(category) {
                    Some(profile) => household.with_category_profile(Arc::clone(profile)),
                    None => household,
                }
            })
            .collect();
        debug!(count = households.len(), "DEFRA households created");
        households
    }

    /// Creates a generator, binding the weather series its type follows.
    pub fn create_pure_generator(&self, capacity_kw: f64, kind: GeneratorKind) -> GeneratorAgent {
        let generator = GeneratorAgent::new(capacity_kw, kind);
        match kind {
            GeneratorKind::Wind => generator.with_resource(Arc::clone(&self.store.wind_speed)),
            GeneratorKind::Solar => generator.with_resource(Arc::clone(&self.store.insolation)),
            _ => generator,
        }
    }

    /// Creates an aggregator bound to the system price signal.
    pub fn create_aggregator(&self) -> AggregatorAgent {
        AggregatorAgent::new(Arc::clone(&self.store.system_price_signal))
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn table(name: &str, text: &str) -> TabularFile {
        TabularFile::from_reader(Path::new(name), text.as_bytes()).unwrap()
    }

    fn store() -> TimeSeriesStore {
        TimeSeriesStore {
            insolation: Arc::from(vec![0.0_f32, 1.0]),
            wind_speed: Arc::from(vec![5.0_f32, 6.0]),
            air_temperature: Arc::from(vec![10.0_f32, 11.0]),
            system_price_signal: Arc::from(vec![30.0_f32, 31.0]),
            household_base_demand: Arc::from(vec![0.2_f32, 0.3]),
            base_profile_name: "demand0".to_string(),
            profile_count: 1,
        }
    }

    fn defra() -> DefraInputs {
        DefraInputs::from_tables(
            &table("cats.csv", "category,proportion\n1,2\n2,1\n3,1\n"),
            &table("profiles.csv", "profile1,profile3,notes\n0.5,0.7,x\n0.6,0.8,y\n"),
        )
        .unwrap()
    }

    #[test]
    fn proportions_are_normalized() {
        let d = defra();
        assert_eq!(d.categories(), &[1, 2, 3]);
        assert!(d.profile(1).is_some());
        assert!(d.profile(2).is_none());
    }

    #[test]
    fn households_share_profiles() {
        let store = store();
        let factory = PopulationFactory::new(&store);
        let mut rng = StdRng::seed_from_u64(17);
        let households = factory.create_defra_households(200, &defra(), &mut rng);
        assert_eq!(households.len(), 200);
        for h in &households {
            assert!(Arc::ptr_eq(&h.base_demand, &store.household_base_demand));
            assert!([1, 2, 3].contains(&h.defra_category));
            assert_eq!(h.category_profile.is_some(), h.defra_category != 2);
        }
        let cat1 = households.iter().filter(|h| h.defra_category == 1).count();
        assert!(cat1 > 60 && cat1 < 140, "category 1 share off: {cat1}");
    }

    #[test]
    fn short_category_profiles_are_reported() {
        let d = defra();
        let warnings = d.check_alignment(2);
        assert!(warnings.is_empty());
        let warnings = d.check_alignment(3);
        let names: Vec<_> = warnings.iter().map(|w| w.series.as_str()).collect();
        assert_eq!(names, ["profile1", "profile3"]);
        assert!(warnings.iter().all(|w| w.len == 2));
    }

    #[test]
    fn zero_weight_categories_are_rejected() {
        let err = DefraInputs::from_tables(
            &table("cats.csv", "category,proportion\n1,0\n2,0\n"),
            &table("profiles.csv", "profile1\n0.5\n"),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::DataFormat { .. }));
    }

    #[test]
    fn bad_category_number_is_rejected() {
        let err = DefraInputs::from_tables(
            &table("cats.csv", "category,proportion\n0,1\n"),
            &table("profiles.csv", "profile1\n0.5\n"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("cats.csv"));
    }

    #[test]
    fn wind_generator_follows_wind_speed() {
        let store = store();
        let factory = PopulationFactory::new(&store);
        let wind = factory.create_pure_generator(2000.0, GeneratorKind::Wind);
        assert!(wind.resource.as_ref().is_some_and(|r| Arc::ptr_eq(r, &store.wind_speed)));
        let gas = factory.create_pure_generator(500.0, GeneratorKind::Gas);
        assert!(gas.resource.is_none());
    }

    #[test]
    fn aggregator_shares_price_signal() {
        let store = store();
        let agg = PopulationFactory::new(&store).create_aggregator();
        assert!(Arc::ptr_eq(&agg.price_signal, &store.system_price_signal));
    }
}
