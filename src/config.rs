//! TOML-based build configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::agents::GeneratorKind;
use crate::error::BuildError;
use crate::network::COMMON_INTEREST_GROUP_EDGE_WEIGHT;
use crate::synth::attributes::{
    ApplianceChain, ApplianceStep, DEFAULT_OCCUPANCY_PROBABILITIES, DEFAULT_OCCUPANCY_VALUES,
    DiscreteDistribution,
};

/// Top-level build configuration parsed from TOML.
///
/// All sections have defaults matching the baseline run. Load from TOML
/// with [`BuildConfig::from_toml_file`] or use [`BuildConfig::baseline`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Input files and run-level parameters.
    #[serde(default)]
    pub run: RunParameters,
    /// Occupancy and appliance ownership tables.
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    /// Small-world social network parameters.
    #[serde(default)]
    pub social: SocialConfig,
    /// The single pure generator.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Run parameters, keyed by their external names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RunParameters {
    /// Base folder all data file names are resolved against.
    pub data_file_folder: PathBuf,
    /// Weather file with `insolation`, `windSpeed` and `airTemp` columns.
    pub weather_file: String,
    /// System demand file with a `demand` column.
    pub system_base_demand_file: String,
    /// Household attribute file with `demand0`, `demand1`, ... columns.
    pub household_base_attribute_file: String,
    /// Electrical network layout file. Not read yet.
    pub electrical_network_layout_file: String,
    /// Number of household prosumers to create.
    pub default_prosumers_per_feeder: u32,
    /// Time discretization of every input series.
    pub ticks_per_day: usize,
    /// Emit population diagnostics while building.
    pub verbose_output: bool,
    /// Fraction of households with electric water heating (0.0–1.0).
    pub elec_water_fraction: f64,
    /// Fraction of households with electric space heating (0.0–1.0).
    pub elec_space_fraction: f64,
    /// DEFRA category definitions file.
    pub defra_categories: String,
    /// DEFRA per-category demand profile file.
    pub defra_profiles: String,
    /// Random seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            data_file_folder: PathBuf::from("data"),
            weather_file: "weather.csv".to_string(),
            system_base_demand_file: "system_demand.csv".to_string(),
            household_base_attribute_file: "household_demand.csv".to_string(),
            electrical_network_layout_file: "network_layout.csv".to_string(),
            default_prosumers_per_feeder: 100,
            ticks_per_day: 48,
            verbose_output: false,
            elec_water_fraction: 0.3,
            elec_space_fraction: 0.1,
            defra_categories: "defra_categories.csv".to_string(),
            defra_profiles: "defra_profiles.csv".to_string(),
            seed: None,
        }
    }
}

impl RunParameters {
    /// Resolves a data file name against `dataFileFolder`.
    pub fn data_path(&self, file_name: &str) -> PathBuf {
        self.data_file_folder.join(file_name)
    }
}

/// Occupancy distribution table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OccupancyConfig {
    /// Household sizes.
    pub values: Vec<u8>,
    /// Probability of each size; any remaining mass leaves occupancy unset.
    pub probabilities: Vec<f64>,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            values: DEFAULT_OCCUPANCY_VALUES.to_vec(),
            probabilities: DEFAULT_OCCUPANCY_PROBABILITIES.to_vec(),
        }
    }
}

/// Attribute synthesis tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisConfig {
    pub occupancy: OccupancyConfig,
    /// Appliance chain, evaluated in order.
    pub appliances: Vec<ApplianceStep>,
    /// Weight of edges inside the DEFRA category 1 clique.
    pub common_interest_weight: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            occupancy: OccupancyConfig::default(),
            appliances: ApplianceChain::default().steps().to_vec(),
            common_interest_weight: COMMON_INTEREST_GROUP_EDGE_WEIGHT,
        }
    }
}

impl SynthesisConfig {
    /// Validated occupancy distribution.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidParameter`] on a malformed table.
    pub fn occupancy_distribution(&self) -> Result<DiscreteDistribution, BuildError> {
        DiscreteDistribution::new(
            "synthesis.occupancy",
            self.occupancy.values.clone(),
            self.occupancy.probabilities.clone(),
        )
    }

    /// Validated appliance chain.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidParameter`] on a probability outside [0, 1].
    pub fn appliance_chain(&self) -> Result<ApplianceChain, BuildError> {
        ApplianceChain::new(self.appliances.clone())
    }
}

/// Small-world social network parameters. The graph is always directed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialConfig {
    /// Mean degree of the ring lattice before rewiring.
    pub degree: usize,
    /// Rewiring probability.
    pub beta: f64,
    /// Add the reverse of every lattice edge, and rewire both together.
    pub symmetric: bool,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            degree: 2,
            beta: 0.1,
            symmetric: true,
        }
    }
}

/// The pure generator added alongside the households.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Nominal capacity (kW).
    pub capacity_kw: f64,
    /// Generation technology.
    pub kind: GeneratorKind,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            capacity_kw: 2000.0,
            kind: GeneratorKind::Wind,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"run.elecWaterFraction"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

fn push_probability(errors: &mut Vec<ConfigError>, field: &str, p: f64) {
    if !(p.is_finite() && (0.0..=1.0).contains(&p)) {
        errors.push(ConfigError {
            field: field.to_string(),
            message: format!("must be in [0.0, 1.0], got {p}"),
        });
    }
}

impl BuildConfig {
    /// Returns the baseline configuration.
    pub fn baseline() -> Self {
        Self {
            run: RunParameters::default(),
            synthesis: SynthesisConfig::default(),
            social: SocialConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }

    /// Returns the electrified preset: high uptake of electric heating.
    pub fn electrified() -> Self {
        Self {
            run: RunParameters {
                elec_water_fraction: 0.6,
                elec_space_fraction: 0.4,
                ..RunParameters::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the large-feeder preset: a thousand households and a bigger wind farm.
    pub fn large_feeder() -> Self {
        Self {
            run: RunParameters {
                default_prosumers_per_feeder: 1000,
                ..RunParameters::default()
            },
            generator: GeneratorConfig {
                capacity_kw: 10_000.0,
                ..GeneratorConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "electrified", "large_feeder"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "electrified" => Ok(Self::electrified()),
            "large_feeder" => Ok(Self::large_feeder()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let r = &self.run;

        if r.ticks_per_day == 0 {
            errors.push(ConfigError {
                field: "run.ticksPerDay".into(),
                message: "must be > 0".into(),
            });
        }
        push_probability(&mut errors, "run.elecWaterFraction", r.elec_water_fraction);
        push_probability(&mut errors, "run.elecSpaceFraction", r.elec_space_fraction);

        let occ = &self.synthesis.occupancy;
        if occ.values.len() != occ.probabilities.len() {
            errors.push(ConfigError {
                field: "synthesis.occupancy".into(),
                message: format!(
                    "{} values but {} probabilities",
                    occ.values.len(),
                    occ.probabilities.len()
                ),
            });
        }
        if let Some(v) = occ.values.iter().find(|v| !(1..=8).contains(*v)) {
            errors.push(ConfigError {
                field: "synthesis.occupancy.values".into(),
                message: format!("must be in 1..=8, got {v}"),
            });
        }
        for (i, &p) in occ.probabilities.iter().enumerate() {
            push_probability(
                &mut errors,
                &format!("synthesis.occupancy.probabilities[{i}]"),
                p,
            );
        }
        let total: f64 = occ.probabilities.iter().sum();
        if total > 1.0 + 1e-9 {
            errors.push(ConfigError {
                field: "synthesis.occupancy.probabilities".into(),
                message: format!("must sum to at most 1.0, got {total}"),
            });
        }

        for (i, step) in self.synthesis.appliances.iter().enumerate() {
            for (j, rule) in step.rules.iter().enumerate() {
                push_probability(
                    &mut errors,
                    &format!("synthesis.appliances[{i}].rules[{j}].probability"),
                    rule.probability,
                );
            }
        }
        let w = self.synthesis.common_interest_weight;
        if !(w.is_finite() && (0.0..1.0).contains(&w)) {
            errors.push(ConfigError {
                field: "synthesis.common_interest_weight".into(),
                message: format!("must be in [0.0, 1.0), got {w}"),
            });
        }

        let s = &self.social;
        if s.degree < 2 {
            errors.push(ConfigError {
                field: "social.degree".into(),
                message: "must be >= 2".into(),
            });
        } else if s.degree % 2 != 0 {
            errors.push(ConfigError {
                field: "social.degree".into(),
                message: format!("must be even, got {}", s.degree),
            });
        }
        push_probability(&mut errors, "social.beta", s.beta);

        let g = &self.generator;
        if !(g.capacity_kw.is_finite() && g.capacity_kw > 0.0) {
            errors.push(ConfigError {
                field: "generator.capacity_kw".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}
