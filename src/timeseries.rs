//! External time-series inputs shared read-only by every agent.

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use crate::config::RunParameters;
use crate::error::{AlignmentWarning, BuildError};
use crate::io::TabularFile;

/// Header prefix of household baseline demand profile columns.
pub const DEMAND_PROFILE_PREFIX: &str = "demand";

/// Loads one named column of a file as a float series.
///
/// # Errors
///
/// Returns [`BuildError::MissingFile`] if the file is absent and
/// [`BuildError::DataFormat`] if the column is absent or malformed.
pub fn load(series_name: &str, source_path: &Path) -> Result<Vec<f32>, BuildError> {
    TabularFile::from_path(source_path)?.column_f32(series_name)
}

/// `true` when `series` covers a whole number of days.
///
/// An empty series is aligned; `ticks_per_day == 0` never is.
pub fn validate_daily_alignment(series: &[f32], ticks_per_day: usize) -> bool {
    ticks_per_day > 0 && series.len() % ticks_per_day == 0
}

/// Checks alignment and logs a warning when it fails.
pub fn check_alignment(
    name: &str,
    series: &[f32],
    ticks_per_day: usize,
) -> Option<AlignmentWarning> {
    if validate_daily_alignment(series, ticks_per_day) {
        return None;
    }
    let warning = AlignmentWarning {
        series: name.to_string(),
        len: series.len(),
        ticks_per_day,
    };
    warn!("{warning}; this may cause unexpected behaviour at day boundaries");
    Some(warning)
}

/// Picks one profile column uniformly at random.
///
/// # Errors
///
/// Returns [`BuildError::InsufficientData`] if the file has no
/// `demand*` columns.
pub fn select_demand_profile<'a, R: Rng + ?Sized>(
    file: &'a TabularFile,
    rng: &mut R,
) -> Result<&'a str, BuildError> {
    let candidates = file.columns_starting(DEMAND_PROFILE_PREFIX);
    if candidates.is_empty() {
        return Err(BuildError::InsufficientData {
            path: file.path().to_path_buf(),
        });
    }
    Ok(candidates[rng.random_range(0..candidates.len())])
}

/// Parsed external series for one build.
#[derive(Debug, Clone)]
pub struct TimeSeriesStore {
    pub insolation: Arc<[f32]>,
    pub wind_speed: Arc<[f32]>,
    pub air_temperature: Arc<[f32]>,
    /// System price/demand signal handed to aggregators.
    pub system_price_signal: Arc<[f32]>,
    /// The baseline profile shared by all households.
    pub household_base_demand: Arc<[f32]>,
    /// Column name the baseline profile was taken from.
    pub base_profile_name: String,
    /// Number of `demand*` columns that were available.
    pub profile_count: usize,
}

impl TimeSeriesStore {
    /// Reads every input series named by `params`.
    ///
    /// Returns the store and any alignment warnings; warnings never stop
    /// the build.
    ///
    /// # Errors
    ///
    /// Fails on a missing file, missing column, malformed cell, or a
    /// household attribute file without profile columns.
    pub fn load<R: Rng + ?Sized>(
        params: &RunParameters,
        rng: &mut R,
    ) -> Result<(Self, Vec<AlignmentWarning>), BuildError> {
        let ticks = params.ticks_per_day;
        let mut warnings = Vec::new();

        let weather = TabularFile::from_path(&params.data_path(&params.weather_file))?;
        let insolation = weather.column_f32("insolation")?;
        let wind_speed = weather.column_f32("windSpeed")?;
        let air_temperature = weather.column_f32("airTemp")?;
        warnings.extend(check_alignment("weather", &insolation, ticks));

        let system_price_signal = load(
            "demand",
            &params.data_path(&params.system_base_demand_file),
        )?;
        warnings.extend(check_alignment("systemDemand", &system_price_signal, ticks));

        let households =
            TabularFile::from_path(&params.data_path(&params.household_base_attribute_file))?;
        let profile_count = households.columns_starting(DEMAND_PROFILE_PREFIX).len();
        let base_profile_name = select_demand_profile(&households, rng)?.to_string();
        let household_base_demand = households.column_f32(&base_profile_name)?;
        warnings.extend(check_alignment(&base_profile_name, &household_base_demand, ticks));
        if params.verbose_output {
            info!(profile = %base_profile_name, "household base demand initialised");
        }

        let store = Self {
            insolation: Arc::from(insolation),
            wind_speed: Arc::from(wind_speed),
            air_temperature: Arc::from(air_temperature),
            system_price_signal: Arc::from(system_price_signal),
            household_base_demand: Arc::from(household_base_demand),
            base_profile_name,
            profile_count,
        };
        Ok((store, warnings))
    }
}
