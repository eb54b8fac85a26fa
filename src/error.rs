//! Error taxonomy for the one-shot context build.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::network::NetworkError;

/// Fatal errors raised while building the simulation context.
///
/// Every variant carries the offending file path or parameter name so the
/// operator can act on it. None of these are retried.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An input file does not exist or cannot be opened.
    #[error("could not open input file \"{}\": {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A named column is absent or a cell cannot be coerced.
    #[error("data format error in \"{}\": {message}", path.display())]
    DataFormat { path: PathBuf, message: String },

    /// A run parameter or synthesis table entry is out of range.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter { name: String, message: String },

    /// The household attribute file has no `demand*` profile columns.
    #[error(
        "no demand profile columns in \"{}\" (expected headers `demand0`, `demand1`, ...)",
        path.display()
    )]
    InsufficientData { path: PathBuf },

    /// An edge referenced an agent outside the population.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl BuildError {
    pub(crate) fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidParameter {
            name: err.field,
            message: err.message,
        }
    }
}

/// A series whose length is not a whole number of simulated days.
///
/// Non-fatal: the build proceeds, but behavior at day boundaries may be
/// unexpected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentWarning {
    /// Series name (e.g. `"insolation"`).
    pub series: String,
    /// Number of samples in the series.
    pub len: usize,
    /// Ticks per simulated day the series was checked against.
    pub ticks_per_day: usize,
}

impl fmt::Display for AlignmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "series `{}` has {} samples, not a whole number of days at {} ticks/day",
            self.series, self.len, self.ticks_per_day
        )
    }
}
