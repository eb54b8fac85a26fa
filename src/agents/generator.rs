use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

/// Generation technology of a pure generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Wind,
    Solar,
    Hydro,
    Gas,
    Coal,
    Nuclear,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GeneratorKind::Wind => "wind",
            GeneratorKind::Solar => "solar",
            GeneratorKind::Hydro => "hydro",
            GeneratorKind::Gas => "gas",
            GeneratorKind::Coal => "coal",
            GeneratorKind::Nuclear => "nuclear",
        };
        f.write_str(s)
    }
}

/// A pure generator prosumer (produces, never consumes).
#[derive(Debug, Clone)]
pub struct GeneratorAgent {
    /// Nominal capacity in kilowatts.
    pub capacity_kw: f64,
    /// Generation technology.
    pub kind: GeneratorKind,
    /// Weather series driving output (wind speed for wind, insolation for
    /// solar). `None` for dispatchable plant.
    pub resource: Option<Arc<[f32]>>,
}

impl GeneratorAgent {
    pub fn new(capacity_kw: f64, kind: GeneratorKind) -> Self {
        Self {
            capacity_kw,
            kind,
            resource: None,
        }
    }

    /// Binds the weather series this generator's output follows.
    pub fn with_resource(mut self, series: Arc<[f32]>) -> Self {
        self.resource = Some(series);
        self
    }
}
