use std::sync::Arc;

/// Aggregator mediating price and information exchange with prosumers.
#[derive(Debug, Clone)]
pub struct AggregatorAgent {
    /// Shared system price/demand signal.
    pub price_signal: Arc<[f32]>,
}

impl AggregatorAgent {
    pub fn new(price_signal: Arc<[f32]>) -> Self {
        Self { price_signal }
    }
}
