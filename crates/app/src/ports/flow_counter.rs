//! Flow counter port: reading a shared water meter.

use irrigator_domain::counter::CounterId;

/// A water meter shared by every faucet configured with its [`CounterId`].
pub trait FlowCounter: Send + Sync {
    /// Key faucets use to reference this counter.
    fn counter_id(&self) -> &CounterId;

    /// Current flow reading.
    ///
    /// # Errors
    ///
    /// Returns [`CounterReadError`] if the meter could not be read.
    fn read_flow(&self) -> Result<f64, CounterReadError>;
}

/// A flow counter could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to read flow counter {counter}")]
pub struct CounterReadError {
    /// Counter that was read.
    pub counter: CounterId,
    /// Underlying failure.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl CounterReadError {
    pub fn new(
        counter: CounterId,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            counter,
            source: source.into(),
        }
    }
}
